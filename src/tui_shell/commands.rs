//! Command vocabulary of the shell: global commands plus verbs that depend on
//! the kind of the selected node.

use crate::model::SettingKey;
use crate::tree::{CredentialKind, NodeKind, TreeNode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct CommandDef {
    pub(super) name: &'static str,
    pub(super) aliases: &'static [&'static str],
    pub(super) usage: &'static str,
    pub(super) help: &'static str,
}

impl CommandDef {
    pub(super) fn matches(&self, word: &str) -> bool {
        self.name == word || self.aliases.contains(&word)
    }
}

/// Edits that run against the selected node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum EditAction {
    Rename,
    DeleteApplication,
    Manifest,
    Copy,
    OpenPortal,
    EditAppIdUri,
    RemoveAppIdUri,
    ChangeAudience,
    AddRedirectUri,
    EditRedirectUri,
    DeleteRedirectUri,
    AddPassword,
    DeletePassword,
    UploadCertificate,
    DeleteCertificate,
    AddPermission,
    EditPermission,
    DeletePermission,
    DeleteApi,
    AddScope,
    EditScope,
    EnableScope,
    DisableScope,
    DeleteScope,
    AddRole,
    EditRole,
    EnableRole,
    DisableRole,
    DeleteRole,
    AddOwner,
    RemoveOwner,
    OpenOwner,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Command {
    Help,
    Refresh,
    New,
    Filter,
    ClearFilter,
    Settings,
    Set { key: SettingKey, value: String },
    Login { tenant: Option<String> },
    Logout,
    Quit,
    Edit(EditAction),
}

const fn def(
    name: &'static str,
    aliases: &'static [&'static str],
    help: &'static str,
) -> CommandDef {
    CommandDef {
        name,
        aliases,
        usage: name,
        help,
    }
}

pub(super) fn global_command_defs() -> Vec<CommandDef> {
    vec![
        def("new", &["create"], "Register a new application"),
        def("refresh", &["r"], "Reload the application list"),
        def("filter", &[], "Show only names starting with a prefix"),
        def("unfilter", &["clear-filter"], "Remove the name filter"),
        def("settings", &[], "Show settings"),
        CommandDef {
            name: "set",
            aliases: &[],
            usage: "set <key> <value>",
            help: "Change a setting",
        },
        CommandDef {
            name: "login",
            aliases: &["signin"],
            usage: "login [tenant]",
            help: "Sign in through the Azure CLI",
        },
        def("logout", &["signout"], "Sign out of this session"),
        def("help", &["h", "?"], "Show help"),
        def("quit", &["exit"], "Exit"),
    ]
}

/// Verbs offered on `node`, each with the edit it runs.
pub(super) fn node_actions(node: &TreeNode) -> Vec<(CommandDef, EditAction)> {
    use EditAction as A;

    let edit = |help| def("edit", &[], help);
    let delete = |help| def("delete", &["rm"], help);
    let add = |help| def("add", &[], help);
    let toggle = |enabled: Option<bool>, on: EditAction, off: EditAction| {
        if enabled == Some(false) {
            (def("enable", &[], "Enable it"), on)
        } else {
            (def("disable", &[], "Disable it (required before delete)"), off)
        }
    };

    let mut out = match &node.kind {
        NodeKind::Application => vec![
            (def("rename", &[], "Rename the application"), A::Rename),
            (delete("Delete the application"), A::DeleteApplication),
            (def("manifest", &[], "View the full JSON"), A::Manifest),
            (def("open", &[], "Open in the Azure portal"), A::OpenPortal),
        ],
        NodeKind::ClientId => vec![(def("open", &[], "Open in the Azure portal"), A::OpenPortal)],
        NodeKind::AppIdUri => {
            let mut v = vec![(edit("Set the application ID URI"), A::EditAppIdUri)];
            if node.value.is_some() {
                v.push((delete("Remove the application ID URI"), A::RemoveAppIdUri));
            }
            v
        }
        NodeKind::SignInAudience => {
            vec![(edit("Change the supported account types"), A::ChangeAudience)]
        }
        NodeKind::RedirectUriGroup(_) => vec![(add("Add a redirect URI"), A::AddRedirectUri)],
        NodeKind::RedirectUri(_) => vec![
            (edit("Change this redirect URI"), A::EditRedirectUri),
            (delete("Remove this redirect URI"), A::DeleteRedirectUri),
        ],
        NodeKind::CredentialGroup(CredentialKind::Password) => {
            vec![(add("Create a client secret"), A::AddPassword)]
        }
        NodeKind::CredentialGroup(CredentialKind::Certificate) => vec![(
            def("upload", &["add"], "Upload a certificate file"),
            A::UploadCertificate,
        )],
        NodeKind::Credential(CredentialKind::Password) => {
            vec![(delete("Delete this client secret"), A::DeletePassword)]
        }
        NodeKind::Credential(CredentialKind::Certificate) => {
            vec![(delete("Delete this certificate"), A::DeleteCertificate)]
        }
        NodeKind::ApiPermissions => vec![(add("Request a permission"), A::AddPermission)],
        NodeKind::ApiResource => vec![
            (add("Request another permission on this API"), A::AddPermission),
            (delete("Remove every permission on this API"), A::DeleteApi),
        ],
        NodeKind::ApiPermission { .. } => vec![
            (edit("Swap for another permission"), A::EditPermission),
            (delete("Remove this permission"), A::DeletePermission),
        ],
        NodeKind::ExposedScopes => vec![(add("Expose a new scope"), A::AddScope)],
        NodeKind::ExposedScope => vec![
            (edit("Edit this scope"), A::EditScope),
            toggle(node.enabled, A::EnableScope, A::DisableScope),
            (delete("Delete this scope (must be disabled)"), A::DeleteScope),
        ],
        NodeKind::AppRoles => vec![(add("Create an app role"), A::AddRole)],
        NodeKind::AppRole => vec![
            (edit("Edit this role"), A::EditRole),
            toggle(node.enabled, A::EnableRole, A::DisableRole),
            (delete("Delete this role (must be disabled)"), A::DeleteRole),
        ],
        NodeKind::Owners => vec![(add("Add an owner"), A::AddOwner)],
        NodeKind::Owner => vec![
            (delete("Remove this owner"), A::RemoveOwner),
            (def("open", &[], "Open the user in the Azure portal"), A::OpenOwner),
        ],
        NodeKind::SignIn | NodeKind::RedirectUris | NodeKind::Credentials | NodeKind::Detail => {
            Vec::new()
        }
    };
    if node.value.as_deref().is_some_and(|v| !v.is_empty()) {
        out.push((def("copy", &["y"], "Copy the value"), A::Copy));
    }
    out
}

/// Node verbs first, then global commands.
pub(super) fn available_command_defs(node: Option<&TreeNode>) -> Vec<CommandDef> {
    let mut out: Vec<CommandDef> = node
        .map(|n| node_actions(n).into_iter().map(|(d, _)| d).collect())
        .unwrap_or_default();
    out.extend(global_command_defs());
    out
}

const NODE_VERBS: &[&str] = &[
    "add", "copy", "delete", "disable", "edit", "enable", "manifest", "open", "rename", "rm",
    "upload", "y",
];

pub(super) fn parse_command(line: &str, node: Option<&TreeNode>) -> Result<Command, String> {
    let line = line.trim().trim_start_matches('/').trim_start();
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Err("empty command".to_string());
    };

    if let Some(n) = node
        && let Some((_, action)) = node_actions(n).into_iter().find(|(d, _)| d.matches(word))
    {
        return Ok(Command::Edit(action));
    }

    let Some(cmd) = global_command_defs().into_iter().find(|d| d.matches(word)) else {
        return Err(match node {
            Some(n) if NODE_VERBS.contains(&word) => {
                format!("`{}` is not available on {}", word, n.label)
            }
            None if NODE_VERBS.contains(&word) => format!("select a node to `{}`", word),
            _ => format!("unknown command: {}", word),
        });
    };

    let rest: Vec<&str> = words.collect();
    Ok(match cmd.name {
        "new" => Command::New,
        "refresh" => Command::Refresh,
        "filter" => Command::Filter,
        "unfilter" => Command::ClearFilter,
        "settings" => Command::Settings,
        "set" => {
            let [key, value @ ..] = rest.as_slice() else {
                return Err(format!("usage: {}", cmd.usage));
            };
            if value.is_empty() {
                return Err(format!("usage: {}", cmd.usage));
            }
            let key = SettingKey::parse(key).ok_or_else(|| format!("unknown setting: {}", key))?;
            Command::Set {
                key,
                value: value.join(" "),
            }
        }
        "login" => Command::Login {
            tenant: rest.first().map(|t| t.to_string()),
        },
        "logout" => Command::Logout,
        "help" => Command::Help,
        "quit" => Command::Quit,
        other => return Err(format!("unknown command: {}", other)),
    })
}

#[cfg(test)]
#[path = "../tests/tui_shell/commands_tests.rs"]
mod tests;
