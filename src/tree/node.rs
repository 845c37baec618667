use crate::model::{AccessType, Platform};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    Password,
    Certificate,
}

impl CredentialKind {
    pub fn group_label(self) -> &'static str {
        match self {
            CredentialKind::Password => "Client Secrets",
            CredentialKind::Certificate => "Certificates",
        }
    }
}

/// What a node represents. Expansion and command availability match on this exhaustively.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    SignIn,
    Application,
    ClientId,
    AppIdUri,
    SignInAudience,
    RedirectUris,
    RedirectUriGroup(Platform),
    RedirectUri(Platform),
    Credentials,
    CredentialGroup(CredentialKind),
    Credential(CredentialKind),
    ApiPermissions,
    ApiResource,
    ApiPermission {
        resource_app_id: String,
        access: AccessType,
    },
    ExposedScopes,
    ExposedScope,
    AppRoles,
    AppRole,
    Owners,
    Owner,
    Detail,
}

impl NodeKind {
    /// Kinds whose children come from a remote fetch on expansion.
    pub fn is_lazy_group(&self) -> bool {
        match self {
            NodeKind::RedirectUriGroup(_)
            | NodeKind::CredentialGroup(_)
            | NodeKind::ApiPermissions
            | NodeKind::ExposedScopes
            | NodeKind::AppRoles
            | NodeKind::Owners => true,
            NodeKind::SignIn
            | NodeKind::Application
            | NodeKind::ClientId
            | NodeKind::AppIdUri
            | NodeKind::SignInAudience
            | NodeKind::RedirectUris
            | NodeKind::RedirectUri(_)
            | NodeKind::Credentials
            | NodeKind::Credential(_)
            | NodeKind::ApiResource
            | NodeKind::ApiPermission { .. }
            | NodeKind::ExposedScope
            | NodeKind::AppRole
            | NodeKind::Owner
            | NodeKind::Detail => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    SignIn,
    Application,
    Folder,
    Identifier,
    Link,
    Key,
    Certificate,
    Expired,
    Permission,
    Scope,
    Role,
    Disabled,
    Person,
    Info,
    Loading,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::SignIn => "→",
            Icon::Application => "▣",
            Icon::Folder => "▤",
            Icon::Identifier => "#",
            Icon::Link => "↗",
            Icon::Key => "⚿",
            Icon::Certificate => "✎",
            Icon::Expired => "⚠",
            Icon::Permission => "◆",
            Icon::Scope => "◇",
            Icon::Role => "●",
            Icon::Disabled => "○",
            Icon::Person => "☺",
            Icon::Info => "·",
            Icon::Loading => "…",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Children {
    /// No expand arrow.
    Leaf,
    /// Expandable; children are fetched on first expansion.
    Lazy,
    Loaded(Vec<TreeNode>),
}

impl Children {
    pub fn is_expandable(&self) -> bool {
        match self {
            Children::Leaf => false,
            Children::Lazy => true,
            Children::Loaded(nodes) => !nodes.is_empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub label: String,
    pub kind: NodeKind,
    pub icon: Icon,
    /// Text offered by copy and used to prefill edits.
    pub value: Option<String>,
    /// Object id of the owning application.
    pub object_id: Option<String>,
    /// Client id of the owning application.
    pub app_id: Option<String>,
    /// Id of the represented entity: role, scope, credential key, owner, or resource app.
    pub entity_id: Option<String>,
    pub enabled: Option<bool>,
    pub tooltip: Option<String>,
    pub children: Children,
    pub expanded: bool,
}

impl TreeNode {
    pub fn new(kind: NodeKind, label: impl Into<String>, icon: Icon) -> Self {
        Self {
            label: label.into(),
            kind,
            icon,
            value: None,
            object_id: None,
            app_id: None,
            entity_id: None,
            enabled: None,
            tooltip: None,
            children: Children::Leaf,
            expanded: false,
        }
    }

    pub fn detail(label: impl Into<String>) -> Self {
        Self::new(NodeKind::Detail, label, Icon::Info)
    }

    pub fn sign_in() -> Self {
        let mut node = Self::new(NodeKind::SignIn, "Sign in to Azure CLI", Icon::SignIn);
        node.tooltip = Some("Run `az login` to browse application registrations".to_string());
        node
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_entity(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        if !enabled {
            self.icon = Icon::Disabled;
        }
        self
    }

    pub fn with_children(mut self, children: Children) -> Self {
        self.children = children;
        self
    }

    /// Attach the owning application to this node and every loaded descendant.
    pub fn owned_by(mut self, object_id: &str, app_id: Option<&str>) -> Self {
        self.adopt(object_id, app_id);
        self
    }

    fn adopt(&mut self, object_id: &str, app_id: Option<&str>) {
        self.object_id = Some(object_id.to_string());
        self.app_id = app_id.map(str::to_string);
        if let Children::Loaded(children) = &mut self.children {
            for c in children {
                c.adopt(object_id, app_id);
            }
        }
    }

    /// `Lazy` when the backing collection has entries, `Leaf` otherwise.
    pub fn lazy_if(mut self, has_entries: bool) -> Self {
        self.children = if has_entries {
            Children::Lazy
        } else {
            Children::Leaf
        };
        self
    }

    pub fn loaded_children(&self) -> &[TreeNode] {
        match &self.children {
            Children::Loaded(nodes) => nodes,
            Children::Leaf | Children::Lazy => &[],
        }
    }

    pub fn find(&self, pred: &dyn Fn(&TreeNode) -> bool) -> Option<&TreeNode> {
        if pred(self) {
            return Some(self);
        }
        self.loaded_children().iter().find_map(|c| c.find(pred))
    }
}
