//! On-demand child materialization for lazy branches.

use anyhow::{Context, Result, anyhow};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::graph::{AppField, DirectoryApi};
use crate::model::{
    AppRole, DirectoryUser, KeyCredential, PasswordCredential, PermissionScope, Platform,
    RequiredResourceAccess, ServicePrincipal,
};

use super::node::{Children, CredentialKind, Icon, NodeKind, TreeNode};

/// Children of `node`, fetching remote data for lazy groups.
pub fn expand(api: &dyn DirectoryApi, node: &TreeNode, now: OffsetDateTime) -> Result<Vec<TreeNode>> {
    let object_id = || {
        node.object_id
            .as_deref()
            .ok_or_else(|| anyhow!("{} has no owning application", node.label))
    };

    let children = match &node.kind {
        NodeKind::RedirectUriGroup(platform) => {
            let app = api.get_application(object_id()?, &[AppField::redirect_uris(*platform)])?;
            redirect_uri_nodes(*platform, app.redirect_uris(*platform))
        }
        NodeKind::CredentialGroup(CredentialKind::Password) => {
            let app = api.get_application(object_id()?, &[AppField::PasswordCredentials])?;
            password_nodes(app.passwords(), now)
        }
        NodeKind::CredentialGroup(CredentialKind::Certificate) => {
            let app = api.get_application(object_id()?, &[AppField::KeyCredentials])?;
            certificate_nodes(app.certificates(), now)
        }
        NodeKind::ApiPermissions => {
            let app = api.get_application(object_id()?, &[AppField::RequiredResourceAccess])?;
            let mut out = Vec::new();
            for entry in app.resource_access() {
                let sp = api
                    .service_principal_by_app_id(&entry.resource_app_id)
                    .with_context(|| format!("resolve API {}", entry.resource_app_id))?;
                out.push(resource_node(entry, sp.as_ref()));
            }
            out
        }
        NodeKind::ExposedScopes => {
            let app = api.get_application(object_id()?, &[AppField::Api])?;
            scope_nodes(app.scopes())
        }
        NodeKind::AppRoles => {
            let app = api.get_application(object_id()?, &[AppField::AppRoles])?;
            role_nodes(app.roles())
        }
        NodeKind::Owners => owner_nodes(&api.list_owners(object_id()?)?),
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
        | NodeKind::Detail => return Ok(node.loaded_children().to_vec()),
    };

    Ok(match node.object_id.as_deref() {
        Some(id) => children
            .into_iter()
            .map(|c| c.owned_by(id, node.app_id.as_deref()))
            .collect(),
        None => children,
    })
}

pub(crate) fn redirect_uri_nodes(platform: Platform, uris: &[String]) -> Vec<TreeNode> {
    uris.iter()
        .map(|uri| {
            TreeNode::new(NodeKind::RedirectUri(platform), uri.as_str(), Icon::Link)
                .with_value(uri.as_str())
        })
        .collect()
}

pub(crate) fn password_nodes(creds: &[PasswordCredential], now: OffsetDateTime) -> Vec<TreeNode> {
    creds
        .iter()
        .map(|c| {
            let expired = is_expired(c.end_date_time.as_deref(), now);
            let mut details = vec![
                TreeNode::detail(format!(
                    "Value: {}",
                    c.hint
                        .as_deref()
                        .map(|h| format!("{}********", h))
                        .unwrap_or_else(|| "********".to_string())
                )),
                TreeNode::detail(format!("Secret Id: {}", c.key_id)).with_value(c.key_id.as_str()),
                TreeNode::detail(format!("Created: {}", short_date(c.start_date_time.as_deref()))),
                TreeNode::detail(format!("Expires: {}", short_date(c.end_date_time.as_deref()))),
            ];
            if expired {
                details.push(TreeNode::detail("This secret has expired"));
            }
            let label = c
                .display_name
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("(no description)");
            TreeNode::new(
                NodeKind::Credential(CredentialKind::Password),
                label,
                if expired { Icon::Expired } else { Icon::Key },
            )
            .with_entity(c.key_id.as_str())
            .with_value(c.key_id.as_str())
            .with_children(Children::Loaded(details))
        })
        .collect()
}

pub(crate) fn certificate_nodes(keys: &[KeyCredential], now: OffsetDateTime) -> Vec<TreeNode> {
    keys.iter()
        .map(|k| {
            let expired = is_expired(k.end_date_time.as_deref(), now);
            let thumbprint = k.custom_key_identifier.clone().unwrap_or_default();
            let mut details = vec![
                TreeNode::detail(format!("Thumbprint: {}", thumbprint))
                    .with_value(thumbprint.as_str()),
                TreeNode::detail(format!(
                    "Certificate Id: {}",
                    k.key_id.as_deref().unwrap_or_default()
                )),
                TreeNode::detail(format!("Created: {}", short_date(k.start_date_time.as_deref()))),
                TreeNode::detail(format!("Expires: {}", short_date(k.end_date_time.as_deref()))),
            ];
            if expired {
                details.push(TreeNode::detail("This certificate has expired"));
            }
            let label = k
                .display_name
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(thumbprint.as_str())
                .to_string();
            let mut node = TreeNode::new(
                NodeKind::Credential(CredentialKind::Certificate),
                label,
                if expired { Icon::Expired } else { Icon::Certificate },
            )
            .with_value(thumbprint.as_str())
            .with_children(Children::Loaded(details));
            if let Some(id) = k.key_id.as_deref() {
                node = node.with_entity(id);
            }
            node
        })
        .collect()
}

pub(crate) fn resource_node(
    entry: &RequiredResourceAccess,
    sp: Option<&ServicePrincipal>,
) -> TreeNode {
    let label = sp
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| entry.resource_app_id.clone());

    let permissions = entry
        .resource_access
        .iter()
        .map(|ra| {
            let resolved = sp.and_then(|s| s.resolve(&ra.id, ra.access_type));
            let value = resolved
                .as_ref()
                .map(|p| p.value.clone())
                .unwrap_or_else(|| ra.id.clone());
            let mut node = TreeNode::new(
                NodeKind::ApiPermission {
                    resource_app_id: entry.resource_app_id.clone(),
                    access: ra.access_type,
                },
                format!("{} ({})", value, ra.access_type.label()),
                Icon::Permission,
            )
            .with_entity(ra.id.as_str())
            .with_value(value);
            if let Some(p) = resolved.filter(|p| !p.description.is_empty()) {
                node = node.with_tooltip(p.description);
            }
            node
        })
        .collect();

    TreeNode::new(NodeKind::ApiResource, label, Icon::Application)
        .with_entity(entry.resource_app_id.as_str())
        .with_value(entry.resource_app_id.as_str())
        .with_children(Children::Loaded(permissions))
}

pub(crate) fn scope_nodes(scopes: &[PermissionScope]) -> Vec<TreeNode> {
    scopes
        .iter()
        .map(|s| {
            let mut node = TreeNode::new(NodeKind::ExposedScope, s.value(), Icon::Scope)
                .with_entity(s.id.as_str())
                .with_value(s.value())
                .with_enabled(s.is_enabled);
            if let Some(t) = s.admin_consent_display_name.as_deref() {
                node = node.with_tooltip(t);
            }
            node
        })
        .collect()
}

pub(crate) fn role_nodes(roles: &[AppRole]) -> Vec<TreeNode> {
    roles
        .iter()
        .map(|r| {
            let label = r
                .display_name
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(r.value());
            let mut node = TreeNode::new(NodeKind::AppRole, label, Icon::Role)
                .with_entity(r.id.as_str())
                .with_value(r.value())
                .with_enabled(r.is_enabled);
            if let Some(d) = r.description.as_deref() {
                node = node.with_tooltip(d);
            }
            node
        })
        .collect()
}

pub(crate) fn owner_nodes(owners: &[DirectoryUser]) -> Vec<TreeNode> {
    owners
        .iter()
        .map(|o| {
            let mut node =
                TreeNode::new(NodeKind::Owner, o.label(), Icon::Person).with_entity(o.id.as_str());
            if let Some(contact) = o.contact() {
                node = node.with_value(contact).with_tooltip(contact);
            }
            node
        })
        .collect()
}

fn parse_ts(raw: Option<&str>) -> Option<OffsetDateTime> {
    raw.and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
}

pub(crate) fn is_expired(end: Option<&str>, now: OffsetDateTime) -> bool {
    parse_ts(end).is_some_and(|t| t < now)
}

/// `YYYY-MM-DD` for RFC 3339 input, the raw text otherwise.
pub(crate) fn short_date(raw: Option<&str>) -> String {
    match (raw, parse_ts(raw)) {
        (_, Some(t)) => format!("{:04}-{:02}-{:02}", t.year(), u8::from(t.month()), t.day()),
        (Some(s), None) => s.to_string(),
        (None, None) => "unknown".to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/tree/expand_tests.rs"]
mod tests;
