//! Fixed per-application node layout built from one skeleton fetch.

use crate::model::{Application, Platform, SignInAudience};

use super::node::{Children, CredentialKind, Icon, NodeKind, TreeNode};

pub fn application_node(app: &Application) -> TreeNode {
    let children = vec![
        client_id_node(app),
        app_id_uri_node(app),
        audience_node(app),
        redirect_uris_node(app),
        credentials_node(app),
        TreeNode::new(NodeKind::ApiPermissions, "API Permissions", Icon::Permission)
            .lazy_if(!app.resource_access().is_empty()),
        TreeNode::new(
            NodeKind::ExposedScopes,
            "Exposed API Permissions",
            Icon::Scope,
        )
        .lazy_if(!app.scopes().is_empty()),
        TreeNode::new(NodeKind::AppRoles, "App Roles", Icon::Role)
            .lazy_if(!app.roles().is_empty()),
        // Ownership is a link collection the skeleton fetch cannot see.
        TreeNode::new(NodeKind::Owners, "Owners", Icon::Person).with_children(Children::Lazy),
    ];

    let mut node = TreeNode::new(NodeKind::Application, app.label(), Icon::Application)
        .with_tooltip(format!("Object id: {}", app.id))
        .with_children(Children::Loaded(children));
    if let Some(app_id) = app.app_id.as_deref() {
        node = node.with_value(app_id);
    }
    node.owned_by(&app.id, app.app_id.as_deref())
}

fn client_id_node(app: &Application) -> TreeNode {
    TreeNode::new(
        NodeKind::ClientId,
        format!("Client Id: {}", app.client_id()),
        Icon::Identifier,
    )
    .with_value(app.client_id())
}

fn app_id_uri_node(app: &Application) -> TreeNode {
    match app.identifier_uris().first() {
        Some(uri) => TreeNode::new(
            NodeKind::AppIdUri,
            format!("Application ID URI: {}", uri),
            Icon::Link,
        )
        .with_value(uri.as_str()),
        None => TreeNode::new(NodeKind::AppIdUri, "Application ID URI: Not set", Icon::Link),
    }
}

fn audience_node(app: &Application) -> TreeNode {
    let raw = app.sign_in_audience.as_deref().unwrap_or_default();
    let label = SignInAudience::parse(raw)
        .map(|a| a.label().to_string())
        .unwrap_or_else(|| raw.to_string());
    let mut node = TreeNode::new(
        NodeKind::SignInAudience,
        format!("Sign In Audience: {}", label),
        Icon::Person,
    )
    .with_value(raw);
    if let Some(a) = SignInAudience::parse(raw) {
        node = node.with_tooltip(a.description());
    }
    node
}

fn redirect_uris_node(app: &Application) -> TreeNode {
    let groups = Platform::ALL
        .into_iter()
        .map(|p| {
            TreeNode::new(NodeKind::RedirectUriGroup(p), p.label(), Icon::Folder)
                .lazy_if(!app.redirect_uris(p).is_empty())
        })
        .collect();
    TreeNode::new(NodeKind::RedirectUris, "Redirect URIs", Icon::Link)
        .with_children(Children::Loaded(groups))
}

fn credentials_node(app: &Application) -> TreeNode {
    let groups = vec![
        TreeNode::new(
            NodeKind::CredentialGroup(CredentialKind::Password),
            CredentialKind::Password.group_label(),
            Icon::Key,
        )
        .lazy_if(!app.passwords().is_empty()),
        TreeNode::new(
            NodeKind::CredentialGroup(CredentialKind::Certificate),
            CredentialKind::Certificate.group_label(),
            Icon::Certificate,
        )
        .lazy_if(!app.certificates().is_empty()),
    ];
    TreeNode::new(NodeKind::Credentials, "Credentials", Icon::Key)
        .with_children(Children::Loaded(groups))
}
