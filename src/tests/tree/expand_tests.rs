use time::macros::datetime;

use super::*;
use crate::model::{AccessType, ApiApplication, RedirectUriSet, ResourceAccess};
use crate::test_support::{FakeDirectory, app, principal, user};
use crate::tree::application_node;

const NOW: OffsetDateTime = datetime!(2026-06-01 12:00 UTC);

fn group(root: &TreeNode, kind: NodeKind) -> TreeNode {
    root.find(&|n| n.kind == kind).cloned().expect("group")
}

fn secret(id: &str, end: &str) -> PasswordCredential {
    PasswordCredential {
        key_id: id.to_string(),
        display_name: Some(format!("secret {}", id)),
        hint: Some("abc".to_string()),
        start_date_time: Some("2025-01-01T00:00:00Z".to_string()),
        end_date_time: Some(end.to_string()),
        secret_text: None,
    }
}

#[test]
fn redirect_group_fetches_only_its_platform() {
    let mut a = app("a", "apple");
    a.spa = Some(RedirectUriSet {
        redirect_uris: vec!["https://spa.example/cb".to_string()],
        ..RedirectUriSet::default()
    });
    let fake = FakeDirectory::new(vec![a.clone()]);
    let root = application_node(&a);
    let spa = group(&root, NodeKind::RedirectUriGroup(Platform::Spa));
    assert_eq!(spa.children, Children::Lazy);

    let children = expand(&fake, &spa, NOW).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].label, "https://spa.example/cb");
    assert_eq!(children[0].kind, NodeKind::RedirectUri(Platform::Spa));
    assert_eq!(children[0].object_id.as_deref(), Some("a"));
    assert_eq!(fake.calls(), ["get_application:a"]);
}

#[test]
fn expired_secrets_get_the_warning_icon_and_note() {
    let mut a = app("a", "apple");
    a.password_credentials = Some(vec![
        secret("old", "2026-01-01T00:00:00Z"),
        secret("new", "2027-01-01T00:00:00Z"),
    ]);
    let fake = FakeDirectory::new(vec![a.clone()]);
    let node = group(
        &application_node(&a),
        NodeKind::CredentialGroup(CredentialKind::Password),
    );
    let children = expand(&fake, &node, NOW).unwrap();

    assert_eq!(children[0].icon, Icon::Expired);
    assert_eq!(children[0].entity_id.as_deref(), Some("old"));
    let old_details: Vec<&str> = children[0]
        .loaded_children()
        .iter()
        .map(|d| d.label.as_str())
        .collect();
    assert_eq!(
        old_details,
        [
            "Value: abc********",
            "Secret Id: old",
            "Created: 2025-01-01",
            "Expires: 2026-01-01",
            "This secret has expired",
        ]
    );
    assert_eq!(children[1].icon, Icon::Key);
    assert_eq!(children[1].loaded_children().len(), 4);
}

#[test]
fn certificates_are_labelled_by_name_or_thumbprint() {
    let keys = vec![
        KeyCredential {
            key_id: Some("k1".to_string()),
            display_name: Some("CN=signing".to_string()),
            custom_key_identifier: Some("AB12".to_string()),
            end_date_time: Some("2030-01-01T00:00:00Z".to_string()),
            ..KeyCredential::default()
        },
        KeyCredential {
            key_id: Some("k2".to_string()),
            custom_key_identifier: Some("CD34".to_string()),
            end_date_time: Some("2020-01-01T00:00:00Z".to_string()),
            ..KeyCredential::default()
        },
    ];
    let nodes = certificate_nodes(&keys, NOW);
    assert_eq!(nodes[0].label, "CN=signing");
    assert_eq!(nodes[0].icon, Icon::Certificate);
    assert_eq!(nodes[1].label, "CD34");
    assert_eq!(nodes[1].icon, Icon::Expired);
    assert_eq!(nodes[1].entity_id.as_deref(), Some("k2"));
}

#[test]
fn api_permissions_resolve_through_the_service_principal() {
    let mut a = app("a", "apple");
    a.required_resource_access = Some(vec![
        RequiredResourceAccess {
            resource_app_id: "graph-app".to_string(),
            resource_access: vec![
                ResourceAccess {
                    id: "s1".to_string(),
                    access_type: AccessType::Scope,
                },
                ResourceAccess {
                    id: "r1".to_string(),
                    access_type: AccessType::Role,
                },
            ],
        },
        RequiredResourceAccess {
            resource_app_id: "unknown-app".to_string(),
            resource_access: vec![ResourceAccess {
                id: "x1".to_string(),
                access_type: AccessType::Scope,
            }],
        },
    ]);
    let mut sp = principal("sp1", "graph-app", "Microsoft Graph");
    sp.oauth2_permission_scopes = vec![PermissionScope {
        id: "s1".to_string(),
        value: Some("User.Read".to_string()),
        admin_consent_display_name: Some("Sign in and read user profile".to_string()),
        is_enabled: true,
        ..PermissionScope::default()
    }];
    sp.app_roles = vec![AppRole {
        id: "r1".to_string(),
        value: Some("User.Read.All".to_string()),
        display_name: Some("Read all users".to_string()),
        is_enabled: true,
        allowed_member_types: vec!["Application".to_string()],
        ..AppRole::default()
    }];
    let fake = FakeDirectory::new(vec![a.clone()]);
    fake.state().principals.push(sp);

    let node = group(&application_node(&a), NodeKind::ApiPermissions);
    let apis = expand(&fake, &node, NOW).unwrap();
    assert_eq!(apis.len(), 2);
    assert_eq!(apis[0].label, "Microsoft Graph");
    let perms: Vec<&str> = apis[0]
        .loaded_children()
        .iter()
        .map(|p| p.label.as_str())
        .collect();
    assert_eq!(perms, ["User.Read (Delegated)", "User.Read.All (Application)"]);
    assert_eq!(
        apis[0].loaded_children()[1].kind,
        NodeKind::ApiPermission {
            resource_app_id: "graph-app".to_string(),
            access: AccessType::Role,
        }
    );
    assert_eq!(
        apis[0].loaded_children()[0].tooltip.as_deref(),
        Some("Sign in and read user profile")
    );
    // Unresolvable APIs fall back to raw ids.
    assert_eq!(apis[1].label, "unknown-app");
    assert_eq!(apis[1].loaded_children()[0].label, "x1 (Delegated)");
    assert!(
        apis[1].loaded_children()[0].object_id.as_deref() == Some("a"),
        "descendants are adopted"
    );
}

#[test]
fn disabled_scopes_and_roles_use_the_disabled_icon() {
    let mut a = app("a", "apple");
    a.api = Some(ApiApplication {
        oauth2_permission_scopes: vec![PermissionScope {
            id: "s1".to_string(),
            value: Some("Files.Read".to_string()),
            is_enabled: false,
            ..PermissionScope::default()
        }],
        ..ApiApplication::default()
    });
    a.app_roles = Some(vec![AppRole {
        id: "r1".to_string(),
        value: Some("Reader".to_string()),
        display_name: Some("Readers".to_string()),
        is_enabled: true,
        ..AppRole::default()
    }]);
    let fake = FakeDirectory::new(vec![a.clone()]);
    let root = application_node(&a);

    let scopes = expand(&fake, &group(&root, NodeKind::ExposedScopes), NOW).unwrap();
    assert_eq!(scopes[0].icon, Icon::Disabled);
    assert_eq!(scopes[0].enabled, Some(false));
    assert_eq!(scopes[0].entity_id.as_deref(), Some("s1"));

    let roles = expand(&fake, &group(&root, NodeKind::AppRoles), NOW).unwrap();
    assert_eq!(roles[0].label, "Readers");
    assert_eq!(roles[0].value.as_deref(), Some("Reader"));
    assert_eq!(roles[0].icon, Icon::Role);
}

#[test]
fn owners_come_from_the_link_collection() {
    let a = app("a", "apple");
    let fake = FakeDirectory::new(vec![a.clone()]);
    fake.state()
        .owners
        .insert("a".to_string(), vec![user("u1", "Ada")]);
    let children = expand(&fake, &group(&application_node(&a), NodeKind::Owners), NOW).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].label, "Ada");
    assert_eq!(children[0].value.as_deref(), Some("u1@contoso.test"));
    assert_eq!(children[0].entity_id.as_deref(), Some("u1"));
}

#[test]
fn static_groups_return_their_loaded_children_without_remote_calls() {
    let a = app("a", "apple");
    let fake = FakeDirectory::new(vec![a.clone()]);
    let node = group(&application_node(&a), NodeKind::RedirectUris);
    let children = expand(&fake, &node, NOW).unwrap();
    assert_eq!(children.len(), 3);
    assert!(fake.calls().is_empty());
}

#[test]
fn detached_lazy_groups_are_an_error() {
    let fake = FakeDirectory::new(Vec::new());
    let node = TreeNode::new(NodeKind::AppRoles, "App Roles", Icon::Role);
    let err = expand(&fake, &node, NOW).unwrap_err();
    assert!(err.to_string().contains("no owning application"));
}

#[test]
fn short_dates_fall_back_to_raw_text() {
    assert_eq!(short_date(Some("2026-03-04T05:06:07Z")), "2026-03-04");
    assert_eq!(short_date(Some("soon")), "soon");
    assert_eq!(short_date(None), "unknown");
    assert!(!is_expired(None, NOW));
}
