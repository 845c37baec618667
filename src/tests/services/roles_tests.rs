use super::*;
use crate::test_support::{Answer, Harness, app};

fn role(id: &str, value: &str, enabled: bool) -> AppRole {
    AppRole {
        id: id.to_string(),
        value: Some(value.to_string()),
        display_name: Some(format!("{} role", value)),
        description: Some(format!("Grants {}", value)),
        is_enabled: enabled,
        allowed_member_types: vec!["User".to_string()],
        ..AppRole::default()
    }
}

fn with_roles(roles: Vec<AppRole>) -> Harness {
    let mut a = app("a", "apple");
    a.app_roles = Some(roles);
    Harness::new(vec![a])
}

fn role_node(h: &Harness, value: &str) -> TreeNode {
    h.child("a", NodeKind::AppRoles, |n| n.value.as_deref() == Some(value))
}

#[test]
fn enabled_role_cannot_be_deleted_and_nothing_is_sent() {
    let h = with_roles(vec![role("r1", "Reader", true)]).answers([Answer::Confirm(true)]);
    let node = role_node(&h, "Reader");
    let out = delete_role(&h.ctx(), &node).unwrap();
    assert!(matches!(out, EditOutcome::Rejected(ref m) if m.contains("Disable")));
    assert!(h.fake.calls().is_empty());
    assert_eq!(h.prompter.confirm_count(), 0);
}

#[test]
fn role_enabled_since_the_tree_was_drawn_is_kept() {
    let h = with_roles(vec![role("r1", "Reader", false)]).answers([Answer::Confirm(true)]);
    let stale = role_node(&h, "Reader");
    assert_eq!(stale.enabled, Some(false));
    h.fake.state().apps[0]
        .app_roles
        .as_mut()
        .unwrap()[0]
        .is_enabled = true;

    let out = delete_role(&h.ctx(), &stale).unwrap();
    assert!(matches!(out, EditOutcome::Rejected(ref m) if m.contains("enabled again")));
    assert_eq!(h.fake.mutation_count(), 0);
    assert_eq!(h.fake.app("a").roles().len(), 1);
    assert!(h.feedback.restored());
}

#[test]
fn disable_then_delete_removes_exactly_that_role() {
    let h = with_roles(vec![
        role("r0", "Writer", true),
        role("r1", "Reader", true),
        role("r2", "Admin", false),
    ])
    .answers([Answer::Confirm(true)]);

    let reader = role_node(&h, "Reader");
    set_role_enabled(&h.ctx(), &reader, false).unwrap();
    let after_disable = h.fake.app("a").roles().to_vec();
    assert!(!after_disable[1].is_enabled);
    assert!(after_disable[0].is_enabled);

    let reader = role_node(&h, "Reader");
    assert_eq!(reader.enabled, Some(false));
    let out = delete_role(&h.ctx(), &reader).unwrap();
    assert_eq!(
        out,
        crate::services::branch("a", NodeKind::AppRoles)
    );

    let left = h.fake.app("a").roles().to_vec();
    assert_eq!(left, [after_disable[0].clone(), after_disable[2].clone()]);
}

#[test]
fn delete_matches_by_id_even_when_values_collide() {
    // Two entries sharing a value can only come from outside edits; id decides.
    let h = with_roles(vec![role("r1", "Reader", false), role("r2", "Reader", false)])
        .answers([Answer::Confirm(true)]);
    let node = h.child("a", NodeKind::AppRoles, |n| n.entity_id.as_deref() == Some("r2"));
    delete_role(&h.ctx(), &node).unwrap();
    let ids: Vec<String> = h.fake.app("a").roles().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, ["r1"]);
}

#[test]
fn duplicate_value_on_create_is_rejected_at_the_prompt() {
    let h = with_roles(vec![role("r1", "Reader", true)]).answers([
        Answer::text("Readers"),
        Answer::text("Reader"),
        Answer::Dismiss,
    ]);
    let group = h.node("a", NodeKind::AppRoles);
    assert_eq!(add_role(&h.ctx(), &group).unwrap(), EditOutcome::Cancelled);
    assert_eq!(h.prompter.errors(), ["The value 'Reader' already exists"]);
    assert_eq!(h.fake.mutation_count(), 0);
}

#[test]
fn create_assigns_a_fresh_id_and_enables_the_role() {
    let h = with_roles(vec![role("r1", "Reader", true)]).answers([
        Answer::text("Task writers"),
        Answer::text("Task.Write"),
        Answer::text("Can write tasks"),
        Answer::pick(2),
    ]);
    let group = h.node("a", NodeKind::AppRoles);
    add_role(&h.ctx(), &group).unwrap();
    let roles = h.fake.app("a").roles().to_vec();
    assert_eq!(roles.len(), 2);
    let new = &roles[1];
    assert_eq!(new.value.as_deref(), Some("Task.Write"));
    assert!(new.is_enabled);
    assert_eq!(new.allowed_member_types, ["User", "Application"]);
    let parsed = uuid::Uuid::parse_str(&new.id).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
    assert_ne!(new.id, "r1");
}

#[test]
fn edit_keeping_the_same_value_is_allowed() {
    let h = with_roles(vec![role("r1", "Reader", true), role("r2", "Writer", true)]).answers([
        Answer::text("Readers of things"),
        Answer::text("Reader"),
        Answer::text("Read access"),
        Answer::pick(0),
    ]);
    let node = role_node(&h, "Reader");
    edit_role(&h.ctx(), &node).unwrap();
    assert!(h.prompter.errors().is_empty());
    let roles = h.fake.app("a").roles().to_vec();
    assert_eq!(roles[0].display_name.as_deref(), Some("Readers of things"));
    assert_eq!(roles[0].id, "r1");
    assert_eq!(roles[1], role("r2", "Writer", true));
}

#[test]
fn edit_to_another_roles_value_is_rejected() {
    let h = with_roles(vec![role("r1", "Reader", true), role("r2", "Writer", true)]).answers([
        Answer::text("Readers"),
        Answer::text("Writer"),
        Answer::Dismiss,
    ]);
    let node = role_node(&h, "Reader");
    assert_eq!(edit_role(&h.ctx(), &node).unwrap(), EditOutcome::Cancelled);
    assert_eq!(h.prompter.errors(), ["The value 'Writer' already exists"]);
}

#[test]
fn toggling_to_the_current_state_is_rejected() {
    let h = with_roles(vec![role("r1", "Reader", true)]);
    let node = role_node(&h, "Reader");
    let out = set_role_enabled(&h.ctx(), &node, true).unwrap();
    assert!(matches!(out, EditOutcome::Rejected(_)));
    assert!(h.fake.calls().is_empty());
}
