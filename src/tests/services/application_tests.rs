use super::*;
use crate::services::{
    change_audience, edit_app_id_uri, remove_app_id_uri,
};
use crate::test_support::{Answer, FeedbackEvent, Harness, app};
use crate::tree::NodeKind;

fn root(h: &Harness) -> TreeNode {
    h.node("a", NodeKind::Application)
}

#[test]
fn add_collects_name_and_audience_then_renders_everything() {
    let h = Harness::new(vec![]).answers([Answer::text("  Billing API "), Answer::pick(1)]);
    let out = add_application(&h.ctx()).unwrap();
    assert_eq!(out, EditOutcome::Applied(Refresh::Full));
    let created = h.fake.state().apps[0].clone();
    assert_eq!(created.display_name.as_deref(), Some("Billing API"));
    assert_eq!(
        created.sign_in_audience.as_deref(),
        Some(SignInAudience::AzureAdMultipleOrgs.as_str())
    );
    let picks = h.prompter.picks.lock().unwrap().clone();
    assert_eq!(picks[0].items.len(), 4);
}

#[test]
fn rename_to_the_same_name_is_a_no_op() {
    let h = Harness::new(vec![app("a", "apple")]).answers([Answer::text("apple")]);
    assert_eq!(
        rename_application(&h.ctx(), &root(&h)).unwrap(),
        EditOutcome::Cancelled
    );
    assert_eq!(h.fake.mutation_count(), 0);
}

#[test]
fn rename_patches_only_the_display_name() {
    let h = Harness::new(vec![app("a", "apple")]).answers([Answer::text("Apple Prod")]);
    rename_application(&h.ctx(), &root(&h)).unwrap();
    assert_eq!(
        h.fake.patches(),
        [(
            "a".to_string(),
            ApplicationPatch::DisplayName("Apple Prod".to_string())
        )]
    );
}

#[test]
fn delete_requires_confirmation() {
    let h = Harness::new(vec![app("a", "apple")]).answers([Answer::Confirm(false)]);
    assert_eq!(
        delete_application(&h.ctx(), &root(&h)).unwrap(),
        EditOutcome::Cancelled
    );
    assert_eq!(h.fake.state().apps.len(), 1);

    let h = Harness::new(vec![app("a", "apple")]).answers([Answer::Confirm(true)]);
    delete_application(&h.ctx(), &root(&h)).unwrap();
    assert!(h.fake.state().apps.is_empty());
}

#[test]
fn manifest_is_pretty_json_of_the_full_object() {
    let h = Harness::new(vec![app("a", "apple")]);
    let text = view_manifest(&h.ctx(), &root(&h)).unwrap();
    assert!(text.contains("\n  \"appId\": \"client-a\""));
}

#[test]
fn copy_sends_the_node_value_to_the_clipboard() {
    let h = Harness::new(vec![app("a", "apple")]);
    let node = h.node("a", NodeKind::ClientId);
    copy_value(&h.ctx(), &node).unwrap();
    assert_eq!(h.feedback.copied(), ["client-a"]);

    let detached = TreeNode::detail("nothing here");
    assert!(matches!(
        copy_value(&h.ctx(), &detached).unwrap(),
        EditOutcome::Rejected(_)
    ));
}

#[test]
fn portal_link_points_at_the_client_id() {
    let h = Harness::new(vec![app("a", "apple")]);
    open_in_portal(&h.ctx(), &root(&h)).unwrap();
    let FeedbackEvent::Opened(url) = &h.feedback.events()[0] else {
        panic!("expected a browser launch");
    };
    assert!(url.starts_with("https://portal.azure.com/tenant-1#view/"));
    assert!(url.contains("/appId/client-a/"));
}

#[test]
fn audience_change_refreshes_the_application() {
    let h = Harness::new(vec![app("a", "apple")]).answers([Answer::pick(3)]);
    let node = h.node("a", NodeKind::SignInAudience);
    let out = change_audience(&h.ctx(), &node).unwrap();
    assert_eq!(
        out,
        EditOutcome::Applied(Refresh::Application {
            object_id: "a".to_string()
        })
    );
    assert_eq!(
        h.fake.app("a").sign_in_audience.as_deref(),
        Some("PersonalMicrosoftAccount")
    );
}

#[test]
fn picking_the_current_audience_cancels() {
    let h = Harness::new(vec![app("a", "apple")]).answers([Answer::pick(0)]);
    let node = h.node("a", NodeKind::SignInAudience);
    assert_eq!(change_audience(&h.ctx(), &node).unwrap(), EditOutcome::Cancelled);
    assert_eq!(h.fake.mutation_count(), 0);
}

#[test]
fn app_id_uri_defaults_to_api_scheme_with_the_client_id() {
    let h = Harness::new(vec![app("a", "apple")]).answers([Answer::text("api://client-a")]);
    let node = h.node("a", NodeKind::AppIdUri);
    edit_app_id_uri(&h.ctx(), &node).unwrap();
    assert_eq!(h.prompter.inputs.lock().unwrap()[0].value, "api://client-a");
    assert_eq!(h.fake.app("a").identifier_uris(), ["api://client-a"]);
}

#[test]
fn app_id_uri_edit_replaces_the_shown_uri_and_keeps_others() {
    let mut a = app("a", "apple");
    a.identifier_uris = Some(vec![
        "api://old".to_string(),
        "https://contoso.test/api".to_string(),
    ]);
    let h = Harness::new(vec![a]).answers([Answer::text("api://new")]);
    let node = h.node("a", NodeKind::AppIdUri);
    edit_app_id_uri(&h.ctx(), &node).unwrap();
    assert_eq!(
        h.fake.app("a").identifier_uris(),
        ["api://new", "https://contoso.test/api"]
    );
}

#[test]
fn removing_an_unset_app_id_uri_is_rejected() {
    let h = Harness::new(vec![app("a", "apple")]);
    let node = h.node("a", NodeKind::AppIdUri);
    assert!(matches!(
        remove_app_id_uri(&h.ctx(), &node).unwrap(),
        EditOutcome::Rejected(_)
    ));
}

#[test]
fn removing_the_app_id_uri_after_confirmation() {
    let mut a = app("a", "apple");
    a.identifier_uris = Some(vec!["api://client-a".to_string()]);
    let h = Harness::new(vec![a]).answers([Answer::Confirm(true)]);
    let node = h.node("a", NodeKind::AppIdUri);
    remove_app_id_uri(&h.ctx(), &node).unwrap();
    assert!(h.fake.app("a").identifier_uris().is_empty());
}
