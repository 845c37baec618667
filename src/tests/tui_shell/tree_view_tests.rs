use super::*;
use crate::test_support::app;
use crate::tree::{Icon, application_node};

fn view() -> TreeView {
    let mut tree = TreeView::default();
    tree.set_roots(vec![
        application_node(&app("a", "Alpha")),
        application_node(&app("b", "Beta")),
    ]);
    tree
}

fn labels(tree: &TreeView) -> Vec<String> {
    tree.rows()
        .iter()
        .filter_map(|r| tree.node(&r.path))
        .map(|n| n.label.clone())
        .collect()
}

fn owners(object_id: &str) -> NodeKey {
    NodeKey::branch(object_id, NodeKind::Owners)
}

#[test]
fn collapsed_roots_are_the_only_rows() {
    let tree = view();
    assert_eq!(labels(&tree), ["Alpha", "Beta"]);
    assert_eq!(tree.selected().map(|n| n.label.as_str()), Some("Alpha"));
}

#[test]
fn opening_a_loaded_node_shows_its_children() {
    let mut tree = view();
    assert!(tree.open(&[0]));
    let rows = tree.rows();
    assert_eq!(rows.len(), 2 + 9);
    assert_eq!(rows[1].depth, 1);
    assert_eq!(labels(&tree)[1], "Client Id: client-a");

    // Owners are fetched on demand.
    assert!(!tree.open(&[0, 8]));
}

#[test]
fn movement_is_clamped() {
    let mut tree = view();
    tree.move_by(-3);
    assert_eq!(tree.selected_index(), 0);
    tree.move_by(10);
    assert_eq!(tree.selected_index(), 1);
    tree.move_to_start();
    assert_eq!(tree.selected_index(), 0);
    tree.move_to_end();
    assert_eq!(tree.selected_index(), 1);
}

#[test]
fn fetched_children_expand_the_group() {
    let mut tree = view();
    tree.open(&[0]);
    let people = vec![TreeNode::new(NodeKind::Owner, "Ada", Icon::Person).owned_by("a", None)];
    assert!(tree.set_children(&owners("a"), people));

    let found = tree.find(&owners("a")).unwrap();
    assert!(found.expanded);
    assert_eq!(found.loaded_children().len(), 1);
    assert!(labels(&tree).contains(&"Ada".to_string()));
}

#[test]
fn empty_children_make_a_leaf() {
    let mut tree = view();
    assert!(tree.set_children(&owners("b"), Vec::new()));
    let found = tree.find(&owners("b")).unwrap();
    assert!(!found.expanded);
    assert!(!found.children.is_expandable());
}

#[test]
fn unknown_keys_are_ignored() {
    let mut tree = view();
    assert!(!tree.set_children(&owners("zzz"), Vec::new()));
    assert!(tree.locate(&owners("zzz")).is_none());
}

#[test]
fn selection_survives_a_re_render() {
    let mut tree = view();
    tree.move_by(1);
    tree.set_roots(vec![
        application_node(&app("c", "Gamma")),
        application_node(&app("a", "Alpha")),
        application_node(&app("b", "Beta")),
    ]);
    assert_eq!(tree.selected().map(|n| n.label.as_str()), Some("Beta"));
}

#[test]
fn parent_selection_and_collapse() {
    let mut tree = view();
    tree.open(&[0]);
    tree.move_by(4);
    assert_eq!(
        tree.selected().map(|n| n.kind.clone()),
        Some(NodeKind::RedirectUris)
    );
    tree.select_parent();
    assert_eq!(tree.selected_index(), 0);

    tree.move_by(2);
    tree.close(&[0]);
    assert_eq!(labels(&tree), ["Alpha", "Beta"]);
    assert_eq!(tree.selected_index(), 0);
}

#[test]
fn replacing_an_application_keeps_it_open() {
    let mut tree = view();
    tree.open(&[0]);
    tree.replace_application("a", Some(application_node(&app("a", "Alpha v2"))));
    assert_eq!(labels(&tree)[0], "Alpha v2");
    assert!(tree.node(&[0]).unwrap().expanded);
}

#[test]
fn a_deleted_application_disappears() {
    let mut tree = view();
    tree.move_by(1);
    tree.replace_application("b", None);
    assert_eq!(labels(&tree), ["Alpha"]);
    assert_eq!(tree.selected_index(), 0);
}
