use super::*;

fn query() -> ApplicationQuery {
    ApplicationQuery {
        owned_only: false,
        name_prefix: None,
        max_results: 100,
        eventual_consistency: false,
    }
}

fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

#[test]
fn odata_string_doubles_single_quotes() {
    assert_eq!(odata_string("O'Brien"), "'O''Brien'");
    assert_eq!(odata_string("plain"), "'plain'");
}

#[test]
fn select_always_includes_id_once() {
    assert_eq!(select(&[AppField::AppRoles]), "id,appRoles");
    assert_eq!(
        select(&[AppField::Id, AppField::Web, AppField::Web]),
        "id,web"
    );
}

#[test]
fn strong_listing_has_no_count_or_order() {
    let params = application_list_params(&query());
    assert_eq!(param(&params, "$top"), Some("100"));
    assert_eq!(param(&params, "$select"), Some("id,displayName"));
    assert_eq!(param(&params, "$count"), None);
    assert_eq!(param(&params, "$orderby"), None);
    assert_eq!(param(&params, "$filter"), None);
}

#[test]
fn eventual_listing_orders_counts_and_filters() {
    let q = ApplicationQuery {
        name_prefix: Some(" Con'toso ".to_string()),
        eventual_consistency: true,
        ..query()
    };
    let params = application_list_params(&q);
    assert_eq!(param(&params, "$count"), Some("true"));
    assert_eq!(param(&params, "$orderby"), Some("displayName"));
    assert_eq!(
        param(&params, "$filter"),
        Some("startswith(displayName,'Con''toso')")
    );
}

#[test]
fn blank_prefix_is_ignored_and_top_is_clamped() {
    let q = ApplicationQuery {
        name_prefix: Some("   ".to_string()),
        max_results: 5000,
        ..query()
    };
    let params = application_list_params(&q);
    assert_eq!(param(&params, "$filter"), None);
    assert_eq!(param(&params, "$top"), Some("999"));
}

#[test]
fn owned_listing_uses_owned_objects_cast() {
    assert_eq!(
        applications_path(true),
        "/me/ownedObjects/microsoft.graph.application"
    );
    assert_eq!(applications_path(false), "/applications");
}

#[test]
fn user_search_matches_name_mail_and_upn() {
    let f = user_search_filter("ann");
    assert!(f.contains("startswith(displayName,'ann')"));
    assert!(f.contains("startswith(mail,'ann')"));
    assert!(f.contains("startswith(userPrincipalName,'ann')"));
}
