use super::{AppField, ApplicationQuery};

/// Largest `$top` the applications endpoint accepts.
pub(super) const MAX_PAGE_SIZE: u32 = 999;

/// Quote a string literal for use inside `$filter`.
pub fn odata_string(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

pub(super) fn select(fields: &[AppField]) -> String {
    let mut names: Vec<&str> = Vec::with_capacity(fields.len() + 1);
    if !fields.contains(&AppField::Id) {
        names.push(AppField::Id.name());
    }
    for f in fields {
        if !names.contains(&f.name()) {
            names.push(f.name());
        }
    }
    names.join(",")
}

pub(super) fn applications_path(owned_only: bool) -> &'static str {
    if owned_only {
        "/me/ownedObjects/microsoft.graph.application"
    } else {
        "/applications"
    }
}

/// Query string of the first listing page.
pub(super) fn application_list_params(query: &ApplicationQuery) -> Vec<(&'static str, String)> {
    let top = query.max_results.clamp(1, MAX_PAGE_SIZE);
    let mut params = vec![
        ("$select", "id,displayName".to_string()),
        ("$top", top.to_string()),
    ];

    if let Some(prefix) = query
        .name_prefix
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        params.push((
            "$filter",
            format!("startswith(displayName,{})", odata_string(prefix)),
        ));
    }

    if query.eventual_consistency {
        params.push(("$count", "true".to_string()));
        params.push(("$orderby", "displayName".to_string()));
    }
    params
}

pub(super) fn display_name_prefix_filter(prefix: &str) -> String {
    format!("startswith(displayName,{})", odata_string(prefix.trim()))
}

pub(super) fn user_search_filter(prefix: &str) -> String {
    let lit = odata_string(prefix.trim());
    format!("startswith(displayName,{lit}) or startswith(mail,{lit}) or startswith(userPrincipalName,{lit})")
}

#[cfg(test)]
#[path = "../tests/graph/query_tests.rs"]
mod tests;
