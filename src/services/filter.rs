use crate::model::Settings;
use crate::tree::SessionContext;

use super::prompt::InputRequest;
use super::{EditContext, EditOutcome, Refresh};

pub const FILTER_NEEDS_EVENTUAL: &str =
    "Filtering needs eventual consistency. Enable useEventualConsistency in settings first.";

/// Prompt for a display-name prefix. A blank answer clears the filter.
pub fn set_filter(
    ctx: &EditContext<'_>,
    session: &SessionContext,
    settings: &Settings,
) -> EditOutcome {
    if !settings.use_eventual_consistency {
        return EditOutcome::Rejected(FILTER_NEEDS_EVENTUAL.to_string());
    }
    let current = session.filter().unwrap_or_default();
    let Some(prefix) = ctx.ask(|p| {
        p.text(
            InputRequest::new("Filter applications", "Display name starts with")
                .value(current.as_str())
                .placeholder("leave blank to clear"),
            |raw| Ok(raw.trim().to_string()),
        )
    }) else {
        return EditOutcome::Cancelled;
    };
    if prefix == current {
        return EditOutcome::Cancelled;
    }
    session.set_filter(Some(&prefix));
    tracing::info!(filter = %prefix, "application filter changed");
    EditOutcome::Applied(Refresh::Full)
}

pub fn clear_filter(session: &SessionContext) -> EditOutcome {
    if session.filter().is_none() {
        return EditOutcome::Rejected("No filter is set".to_string());
    }
    session.set_filter(None);
    EditOutcome::Applied(Refresh::Full)
}

#[cfg(test)]
#[path = "../tests/services/filter_tests.rs"]
mod tests;
