use anyhow::{Context, Result, anyhow};

use crate::graph::ApplicationPatch;
use crate::model::SignInAudience;
use crate::portal;
use crate::tree::TreeNode;

use super::prompt::{InputRequest, PickItem};
use super::{EditContext, EditOutcome, Refresh, owning_app, validate};

pub(super) fn audience_choices() -> Vec<(SignInAudience, PickItem)> {
    SignInAudience::ALL
        .into_iter()
        .map(|a| (a, PickItem::new(a.label()).describe(a.description())))
        .collect()
}

pub fn add_application(ctx: &EditContext<'_>) -> Result<EditOutcome> {
    let Some((name, audience)) = ctx.ask(|p| {
        let name = p.text(
            InputRequest::new("New application", "Display name"),
            validate::display_name,
        )?;
        let audience = p.pick_one("Who can use this application?", &audience_choices())?;
        Ok((name, audience))
    }) else {
        return Ok(EditOutcome::Cancelled);
    };

    let app = ctx.commit("Creating application", "create application", |api| {
        api.create_application(&name, audience)
    })?;
    tracing::info!(object_id = %app.id, "created application");
    ctx.feedback
        .info(&format!("Created {} ({})", app.label(), app.client_id()));
    Ok(EditOutcome::Applied(Refresh::Full))
}

pub fn rename_application(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let current = node.label.clone();
    let Some(name) = ctx.ask(|p| {
        p.text(
            InputRequest::new("Rename application", "Display name").value(current.as_str()),
            validate::display_name,
        )
    }) else {
        return Ok(EditOutcome::Cancelled);
    };
    if name == current {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Renaming", "rename application", |api| {
        api.update_application(object_id, &ApplicationPatch::DisplayName(name))
    })?;
    Ok(EditOutcome::Applied(Refresh::Full))
}

pub fn delete_application(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let message = format!(
        "Delete the application {}? This cannot be undone from here.",
        node.label
    );
    if ctx.ask(|p| p.confirm(&message, "Delete")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Deleting", "delete application", |api| {
        api.delete_application(object_id)
    })?;
    ctx.feedback.info(&format!("Deleted {}", node.label));
    Ok(EditOutcome::Applied(Refresh::Full))
}

/// Pretty-printed full object for the read-only viewer.
pub fn view_manifest(ctx: &EditContext<'_>, node: &TreeNode) -> Result<String> {
    let object_id = owning_app(node)?;
    let manifest = ctx
        .api
        .get_manifest(object_id)
        .with_context(|| format!("load manifest of {}", object_id))?;
    serde_json::to_string_pretty(&manifest).context("format manifest")
}

pub fn copy_value(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let Some(value) = node.value.as_deref().filter(|v| !v.is_empty()) else {
        return Ok(EditOutcome::Rejected(format!(
            "{} has no value to copy",
            node.label
        )));
    };
    ctx.feedback.copy(value).context("copy to clipboard")?;
    ctx.feedback.info(&format!("Copied {}", value));
    Ok(EditOutcome::Applied(Refresh::Nothing))
}

pub fn open_in_portal(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let app_id = node
        .app_id
        .as_deref()
        .ok_or_else(|| anyhow!("{} has no client id", node.label))?;
    let url = portal::application_url(ctx.tenant_id, app_id);
    ctx.feedback.open_url(&url)?;
    Ok(EditOutcome::Applied(Refresh::Nothing))
}

#[cfg(test)]
#[path = "../tests/services/application_tests.rs"]
mod tests;
