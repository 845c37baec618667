use anyhow::{Result, anyhow, bail};

use crate::graph::{AppField, ApplicationPatch, DirectoryApi};
use crate::model::Platform;
use crate::tree::{NodeKind, TreeNode};

use super::prompt::InputRequest;
use super::{EditContext, EditOutcome, branch, owning_app, validate};

fn platform_of(node: &TreeNode) -> Result<Platform> {
    match &node.kind {
        NodeKind::RedirectUriGroup(p) | NodeKind::RedirectUri(p) => Ok(*p),
        other => Err(anyhow!("{:?} is not a redirect URI node", other)),
    }
}

fn current(api: &dyn DirectoryApi, object_id: &str, platform: Platform) -> Result<Vec<String>> {
    let app = api.get_application(object_id, &[AppField::redirect_uris(platform)])?;
    Ok(app.redirect_uris(platform).to_vec())
}

fn replace(
    api: &dyn DirectoryApi,
    object_id: &str,
    platform: Platform,
    uris: Vec<String>,
) -> Result<()> {
    api.update_application(object_id, &ApplicationPatch::RedirectUris(platform, uris))
}

pub fn add_redirect_uri(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let platform = platform_of(node)?;
    let existing = current(ctx.api, object_id, platform)?;

    let placeholder = match platform {
        Platform::Web => "https://myapp.example/signin-oidc",
        Platform::Spa => "https://localhost:3000",
        Platform::Native => "myapp://auth",
    };
    let Some(uri) = ctx.ask(|p| {
        p.text(
            InputRequest::new(
                format!("Add {} redirect URI", platform.label()),
                "Redirect URI",
            )
            .placeholder(placeholder),
            |raw| validate::redirect_uri(platform, raw, &existing, None),
        )
    }) else {
        return Ok(EditOutcome::Cancelled);
    };

    ctx.commit("Adding redirect URI", "add redirect URI", |api| {
        let mut uris = current(api, object_id, platform)?;
        if uris.contains(&uri) {
            bail!("{} was added concurrently", uri);
        }
        uris.push(uri);
        replace(api, object_id, platform, uris)
    })?;
    Ok(branch(object_id, NodeKind::RedirectUriGroup(platform)))
}

pub fn edit_redirect_uri(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let platform = platform_of(node)?;
    let original = node.value.clone().unwrap_or_else(|| node.label.clone());
    let existing = current(ctx.api, object_id, platform)?;

    let Some(uri) = ctx.ask(|p| {
        p.text(
            InputRequest::new(
                format!("Edit {} redirect URI", platform.label()),
                "Redirect URI",
            )
            .value(original.as_str()),
            |raw| validate::redirect_uri(platform, raw, &existing, Some(original.as_str())),
        )
    }) else {
        return Ok(EditOutcome::Cancelled);
    };
    if uri == original {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Updating redirect URI", "edit redirect URI", |api| {
        let mut uris = current(api, object_id, platform)?;
        let Some(slot) = uris.iter_mut().find(|u| **u == original) else {
            bail!("{} no longer exists", original);
        };
        *slot = uri;
        replace(api, object_id, platform, uris)
    })?;
    Ok(branch(object_id, NodeKind::RedirectUriGroup(platform)))
}

pub fn delete_redirect_uri(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let platform = platform_of(node)?;
    let target = node.value.clone().unwrap_or_else(|| node.label.clone());

    let message = format!("Remove the redirect URI {}?", target);
    if ctx.ask(|p| p.confirm(&message, "Remove")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Removing redirect URI", "delete redirect URI", |api| {
        let mut uris = current(api, object_id, platform)?;
        uris.retain(|u| *u != target);
        replace(api, object_id, platform, uris)
    })?;
    Ok(branch(object_id, NodeKind::RedirectUriGroup(platform)))
}

#[cfg(test)]
#[path = "../tests/services/redirect_uris_tests.rs"]
mod tests;
