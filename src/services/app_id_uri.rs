use anyhow::{Result, bail};

use crate::graph::{AppField, ApplicationPatch, DirectoryApi};
use crate::tree::TreeNode;

use super::prompt::InputRequest;
use super::{EditContext, EditOutcome, Refresh, owning_app, validate};

fn current(api: &dyn DirectoryApi, object_id: &str) -> Result<Vec<String>> {
    let app = api.get_application(object_id, &[AppField::IdentifierUris])?;
    Ok(app.identifier_uris().to_vec())
}

fn refresh(object_id: &str) -> EditOutcome {
    EditOutcome::Applied(Refresh::Application {
        object_id: object_id.to_string(),
    })
}

/// Set the primary identifier URI, suggesting `api://{client id}` when none is set.
pub fn edit_app_id_uri(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let original = node.value.clone();
    let suggestion = original
        .clone()
        .unwrap_or_else(|| format!("api://{}", node.app_id.as_deref().unwrap_or_default()));

    let Some(uri) = ctx.ask(|p| {
        p.text(
            InputRequest::new("Application ID URI", "URI").value(suggestion),
            validate::app_id_uri,
        )
    }) else {
        return Ok(EditOutcome::Cancelled);
    };
    if original.as_deref() == Some(uri.as_str()) {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Updating application ID URI", "edit application ID URI", |api| {
        let mut uris = current(api, object_id)?;
        match original.as_deref().and_then(|o| uris.iter().position(|u| u == o)) {
            Some(i) => uris[i] = uri,
            None => uris.insert(0, uri),
        }
        api.update_application(object_id, &ApplicationPatch::IdentifierUris(uris))
    })?;
    Ok(refresh(object_id))
}

pub fn remove_app_id_uri(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let Some(target) = node.value.clone() else {
        return Ok(EditOutcome::Rejected(
            "No application ID URI is set".to_string(),
        ));
    };
    let message = format!("Remove the application ID URI {}?", target);
    if ctx.ask(|p| p.confirm(&message, "Remove")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Removing application ID URI", "remove application ID URI", |api| {
        let mut uris = current(api, object_id)?;
        let before = uris.len();
        uris.retain(|u| *u != target);
        if uris.len() == before {
            bail!("{} is no longer set", target);
        }
        api.update_application(object_id, &ApplicationPatch::IdentifierUris(uris))
    })?;
    Ok(refresh(object_id))
}
