use anyhow::Result;

use crate::graph::ApplicationPatch;
use crate::model::SignInAudience;
use crate::tree::TreeNode;

use super::application::audience_choices;
use super::{EditContext, EditOutcome, Refresh, owning_app};

pub fn change_audience(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let current = node.value.as_deref().and_then(SignInAudience::parse);
    let Some(audience) = ctx.ask(|p| p.pick_one("Supported account types", &audience_choices()))
    else {
        return Ok(EditOutcome::Cancelled);
    };
    if Some(audience) == current {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Updating audience", "change sign-in audience", |api| {
        api.update_application(object_id, &ApplicationPatch::SignInAudience(audience))
    })?;
    Ok(EditOutcome::Applied(Refresh::Application {
        object_id: object_id.to_string(),
    }))
}
