use anyhow::Result;

use crate::model::DirectoryUser;
use crate::portal;
use crate::tree::{NodeKind, TreeNode};

use super::prompt::{InputRequest, PickItem};
use super::{EditContext, EditOutcome, Refresh, branch, entity_id, owning_app, validate};

pub fn add_owner(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let Some(prefix) = ctx.ask(|p| {
        p.text(
            InputRequest::new("Add owner", "Search users by name or email"),
            validate::search_text,
        )
    }) else {
        return Ok(EditOutcome::Cancelled);
    };

    let owners = ctx.api.list_owners(object_id)?;
    let candidates: Vec<(DirectoryUser, PickItem)> = ctx
        .api
        .search_users(&prefix)?
        .into_iter()
        .filter(|u| !owners.iter().any(|o| o.id == u.id))
        .map(|u| {
            let mut item = PickItem::new(u.label());
            if let Some(contact) = u.contact() {
                item = item.describe(contact);
            }
            (u, item)
        })
        .collect();
    if candidates.is_empty() {
        return Ok(EditOutcome::Rejected(format!(
            "No users match '{}' who are not already owners",
            prefix
        )));
    }
    let Some(user) = ctx.ask(|p| p.pick_one("Select the new owner", &candidates)) else {
        return Ok(EditOutcome::Cancelled);
    };

    ctx.commit("Adding owner", "add owner", |api| {
        api.add_owner(object_id, &user.id)
    })?;
    Ok(branch(object_id, NodeKind::Owners))
}

pub fn remove_owner(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let user_id = entity_id(node)?;
    let message = format!("Remove {} as an owner?", node.label);
    if ctx.ask(|p| p.confirm(&message, "Remove")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Removing owner", "remove owner", |api| {
        api.remove_owner(object_id, user_id)
    })?;
    Ok(branch(object_id, NodeKind::Owners))
}

pub fn open_owner_in_portal(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let user_id = entity_id(node)?;
    ctx.feedback
        .open_url(&portal::user_url(ctx.tenant_id, user_id))?;
    Ok(EditOutcome::Applied(Refresh::Nothing))
}

#[cfg(test)]
#[path = "../tests/services/owners_tests.rs"]
mod tests;
