//! Requested permissions on other APIs (`requiredResourceAccess`).

use anyhow::{Result, anyhow, bail};

use crate::graph::{AppField, ApplicationPatch, DirectoryApi};
use crate::model::{
    AccessType, OfferedPermission, RequiredResourceAccess, ResourceAccess, ServicePrincipal,
};
use crate::tree::{NodeKind, TreeNode};

use super::prompt::{InputRequest, PickItem};
use super::{EditContext, EditOutcome, branch, entity_id, owning_app, validate};

fn read(api: &dyn DirectoryApi, object_id: &str) -> Result<Vec<RequiredResourceAccess>> {
    let app = api.get_application(object_id, &[AppField::RequiredResourceAccess])?;
    Ok(app.resource_access().to_vec())
}

fn write(
    api: &dyn DirectoryApi,
    object_id: &str,
    entries: Vec<RequiredResourceAccess>,
) -> Result<()> {
    api.update_application(object_id, &ApplicationPatch::RequiredResourceAccess(entries))
}

fn requested(entries: &[RequiredResourceAccess], resource_app_id: &str) -> Vec<ResourceAccess> {
    entries
        .iter()
        .find(|e| e.resource_app_id == resource_app_id)
        .map(|e| e.resource_access.clone())
        .unwrap_or_default()
}

/// Offered permissions of one kind that are not yet requested.
pub(crate) fn available(
    sp: &ServicePrincipal,
    access: AccessType,
    already: &[ResourceAccess],
) -> Vec<OfferedPermission> {
    sp.offered(access)
        .into_iter()
        .filter(|p| !already.iter().any(|r| r.id == p.id && r.access_type == access))
        .collect()
}

fn permission_items(perms: &[OfferedPermission]) -> Vec<(OfferedPermission, PickItem)> {
    perms
        .iter()
        .map(|p| {
            let mut item = PickItem::new(p.value.as_str());
            if !p.description.is_empty() {
                item = item.describe(p.description.as_str());
            }
            (p.clone(), item)
        })
        .collect()
}

fn resource_app_of(node: &TreeNode) -> Option<&str> {
    match &node.kind {
        NodeKind::ApiResource => node.entity_id.as_deref(),
        NodeKind::ApiPermission {
            resource_app_id, ..
        } => Some(resource_app_id.as_str()),
        _ => None,
    }
}

fn principal_for(api: &dyn DirectoryApi, resource_app_id: &str) -> Result<ServicePrincipal> {
    api.service_principal_by_app_id(resource_app_id)?
        .ok_or_else(|| anyhow!("no service principal for API {}", resource_app_id))
}

enum Found {
    Api(ServicePrincipal),
    Nothing(String),
}

/// The API to add to: the node's own, or one the user searches for.
fn choose_api(ctx: &EditContext<'_>, node: &TreeNode) -> Result<Option<Found>> {
    if let Some(app_id) = resource_app_of(node) {
        return principal_for(ctx.api, app_id).map(|sp| Some(Found::Api(sp)));
    }
    let Some(prefix) = ctx.ask(|p| {
        p.text(
            InputRequest::new("Add a permission", "Search APIs by name")
                .placeholder("Microsoft Graph"),
            validate::search_text,
        )
    }) else {
        return Ok(None);
    };
    let found = ctx.api.search_service_principals(&prefix)?;
    if found.is_empty() {
        return Ok(Some(Found::Nothing(format!("No APIs match '{}'", prefix))));
    }
    let items: Vec<(ServicePrincipal, PickItem)> = found
        .into_iter()
        .map(|sp| {
            let item = PickItem::new(sp.label()).describe(sp.app_id.as_str());
            (sp, item)
        })
        .collect();
    Ok(ctx.ask(|p| p.pick_one("Select an API", &items)).map(Found::Api))
}

pub fn add_permission(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let sp = match choose_api(ctx, node)? {
        None => return Ok(EditOutcome::Cancelled),
        Some(Found::Nothing(msg)) => return Ok(EditOutcome::Rejected(msg)),
        Some(Found::Api(sp)) => sp,
    };
    let already = requested(&read(ctx.api, object_id)?, &sp.app_id);

    let kinds: Vec<(AccessType, PickItem)> = [AccessType::Scope, AccessType::Role]
        .into_iter()
        .filter(|a| !available(&sp, *a, &already).is_empty())
        .map(|a| {
            let hint = match a {
                AccessType::Scope => "Act as the signed-in user",
                AccessType::Role => "Run without a signed-in user",
            };
            (a, PickItem::new(a.label()).describe(hint))
        })
        .collect();
    if kinds.is_empty() {
        return Ok(EditOutcome::Rejected(format!(
            "{} offers no further permissions",
            sp.label()
        )));
    }

    let Some(picked) = ctx.ask(|p| {
        let access = p.pick_one("Type of permission", &kinds)?;
        let perms = permission_items(&available(&sp, access, &already));
        p.pick_many(&format!("{} permissions", sp.label()), &perms)
    }) else {
        return Ok(EditOutcome::Cancelled);
    };

    let resource_app_id = sp.app_id.clone();
    ctx.commit("Adding permission", "add API permission", |api| {
        let mut entries = read(api, object_id)?;
        let idx = match entries
            .iter()
            .position(|e| e.resource_app_id == resource_app_id)
        {
            Some(i) => i,
            None => {
                entries.push(RequiredResourceAccess {
                    resource_app_id: resource_app_id.clone(),
                    resource_access: Vec::new(),
                });
                entries.len() - 1
            }
        };
        let list = &mut entries[idx].resource_access;
        for p in picked {
            if !list.iter().any(|r| r.id == p.id && r.access_type == p.access_type) {
                list.push(ResourceAccess {
                    id: p.id,
                    access_type: p.access_type,
                });
            }
        }
        write(api, object_id, entries)
    })?;
    Ok(branch(object_id, NodeKind::ApiPermissions))
}

fn permission_of(node: &TreeNode) -> Result<(String, AccessType)> {
    match &node.kind {
        NodeKind::ApiPermission {
            resource_app_id,
            access,
        } => Ok((resource_app_id.clone(), *access)),
        other => Err(anyhow!("{:?} is not an API permission", other)),
    }
}

/// Swap a requested permission for another of the same API and type.
pub fn edit_permission(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let permission_id = entity_id(node)?;
    let (resource_app_id, access) = permission_of(node)?;
    let sp = principal_for(ctx.api, &resource_app_id)?;
    let already = requested(&read(ctx.api, object_id)?, &resource_app_id);

    let perms = permission_items(&available(&sp, access, &already));
    if perms.is_empty() {
        return Ok(EditOutcome::Rejected(format!(
            "{} offers no other {} permissions",
            sp.label(),
            access.label().to_lowercase()
        )));
    }
    let Some(replacement) = ctx.ask(|p| p.pick_one(&format!("Replace {}", node.label), &perms))
    else {
        return Ok(EditOutcome::Cancelled);
    };

    ctx.commit("Updating permission", "edit API permission", |api| {
        let mut entries = read(api, object_id)?;
        let Some(slot) = entries
            .iter_mut()
            .filter(|e| e.resource_app_id == resource_app_id)
            .flat_map(|e| e.resource_access.iter_mut())
            .find(|r| r.id == permission_id && r.access_type == access)
        else {
            bail!("permission {} is no longer requested", permission_id);
        };
        slot.id = replacement.id;
        write(api, object_id, entries)
    })?;
    Ok(branch(object_id, NodeKind::ApiPermissions))
}

pub fn delete_permission(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let permission_id = entity_id(node)?;
    let (resource_app_id, access) = permission_of(node)?;
    let message = format!("Remove the permission {}?", node.label);
    if ctx.ask(|p| p.confirm(&message, "Remove")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Removing permission", "delete API permission", |api| {
        let mut entries = read(api, object_id)?;
        for e in entries
            .iter_mut()
            .filter(|e| e.resource_app_id == resource_app_id)
        {
            e.resource_access
                .retain(|r| !(r.id == permission_id && r.access_type == access));
        }
        entries.retain(|e| e.resource_app_id != resource_app_id || !e.resource_access.is_empty());
        write(api, object_id, entries)
    })?;
    Ok(branch(object_id, NodeKind::ApiPermissions))
}

/// Drop every requested permission on one API.
pub fn delete_api(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let resource_app_id = entity_id(node)?;
    let message = format!("Remove all permissions on {}?", node.label);
    if ctx.ask(|p| p.confirm(&message, "Remove")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Removing API", "delete API permissions", |api| {
        let mut entries = read(api, object_id)?;
        entries.retain(|e| e.resource_app_id != resource_app_id);
        write(api, object_id, entries)
    })?;
    Ok(branch(object_id, NodeKind::ApiPermissions))
}

#[cfg(test)]
#[path = "../tests/services/permissions_tests.rs"]
mod tests;
