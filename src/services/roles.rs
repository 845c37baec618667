use anyhow::{Result, bail};
use uuid::Uuid;

use crate::graph::{AppField, ApplicationPatch, DirectoryApi};
use crate::model::{AppRole, Application};
use crate::tree::{NodeKind, TreeNode};

use super::prompt::{InputRequest, PickItem};
use super::scopes::claim_values;
use super::{EditContext, EditOutcome, branch, entity_id, owning_app, validate};

const USER: &str = "User";
const APPLICATION: &str = "Application";

fn member_choices() -> Vec<(Vec<String>, PickItem)> {
    let one = |t: &str| vec![t.to_string()];
    vec![
        (
            one(USER),
            PickItem::new("Users/Groups").describe("Assignable to users and groups"),
        ),
        (
            one(APPLICATION),
            PickItem::new("Applications").describe("Requestable as an application permission"),
        ),
        (
            vec![USER.to_string(), APPLICATION.to_string()],
            PickItem::new("Both"),
        ),
    ]
}

fn read(api: &dyn DirectoryApi, object_id: &str) -> Result<Application> {
    api.get_application(object_id, &[AppField::Api, AppField::AppRoles])
}

fn write(api: &dyn DirectoryApi, object_id: &str, roles: Vec<AppRole>) -> Result<()> {
    api.update_application(object_id, &ApplicationPatch::AppRoles(roles))
}

struct RoleInput {
    display_name: String,
    value: String,
    description: String,
    members: Vec<String>,
}

impl RoleInput {
    fn apply(self, role: &mut AppRole) {
        role.display_name = Some(self.display_name);
        role.value = Some(self.value);
        role.description = Some(self.description);
        role.allowed_member_types = self.members;
    }
}

fn collect(
    ctx: &EditContext<'_>,
    title: &str,
    taken: &[String],
    original: Option<&AppRole>,
) -> Option<RoleInput> {
    let taken: Vec<&str> = taken.iter().map(String::as_str).collect();
    ctx.ask(|p| {
        let display_name = p.text(
            InputRequest::new(title, "Display name")
                .value(prefill(original, |r| r.display_name.as_deref())),
            validate::display_name,
        )?;
        let value = p.text(
            InputRequest::new(title, "Value")
                .value(prefill(original, |r| r.value.as_deref()))
                .placeholder("Task.Write"),
            |raw| validate::claim_value(raw, &taken, original.map(AppRole::value)),
        )?;
        let description = p.text(
            InputRequest::new(title, "Description")
                .value(prefill(original, |r| r.description.as_deref())),
            validate::description,
        )?;
        let members = p.pick_one("Allowed member types", &member_choices())?;
        Ok(RoleInput {
            display_name,
            value,
            description,
            members,
        })
    })
}

fn prefill(original: Option<&AppRole>, field: impl Fn(&AppRole) -> Option<&str>) -> String {
    original.and_then(field).unwrap_or_default().to_string()
}

pub fn add_role(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let taken = claim_values(&read(ctx.api, object_id)?);
    let Some(input) = collect(ctx, "Create app role", &taken, None) else {
        return Ok(EditOutcome::Cancelled);
    };
    let id = Uuid::new_v4().to_string();

    ctx.commit("Adding role", "add app role", |api| {
        let app = read(api, object_id)?;
        if claim_values(&app).contains(&input.value) {
            bail!("The value '{}' already exists", input.value);
        }
        let mut role = AppRole {
            id,
            is_enabled: true,
            ..AppRole::default()
        };
        input.apply(&mut role);
        let mut roles = app.roles().to_vec();
        roles.push(role);
        write(api, object_id, roles)
    })?;
    Ok(branch(object_id, NodeKind::AppRoles))
}

pub fn edit_role(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let role_id = entity_id(node)?;
    let app = read(ctx.api, object_id)?;
    let Some(original) = app.roles().iter().find(|r| r.id == role_id).cloned() else {
        bail!("app role {} no longer exists", role_id);
    };
    let Some(input) = collect(ctx, "Edit app role", &claim_values(&app), Some(&original)) else {
        return Ok(EditOutcome::Cancelled);
    };

    ctx.commit("Updating role", "edit app role", |api| {
        let mut roles = read(api, object_id)?.roles().to_vec();
        let Some(role) = roles.iter_mut().find(|r| r.id == role_id) else {
            bail!("app role {} no longer exists", role_id);
        };
        input.apply(role);
        write(api, object_id, roles)
    })?;
    Ok(branch(object_id, NodeKind::AppRoles))
}

pub fn set_role_enabled(
    ctx: &EditContext<'_>,
    node: &TreeNode,
    enabled: bool,
) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let role_id = entity_id(node)?;
    if node.enabled == Some(enabled) {
        return Ok(EditOutcome::Rejected(format!(
            "{} is already {}",
            node.label,
            if enabled { "enabled" } else { "disabled" }
        )));
    }

    let busy = if enabled { "Enabling" } else { "Disabling" };
    ctx.commit(busy, "toggle app role", |api| {
        let mut roles = read(api, object_id)?.roles().to_vec();
        let Some(role) = roles.iter_mut().find(|r| r.id == role_id) else {
            bail!("app role {} no longer exists", role_id);
        };
        role.is_enabled = enabled;
        write(api, object_id, roles)
    })?;
    Ok(branch(object_id, NodeKind::AppRoles))
}

pub fn delete_role(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let role_id = entity_id(node)?;
    if node.enabled != Some(false) {
        return Ok(EditOutcome::Rejected(format!(
            "Disable {} before deleting it",
            node.label
        )));
    }
    let message = format!("Delete the app role {}?", node.label);
    if ctx.ask(|p| p.confirm(&message, "Delete")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    let deleted = ctx.commit("Deleting role", "delete app role", |api| {
        let mut roles = read(api, object_id)?.roles().to_vec();
        let Some(pos) = roles.iter().position(|r| r.id == role_id) else {
            bail!("app role {} no longer exists", role_id);
        };
        if roles[pos].is_enabled {
            return Ok(false);
        }
        roles.remove(pos);
        write(api, object_id, roles)?;
        Ok(true)
    })?;
    if !deleted {
        ctx.feedback.restore();
        return Ok(EditOutcome::Rejected(format!(
            "{} was enabled again; disable it before deleting it",
            node.label
        )));
    }
    Ok(branch(object_id, NodeKind::AppRoles))
}

#[cfg(test)]
#[path = "../tests/services/roles_tests.rs"]
mod tests;
