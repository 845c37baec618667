use anyhow::{Result, bail};
use uuid::Uuid;

use crate::graph::{AppField, ApplicationPatch, DirectoryApi};
use crate::model::{Application, PermissionScope};
use crate::tree::{NodeKind, TreeNode};

use super::prompt::{InputRequest, PickItem};
use super::{EditContext, EditOutcome, branch, entity_id, owning_app, validate};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Consent {
    Admin,
    User,
}

impl Consent {
    fn as_str(self) -> &'static str {
        match self {
            Consent::Admin => "Admin",
            Consent::User => "User",
        }
    }
}

fn consent_choices() -> Vec<(Consent, PickItem)> {
    vec![
        (Consent::Admin, PickItem::new("Admins only")),
        (Consent::User, PickItem::new("Admins and users")),
    ]
}

/// Role and scope values share one namespace.
pub(super) fn claim_values(app: &Application) -> Vec<String> {
    app.scopes()
        .iter()
        .map(|s| s.value().to_string())
        .chain(app.roles().iter().map(|r| r.value().to_string()))
        .collect()
}

fn read(api: &dyn DirectoryApi, object_id: &str) -> Result<Application> {
    api.get_application(object_id, &[AppField::Api, AppField::AppRoles])
}

fn write(api: &dyn DirectoryApi, object_id: &str, scopes: Vec<PermissionScope>) -> Result<()> {
    api.update_application(object_id, &ApplicationPatch::Scopes(scopes))
}

struct ScopeInput {
    value: String,
    admin_name: String,
    admin_description: String,
    consent: Consent,
    user_name: String,
    user_description: String,
}

fn collect(
    ctx: &EditContext<'_>,
    title: &str,
    taken: &[String],
    original: Option<&PermissionScope>,
) -> Option<ScopeInput> {
    let taken: Vec<&str> = taken.iter().map(String::as_str).collect();
    ctx.ask(|p| {
        let value = p.text(
            InputRequest::new(title, "Scope name (value)")
                .value(prefill(original, |s| s.value.as_deref()))
                .placeholder("Files.Read"),
            |raw| validate::claim_value(raw, &taken, original.map(PermissionScope::value)),
        )?;
        let admin_name = p.text(
            InputRequest::new(title, "Admin consent display name")
                .value(prefill(original, |s| s.admin_consent_display_name.as_deref())),
            validate::display_name,
        )?;
        let admin_description = p.text(
            InputRequest::new(title, "Admin consent description")
                .value(prefill(original, |s| s.admin_consent_description.as_deref())),
            validate::description,
        )?;
        let consent = p.pick_one("Who can consent?", &consent_choices())?;
        let (user_name, user_description) = match consent {
            Consent::Admin => (String::new(), String::new()),
            Consent::User => (
                p.text(
                    InputRequest::new(title, "User consent display name")
                        .value(prefill(original, |s| s.user_consent_display_name.as_deref())),
                    validate::optional_description,
                )?,
                p.text(
                    InputRequest::new(title, "User consent description")
                        .value(prefill(original, |s| s.user_consent_description.as_deref())),
                    validate::optional_description,
                )?,
            ),
        };
        Ok(ScopeInput {
            value,
            admin_name,
            admin_description,
            consent,
            user_name,
            user_description,
        })
    })
}

fn prefill(
    original: Option<&PermissionScope>,
    field: impl Fn(&PermissionScope) -> Option<&str>,
) -> String {
    original.and_then(field).unwrap_or_default().to_string()
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

impl ScopeInput {
    fn apply(self, scope: &mut PermissionScope) {
        scope.value = Some(self.value);
        scope.admin_consent_display_name = Some(self.admin_name);
        scope.admin_consent_description = Some(self.admin_description);
        scope.consent_type = Some(self.consent.as_str().to_string());
        scope.user_consent_display_name = non_empty(self.user_name);
        scope.user_consent_description = non_empty(self.user_description);
    }
}

pub fn add_scope(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let taken = claim_values(&read(ctx.api, object_id)?);
    let Some(input) = collect(ctx, "Expose a scope", &taken, None) else {
        return Ok(EditOutcome::Cancelled);
    };
    let id = Uuid::new_v4().to_string();

    ctx.commit("Adding scope", "add scope", |api| {
        let app = read(api, object_id)?;
        if claim_values(&app).contains(&input.value) {
            bail!("The value '{}' already exists", input.value);
        }
        let mut scope = PermissionScope {
            id,
            is_enabled: true,
            ..PermissionScope::default()
        };
        input.apply(&mut scope);
        let mut scopes = app.scopes().to_vec();
        scopes.push(scope);
        write(api, object_id, scopes)
    })?;
    Ok(branch(object_id, NodeKind::ExposedScopes))
}

pub fn edit_scope(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let scope_id = entity_id(node)?;
    let app = read(ctx.api, object_id)?;
    let Some(original) = app.scopes().iter().find(|s| s.id == scope_id).cloned() else {
        bail!("scope {} no longer exists", scope_id);
    };
    let Some(input) = collect(ctx, "Edit scope", &claim_values(&app), Some(&original)) else {
        return Ok(EditOutcome::Cancelled);
    };

    ctx.commit("Updating scope", "edit scope", |api| {
        let mut scopes = read(api, object_id)?.scopes().to_vec();
        let Some(scope) = scopes.iter_mut().find(|s| s.id == scope_id) else {
            bail!("scope {} no longer exists", scope_id);
        };
        input.apply(scope);
        write(api, object_id, scopes)
    })?;
    Ok(branch(object_id, NodeKind::ExposedScopes))
}

pub fn set_scope_enabled(
    ctx: &EditContext<'_>,
    node: &TreeNode,
    enabled: bool,
) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let scope_id = entity_id(node)?;
    if node.enabled == Some(enabled) {
        return Ok(EditOutcome::Rejected(format!(
            "{} is already {}",
            node.label,
            if enabled { "enabled" } else { "disabled" }
        )));
    }

    let busy = if enabled { "Enabling" } else { "Disabling" };
    ctx.commit(busy, "toggle scope", |api| {
        let mut scopes = read(api, object_id)?.scopes().to_vec();
        let Some(scope) = scopes.iter_mut().find(|s| s.id == scope_id) else {
            bail!("scope {} no longer exists", scope_id);
        };
        scope.is_enabled = enabled;
        write(api, object_id, scopes)
    })?;
    Ok(branch(object_id, NodeKind::ExposedScopes))
}

pub fn delete_scope(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let scope_id = entity_id(node)?;
    if node.enabled != Some(false) {
        return Ok(EditOutcome::Rejected(format!(
            "Disable {} before deleting it",
            node.label
        )));
    }
    let message = format!("Delete the scope {}?", node.label);
    if ctx.ask(|p| p.confirm(&message, "Delete")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    let deleted = ctx.commit("Deleting scope", "delete scope", |api| {
        let mut scopes = read(api, object_id)?.scopes().to_vec();
        let Some(pos) = scopes.iter().position(|s| s.id == scope_id) else {
            bail!("scope {} no longer exists", scope_id);
        };
        if scopes[pos].is_enabled {
            return Ok(false);
        }
        scopes.remove(pos);
        write(api, object_id, scopes)?;
        Ok(true)
    })?;
    if !deleted {
        ctx.feedback.restore();
        return Ok(EditOutcome::Rejected(format!(
            "{} was enabled again; disable it before deleting it",
            node.label
        )));
    }
    Ok(branch(object_id, NodeKind::ExposedScopes))
}

#[cfg(test)]
#[path = "../tests/services/scopes_tests.rs"]
mod tests;
