use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use time::Duration;
use time::format_description::well_known::Rfc3339;

use crate::graph::{AppField, ApplicationPatch};
use crate::model::KeyCredential;
use crate::tree::{CredentialKind, NodeKind, TreeNode};

use super::prompt::InputRequest;
use super::{EditContext, EditOutcome, branch, entity_id, owning_app, validate};

pub const DEFAULT_EXPIRY_DAYS: u32 = 90;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

fn group(kind: CredentialKind) -> NodeKind {
    NodeKind::CredentialGroup(kind)
}

/// End of validity `days` from `now`, to whole seconds.
pub(crate) fn expiry(now: time::OffsetDateTime, days: u32) -> Result<String> {
    let end = now.replace_nanosecond(0)? + Duration::days(i64::from(days));
    end.format(&Rfc3339).context("format expiry")
}

pub fn add_password(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let Some((description, days)) = ctx.ask(|p| {
        let description = p.text(
            InputRequest::new("New client secret", "Description").placeholder("optional"),
            validate::secret_description,
        )?;
        let days = p.text(
            InputRequest::new("New client secret", "Expires in (days)")
                .value(DEFAULT_EXPIRY_DAYS.to_string()),
            validate::expiry_days,
        )?;
        Ok((description, days))
    }) else {
        return Ok(EditOutcome::Cancelled);
    };
    let days: u32 = days.parse().context("expiry days")?;
    let end = expiry(ctx.now, days)?;

    let created = ctx.commit("Creating secret", "add client secret", |api| {
        api.add_password(object_id, &description, &end)
    })?;

    match created.secret_text.as_deref() {
        Some(secret) => match ctx.feedback.copy(secret) {
            Ok(()) => ctx
                .feedback
                .info("Secret copied to the clipboard. It cannot be retrieved again."),
            Err(err) => {
                ctx.feedback
                    .warn(&format!("Could not copy the secret: {:#}", err));
                ctx.feedback.info(&format!("Secret value: {}", secret));
            }
        },
        None => ctx
            .feedback
            .warn("The directory did not return the secret value"),
    }
    Ok(branch(object_id, group(CredentialKind::Password)))
}

pub fn delete_password(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let key_id = entity_id(node)?;
    let message = format!("Delete the client secret {}?", node.label);
    if ctx.ask(|p| p.confirm(&message, "Delete")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Deleting secret", "delete client secret", |api| {
        api.remove_password(object_id, key_id)
    })?;
    Ok(branch(object_id, group(CredentialKind::Password)))
}

/// Base64 DER body of a PEM or DER certificate file.
pub(crate) fn certificate_body(bytes: &[u8]) -> Result<String> {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return Ok(STANDARD.encode(bytes));
    };
    let Some(start) = text.find(PEM_BEGIN) else {
        if text.trim().is_empty() {
            bail!("certificate file is empty");
        }
        return Ok(STANDARD.encode(bytes));
    };
    let rest = &text[start + PEM_BEGIN.len()..];
    let end = rest
        .find(PEM_END)
        .ok_or_else(|| anyhow!("PEM certificate is missing its END line"))?;
    let body: String = rest[..end].chars().filter(|c| !c.is_whitespace()).collect();
    let der = STANDARD.decode(body.as_bytes()).context("decode PEM body")?;
    if der.is_empty() {
        bail!("PEM certificate has an empty body");
    }
    Ok(STANDARD.encode(der))
}

pub fn upload_certificate(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let Some((path, description)) = ctx.ask(|p| {
        let path = p.text(
            InputRequest::new("Upload certificate", "Certificate file (.cer, .pem, .crt)"),
            validate::file_path,
        )?;
        let description = p.text(
            InputRequest::new("Upload certificate", "Description").placeholder("optional"),
            validate::optional_description,
        )?;
        Ok((path, description))
    }) else {
        return Ok(EditOutcome::Cancelled);
    };

    let bytes = std::fs::read(Path::new(&path)).with_context(|| format!("read {}", path))?;
    let key = certificate_body(&bytes).with_context(|| format!("parse {}", path))?;

    ctx.commit("Uploading certificate", "upload certificate", |api| {
        let app = api.get_application(object_id, &[AppField::KeyCredentials])?;
        let mut keys = app.certificates().to_vec();
        keys.push(KeyCredential {
            display_name: (!description.is_empty()).then(|| description.clone()),
            key_type: Some("AsymmetricX509Cert".to_string()),
            usage: Some("Verify".to_string()),
            key: Some(key),
            ..KeyCredential::default()
        });
        api.update_application(object_id, &ApplicationPatch::KeyCredentials(keys))
    })?;
    Ok(branch(object_id, group(CredentialKind::Certificate)))
}

pub fn delete_certificate(ctx: &EditContext<'_>, node: &TreeNode) -> Result<EditOutcome> {
    let object_id = owning_app(node)?;
    let key_id = entity_id(node)?;
    let message = format!("Delete the certificate {}?", node.label);
    if ctx.ask(|p| p.confirm(&message, "Delete")).is_none() {
        return Ok(EditOutcome::Cancelled);
    }

    ctx.commit("Deleting certificate", "delete certificate", |api| {
        let app = api.get_application(object_id, &[AppField::KeyCredentials])?;
        let mut keys = app.certificates().to_vec();
        let before = keys.len();
        keys.retain(|k| k.key_id.as_deref() != Some(key_id));
        if keys.len() == before {
            bail!("certificate {} no longer exists", key_id);
        }
        api.update_application(object_id, &ApplicationPatch::KeyCredentials(keys))
    })?;
    Ok(branch(object_id, group(CredentialKind::Certificate)))
}

#[cfg(test)]
#[path = "../tests/services/credentials_tests.rs"]
mod tests;
