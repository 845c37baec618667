//! Application CRUD, partial fetches and password credential calls.

use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;

use super::query::{application_list_params, applications_path, select};
use super::{AppField, ApplicationPatch, ApplicationQuery, GraphClient};
use crate::model::{Application, ApplicationSummary, PasswordCredential, SignInAudience};

impl GraphClient {
    pub fn list_applications(&self, query: &ApplicationQuery) -> Result<Vec<ApplicationSummary>> {
        let url = self.url(applications_path(query.owned_only));
        let params = application_list_params(query);
        tracing::debug!(
            owned_only = query.owned_only,
            eventual = query.eventual_consistency,
            prefix = query.name_prefix.as_deref().unwrap_or(""),
            "list applications"
        );
        self.get_pages(
            &url,
            &params,
            query.eventual_consistency,
            query.max_results as usize,
            "list applications",
        )
    }

    pub fn count_applications(&self, owned_only: bool) -> Result<u64> {
        let url = self.url(&format!("{}/$count", applications_path(owned_only)));
        let req = self.eventual(self.request(Method::GET, &url)?, true);
        let resp = req.send().context("count applications")?;
        let text = self
            .ensure_ok(resp, "count applications")?
            .text()
            .context("read application count")?;
        text.trim()
            .trim_start_matches('\u{feff}')
            .parse::<u64>()
            .with_context(|| format!("parse application count {:?}", text))
    }

    pub fn get_application(&self, object_id: &str, fields: &[AppField]) -> Result<Application> {
        let url = self.url(&format!("/applications/{}", object_id));
        let params = [("$select", select(fields))];
        self.get_json(&url, &params, false, "get application")
            .with_context(|| format!("application {}", object_id))
    }

    pub fn get_manifest(&self, object_id: &str) -> Result<Value> {
        let url = self.url(&format!("/applications/{}", object_id));
        self.get_json(&url, &[], false, "get manifest")
            .with_context(|| format!("application {}", object_id))
    }

    pub fn create_application(&self, name: &str, audience: SignInAudience) -> Result<Application> {
        let body = serde_json::json!({
            "displayName": name,
            "signInAudience": audience.as_str(),
        });
        let app: Application = self
            .send_json(Method::POST, &self.url("/applications"), &body, "create application")?
            .json()
            .context("parse created application")?;
        tracing::info!(object_id = %app.id, name, "created application");
        Ok(app)
    }

    pub fn update_application(&self, object_id: &str, patch: &ApplicationPatch) -> Result<()> {
        let url = self.url(&format!("/applications/{}", object_id));
        tracing::debug!(object_id, what = patch.label(), "patch application");
        let _ = self.send_json(Method::PATCH, &url, &patch.to_body(), patch.label())?;
        Ok(())
    }

    pub fn delete_application(&self, object_id: &str) -> Result<()> {
        let url = self.url(&format!("/applications/{}", object_id));
        self.send_empty(Method::DELETE, &url, "delete application")?;
        tracing::info!(object_id, "deleted application");
        Ok(())
    }

    pub fn add_password(
        &self,
        object_id: &str,
        description: &str,
        end_date_time: &str,
    ) -> Result<PasswordCredential> {
        let url = self.url(&format!("/applications/{}/addPassword", object_id));
        let body = serde_json::json!({
            "passwordCredential": {
                "displayName": description,
                "endDateTime": end_date_time,
            }
        });
        let cred: PasswordCredential = self
            .send_json(Method::POST, &url, &body, "add password")?
            .json()
            .context("parse added password")?;
        Ok(cred)
    }

    pub fn remove_password(&self, object_id: &str, key_id: &str) -> Result<()> {
        let url = self.url(&format!("/applications/{}/removePassword", object_id));
        let body = serde_json::json!({ "keyId": key_id });
        let _ = self.send_json(Method::POST, &url, &body, "remove password")?;
        Ok(())
    }
}
