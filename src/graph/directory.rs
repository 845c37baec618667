//! Owner links, service principals and user lookups.

use anyhow::{Context, Result};
use reqwest::Method;

use super::GraphClient;
use super::query::{display_name_prefix_filter, odata_string, user_search_filter};
use crate::model::{DirectoryUser, ServicePrincipal};

const USER_SELECT: &str = "id,displayName,mail,userPrincipalName";
const PRINCIPAL_SELECT: &str = "id,appId,displayName,oauth2PermissionScopes,appRoles";
const SEARCH_LIMIT: usize = 50;

impl GraphClient {
    pub fn list_owners(&self, object_id: &str) -> Result<Vec<DirectoryUser>> {
        let url = self.url(&format!("/applications/{}/owners", object_id));
        let params = [("$select", USER_SELECT.to_string())];
        self.get_pages(&url, &params, false, usize::MAX, "list owners")
            .with_context(|| format!("application {}", object_id))
    }

    pub fn add_owner(&self, object_id: &str, user_id: &str) -> Result<()> {
        let url = self.url(&format!("/applications/{}/owners/$ref", object_id));
        let body = serde_json::json!({
            "@odata.id": self.url(&format!("/directoryObjects/{}", user_id)),
        });
        let _ = self.send_json(Method::POST, &url, &body, "add owner")?;
        Ok(())
    }

    pub fn remove_owner(&self, object_id: &str, user_id: &str) -> Result<()> {
        let url = self.url(&format!("/applications/{}/owners/{}/$ref", object_id, user_id));
        self.send_empty(Method::DELETE, &url, "remove owner")
    }

    pub fn service_principal_by_app_id(&self, app_id: &str) -> Result<Option<ServicePrincipal>> {
        let url = self.url("/servicePrincipals");
        let params = [
            ("$filter", format!("appId eq {}", odata_string(app_id))),
            ("$select", PRINCIPAL_SELECT.to_string()),
        ];
        let found: Vec<ServicePrincipal> =
            self.get_pages(&url, &params, false, 1, "find service principal")?;
        Ok(found.into_iter().next())
    }

    pub fn service_principal(&self, id: &str) -> Result<ServicePrincipal> {
        let url = self.url(&format!("/servicePrincipals/{}", id));
        let params = [("$select", PRINCIPAL_SELECT.to_string())];
        self.get_json(&url, &params, false, "get service principal")
    }

    pub fn search_service_principals(&self, prefix: &str) -> Result<Vec<ServicePrincipal>> {
        let url = self.url("/servicePrincipals");
        let params = [
            ("$filter", display_name_prefix_filter(prefix)),
            ("$select", PRINCIPAL_SELECT.to_string()),
            ("$count", "true".to_string()),
            ("$orderby", "displayName".to_string()),
            ("$top", SEARCH_LIMIT.to_string()),
        ];
        self.get_pages(&url, &params, true, SEARCH_LIMIT, "search service principals")
    }

    pub fn search_users(&self, prefix: &str) -> Result<Vec<DirectoryUser>> {
        let url = self.url("/users");
        let params = [
            ("$filter", user_search_filter(prefix)),
            ("$select", USER_SELECT.to_string()),
            ("$count", "true".to_string()),
            ("$orderby", "displayName".to_string()),
            ("$top", SEARCH_LIMIT.to_string()),
        ];
        self.get_pages(&url, &params, true, SEARCH_LIMIT, "search users")
    }

    pub fn signed_in_user(&self) -> Result<DirectoryUser> {
        let url = self.url("/me");
        let params = [("$select", USER_SELECT.to_string())];
        self.get_json(&url, &params, false, "get signed-in user")
    }
}
