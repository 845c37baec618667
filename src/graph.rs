//! Directory API client.
//!
//! [`DirectoryApi`] is the seam the tree and the edit services depend on;
//! [`GraphClient`] implements it against Microsoft Graph over blocking HTTP.
//! Nothing here retries: a failed call is returned to the caller as-is.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::auth::CredentialProvider;
use crate::model::{
    AppRole, Application, ApplicationSummary, DirectoryUser, KeyCredential, PasswordCredential,
    PermissionScope, Platform, RequiredResourceAccess, ServicePrincipal, SignInAudience,
};

mod applications;
mod directory;
mod http_client;
mod query;
mod types;

pub use self::query::odata_string;

pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Selectable application properties for partial fetches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppField {
    Id,
    AppId,
    DisplayName,
    SignInAudience,
    IdentifierUris,
    Web,
    Spa,
    PublicClient,
    PasswordCredentials,
    KeyCredentials,
    Api,
    AppRoles,
    RequiredResourceAccess,
}

impl AppField {
    /// Everything the top-level skeleton needs to decide which branches are expandable.
    pub const SKELETON: &'static [AppField] = &[
        AppField::Id,
        AppField::AppId,
        AppField::DisplayName,
        AppField::SignInAudience,
        AppField::IdentifierUris,
        AppField::Web,
        AppField::Spa,
        AppField::PublicClient,
        AppField::PasswordCredentials,
        AppField::KeyCredentials,
        AppField::Api,
        AppField::AppRoles,
        AppField::RequiredResourceAccess,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AppField::Id => "id",
            AppField::AppId => "appId",
            AppField::DisplayName => "displayName",
            AppField::SignInAudience => "signInAudience",
            AppField::IdentifierUris => "identifierUris",
            AppField::Web => "web",
            AppField::Spa => "spa",
            AppField::PublicClient => "publicClient",
            AppField::PasswordCredentials => "passwordCredentials",
            AppField::KeyCredentials => "keyCredentials",
            AppField::Api => "api",
            AppField::AppRoles => "appRoles",
            AppField::RequiredResourceAccess => "requiredResourceAccess",
        }
    }

    pub fn redirect_uris(platform: Platform) -> AppField {
        match platform {
            Platform::Web => AppField::Web,
            Platform::Spa => AppField::Spa,
            Platform::Native => AppField::PublicClient,
        }
    }
}

/// Parameters of the top-level application listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicationQuery {
    pub owned_only: bool,
    pub name_prefix: Option<String>,
    pub max_results: u32,
    pub eventual_consistency: bool,
}

/// A single-property update. Each variant replaces one whole collection.
#[derive(Clone, Debug, PartialEq)]
pub enum ApplicationPatch {
    DisplayName(String),
    RedirectUris(Platform, Vec<String>),
    KeyCredentials(Vec<KeyCredential>),
    Scopes(Vec<PermissionScope>),
    AppRoles(Vec<AppRole>),
    RequiredResourceAccess(Vec<RequiredResourceAccess>),
    SignInAudience(SignInAudience),
    IdentifierUris(Vec<String>),
}

impl ApplicationPatch {
    pub fn to_body(&self) -> Value {
        match self {
            ApplicationPatch::DisplayName(name) => serde_json::json!({ "displayName": name }),
            ApplicationPatch::RedirectUris(platform, uris) => {
                serde_json::json!({ platform.property(): { "redirectUris": uris } })
            }
            ApplicationPatch::KeyCredentials(keys) => serde_json::json!({ "keyCredentials": keys }),
            ApplicationPatch::Scopes(scopes) => {
                serde_json::json!({ "api": { "oauth2PermissionScopes": scopes } })
            }
            ApplicationPatch::AppRoles(roles) => serde_json::json!({ "appRoles": roles }),
            ApplicationPatch::RequiredResourceAccess(entries) => {
                serde_json::json!({ "requiredResourceAccess": entries })
            }
            ApplicationPatch::SignInAudience(audience) => {
                serde_json::json!({ "signInAudience": audience.as_str() })
            }
            ApplicationPatch::IdentifierUris(uris) => serde_json::json!({ "identifierUris": uris }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationPatch::DisplayName(_) => "rename application",
            ApplicationPatch::RedirectUris(..) => "update redirect URIs",
            ApplicationPatch::KeyCredentials(_) => "update certificates",
            ApplicationPatch::Scopes(_) => "update exposed scopes",
            ApplicationPatch::AppRoles(_) => "update app roles",
            ApplicationPatch::RequiredResourceAccess(_) => "update API permissions",
            ApplicationPatch::SignInAudience(_) => "update sign-in audience",
            ApplicationPatch::IdentifierUris(_) => "update application ID URI",
        }
    }
}

pub trait DirectoryApi: Send + Sync {
    /// Ids and names in listing order (server-ordered only under eventual consistency).
    fn list_applications(&self, query: &ApplicationQuery) -> Result<Vec<ApplicationSummary>>;
    fn count_applications(&self, owned_only: bool) -> Result<u64>;
    fn get_application(&self, object_id: &str, fields: &[AppField]) -> Result<Application>;
    /// The full raw object, for the read-only manifest view.
    fn get_manifest(&self, object_id: &str) -> Result<Value>;
    fn create_application(&self, name: &str, audience: SignInAudience) -> Result<Application>;
    fn update_application(&self, object_id: &str, patch: &ApplicationPatch) -> Result<()>;
    fn delete_application(&self, object_id: &str) -> Result<()>;

    fn add_password(
        &self,
        object_id: &str,
        description: &str,
        end_date_time: &str,
    ) -> Result<PasswordCredential>;
    fn remove_password(&self, object_id: &str, key_id: &str) -> Result<()>;

    fn list_owners(&self, object_id: &str) -> Result<Vec<DirectoryUser>>;
    fn add_owner(&self, object_id: &str, user_id: &str) -> Result<()>;
    fn remove_owner(&self, object_id: &str, user_id: &str) -> Result<()>;

    fn service_principal_by_app_id(&self, app_id: &str) -> Result<Option<ServicePrincipal>>;
    fn service_principal(&self, id: &str) -> Result<ServicePrincipal>;
    fn search_service_principals(&self, prefix: &str) -> Result<Vec<ServicePrincipal>>;
    fn search_users(&self, prefix: &str) -> Result<Vec<DirectoryUser>>;
    fn signed_in_user(&self) -> Result<DirectoryUser>;
}

pub struct GraphClient {
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    client: reqwest::blocking::Client,
}

impl GraphClient {
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("appreg/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl DirectoryApi for GraphClient {
    fn list_applications(&self, query: &ApplicationQuery) -> Result<Vec<ApplicationSummary>> {
        GraphClient::list_applications(self, query)
    }

    fn count_applications(&self, owned_only: bool) -> Result<u64> {
        GraphClient::count_applications(self, owned_only)
    }

    fn get_application(&self, object_id: &str, fields: &[AppField]) -> Result<Application> {
        GraphClient::get_application(self, object_id, fields)
    }

    fn get_manifest(&self, object_id: &str) -> Result<Value> {
        GraphClient::get_manifest(self, object_id)
    }

    fn create_application(&self, name: &str, audience: SignInAudience) -> Result<Application> {
        GraphClient::create_application(self, name, audience)
    }

    fn update_application(&self, object_id: &str, patch: &ApplicationPatch) -> Result<()> {
        GraphClient::update_application(self, object_id, patch)
    }

    fn delete_application(&self, object_id: &str) -> Result<()> {
        GraphClient::delete_application(self, object_id)
    }

    fn add_password(
        &self,
        object_id: &str,
        description: &str,
        end_date_time: &str,
    ) -> Result<PasswordCredential> {
        GraphClient::add_password(self, object_id, description, end_date_time)
    }

    fn remove_password(&self, object_id: &str, key_id: &str) -> Result<()> {
        GraphClient::remove_password(self, object_id, key_id)
    }

    fn list_owners(&self, object_id: &str) -> Result<Vec<DirectoryUser>> {
        GraphClient::list_owners(self, object_id)
    }

    fn add_owner(&self, object_id: &str, user_id: &str) -> Result<()> {
        GraphClient::add_owner(self, object_id, user_id)
    }

    fn remove_owner(&self, object_id: &str, user_id: &str) -> Result<()> {
        GraphClient::remove_owner(self, object_id, user_id)
    }

    fn service_principal_by_app_id(&self, app_id: &str) -> Result<Option<ServicePrincipal>> {
        GraphClient::service_principal_by_app_id(self, app_id)
    }

    fn service_principal(&self, id: &str) -> Result<ServicePrincipal> {
        GraphClient::service_principal(self, id)
    }

    fn search_service_principals(&self, prefix: &str) -> Result<Vec<ServicePrincipal>> {
        GraphClient::search_service_principals(self, prefix)
    }

    fn search_users(&self, prefix: &str) -> Result<Vec<DirectoryUser>> {
        GraphClient::search_users(self, prefix)
    }

    fn signed_in_user(&self) -> Result<DirectoryUser> {
        GraphClient::signed_in_user(self)
    }
}

#[cfg(test)]
#[path = "tests/graph/patch_tests.rs"]
mod tests;
