use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An application registration as returned by the directory.
///
/// Every field except the object id is optional because most reads are
/// partial (`$select`) fetches of one sub-collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_in_audience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_uris: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<RedirectUriSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spa: Option<RedirectUriSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_client: Option<RedirectUriSet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_credentials: Option<Vec<PasswordCredential>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_credentials: Option<Vec<KeyCredential>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiApplication>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_roles: Option<Vec<AppRole>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_resource_access: Option<Vec<RequiredResourceAccess>>,
}

impl Application {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }

    pub fn client_id(&self) -> &str {
        self.app_id.as_deref().unwrap_or_default()
    }

    pub fn redirect_uris(&self, platform: Platform) -> &[String] {
        let set = match platform {
            Platform::Web => self.web.as_ref(),
            Platform::Spa => self.spa.as_ref(),
            Platform::Native => self.public_client.as_ref(),
        };
        set.map(|s| s.redirect_uris.as_slice()).unwrap_or_default()
    }

    pub fn scopes(&self) -> &[PermissionScope] {
        self.api
            .as_ref()
            .map(|a| a.oauth2_permission_scopes.as_slice())
            .unwrap_or_default()
    }

    pub fn roles(&self) -> &[AppRole] {
        self.app_roles.as_deref().unwrap_or_default()
    }

    pub fn passwords(&self) -> &[PasswordCredential] {
        self.password_credentials.as_deref().unwrap_or_default()
    }

    pub fn certificates(&self) -> &[KeyCredential] {
        self.key_credentials.as_deref().unwrap_or_default()
    }

    pub fn resource_access(&self) -> &[RequiredResourceAccess] {
        self.required_resource_access.as_deref().unwrap_or_default()
    }

    pub fn identifier_uris(&self) -> &[String] {
        self.identifier_uris.as_deref().unwrap_or_default()
    }
}

/// Redirect URI platform. Each maps to its own property on the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    Web,
    Spa,
    Native,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Web, Platform::Spa, Platform::Native];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Web => "Web",
            Platform::Spa => "SPA",
            Platform::Native => "Mobile and desktop",
        }
    }

    /// The application property that carries this platform's URIs.
    pub fn property(self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Spa => "spa",
            Platform::Native => "publicClient",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectUriSet {
    #[serde(default)]
    pub redirect_uris: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCredential {
    #[serde(default)]
    pub key_id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub hint: Option<String>,

    #[serde(default)]
    pub start_date_time: Option<String>,

    #[serde(default)]
    pub end_date_time: Option<String>,

    /// Only present in the response to `addPassword`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyCredential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_key_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Base64 certificate body. Null on reads; required when uploading.
    #[serde(default)]
    pub key: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiApplication {
    #[serde(default)]
    pub oauth2_permission_scopes: Vec<PermissionScope>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A delegated permission exposed by the application's API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionScope {
    pub id: String,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub admin_consent_display_name: Option<String>,

    #[serde(default)]
    pub admin_consent_description: Option<String>,

    #[serde(default)]
    pub user_consent_display_name: Option<String>,

    #[serde(default)]
    pub user_consent_description: Option<String>,

    #[serde(default)]
    pub is_enabled: bool,

    /// `User` (admins and users may consent) or `Admin`.
    #[serde(rename = "type", default)]
    pub consent_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PermissionScope {
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRole {
    pub id: String,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_enabled: bool,

    #[serde(default)]
    pub allowed_member_types: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppRole {
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredResourceAccess {
    pub resource_app_id: String,

    #[serde(default)]
    pub resource_access: Vec<ResourceAccess>,
}

/// A reference to one scope (`Scope`) or app role (`Role`) on another API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAccess {
    pub id: String,

    #[serde(rename = "type")]
    pub access_type: AccessType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    /// Delegated permission.
    Scope,
    /// Application permission.
    Role,
}

impl AccessType {
    pub fn label(self) -> &'static str {
        match self {
            AccessType::Scope => "Delegated",
            AccessType::Role => "Application",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignInAudience {
    AzureAdMyOrg,
    AzureAdMultipleOrgs,
    AzureAdAndPersonalMicrosoftAccount,
    PersonalMicrosoftAccount,
}

impl SignInAudience {
    pub const ALL: [SignInAudience; 4] = [
        SignInAudience::AzureAdMyOrg,
        SignInAudience::AzureAdMultipleOrgs,
        SignInAudience::AzureAdAndPersonalMicrosoftAccount,
        SignInAudience::PersonalMicrosoftAccount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SignInAudience::AzureAdMyOrg => "AzureADMyOrg",
            SignInAudience::AzureAdMultipleOrgs => "AzureADMultipleOrgs",
            SignInAudience::AzureAdAndPersonalMicrosoftAccount => {
                "AzureADandPersonalMicrosoftAccount"
            }
            SignInAudience::PersonalMicrosoftAccount => "PersonalMicrosoftAccount",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            SignInAudience::AzureAdMyOrg => "Single tenant",
            SignInAudience::AzureAdMultipleOrgs => "Multitenant",
            SignInAudience::AzureAdAndPersonalMicrosoftAccount => {
                "Multitenant and personal accounts"
            }
            SignInAudience::PersonalMicrosoftAccount => "Personal accounts only",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SignInAudience::AzureAdMyOrg => "Accounts in this organizational directory only",
            SignInAudience::AzureAdMultipleOrgs => {
                "Accounts in any organizational directory"
            }
            SignInAudience::AzureAdAndPersonalMicrosoftAccount => {
                "Accounts in any organizational directory and personal Microsoft accounts"
            }
            SignInAudience::PersonalMicrosoftAccount => "Personal Microsoft accounts only",
        }
    }
}

/// Minimal listing row used to order applications before hydration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,
}
