use serde::{Deserialize, Serialize};

use super::{AccessType, AppRole, PermissionScope};

/// A user as seen through owner links and user search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub mail: Option<String>,

    #[serde(default)]
    pub user_principal_name: Option<String>,
}

impl DirectoryUser {
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.user_principal_name.as_deref())
            .unwrap_or(&self.id)
    }

    /// Mail when set, otherwise the sign-in name.
    pub fn contact(&self) -> Option<&str> {
        self.mail
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.user_principal_name.as_deref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePrincipal {
    pub id: String,

    #[serde(default)]
    pub app_id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub oauth2_permission_scopes: Vec<PermissionScope>,

    #[serde(default)]
    pub app_roles: Vec<AppRole>,
}

/// A permission offered by a service principal, normalized across scopes and roles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OfferedPermission {
    pub id: String,
    pub value: String,
    pub description: String,
    pub access_type: AccessType,
}

impl ServicePrincipal {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.app_id)
    }

    /// Enabled permissions of one kind, sorted by value.
    pub fn offered(&self, access_type: AccessType) -> Vec<OfferedPermission> {
        let mut out: Vec<OfferedPermission> = match access_type {
            AccessType::Scope => self
                .oauth2_permission_scopes
                .iter()
                .filter(|s| s.is_enabled)
                .map(|s| OfferedPermission {
                    id: s.id.clone(),
                    value: s.value().to_string(),
                    description: s.admin_consent_display_name.clone().unwrap_or_default(),
                    access_type,
                })
                .collect(),
            AccessType::Role => self
                .app_roles
                .iter()
                .filter(|r| {
                    r.is_enabled && r.allowed_member_types.iter().any(|t| t == "Application")
                })
                .map(|r| OfferedPermission {
                    id: r.id.clone(),
                    value: r.value().to_string(),
                    description: r.display_name.clone().unwrap_or_default(),
                    access_type,
                })
                .collect(),
        };
        out.sort_by(|a, b| a.value.cmp(&b.value));
        out
    }

    /// Resolve a permission reference regardless of its enabled state.
    pub fn resolve(&self, id: &str, access_type: AccessType) -> Option<OfferedPermission> {
        match access_type {
            AccessType::Scope => self
                .oauth2_permission_scopes
                .iter()
                .find(|s| s.id == id)
                .map(|s| OfferedPermission {
                    id: s.id.clone(),
                    value: s.value().to_string(),
                    description: s.admin_consent_display_name.clone().unwrap_or_default(),
                    access_type,
                }),
            AccessType::Role => self.app_roles.iter().find(|r| r.id == id).map(|r| {
                OfferedPermission {
                    id: r.id.clone(),
                    value: r.value().to_string(),
                    description: r.display_name.clone().unwrap_or_default(),
                    access_type,
                }
            }),
        }
    }
}
