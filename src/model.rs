mod application;
mod directory;
mod settings;

pub use self::application::{
    AccessType, ApiApplication, AppRole, Application, ApplicationSummary, KeyCredential,
    PasswordCredential, PermissionScope, Platform, RedirectUriSet, RequiredResourceAccess,
    ResourceAccess, SignInAudience,
};
pub use self::directory::{DirectoryUser, OfferedPermission, ServicePrincipal};
pub use self::settings::{
    DEFAULT_MAXIMUM_RESULTS, MAXIMUM_RESULTS_LIMIT, SettingKey, Settings,
};

#[cfg(test)]
#[path = "tests/model/model_tests.rs"]
mod tests;
