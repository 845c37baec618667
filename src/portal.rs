//! Azure portal deep links.

use anyhow::{Context, Result};

pub const PORTAL_BASE: &str = "https://portal.azure.com";

fn base(tenant_id: Option<&str>) -> String {
    match tenant_id.filter(|t| !t.is_empty()) {
        Some(t) => format!("{}/{}", PORTAL_BASE, t),
        None => format!("{}/", PORTAL_BASE),
    }
}

pub fn application_url(tenant_id: Option<&str>, app_id: &str) -> String {
    format!(
        "{}#view/Microsoft_AAD_RegisteredApps/ApplicationMenuBlade/~/Overview/appId/{}/isMSAApp~/false",
        base(tenant_id),
        app_id
    )
}

pub fn user_url(tenant_id: Option<&str>, user_id: &str) -> String {
    format!(
        "{}#view/Microsoft_AAD_UsersAndTenants/UserProfileMenuBlade/~/overview/userId/{}",
        base(tenant_id),
        user_id
    )
}

pub fn open(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("open {}", url))
}
