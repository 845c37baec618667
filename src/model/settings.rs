use serde::{Deserialize, Serialize};

pub const DEFAULT_MAXIMUM_RESULTS: u32 = 100;
pub const MAXIMUM_RESULTS_LIMIT: u32 = 999;

/// User-tunable behaviour of the browser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// List every application in the tenant instead of only owned ones.
    pub show_all_applications: bool,

    /// Upper bound on listed applications.
    pub maximum_results: u32,

    /// Query with `ConsistencyLevel: eventual` (server ordering and filtering).
    pub use_eventual_consistency: bool,

    /// Warn once per session when more applications exist than are shown.
    pub show_application_count_warning: bool,

    /// Leave the tenant id out of portal links.
    pub omit_tenant_id_from_portal_requests: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_all_applications: false,
            maximum_results: DEFAULT_MAXIMUM_RESULTS,
            use_eventual_consistency: false,
            show_application_count_warning: true,
            omit_tenant_id_from_portal_requests: false,
        }
    }
}

/// Settings keys accepted by `settings set` and the TUI `set` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingKey {
    ShowAllApplications,
    MaximumResults,
    UseEventualConsistency,
    ShowApplicationCountWarning,
    OmitTenantIdFromPortalRequests,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::ShowAllApplications,
        SettingKey::MaximumResults,
        SettingKey::UseEventualConsistency,
        SettingKey::ShowApplicationCountWarning,
        SettingKey::OmitTenantIdFromPortalRequests,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingKey::ShowAllApplications => "showAllApplications",
            SettingKey::MaximumResults => "maximumResults",
            SettingKey::UseEventualConsistency => "useEventualConsistency",
            SettingKey::ShowApplicationCountWarning => "showApplicationCountWarning",
            SettingKey::OmitTenantIdFromPortalRequests => "omitTenantIdFromPortalRequests",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(raw))
    }
}

impl Settings {
    /// Clamp out-of-range values read from disk.
    pub fn normalized(mut self) -> Self {
        self.maximum_results = self.maximum_results.clamp(1, MAXIMUM_RESULTS_LIMIT);
        self
    }

    /// True when switching from `self` to `next` changes what the top-level listing returns.
    pub fn repopulation_needed(&self, next: &Settings) -> bool {
        self.show_all_applications != next.show_all_applications
            || self.maximum_results != next.maximum_results
            || self.use_eventual_consistency != next.use_eventual_consistency
    }

    pub fn get(&self, key: SettingKey) -> String {
        match key {
            SettingKey::ShowAllApplications => self.show_all_applications.to_string(),
            SettingKey::MaximumResults => self.maximum_results.to_string(),
            SettingKey::UseEventualConsistency => self.use_eventual_consistency.to_string(),
            SettingKey::ShowApplicationCountWarning => {
                self.show_application_count_warning.to_string()
            }
            SettingKey::OmitTenantIdFromPortalRequests => {
                self.omit_tenant_id_from_portal_requests.to_string()
            }
        }
    }

    pub fn set(&mut self, key: SettingKey, raw: &str) -> Result<(), String> {
        let raw = raw.trim();
        match key {
            SettingKey::MaximumResults => {
                let n: u32 = raw
                    .parse()
                    .map_err(|_| format!("{} expects a number", key.name()))?;
                if !(1..=MAXIMUM_RESULTS_LIMIT).contains(&n) {
                    return Err(format!(
                        "{} must be between 1 and {}",
                        key.name(),
                        MAXIMUM_RESULTS_LIMIT
                    ));
                }
                self.maximum_results = n;
            }
            SettingKey::ShowAllApplications => self.show_all_applications = flag(key, raw)?,
            SettingKey::UseEventualConsistency => self.use_eventual_consistency = flag(key, raw)?,
            SettingKey::ShowApplicationCountWarning => {
                self.show_application_count_warning = flag(key, raw)?
            }
            SettingKey::OmitTenantIdFromPortalRequests => {
                self.omit_tenant_id_from_portal_requests = flag(key, raw)?
            }
        }
        Ok(())
    }
}

fn flag(key: SettingKey, raw: &str) -> Result<bool, String> {
    parse_bool(raw).ok_or_else(|| format!("{} expects true/false", key.name()))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
