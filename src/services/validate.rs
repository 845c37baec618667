//! Input checks applied at prompt time. Each returns the normalized value or a message.

use crate::model::Platform;

pub const MAX_REDIRECT_URI_LEN: usize = 256;
pub const MAX_DISPLAY_NAME_LEN: usize = 120;
pub const MAX_VALUE_LEN: usize = 120;
pub const MAX_DESCRIPTION_LEN: usize = 1024;
pub const MAX_SECRET_DESCRIPTION_LEN: usize = 100;
pub const MIN_EXPIRY_DAYS: u32 = 1;
pub const MAX_EXPIRY_DAYS: u32 = 730;

fn required(raw: &str, what: &str) -> Result<String, String> {
    let v = raw.trim();
    if v.is_empty() {
        return Err(format!("{} is required", what));
    }
    Ok(v.to_string())
}

fn at_most(v: String, max: usize, what: &str) -> Result<String, String> {
    if v.chars().count() > max {
        return Err(format!("{} must be {} characters or fewer", what, max));
    }
    Ok(v)
}

pub fn display_name(raw: &str) -> Result<String, String> {
    at_most(required(raw, "A name")?, MAX_DISPLAY_NAME_LEN, "The name")
}

pub fn description(raw: &str) -> Result<String, String> {
    at_most(
        required(raw, "A description")?,
        MAX_DESCRIPTION_LEN,
        "The description",
    )
}

/// Optional free text; empty is allowed.
pub fn optional_description(raw: &str) -> Result<String, String> {
    at_most(raw.trim().to_string(), MAX_DESCRIPTION_LEN, "The description")
}

/// `original` is the value being edited; it does not count as a duplicate of itself.
pub fn redirect_uri(
    platform: Platform,
    raw: &str,
    existing: &[String],
    original: Option<&str>,
) -> Result<String, String> {
    let v = required(raw, "A redirect URI")?;
    let v = at_most(v, MAX_REDIRECT_URI_LEN, "A redirect URI")?;

    match platform {
        Platform::Web => {
            if !(v.starts_with("https://") || v.starts_with("http://localhost")) {
                return Err(
                    "Web redirect URIs must start with https:// or http://localhost".to_string(),
                );
            }
        }
        Platform::Spa | Platform::Native => {
            if !v.contains("://") {
                return Err("The redirect URI must contain a scheme, like myapp://".to_string());
            }
        }
    }

    if original != Some(v.as_str()) && existing.iter().any(|e| *e == v) {
        return Err("That redirect URI already exists".to_string());
    }
    Ok(v)
}

/// Role and scope `value` claims: no whitespace, no leading dot, unique within the application.
pub fn claim_value(raw: &str, existing: &[&str], original: Option<&str>) -> Result<String, String> {
    let v = at_most(required(raw, "A value")?, MAX_VALUE_LEN, "The value")?;
    if v.chars().any(char::is_whitespace) {
        return Err("The value cannot contain spaces".to_string());
    }
    if v.starts_with('.') {
        return Err("The value cannot start with a period".to_string());
    }
    if original != Some(v.as_str()) && existing.contains(&v.as_str()) {
        return Err(format!("The value '{}' already exists", v));
    }
    Ok(v)
}

pub fn secret_description(raw: &str) -> Result<String, String> {
    at_most(
        raw.trim().to_string(),
        MAX_SECRET_DESCRIPTION_LEN,
        "The description",
    )
}

pub fn expiry_days(raw: &str) -> Result<String, String> {
    let days: u32 = raw
        .trim()
        .parse()
        .map_err(|_| "Enter a whole number of days".to_string())?;
    if !(MIN_EXPIRY_DAYS..=MAX_EXPIRY_DAYS).contains(&days) {
        return Err(format!(
            "Expiry must be between {} and {} days",
            MIN_EXPIRY_DAYS, MAX_EXPIRY_DAYS
        ));
    }
    Ok(days.to_string())
}

pub fn app_id_uri(raw: &str) -> Result<String, String> {
    let v = at_most(
        required(raw, "An application ID URI")?,
        MAX_REDIRECT_URI_LEN,
        "The application ID URI",
    )?;
    if !(v.contains("://") || v.starts_with("urn:")) {
        return Err("The application ID URI must be a URI, like api://<client id>".to_string());
    }
    if v.ends_with('/') {
        return Err("The application ID URI cannot end with a slash".to_string());
    }
    Ok(v)
}

pub fn search_text(raw: &str) -> Result<String, String> {
    required(raw, "Search text")
}

pub fn file_path(raw: &str) -> Result<String, String> {
    let v = required(raw, "A file path")?;
    if !std::path::Path::new(&v).is_file() {
        return Err(format!("{} is not a file", v));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../tests/services/validate_tests.rs"]
mod tests;
