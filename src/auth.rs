//! Token acquisition for the directory client.
//!
//! The Azure CLI is the only interactive flow: silent acquisition runs
//! `az account get-access-token`, sign-in runs `az login` and then retries the
//! silent path. A static token (from `APPREG_ACCESS_TOKEN`) bypasses the CLI.

use std::ffi::OsString;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::GraphError;

pub const GRAPH_RESOURCE: &str = "https://graph.microsoft.com";
pub const ACCESS_TOKEN_ENV: &str = "APPREG_ACCESS_TOKEN";

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: time::Duration = time::Duration::minutes(5);

#[derive(Clone, Debug)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<OffsetDateTime>,
    pub tenant_id: Option<String>,
}

impl AccessToken {
    fn fresh_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|t| now + EXPIRY_MARGIN < t)
    }
}

pub trait CredentialProvider: Send + Sync {
    /// Silent acquisition. Fails with [`GraphError::CredentialUnavailable`].
    fn access_token(&self) -> Result<AccessToken>;

    /// Interactive sign-in, optionally pinned to a tenant. `progress` receives
    /// each line the sign-in flow prints for the user, such as a device code.
    fn sign_in(&self, tenant: Option<&str>, progress: &dyn Fn(&str)) -> Result<()>;

    /// Drop any cached token so the next call re-acquires.
    fn invalidate(&self);

    fn tenant_id(&self) -> Option<String>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliToken {
    access_token: String,

    #[serde(default, rename = "expires_on")]
    expires_on: Option<i64>,

    #[serde(default)]
    tenant: Option<String>,
}

pub(crate) fn parse_cli_token(stdout: &[u8]) -> Result<AccessToken> {
    let raw: CliToken = serde_json::from_slice(stdout).context("parse az token output")?;
    let expires_at = raw
        .expires_on
        .and_then(|s| OffsetDateTime::from_unix_timestamp(s).ok());
    Ok(AccessToken {
        token: raw.access_token,
        expires_at,
        tenant_id: raw.tenant,
    })
}

/// Arguments of `az login`. Device-code login is the only flow that works
/// when no local browser can be opened.
pub(crate) fn login_args(tenant: Option<&str>, device_code: bool) -> Vec<String> {
    let mut args: Vec<String> = ["login", "--allow-no-subscriptions", "--output", "none"]
        .into_iter()
        .map(String::from)
        .collect();
    if device_code {
        args.push("--use-device-code".to_string());
    }
    if let Some(t) = tenant.map(str::trim).filter(|t| !t.is_empty()) {
        args.push("--tenant".to_string());
        args.push(t.to_string());
    }
    args
}

/// True over SSH, and on Linux desktops without a display server.
pub(crate) fn browser_unavailable(var: impl Fn(&str) -> Option<OsString>) -> bool {
    let set = |k: &str| var(k).is_some_and(|v| !v.is_empty());
    if set("SSH_CONNECTION") || set("SSH_TTY") {
        return true;
    }
    cfg!(target_os = "linux") && !set("DISPLAY") && !set("WAYLAND_DISPLAY")
}

pub struct AzureCliCredential {
    program: String,
    cache: Mutex<Option<AccessToken>>,
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self::new()
    }
}

impl AzureCliCredential {
    pub fn new() -> Self {
        let program = if cfg!(windows) { "az.cmd" } else { "az" };
        Self::with_program(program)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            cache: Mutex::new(None),
        }
    }

    fn cached(&self) -> Option<AccessToken> {
        let guard = self.cache.lock().ok()?;
        guard
            .as_ref()
            .filter(|t| t.fresh_at(OffsetDateTime::now_utc()))
            .cloned()
    }

    fn store(&self, token: &AccessToken) {
        if let Ok(mut guard) = self.cache.lock() {
            *guard = Some(token.clone());
        }
    }
}

impl CredentialProvider for AzureCliCredential {
    fn access_token(&self) -> Result<AccessToken> {
        if let Some(token) = self.cached() {
            return Ok(token);
        }

        let out = Command::new(&self.program)
            .args([
                "account",
                "get-access-token",
                "--resource",
                GRAPH_RESOURCE,
                "--output",
                "json",
            ])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                GraphError::CredentialUnavailable(format!("run {}: {}", self.program, e))
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let msg = stderr.trim();
            tracing::debug!(status = ?out.status, "az get-access-token failed");
            return Err(GraphError::CredentialUnavailable(if msg.is_empty() {
                "az account get-access-token failed (run `az login`)".to_string()
            } else {
                msg.to_string()
            })
            .into());
        }

        let token = parse_cli_token(&out.stdout)
            .map_err(|e| GraphError::CredentialUnavailable(format!("{:#}", e)))?;
        self.store(&token);
        Ok(token)
    }

    fn sign_in(&self, tenant: Option<&str>, progress: &dyn Fn(&str)) -> Result<()> {
        let device_code = browser_unavailable(|k| std::env::var_os(k));
        let args = login_args(tenant, device_code);
        tracing::info!(tenant = tenant.unwrap_or(""), device_code, "interactive az login");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("run {} login", self.program))?;

        // The device-code instructions arrive on stderr while az waits.
        let mut last = String::new();
        if let Some(stderr) = child.stderr.take() {
            for line in BufReader::new(stderr).lines() {
                let line = line.context("read az login output")?;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                tracing::info!(line, "az login");
                progress(line);
                last = line.to_string();
            }
        }
        let status = child.wait().context("wait for az login")?;
        if !status.success() {
            anyhow::bail!("az login failed: {}", last);
        }

        self.invalidate();
        self.access_token().context("acquire token after sign-in")?;
        Ok(())
    }

    fn invalidate(&self) {
        if let Ok(mut guard) = self.cache.lock() {
            *guard = None;
        }
    }

    fn tenant_id(&self) -> Option<String> {
        self.cache
            .lock()
            .ok()
            .and_then(|g| g.as_ref().and_then(|t| t.tenant_id.clone()))
    }
}

/// A fixed bearer token. Sign-in is not possible; an empty token is "signed out".
pub struct StaticCredential {
    token: String,
    tenant_id: Option<String>,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            tenant_id: None,
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(|t| Self::new(t.trim()))
    }
}

impl CredentialProvider for StaticCredential {
    fn access_token(&self) -> Result<AccessToken> {
        if self.token.is_empty() {
            return Err(GraphError::CredentialUnavailable("no access token".into()).into());
        }
        Ok(AccessToken {
            token: self.token.clone(),
            expires_at: None,
            tenant_id: self.tenant_id.clone(),
        })
    }

    fn sign_in(&self, _tenant: Option<&str>, _progress: &dyn Fn(&str)) -> Result<()> {
        anyhow::bail!("sign-in is not available with {}", ACCESS_TOKEN_ENV)
    }

    fn invalidate(&self) {}

    fn tenant_id(&self) -> Option<String> {
        self.tenant_id.clone()
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
