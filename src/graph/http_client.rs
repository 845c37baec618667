use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::blocking::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::GraphClient;
use super::types::{Page, api_error};
use crate::error::GraphError;

const CONSISTENCY_HEADER: &str = "ConsistencyLevel";

impl GraphClient {
    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start an authenticated request. Token failures surface before any I/O.
    pub(super) fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self.credentials.access_token()?;
        Ok(self.client.request(method, url).bearer_auth(token.token))
    }

    pub(super) fn eventual(&self, req: RequestBuilder, eventual: bool) -> RequestBuilder {
        if eventual {
            req.header(CONSISTENCY_HEADER, "eventual")
        } else {
            req
        }
    }

    pub(super) fn ensure_ok(&self, resp: Response, label: &str) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        tracing::debug!(%status, label, "graph call failed");

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.credentials.invalidate();
            return Err(GraphError::CredentialUnavailable(format!(
                "{}: access token rejected (sign in again)",
                label
            ))
            .into());
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GraphError::NotFound {
                label: label.to_string(),
            }
            .into());
        }

        let body = resp.text().unwrap_or_default();
        Err(api_error(label, status.as_u16(), &body).into())
    }

    pub(super) fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        eventual: bool,
        label: &str,
    ) -> Result<T> {
        let req = self.eventual(self.request(Method::GET, url)?, eventual);
        let resp = req.query(params).send().context(label.to_string())?;
        self.ensure_ok(resp, label)?
            .json()
            .with_context(|| format!("parse {}", label))
    }

    /// Follow `@odata.nextLink` until `limit` items are collected or the pages run out.
    pub(super) fn get_pages<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        eventual: bool,
        limit: usize,
        label: &str,
    ) -> Result<Vec<T>> {
        let mut page: Page<T> = self.get_json(url, params, eventual, label)?;
        let mut out = std::mem::take(&mut page.value);

        while out.len() < limit {
            let Some(next) = page.next_link.take() else {
                break;
            };
            page = self.get_json(&next, &[], eventual, label)?;
            out.append(&mut page.value);
        }

        out.truncate(limit);
        Ok(out)
    }

    pub(super) fn send_json(
        &self,
        method: Method,
        url: &str,
        body: &serde_json::Value,
        label: &str,
    ) -> Result<Response> {
        let resp = self
            .request(method, url)?
            .json(body)
            .send()
            .context(label.to_string())?;
        self.ensure_ok(resp, label)
    }

    pub(super) fn send_empty(&self, method: Method, url: &str, label: &str) -> Result<()> {
        let resp = self
            .request(method, url)?
            .send()
            .context(label.to_string())?;
        let _ = self.ensure_ok(resp, label)?;
        Ok(())
    }
}
