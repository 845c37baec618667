use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use time::OffsetDateTime;

use crate::auth::CredentialProvider;
use crate::error::{is_credential_error, is_not_found};
use crate::graph::{AppField, ApplicationQuery, DirectoryApi};
use crate::model::{ApplicationSummary, Settings};

use super::expand::expand;
use super::node::TreeNode;
use super::session::SessionContext;
use super::skeleton::application_node;

/// Concurrent skeleton fetches per render.
const HYDRATE_WORKERS: usize = 8;

/// Outcome of one top-level render pass.
#[derive(Debug)]
pub enum Render {
    /// The new top-level node set. Delivered once per pass.
    Rendered {
        nodes: Vec<TreeNode>,
        warning: Option<String>,
    },
    /// Another render was in flight; nothing was fetched.
    Skipped,
    /// The credential went away mid-render; the host should re-initialize.
    SignedOut,
}

pub struct TreeSync {
    api: Arc<dyn DirectoryApi>,
    session: Arc<SessionContext>,
}

impl TreeSync {
    pub fn new(api: Arc<dyn DirectoryApi>, session: Arc<SessionContext>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn api(&self) -> &dyn DirectoryApi {
        self.api.as_ref()
    }

    /// Silent token acquisition; records the result on the session.
    pub fn initialize(&self, credentials: &dyn CredentialProvider) -> bool {
        let ok = match credentials.access_token() {
            Ok(_) => true,
            Err(err) => {
                tracing::info!(error = %format!("{:#}", err), "not signed in");
                false
            }
        };
        self.session.set_authenticated(ok);
        ok
    }

    pub fn render_top_level(&self, settings: &Settings) -> Result<Render> {
        if !self.session.is_authenticated() {
            return Ok(Render::Rendered {
                nodes: vec![TreeNode::sign_in()],
                warning: None,
            });
        }

        let Some(_busy) = self.session.try_begin_render() else {
            tracing::debug!("render already in flight; dropping request");
            return Ok(Render::Skipped);
        };

        match self.populate(settings) {
            Ok(render) => Ok(render),
            Err(err) if is_credential_error(&err) => {
                tracing::info!(error = %format!("{:#}", err), "credential lost during render");
                self.session.set_authenticated(false);
                Ok(Render::SignedOut)
            }
            Err(err) => Err(err),
        }
    }

    fn populate(&self, settings: &Settings) -> Result<Render> {
        let warning = self.count_warning(settings)?;

        let query = ApplicationQuery {
            owned_only: !settings.show_all_applications,
            name_prefix: self.session.filter(),
            max_results: settings.maximum_results,
            eventual_consistency: settings.use_eventual_consistency,
        };
        let mut listed = self.api.list_applications(&query)?;
        if !settings.use_eventual_consistency {
            sort_by_display_name(&mut listed);
        }

        let nodes = self.hydrate(&listed)?;
        tracing::info!(listed = listed.len(), rendered = nodes.len(), "rendered applications");
        Ok(Render::Rendered { nodes, warning })
    }

    fn count_warning(&self, settings: &Settings) -> Result<Option<String>> {
        if !settings.show_application_count_warning
            || settings.use_eventual_consistency
            || !self.session.take_count_warning()
        {
            return Ok(None);
        }

        match self.api.count_applications(!settings.show_all_applications) {
            Ok(n) if n > u64::from(settings.maximum_results) => Ok(Some(format!(
                "{} applications exist but at most {} are listed. Enable eventual consistency to filter and sort on the server.",
                n, settings.maximum_results
            ))),
            Ok(_) => Ok(None),
            Err(err) if is_credential_error(&err) => Err(err),
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "application count unavailable");
                Ok(None)
            }
        }
    }

    /// Skeleton-fetch every listed application; 404s are dropped, order is preserved.
    fn hydrate(&self, listed: &[ApplicationSummary]) -> Result<Vec<TreeNode>> {
        let next = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);
        let done: Mutex<Vec<(usize, TreeNode)>> = Mutex::new(Vec::with_capacity(listed.len()));
        let first_err: Mutex<Option<anyhow::Error>> = Mutex::new(None);
        let api = self.api.as_ref();

        std::thread::scope(|s| {
            for _ in 0..HYDRATE_WORKERS.min(listed.len()) {
                s.spawn(|| {
                    loop {
                        if failed.load(Ordering::Acquire) {
                            return;
                        }
                        let i = next.fetch_add(1, Ordering::AcqRel);
                        let Some(summary) = listed.get(i) else {
                            return;
                        };
                        match api.get_application(&summary.id, AppField::SKELETON) {
                            Ok(app) => {
                                if let Ok(mut d) = done.lock() {
                                    d.push((i, application_node(&app)));
                                }
                            }
                            Err(err) if is_not_found(&err) => {
                                tracing::debug!(object_id = %summary.id, "application vanished before hydration");
                            }
                            Err(err) => {
                                failed.store(true, Ordering::Release);
                                if let Ok(mut slot) = first_err.lock() {
                                    slot.get_or_insert(err);
                                }
                                return;
                            }
                        }
                    }
                });
            }
        });

        if let Some(err) = first_err
            .into_inner()
            .map_err(|_| anyhow!("hydration error slot poisoned"))?
        {
            return Err(err);
        }
        let mut done = done
            .into_inner()
            .map_err(|_| anyhow!("hydration results poisoned"))?;
        done.sort_by_key(|(i, _)| *i);
        Ok(done.into_iter().map(|(_, node)| node).collect())
    }

    /// Fresh skeleton of one application; `None` once it has been deleted.
    pub fn application(&self, object_id: &str) -> Result<Option<TreeNode>> {
        match self.api.get_application(object_id, AppField::SKELETON) {
            Ok(app) => Ok(Some(application_node(&app))),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => {
                if is_credential_error(&err) {
                    self.session.set_authenticated(false);
                }
                Err(err)
            }
        }
    }

    /// Children of `node`, fetched on demand for lazy groups.
    pub fn children(&self, node: &TreeNode) -> Result<Vec<TreeNode>> {
        let out = expand(self.api.as_ref(), node, OffsetDateTime::now_utc());
        if let Err(err) = &out
            && is_credential_error(err)
        {
            self.session.set_authenticated(false);
        }
        out
    }
}

/// Ordering key that ignores case, punctuation and whitespace.
pub fn display_name_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn sort_by_display_name(apps: &mut [ApplicationSummary]) {
    apps.sort_by_cached_key(|a| display_name_key(a.display_name.as_deref().unwrap_or_default()));
}

#[cfg(test)]
#[path = "../tests/tree/sync_tests.rs"]
mod tests;
