//! Edit operations on application registrations.
//!
//! Every operation follows the same shape: collect all input first (any
//! dismissal cancels with no remote call), mark the node busy, read the one
//! sub-collection being changed, mutate it in memory, send a single replace
//! call, and tell the caller what to re-render.

use anyhow::{Result, anyhow};
use time::OffsetDateTime;

use crate::graph::DirectoryApi;
use crate::tree::{NodeKind, TreeNode};

use self::prompt::{Prompter, Prompts, Step};

mod app_id_uri;
mod application;
mod audience;
mod credentials;
mod filter;
mod owners;
mod permissions;
pub mod prompt;
mod redirect_uris;
mod roles;
mod scopes;
pub mod validate;

pub use self::app_id_uri::{edit_app_id_uri, remove_app_id_uri};
pub use self::application::{
    add_application, copy_value, delete_application, open_in_portal, rename_application,
    view_manifest,
};
pub use self::audience::change_audience;
pub use self::credentials::{
    DEFAULT_EXPIRY_DAYS, add_password, delete_certificate, delete_password, upload_certificate,
};
pub use self::filter::{FILTER_NEEDS_EVENTUAL, clear_filter, set_filter};
pub use self::owners::{add_owner, open_owner_in_portal, remove_owner};
pub use self::permissions::{add_permission, delete_api, delete_permission, edit_permission};
pub use self::redirect_uris::{add_redirect_uri, delete_redirect_uri, edit_redirect_uri};
pub use self::roles::{add_role, delete_role, edit_role, set_role_enabled};
pub use self::scopes::{add_scope, delete_scope, edit_scope, set_scope_enabled};

/// Host side effects an edit may trigger besides prompting.
pub trait Feedback {
    /// Put the node being edited into its busy state.
    fn busy(&self, label: &str);
    /// Undo `busy` after a failed edit.
    fn restore(&self);
    fn copy(&self, text: &str) -> Result<()>;
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn open_url(&self, url: &str) -> Result<()>;
}

/// What the caller should re-render after an applied edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refresh {
    /// The whole top-level list.
    Full,
    /// One application's skeleton.
    Application { object_id: String },
    /// The children of one group under an application.
    Branch { object_id: String, kind: NodeKind },
    Nothing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Applied(Refresh),
    /// A prompt was dismissed. Nothing was sent.
    Cancelled,
    /// A client-side rule refused the edit. Nothing was sent.
    Rejected(String),
}

pub struct EditContext<'a> {
    pub api: &'a dyn DirectoryApi,
    pub prompter: &'a dyn Prompter,
    pub feedback: &'a dyn Feedback,
    /// Tenant used in portal links; `None` leaves the segment out.
    pub tenant_id: Option<&'a str>,
    pub now: OffsetDateTime,
}

impl<'a> EditContext<'a> {
    /// Run a prompt sequence; `None` when any step was dismissed.
    pub(crate) fn ask<T>(&self, steps: impl FnOnce(&Prompts<'a>) -> Step<T>) -> Option<T> {
        steps(&Prompts::new(self.prompter)).ok()
    }

    /// Remote part of an edit: busy while it runs, restored if it fails.
    pub(crate) fn commit<T>(
        &self,
        busy: &str,
        label: &str,
        call: impl FnOnce(&dyn DirectoryApi) -> Result<T>,
    ) -> Result<T> {
        self.feedback.busy(busy);
        match call(self.api) {
            Ok(v) => Ok(v),
            Err(err) => {
                tracing::warn!(edit = label, error = %format!("{:#}", err), "edit failed");
                self.feedback.restore();
                Err(err.context(label.to_string()))
            }
        }
    }
}

pub(crate) fn owning_app(node: &TreeNode) -> Result<&str> {
    node.object_id
        .as_deref()
        .ok_or_else(|| anyhow!("{} does not belong to an application", node.label))
}

pub(crate) fn entity_id(node: &TreeNode) -> Result<&str> {
    node.entity_id
        .as_deref()
        .ok_or_else(|| anyhow!("{} has no id", node.label))
}

pub(crate) fn branch(object_id: &str, kind: NodeKind) -> EditOutcome {
    EditOutcome::Applied(Refresh::Branch {
        object_id: object_id.to_string(),
        kind,
    })
}
