//! Background jobs. Every network call the TUI makes runs here and reports
//! back over one channel, so the UI thread never blocks.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use anyhow::Result;
use time::OffsetDateTime;

use crate::auth::CredentialProvider;
use crate::model::Settings;
use crate::services::{self, EditContext, EditOutcome};
use crate::tree::{Render, TreeNode, TreeSync};

use super::host::{ChannelFeedback, ChannelPrompter, Level};
use super::{EditAction, NodeKey, PromptRequest};

pub(super) enum UiEvent {
    Prompt(PromptRequest),
    Busy {
        key: NodeKey,
        label: String,
    },
    Restore {
        key: NodeKey,
    },
    Copy {
        text: String,
        reply: Sender<Result<(), String>>,
    },
    Notice {
        level: Level,
        message: String,
    },
    Initialized {
        authenticated: bool,
    },
    SignedIn(Result<()>),
    Rendered(Result<Render>),
    Expanded {
        key: NodeKey,
        result: Result<Vec<TreeNode>>,
    },
    ApplicationLoaded {
        object_id: String,
        result: Result<Option<TreeNode>>,
    },
    JobDone {
        target: Option<NodeKey>,
        result: Result<JobOutput>,
    },
}

/// An edit to run off the UI thread.
pub(super) enum Job {
    Edit { action: EditAction, node: TreeNode },
    AddApplication,
    Filter,
}

pub(super) enum JobOutput {
    Outcome(EditOutcome),
    Manifest { title: String, text: String },
}

/// Everything a job needs, cloned off the UI thread.
pub(super) struct Workers {
    pub(super) sync: Arc<TreeSync>,
    pub(super) credentials: Arc<dyn CredentialProvider>,
    pub(super) tx: Sender<UiEvent>,
}

impl Workers {
    fn spawn(&self, name: &str, f: impl FnOnce(Arc<TreeSync>, Sender<UiEvent>) + Send + 'static) {
        let sync = Arc::clone(&self.sync);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("appreg-{}", name))
            .spawn(move || f(sync, tx));
        if let Err(err) = spawned {
            tracing::error!(job = name, error = %err, "could not start worker thread");
        }
    }

    pub(super) fn initialize(&self) {
        let credentials = Arc::clone(&self.credentials);
        self.spawn("init", move |sync, tx| {
            let authenticated = sync.initialize(credentials.as_ref());
            let _ = tx.send(UiEvent::Initialized { authenticated });
        });
    }

    pub(super) fn sign_in(&self, tenant: Option<String>) {
        let credentials = Arc::clone(&self.credentials);
        self.spawn("sign-in", move |_, tx| {
            let progress = |line: &str| {
                let _ = tx.send(UiEvent::Notice {
                    level: Level::Info,
                    message: line.to_string(),
                });
            };
            let result = credentials.sign_in(tenant.as_deref(), &progress);
            let _ = tx.send(UiEvent::SignedIn(result));
        });
    }

    pub(super) fn render(&self, settings: Settings) {
        self.spawn("render", move |sync, tx| {
            let _ = tx.send(UiEvent::Rendered(sync.render_top_level(&settings)));
        });
    }

    pub(super) fn expand(&self, node: TreeNode) {
        self.spawn("expand", move |sync, tx| {
            let key = NodeKey::of(&node);
            let result = sync.children(&node);
            let _ = tx.send(UiEvent::Expanded { key, result });
        });
    }

    pub(super) fn application(&self, object_id: String) {
        self.spawn("application", move |sync, tx| {
            let result = sync.application(&object_id);
            let _ = tx.send(UiEvent::ApplicationLoaded { object_id, result });
        });
    }

    pub(super) fn edit(&self, job: Job, settings: Settings, tenant_id: Option<String>) {
        self.spawn("edit", move |sync, tx| {
            let target = match &job {
                Job::Edit { node, .. } => Some(NodeKey::of(node)),
                Job::AddApplication | Job::Filter => None,
            };
            let prompter = ChannelPrompter::new(tx.clone());
            let feedback = ChannelFeedback::new(tx.clone(), target.clone());
            let ctx = EditContext {
                api: sync.api(),
                prompter: &prompter,
                feedback: &feedback,
                tenant_id: tenant_id.as_deref(),
                now: OffsetDateTime::now_utc(),
            };
            let result = run_job(&ctx, &sync, &settings, job);
            let _ = tx.send(UiEvent::JobDone { target, result });
        });
    }
}

pub(super) fn run_job(
    ctx: &EditContext<'_>,
    sync: &TreeSync,
    settings: &Settings,
    job: Job,
) -> Result<JobOutput> {
    match job {
        Job::AddApplication => services::add_application(ctx).map(JobOutput::Outcome),
        Job::Filter => Ok(JobOutput::Outcome(services::set_filter(
            ctx,
            sync.session(),
            settings,
        ))),
        Job::Edit { action, node } => run_edit(ctx, action, &node),
    }
}

fn run_edit(ctx: &EditContext<'_>, action: EditAction, node: &TreeNode) -> Result<JobOutput> {
    let outcome = match action {
        EditAction::Manifest => {
            return Ok(JobOutput::Manifest {
                title: format!("Manifest: {}", node.label),
                text: services::view_manifest(ctx, node)?,
            });
        }
        EditAction::Rename => services::rename_application(ctx, node),
        EditAction::DeleteApplication => services::delete_application(ctx, node),
        EditAction::Copy => services::copy_value(ctx, node),
        EditAction::OpenPortal => services::open_in_portal(ctx, node),
        EditAction::EditAppIdUri => services::edit_app_id_uri(ctx, node),
        EditAction::RemoveAppIdUri => services::remove_app_id_uri(ctx, node),
        EditAction::ChangeAudience => services::change_audience(ctx, node),
        EditAction::AddRedirectUri => services::add_redirect_uri(ctx, node),
        EditAction::EditRedirectUri => services::edit_redirect_uri(ctx, node),
        EditAction::DeleteRedirectUri => services::delete_redirect_uri(ctx, node),
        EditAction::AddPassword => services::add_password(ctx, node),
        EditAction::DeletePassword => services::delete_password(ctx, node),
        EditAction::UploadCertificate => services::upload_certificate(ctx, node),
        EditAction::DeleteCertificate => services::delete_certificate(ctx, node),
        EditAction::AddPermission => services::add_permission(ctx, node),
        EditAction::EditPermission => services::edit_permission(ctx, node),
        EditAction::DeletePermission => services::delete_permission(ctx, node),
        EditAction::DeleteApi => services::delete_api(ctx, node),
        EditAction::AddScope => services::add_scope(ctx, node),
        EditAction::EditScope => services::edit_scope(ctx, node),
        EditAction::EnableScope => services::set_scope_enabled(ctx, node, true),
        EditAction::DisableScope => services::set_scope_enabled(ctx, node, false),
        EditAction::DeleteScope => services::delete_scope(ctx, node),
        EditAction::AddRole => services::add_role(ctx, node),
        EditAction::EditRole => services::edit_role(ctx, node),
        EditAction::EnableRole => services::set_role_enabled(ctx, node, true),
        EditAction::DisableRole => services::set_role_enabled(ctx, node, false),
        EditAction::DeleteRole => services::delete_role(ctx, node),
        EditAction::AddOwner => services::add_owner(ctx, node),
        EditAction::RemoveOwner => services::remove_owner(ctx, node),
        EditAction::OpenOwner => services::open_owner_in_portal(ctx, node),
    }?;
    Ok(JobOutput::Outcome(outcome))
}
