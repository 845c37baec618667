use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{self, IsTerminal};
use std::sync::mpsc::{Receiver, channel};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::auth::CredentialProvider;
use crate::error::is_credential_error;
use crate::graph::{DirectoryApi, GraphClient};
use crate::model::{SettingKey, Settings};
use crate::services::{self, EditOutcome, Refresh};
use crate::store::SettingsStore;
use crate::tree::{Children, Icon, NodeKind, Render, SessionContext, TreeNode, TreeSync};

use super::host::Level;
use super::modal::{self, Modal};
use super::suggest::suggestions;
use super::worker::Workers;
use super::commands::{Command, available_command_defs, global_command_defs, node_actions, parse_command};
use super::{CommandDef, Input, Job, JobOutput, NodeKey, TreeView, UiEvent};

mod actions;
mod event_loop;
mod events;
mod render;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(super) fn run(opts: crate::tui::TuiOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let api: Arc<dyn DirectoryApi> = Arc::new(GraphClient::new(
        &opts.graph_url,
        Arc::clone(&opts.credentials),
    )?);
    let mut app = App::new(api, opts.credentials, opts.store);

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    app.start();
    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

#[derive(Clone, Debug)]
pub(super) struct StatusEntry {
    pub(super) level: Level,
    pub(super) text: String,
}

pub(super) struct App {
    workers: Workers,
    store: SettingsStore,
    settings: Settings,

    tree: TreeView,
    /// Nodes with an edit in flight, with the label shown next to them.
    busy: HashMap<NodeKey, String>,
    /// Lazy nodes whose children are being fetched.
    loading: HashSet<NodeKey>,
    rendering: bool,

    modal: Option<Modal>,
    /// Prompts and viewers waiting for the current modal to close.
    pending: VecDeque<Modal>,

    input: Input,
    suggestions: Vec<CommandDef>,
    suggestion_selected: usize,

    last_command: Option<String>,
    last_result: Option<StatusEntry>,

    rx: Receiver<UiEvent>,
    clipboard: Option<arboard::Clipboard>,
    /// Set after a credential failure forced one re-initialization.
    reinitialized: bool,
    /// The terminal was written to behind our back (e.g. by `az login`).
    needs_clear: bool,
    tick: usize,
    quit: bool,
}

impl App {
    pub(super) fn new(
        api: Arc<dyn DirectoryApi>,
        credentials: Arc<dyn CredentialProvider>,
        store: SettingsStore,
    ) -> Self {
        let (tx, rx) = channel();
        let session = Arc::new(SessionContext::new());
        let mut app = Self {
            workers: Workers {
                sync: Arc::new(TreeSync::new(api, session)),
                credentials,
                tx,
            },
            store,
            settings: Settings::default(),
            tree: TreeView::default(),
            busy: HashMap::new(),
            loading: HashSet::new(),
            rendering: false,
            modal: None,
            pending: VecDeque::new(),
            input: Input::default(),
            suggestions: Vec::new(),
            suggestion_selected: 0,
            last_command: None,
            last_result: None,
            rx,
            clipboard: None,
            reinitialized: false,
            needs_clear: false,
            tick: 0,
            quit: false,
        };
        match app.store.read() {
            Ok(s) => app.settings = s,
            Err(err) => app.report(Level::Warn, format!("Using default settings: {:#}", err)),
        }
        app
    }

    /// Silent sign-in, then the first render.
    pub(super) fn start(&mut self) {
        self.rendering = true;
        self.workers.initialize();
    }

    fn session(&self) -> &SessionContext {
        self.workers.sync.session()
    }

    fn report(&mut self, level: Level, text: impl Into<String>) {
        let text = text.into();
        match level {
            Level::Info => tracing::info!("{}", text),
            Level::Warn => tracing::warn!("{}", text),
            Level::Error => tracing::error!("{}", text),
        }
        self.last_result = Some(StatusEntry { level, text });
    }

    fn report_error(&mut self, err: &anyhow::Error) {
        self.report(Level::Error, format!("{:#}", err));
    }

    fn tenant_for_links(&self) -> Option<String> {
        if self.settings.omit_tenant_id_from_portal_requests {
            None
        } else {
            self.workers.credentials.tenant_id()
        }
    }

    fn refresh_all(&mut self) {
        self.rendering = true;
        self.workers.render(self.settings.clone());
    }

    fn recompute_suggestions(&mut self) {
        let defs = available_command_defs(self.tree.selected());
        self.suggestions = suggestions(&self.input.buf, &defs);
        self.suggestion_selected = 0;
    }

    fn apply_selected_suggestion(&mut self) {
        let Some(def) = self.suggestions.get(self.suggestion_selected) else {
            return;
        };
        self.input.set(format!("{} ", def.name));
        self.recompute_suggestions();
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), String> {
        if self.clipboard.is_none() {
            self.clipboard = Some(arboard::Clipboard::new().map_err(|e| e.to_string())?);
        }
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| e.to_string()),
            None => Err("clipboard unavailable".to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
