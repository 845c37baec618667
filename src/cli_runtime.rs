use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use appreg::auth::{AzureCliCredential, CredentialProvider, StaticCredential};
use appreg::graph::GRAPH_BASE_URL;
use appreg::store::SettingsStore;

use crate::Commands;

#[derive(Parser)]
#[command(name = "appreg")]
#[command(about = "Browse and edit application registrations", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (defaults to the user configuration directory)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Graph API root
    #[arg(long = "graph-url", value_name = "URL", global = true, default_value = GRAPH_BASE_URL)]
    graph_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command.
pub(crate) struct Globals {
    pub(crate) store: SettingsStore,
    pub(crate) graph_url: String,
}

impl Globals {
    pub(crate) fn credentials(&self) -> Arc<dyn CredentialProvider> {
        match StaticCredential::from_env() {
            Some(c) => Arc::new(c),
            None => Arc::new(AzureCliCredential::new()),
        }
    }
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.command.is_none();
    appreg::logging::init(cli.log_file.as_deref(), interactive)?;

    let globals = Globals {
        store: SettingsStore::open(cli.config)?,
        graph_url: cli.graph_url,
    };

    match cli.command {
        None => {
            let credentials = globals.credentials();
            appreg::tui::run(appreg::tui::TuiOptions {
                store: globals.store,
                graph_url: globals.graph_url,
                credentials,
            })?;
        }
        Some(command) => crate::cli_exec::handle_command(&globals, command)?,
    }

    Ok(())
}
