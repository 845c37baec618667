use clap::{Args, Subcommand};

use crate::SettingsCommands;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List application registrations
    List(ListArgs),

    /// Print the full JSON of one application
    Manifest(ManifestArgs),

    /// Sign in through the Azure CLI
    Login(LoginArgs),

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Every application in the tenant, not only owned ones
    #[arg(long)]
    pub(crate) all: bool,
    /// Display-name prefix (needs eventual consistency)
    #[arg(long)]
    pub(crate) filter: Option<String>,
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct ManifestArgs {
    /// Object id of the application
    pub(crate) object_id: String,
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    /// Tenant to sign in to
    #[arg(long)]
    pub(crate) tenant: Option<String>,
}
