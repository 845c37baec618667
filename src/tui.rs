use std::sync::Arc;

use anyhow::Result;

use crate::auth::CredentialProvider;
use crate::store::SettingsStore;

/// What the interactive browser needs from the command line.
pub struct TuiOptions {
    pub store: SettingsStore,
    pub graph_url: String,
    pub credentials: Arc<dyn CredentialProvider>,
}

pub fn run(opts: TuiOptions) -> Result<()> {
    crate::tui_shell::run(opts)
}
