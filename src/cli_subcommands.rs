use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum SettingsCommands {
    /// Print the current settings
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Change one setting
    Set {
        /// Setting name, e.g. maximumResults
        key: String,
        value: String,
    },
}
