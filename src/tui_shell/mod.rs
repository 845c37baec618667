use anyhow::Result;

mod app;
mod commands;
mod host;
mod input;
mod modal;
mod suggest;
mod tree_view;
mod worker;

use commands::{CommandDef, EditAction};
use host::PromptRequest;
use input::Input;
use tree_view::{NodeKey, TreeView};
use worker::{Job, JobOutput, UiEvent};

pub(crate) fn run(opts: crate::tui::TuiOptions) -> Result<()> {
    app::run(opts)
}
