//! Browse and edit application registrations in a directory tenant.

pub mod auth;
pub mod error;
pub mod graph;
pub mod logging;
pub mod model;
pub mod portal;
pub mod services;
pub mod store;
pub mod tree;
pub mod tui;

mod tui_shell;

#[cfg(test)]
#[path = "tests/support/mod.rs"]
pub(crate) mod test_support;
