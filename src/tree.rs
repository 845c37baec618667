//! Lazy tree synchronization between directory objects and the on-screen tree.

mod expand;
mod node;
mod session;
mod skeleton;
mod sync;

pub use self::expand::expand;
pub use self::node::{Children, CredentialKind, Icon, NodeKind, TreeNode};
pub use self::session::{BusyGuard, SessionContext};
pub use self::skeleton::application_node;
pub use self::sync::{Render, TreeSync, display_name_key, sort_by_display_name};
