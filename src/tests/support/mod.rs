//! In-memory collaborators shared by unit tests.


pub(crate) use self::fake_directory::{FakeDirectory, app, principal, user};
pub(crate) use self::harness::{Harness, NOW};
pub(crate) use self::scripted::{Answer, FeedbackEvent, RecordingFeedback, ScriptedPrompter};
