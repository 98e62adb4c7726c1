//! Use cases on top of the stores.
//!
//! The logged-in user is always passed in explicitly; nothing here keeps
//! session state between calls.

mod task;
mod user;

pub use task::{DeleteOutcome, Ownership, TaskListing, TaskLogic};
pub use user::UserLogic;
