//! Data access over the three CSV tables.
//!
//! Stores only read and write rows. Existence checks, status rules and the
//! delete cascade belong to [`crate::logic`].

mod log;
mod task;
mod user;

pub use log::{LogStore, LOGS_HEADER};
pub use task::{TaskRecord, TaskStore, TASKS_HEADER};
pub use user::{UserStore, USERS_HEADER};

use crate::model::Status;

fn parse_status(column: &str, raw: &str) -> std::result::Result<Status, String> {
    let code = raw
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("{column}: '{raw}' is not a status code"))?;
    Status::from_code(code).ok_or_else(|| format!("{column}: {code} is not a valid status (0, 1 or 2)"))
}
