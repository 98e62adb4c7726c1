//! Domain records shared by the stores and the logic layer.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A team member. Loaded from `users.csv` and never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub code: u32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Progress of a task. Stored as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    NotStarted,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Done];

    pub fn code(self) -> u8 {
        match self {
            Status::NotStarted => 0,
            Status::InProgress => 1,
            Status::Done => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Status::NotStarted),
            1 => Some(Status::InProgress),
            2 => Some(Status::Done),
            _ => None,
        }
    }

    /// Label shown in task listings.
    pub fn label(self) -> &'static str {
        match self {
            Status::NotStarted => "未着手",
            Status::InProgress => "着手中",
            Status::Done => "完了",
        }
    }

    /// The only status this one may advance to, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Status::NotStarted => Some(Status::InProgress),
            Status::InProgress => Some(Status::Done),
            Status::Done => None,
        }
    }

    pub fn can_advance_to(self, target: Status) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        Status::from_code(code).ok_or_else(|| format!("invalid status {code} (expected 0, 1 or 2)"))
    }
}

/// Responsible user of a task, as resolved against the user file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RepUser {
    Resolved(User),
    /// The task references a user code that is not in `users.csv`.
    Unresolved { code: u32 },
}

impl RepUser {
    pub fn code(&self) -> u32 {
        match self {
            RepUser::Resolved(user) => user.code,
            RepUser::Unresolved { code } => *code,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            RepUser::Resolved(user) => Some(user),
            RepUser::Unresolved { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub code: u32,
    pub name: String,
    pub status: Status,
    pub rep_user: RepUser,
}

impl Task {
    /// A freshly registered task: always starts as not started.
    pub fn new(code: u32, name: impl Into<String>, rep_user: User) -> Self {
        Self {
            code,
            name: name.into(),
            status: Status::NotStarted,
            rep_user: RepUser::Resolved(rep_user),
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Audit record of one task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub task_code: u32,
    pub change_user_code: u32,
    pub status: Status,
    pub change_date: NaiveDate,
}
