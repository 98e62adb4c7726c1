//! taskapp - CSV-backed task tracking library
//!
//! This library provides the core functionality for the taskapp CLI:
//! users log in against `users.csv`, register tasks in `tasks.csv`, advance
//! them one status step at a time, and every registration or status change
//! is appended to the audit log in `logs.csv`.
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskapp.toml`
//! - `error`: Error types and result aliases
//! - `model`: Users, tasks, statuses and log records
//! - `table`: Header-plus-rows CSV file codec
//! - `store`: Per-file stores for users, tasks and logs
//! - `logic`: Login and task use cases
//! - `session`: Credential resolution for one invocation
//! - `storage`: Data directory layout and initialization
//! - `lock`: File locking and atomic rewrites
//! - `clock`: Date source for log records

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod lock;
pub mod logic;
pub mod model;
pub mod output;
pub mod session;
pub mod storage;
pub mod store;
pub mod table;

pub use error::{Error, Result};
