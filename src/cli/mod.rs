//! Command-line interface for taskapp
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::model::User;
use crate::output::OutputOptions;
use crate::session::{self, Credentials};
use crate::storage::{self, DataDir};

mod init;
mod log;
mod task;
mod user;

/// taskapp - CSV-backed task tracking
///
/// Tasks, users and the status audit log live as plain CSV files in one
/// data directory.
#[derive(Parser, Debug)]
#[command(name = "taskapp")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the CSV files (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKAPP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Login email
    #[arg(long, global = true, env = "TASKAPP_EMAIL")]
    pub email: Option<String>,

    /// Login password
    #[arg(long, global = true, env = "TASKAPP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory, empty tables and a default config
    Init,

    /// Check credentials and show the logged-in user
    Login,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Status change audit log
    #[command(subcommand)]
    Log(LogCommands),

    /// Registered users
    #[command(subcommand)]
    User(UserCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List every task with its responsible user and status
    List,

    /// Register a new task (starts as not started)
    New {
        /// Task code
        code: u32,

        /// Task name
        name: String,

        /// Code of the responsible user
        rep_user_code: u32,
    },

    /// Advance a task by one status step
    Status {
        /// Task code
        code: u32,

        /// New status: 1 (in progress) or 2 (done)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=2))]
        status: u8,
    },

    /// Delete a task and its log history
    Rm {
        /// Task code
        code: u32,
    },
}

/// Log subcommands
#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// List status change records
    List {
        /// Only records of this task code
        #[arg(long)]
        task: Option<u32>,
    },
}

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users (passwords are never shown)
    List,
}

/// Global flags every command receives.
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: Option<PathBuf>,
    pub credentials: Credentials,
    pub output: OutputOptions,
}

impl Context {
    /// Resolve the data directory and load its config without requiring tables.
    pub fn resolve(&self) -> Result<(DataDir, Config)> {
        let root = storage::resolve_data_dir(self.data_dir.clone())?;
        DataDir::open(root)
    }

    /// Resolve an initialized data directory.
    pub fn open(&self) -> Result<(DataDir, Config)> {
        let (data_dir, config) = self.resolve()?;
        data_dir.ensure_initialized()?;
        Ok((data_dir, config))
    }

    pub fn login(&self, data_dir: &DataDir) -> Result<User> {
        session::login(data_dir, &self.credentials)
    }
}

impl Cli {
    fn context(&self) -> Context {
        Context {
            data_dir: self.data_dir.clone(),
            credentials: Credentials::new(self.email.clone(), self.password.clone()),
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        }
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let context = self.context();
        match self.command {
            Commands::Init => init::run(context),
            Commands::Login => user::run_login(user::LoginOptions { context }),
            Commands::Task(cmd) => match cmd {
                TaskCommands::List => task::run_list(task::ListOptions { context }),
                TaskCommands::New {
                    code,
                    name,
                    rep_user_code,
                } => task::run_new(task::NewOptions {
                    code,
                    name,
                    rep_user_code,
                    context,
                }),
                TaskCommands::Status { code, status } => task::run_status(task::StatusOptions {
                    code,
                    status,
                    context,
                }),
                TaskCommands::Rm { code } => task::run_rm(task::RmOptions { code, context }),
            },
            Commands::Log(cmd) => match cmd {
                LogCommands::List { task } => log::run_list(log::ListOptions { task, context }),
            },
            Commands::User(cmd) => match cmd {
                UserCommands::List => user::run_list(user::ListOptions { context }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn about_text_comes_from_the_doc_comment() {
        let about = Cli::command()
            .get_about()
            .map(|about| about.to_string())
            .unwrap_or_default();
        assert!(about.contains("CSV-backed task tracking"), "{about}");
    }

    #[test]
    fn status_argument_only_accepts_forward_codes() {
        for rejected in ["0", "3", "-1", "x"] {
            assert!(Cli::try_parse_from(["taskapp", "task", "status", "1", rejected]).is_err());
        }

        let cli = Cli::try_parse_from(["taskapp", "task", "status", "1", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Task(TaskCommands::Status { code: 1, status: 2 })
        ));
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "taskapp",
            "task",
            "list",
            "--email",
            "alice@example.com",
            "--password",
            "pw1",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.email.as_deref(), Some("alice@example.com"));
        assert!(cli.json);
    }

    #[test]
    fn numeric_codes_must_be_unsigned() {
        assert!(Cli::try_parse_from(["taskapp", "task", "rm", "-3"]).is_err());
        assert!(Cli::try_parse_from(["taskapp", "task", "new", "1", "Design", "abc"]).is_err());
    }
}
