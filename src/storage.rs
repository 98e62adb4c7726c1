//! Storage layout for taskapp
//!
//! All state lives in a single data directory:
//!
//! ```text
//! <data-dir>/
//!   taskapp.toml      # Optional configuration
//!   users.csv         # Code,Name,Email,Password (seeded externally, read-only)
//!   tasks.csv         # Code,Name,Status,Rep_User_Code
//!   logs.csv          # Task_Code,Change_User_Code,Status,Change_Date
//!   .taskapp.lock     # Held while a mutation rewrites tasks/logs
//! ```
//!
//! File names other than the lock come from `[files]` in the config.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Config, FilesConfig, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::lock::FileLock;
use crate::model::{Log, User};
use crate::store::TaskRecord;
use crate::table::Table;

/// Name of the lock file inside the data directory
pub const LOCK_FILE: &str = ".taskapp.lock";

/// Resolved locations of the data files
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    files: FilesConfig,
}

/// What `init` created
#[derive(Debug, Clone, Default, Serialize)]
pub struct InitReport {
    pub data_dir: PathBuf,
    pub config: bool,
    pub users: bool,
    pub tasks: bool,
    pub logs: bool,
}

impl InitReport {
    pub fn created_any(&self) -> bool {
        self.config || self.users || self.tasks || self.logs
    }
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>, files: FilesConfig) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    /// Data directory laid out per the config found inside it
    pub fn open(root: impl Into<PathBuf>) -> Result<(Self, Config)> {
        let root = root.into();
        let config = Config::load_from_dir(&root)?;
        let data_dir = Self::new(root, config.files.clone());
        Ok((data_dir, config))
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn users_file(&self) -> PathBuf {
        self.root.join(&self.files.users)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.root.join(&self.files.tasks)
    }

    pub fn logs_file(&self) -> PathBuf {
        self.root.join(&self.files.logs)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Create the directory, a default config and header-only tables.
    ///
    /// Existing files are left untouched.
    pub fn init(&self) -> Result<InitReport> {
        std::fs::create_dir_all(&self.root)?;

        let config_path = self.config_file();
        let created_config = if config_path.exists() {
            false
        } else {
            Config::default().save(&config_path)?;
            true
        };

        let report = InitReport {
            data_dir: self.root.clone(),
            config: created_config,
            users: Table::<User>::new(self.users_file()).create_if_missing()?,
            tasks: Table::<TaskRecord>::new(self.tasks_file()).create_if_missing()?,
            logs: Table::<Log>::new(self.logs_file()).create_if_missing()?,
        };

        tracing::info!(
            data_dir = %self.root.display(),
            created = report.created_any(),
            "data directory initialized"
        );
        Ok(report)
    }

    /// Check if all three tables exist
    pub fn is_initialized(&self) -> bool {
        self.users_file().is_file() && self.tasks_file().is_file() && self.logs_file().is_file()
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::DataDirNotInitialized(self.root.clone()))
        }
    }

    /// Exclusive lock over the data directory for a read-modify-write.
    pub fn lock(&self, timeout_ms: u64) -> Result<FileLock> {
        FileLock::acquire(self.lock_file(), timeout_ms)
    }
}

/// Platform data directory used when neither `--data-dir` nor
/// `TASKAPP_DATA_DIR` is given.
pub fn default_data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "taskapp").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Resolve the data directory from an explicit path or the platform default
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => default_data_dir().ok_or_else(|| {
            Error::InvalidArgument(
                "no home directory found; pass --data-dir or set TASKAPP_DATA_DIR".to_string(),
            )
        }),
    }
}
