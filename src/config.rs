//! Configuration loading and management
//!
//! Handles parsing of the optional `taskapp.toml` inside the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "taskapp.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// CSV file names, relative to the data directory
    #[serde(default)]
    pub files: FilesConfig,

    /// Task rules
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Lock configuration
    #[serde(default)]
    pub lock: LockConfig,
}

/// File names of the three tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_users_file")]
    pub users: String,

    #[serde(default = "default_tasks_file")]
    pub tasks: String,

    #[serde(default = "default_logs_file")]
    pub logs: String,
}

fn default_users_file() -> String {
    "users.csv".to_string()
}

fn default_tasks_file() -> String {
    "tasks.csv".to_string()
}

fn default_logs_file() -> String {
    "logs.csv".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            users: default_users_file(),
            tasks: default_tasks_file(),
            logs: default_logs_file(),
        }
    }
}

/// Task configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Maximum task name length, in characters
    #[serde(default = "default_name_max_len")]
    pub name_max_len: usize,

    /// Accept a new task whose code is already taken
    #[serde(default)]
    pub allow_duplicate_codes: bool,
}

fn default_name_max_len() -> usize {
    10
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            name_max_len: default_name_max_len(),
            allow_duplicate_codes: false,
        }
    }
}

/// Lock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// How long a mutation waits for the data directory lock
    #[serde(default = "default_lock_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a `taskapp.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults when absent
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.files.validate()?;
        if self.tasks.name_max_len == 0 {
            return Err(Error::InvalidConfig(
                "tasks.name_max_len must be >= 1".to_string(),
            ));
        }
        if self.lock.timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "lock.timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl FilesConfig {
    fn validate(&self) -> Result<()> {
        let entries = [
            ("files.users", &self.users),
            ("files.tasks", &self.tasks),
            ("files.logs", &self.logs),
        ];

        for (field, name) in entries {
            validate_file_name(name, field)?;
        }

        if self.users == self.tasks || self.users == self.logs || self.tasks == self.logs {
            return Err(Error::InvalidConfig(
                "files.users, files.tasks and files.logs must be distinct".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_file_name(name: &str, field: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidConfig(format!("{field} cannot be empty")));
    }
    let relative = Path::new(name)
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if !relative {
        return Err(Error::InvalidConfig(format!(
            "{field}: '{name}' must be a relative path inside the data directory"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.files.users, "users.csv");
        assert_eq!(cfg.files.tasks, "tasks.csv");
        assert_eq!(cfg.files.logs, "logs.csv");
        assert_eq!(cfg.tasks.name_max_len, 10);
        assert!(!cfg.tasks.allow_duplicate_codes);
        assert_eq!(cfg.lock.timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[files]
users = "members.csv"
tasks = "todo.csv"
logs = "audit/logs.csv"

[tasks]
name_max_len = 20
allow_duplicate_codes = true

[lock]
timeout_ms = 250
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.files.users, "members.csv");
        assert_eq!(cfg.files.tasks, "todo.csv");
        assert_eq!(cfg.files.logs, "audit/logs.csv");
        assert_eq!(cfg.tasks.name_max_len, 20);
        assert!(cfg.tasks.allow_duplicate_codes);
        assert_eq!(cfg.lock.timeout_ms, 250);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[tasks]\nallow_duplicate_codes = true\n").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert!(cfg.tasks.allow_duplicate_codes);
        assert_eq!(cfg.tasks.name_max_len, 10);
        assert_eq!(cfg.files.tasks, "tasks.csv");
    }

    #[test]
    fn escaping_file_name_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[files]\nusers = \"../users.csv\"\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn shared_file_names_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[files]\ntasks = \"data.csv\"\nlogs = \"data.csv\"\n")
            .expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn zero_name_length_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[tasks]\nname_max_len = 0\n").expect("write config");

        assert!(matches!(
            Config::load(&path),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path()).expect("defaults");
        assert_eq!(cfg.files.users, "users.csv");
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        Config::default().save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("users = \"users.csv\""));
        assert!(written.contains("name_max_len = 10"));

        let reloaded = Config::load(&path).expect("reload");
        assert_eq!(reloaded.lock.timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
    }
}
