//! Login for a single CLI invocation.
//!
//! Credential resolution order:
//! 1) `--email` / `--password` flags
//! 2) `TASKAPP_EMAIL` / `TASKAPP_PASSWORD` environment variables
//!
//! clap merges both sources into the same optional values before they
//! reach this module. There is no persisted session.

use crate::error::{Error, Result};
use crate::logic::UserLogic;
use crate::model::User;
use crate::storage::DataDir;

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(email: Option<String>, password: Option<String>) -> Self {
        Self { email, password }
    }

    /// Both values, or `MissingCredentials` if either is absent or blank.
    ///
    /// Values are used as given; only an all-whitespace value counts as absent.
    pub fn require(&self) -> Result<(&str, &str)> {
        match (non_blank(self.email.as_deref()), non_blank(self.password.as_deref())) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(Error::MissingCredentials),
        }
    }
}

/// Authenticate against the data directory's user table.
pub fn login(data_dir: &DataDir, credentials: &Credentials) -> Result<User> {
    let (email, password) = credentials.require()?;
    UserLogic::from_data_dir(data_dir).login(email, password)
}

fn non_blank(input: Option<&str>) -> Option<&str> {
    input.filter(|value| !value.trim().is_empty())
}
