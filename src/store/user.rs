use std::path::PathBuf;

use crate::error::Result;
use crate::model::User;
use crate::storage::DataDir;
use crate::table::{expect_columns, parse_u32, Record, Table};

pub const USERS_HEADER: &str = "Code,Name,Email,Password";

impl Record for User {
    const HEADER: &'static str = USERS_HEADER;

    fn decode(fields: &[&str]) -> std::result::Result<Self, String> {
        expect_columns(fields, 4)?;
        Ok(User {
            code: parse_u32("Code", fields[0])?,
            name: fields[1].to_string(),
            email: fields[2].to_string(),
            password: fields[3].to_string(),
        })
    }

    fn encode(&self) -> String {
        format!(
            "{},{},{},{}",
            self.code, self.name, self.email, self.password
        )
    }
}

/// Read-only lookups over `users.csv`.
#[derive(Debug, Clone)]
pub struct UserStore {
    table: Table<User>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            table: Table::new(path),
        }
    }

    pub fn from_data_dir(data_dir: &DataDir) -> Self {
        Self::new(data_dir.users_file())
    }

    /// First user whose email and password both match exactly.
    pub fn find_by_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.table
            .find_first(|user| user.email == email && user.password == password)
    }

    pub fn find_by_code(&self, code: u32) -> Result<Option<User>> {
        self.table.find_first(|user| user.code == code)
    }

    pub fn find_all(&self) -> Result<Vec<User>> {
        self.table.read_all()
    }
}
