use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::Log;
use crate::storage::DataDir;
use crate::table::{expect_columns, parse_u32, Record, Table};

use super::parse_status;

pub const LOGS_HEADER: &str = "Task_Code,Change_User_Code,Status,Change_Date";

const DATE_FORMAT: &str = "%Y-%m-%d";

impl Record for Log {
    const HEADER: &'static str = LOGS_HEADER;

    fn decode(fields: &[&str]) -> std::result::Result<Self, String> {
        expect_columns(fields, 4)?;
        let change_date = NaiveDate::parse_from_str(fields[3].trim(), DATE_FORMAT)
            .map_err(|_| format!("Change_Date: '{}' is not a YYYY-MM-DD date", fields[3]))?;
        Ok(Log {
            task_code: parse_u32("Task_Code", fields[0])?,
            change_user_code: parse_u32("Change_User_Code", fields[1])?,
            status: parse_status("Status", fields[2])?,
            change_date,
        })
    }

    fn encode(&self) -> String {
        format!(
            "{},{},{},{}",
            self.task_code,
            self.change_user_code,
            self.status.code(),
            self.change_date.format(DATE_FORMAT)
        )
    }
}

/// Append-only audit log in `logs.csv`.
#[derive(Debug, Clone)]
pub struct LogStore {
    table: Table<Log>,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            table: Table::new(path),
        }
    }

    pub fn from_data_dir(data_dir: &DataDir) -> Self {
        Self::new(data_dir.logs_file())
    }

    pub fn save(&self, log: &Log) -> Result<()> {
        self.table.append(log)
    }

    pub fn find_all(&self) -> Result<Vec<Log>> {
        self.table.read_all()
    }

    pub fn find_by_task_code(&self, task_code: u32) -> Result<Vec<Log>> {
        let mut logs = self.table.read_all()?;
        logs.retain(|log| log.task_code == task_code);
        Ok(logs)
    }

    /// Rewrite the file without the rows of `task_code`.
    ///
    /// Returns the number of rows removed.
    pub fn delete_by_task_code(&self, task_code: u32) -> Result<usize> {
        let mut logs = self.table.read_all()?;
        let before = logs.len();
        logs.retain(|log| log.task_code != task_code);
        let removed = before - logs.len();

        self.table.rewrite(&logs)?;
        Ok(removed)
    }
}
