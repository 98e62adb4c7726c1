use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::model::{RepUser, Status, Task, User};
use crate::storage::DataDir;
use crate::table::{ensure_field, expect_columns, parse_u32, Record, Table};

use super::{parse_status, UserStore};

pub const TASKS_HEADER: &str = "Code,Name,Status,Rep_User_Code";

/// One row of `tasks.csv`, before the responsible user is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub code: u32,
    pub name: String,
    pub status: Status,
    pub rep_user_code: u32,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            code: task.code,
            name: task.name.clone(),
            status: task.status,
            rep_user_code: task.rep_user.code(),
        }
    }
}

impl Record for TaskRecord {
    const HEADER: &'static str = TASKS_HEADER;

    fn decode(fields: &[&str]) -> std::result::Result<Self, String> {
        expect_columns(fields, 4)?;
        Ok(TaskRecord {
            code: parse_u32("Code", fields[0])?,
            name: fields[1].to_string(),
            status: parse_status("Status", fields[2])?,
            rep_user_code: parse_u32("Rep_User_Code", fields[3])?,
        })
    }

    fn encode(&self) -> String {
        format!(
            "{},{},{},{}",
            self.code,
            self.name,
            self.status.code(),
            self.rep_user_code
        )
    }
}

/// CRUD over `tasks.csv`, joined against the user table on read.
#[derive(Debug, Clone)]
pub struct TaskStore {
    table: Table<TaskRecord>,
    users: UserStore,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>, users: UserStore) -> Self {
        Self {
            table: Table::new(path),
            users,
        }
    }

    pub fn from_data_dir(data_dir: &DataDir) -> Self {
        Self::new(data_dir.tasks_file(), UserStore::from_data_dir(data_dir))
    }

    /// Every task in file order with its responsible user resolved.
    pub fn find_all(&self) -> Result<Vec<Task>> {
        let records = self.table.read_all()?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut users: HashMap<u32, User> = HashMap::new();
        for user in self.users.find_all()? {
            users.entry(user.code).or_insert(user);
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let rep_user = match users.get(&record.rep_user_code) {
                    Some(user) => RepUser::Resolved(user.clone()),
                    None => unresolved(&record),
                };
                into_task(record, rep_user)
            })
            .collect())
    }

    /// First task with `code`.
    pub fn find_by_code(&self, code: u32) -> Result<Option<Task>> {
        let Some(record) = self.table.find_first(|record| record.code == code)? else {
            return Ok(None);
        };
        let rep_user = match self.users.find_by_code(record.rep_user_code)? {
            Some(user) => RepUser::Resolved(user),
            None => unresolved(&record),
        };
        Ok(Some(into_task(record, rep_user)))
    }

    /// Append one task row. Does not check for an existing code.
    pub fn save(&self, task: &Task) -> Result<()> {
        ensure_field("task name", &task.name)?;
        self.table.append(&TaskRecord::from(task))
    }

    /// Rewrite the file, replacing rows whose code matches `task.code`.
    ///
    /// Returns the number of rows replaced.
    pub fn update(&self, task: &Task) -> Result<usize> {
        ensure_field("task name", &task.name)?;
        let replacement = TaskRecord::from(task);
        let mut replaced = 0;
        let records: Vec<TaskRecord> = self
            .table
            .read_all()?
            .into_iter()
            .map(|record| {
                if record.code == task.code {
                    replaced += 1;
                    replacement.clone()
                } else {
                    record
                }
            })
            .collect();

        self.table.rewrite(&records)?;
        Ok(replaced)
    }

    /// Rewrite the file without rows whose code is `code`.
    ///
    /// Returns the number of rows removed.
    pub fn delete(&self, code: u32) -> Result<usize> {
        let mut records = self.table.read_all()?;
        let before = records.len();
        records.retain(|record| record.code != code);
        let removed = before - records.len();

        self.table.rewrite(&records)?;
        Ok(removed)
    }

    pub(crate) fn table(&self) -> &Table<TaskRecord> {
        &self.table
    }
}

fn unresolved(record: &TaskRecord) -> RepUser {
    tracing::warn!(
        task = record.code,
        user = record.rep_user_code,
        "task references unknown user"
    );
    RepUser::Unresolved {
        code: record.rep_user_code,
    }
}

fn into_task(record: TaskRecord, rep_user: RepUser) -> Task {
    Task {
        code: record.code,
        name: record.name,
        status: record.status,
        rep_user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        store: TaskStore,
    }

    impl Fixture {
        fn new(tasks: &str) -> Self {
            let dir = TempDir::new().unwrap();
            fs::write(
                dir.path().join("users.csv"),
                "Code,Name,Email,Password\n1,Alice,alice@example.com,pw1\n2,Bob,bob@example.com,pw2\n",
            )
            .unwrap();
            fs::write(dir.path().join("tasks.csv"), tasks).unwrap();
            let users = UserStore::new(dir.path().join("users.csv"));
            let store = TaskStore::new(dir.path().join("tasks.csv"), users);
            Self { dir, store }
        }

        fn contents(&self) -> String {
            fs::read_to_string(self.dir.path().join("tasks.csv")).unwrap()
        }

        fn user(&self, code: u32) -> User {
            UserStore::new(self.dir.path().join("users.csv"))
                .find_by_code(code)
                .unwrap()
                .unwrap()
        }
    }

    const TASKS: &str = "Code,Name,Status,Rep_User_Code\n\
        1,Design,0,1\n\
        2,Build,1,2\n\
        3,Ship,2,1\n";

    #[test]
    fn find_all_resolves_rep_users_in_file_order() {
        let fx = Fixture::new(TASKS);
        let tasks = fx.store.find_all().unwrap();

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].name, "Design");
        assert_eq!(tasks[0].status, Status::NotStarted);
        assert_eq!(tasks[0].rep_user.user().unwrap().name, "Alice");
        assert_eq!(tasks[1].rep_user.user().unwrap().name, "Bob");
        assert_eq!(tasks[2].status, Status::Done);
    }

    #[test]
    fn unknown_rep_user_is_unresolved() {
        let fx = Fixture::new("Code,Name,Status,Rep_User_Code\n5,Orphan,0,99\n");

        let tasks = fx.store.find_all().unwrap();
        assert_eq!(tasks[0].rep_user, RepUser::Unresolved { code: 99 });

        let task = fx.store.find_by_code(5).unwrap().unwrap();
        assert_eq!(task.rep_user, RepUser::Unresolved { code: 99 });
    }

    #[test]
    fn find_by_code_returns_first_match() {
        let fx = Fixture::new("Code,Name,Status,Rep_User_Code\n4,First,0,1\n4,Second,1,2\n");
        assert_eq!(fx.store.find_by_code(4).unwrap().unwrap().name, "First");
        assert!(fx.store.find_by_code(5).unwrap().is_none());
    }

    #[test]
    fn save_then_read_back_is_equal() {
        let fx = Fixture::new("Code,Name,Status,Rep_User_Code\n");
        let task = Task::new(10, "Design", fx.user(1));

        fx.store.save(&task).unwrap();

        assert_eq!(fx.store.find_all().unwrap(), vec![task.clone()]);
        assert_eq!(fx.store.find_by_code(10).unwrap(), Some(task));
        assert_eq!(fx.contents(), "Code,Name,Status,Rep_User_Code\n10,Design,0,1\n");
    }

    #[test]
    fn save_does_not_check_duplicates() {
        let fx = Fixture::new(TASKS);
        fx.store.save(&Task::new(1, "Again", fx.user(2))).unwrap();
        assert_eq!(fx.store.find_all().unwrap().len(), 4);
    }

    #[test]
    fn save_rejects_names_with_commas() {
        let fx = Fixture::new(TASKS);
        let err = fx.store.save(&Task::new(9, "a,b", fx.user(1))).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(fx.contents(), TASKS);
    }

    #[test]
    fn update_replaces_only_matching_row() {
        let fx = Fixture::new(TASKS);
        let task = fx
            .store
            .find_by_code(1)
            .unwrap()
            .unwrap()
            .with_status(Status::InProgress);

        assert_eq!(fx.store.update(&task).unwrap(), 1);
        assert_eq!(
            fx.contents(),
            "Code,Name,Status,Rep_User_Code\n1,Design,1,1\n2,Build,1,2\n3,Ship,2,1\n"
        );
    }

    #[test]
    fn update_of_missing_code_rewrites_unchanged() {
        let fx = Fixture::new(TASKS);
        let ghost = Task::new(42, "Ghost", fx.user(1));
        assert_eq!(fx.store.update(&ghost).unwrap(), 0);
        assert_eq!(fx.contents(), TASKS);
    }

    #[test]
    fn delete_removes_matching_rows_only() {
        let fx = Fixture::new(TASKS);
        assert_eq!(fx.store.delete(2).unwrap(), 1);
        assert_eq!(
            fx.contents(),
            "Code,Name,Status,Rep_User_Code\n1,Design,0,1\n3,Ship,2,1\n"
        );
        assert_eq!(fx.store.delete(2).unwrap(), 0);
    }

    #[test]
    fn invalid_status_is_a_parse_error() {
        let fx = Fixture::new("Code,Name,Status,Rep_User_Code\n1,Design,5,1\n");
        assert!(matches!(
            fx.store.find_all(),
            Err(Error::Parse { line: 2, .. })
        ));
    }
}
