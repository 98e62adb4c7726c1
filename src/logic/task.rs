use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, TasksConfig};
use crate::error::{Error, Result};
use crate::model::{Log, RepUser, Status, Task, User};
use crate::storage::DataDir;
use crate::store::{LogStore, TaskStore, UserStore};

/// Who a listed task belongs to, relative to the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ownership {
    You,
    Other { name: String },
    Unknown { code: u32 },
}

impl Ownership {
    fn of(rep_user: &RepUser, viewer: &User) -> Self {
        match rep_user {
            RepUser::Resolved(user) if user.code == viewer.code => Ownership::You,
            RepUser::Resolved(user) => Ownership::Other {
                name: user.name.clone(),
            },
            RepUser::Unresolved { code } => Ownership::Unknown { code: *code },
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Ownership::You => "あなたが担当しています".to_string(),
            Ownership::Other { name } => format!("{name}が担当しています"),
            Ownership::Unknown { code } => format!("ユーザーコード{code}は存在しません"),
        }
    }
}

/// One row of the task list as seen by a particular user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListing {
    pub code: u32,
    pub name: String,
    pub status: Status,
    pub status_label: &'static str,
    pub rep_user_code: u32,
    pub ownership: Ownership,
}

impl TaskListing {
    fn new(task: Task, viewer: &User) -> Self {
        Self {
            ownership: Ownership::of(&task.rep_user, viewer),
            rep_user_code: task.rep_user.code(),
            status_label: task.status.label(),
            status: task.status,
            name: task.name,
            code: task.code,
        }
    }

    /// `position` is 1-based.
    pub fn line(&self, position: usize) -> String {
        format!(
            "{position}. タスク名：{}, 担当者名：{}, ステータス：{}",
            self.name,
            self.ownership.describe(),
            self.status_label
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub task: Task,
    pub removed_tasks: usize,
    pub removed_logs: usize,
}

/// Task use cases: list, create, advance status, delete.
///
/// Every mutation holds the data directory lock, writes `tasks.csv` first and
/// then `logs.csv`. If either write fails, `tasks.csv` is put back to its
/// previous bytes before the error is returned.
pub struct TaskLogic<C: Clock = SystemClock> {
    data_dir: DataDir,
    tasks: TaskStore,
    logs: LogStore,
    users: UserStore,
    rules: TasksConfig,
    lock_timeout_ms: u64,
    clock: C,
}

impl TaskLogic<SystemClock> {
    pub fn new(data_dir: &DataDir, config: &Config) -> Self {
        Self::with_clock(data_dir, config, SystemClock)
    }
}

impl<C: Clock> TaskLogic<C> {
    pub fn with_clock(data_dir: &DataDir, config: &Config, clock: C) -> Self {
        Self {
            data_dir: data_dir.clone(),
            tasks: TaskStore::from_data_dir(data_dir),
            logs: LogStore::from_data_dir(data_dir),
            users: UserStore::from_data_dir(data_dir),
            rules: config.tasks.clone(),
            lock_timeout_ms: config.lock.timeout_ms,
            clock,
        }
    }

    /// Every task in file order, annotated for `viewer`.
    pub fn show_all(&self, viewer: &User) -> Result<Vec<TaskListing>> {
        Ok(self
            .tasks
            .find_all()?
            .into_iter()
            .map(|task| TaskListing::new(task, viewer))
            .collect())
    }

    /// Register a new task as not started and log its creation.
    pub fn save(
        &self,
        code: u32,
        name: &str,
        rep_user_code: u32,
        login_user: &User,
    ) -> Result<Task> {
        let _lock = self.data_dir.lock(self.lock_timeout_ms)?;

        let rep_user = self
            .users
            .find_by_code(rep_user_code)?
            .ok_or(Error::UserNotFound(rep_user_code))?;

        if !self.rules.allow_duplicate_codes && self.tasks.find_by_code(code)?.is_some() {
            return Err(Error::DuplicateTaskCode(code));
        }

        let task = Task::new(code, name, rep_user);
        let log = self.change_log(&task, login_user);

        self.apply(|tasks| tasks.save(&task), |logs| logs.save(&log))?;

        tracing::info!(
            task = task.code,
            rep_user = rep_user_code,
            by = login_user.code,
            "task registered"
        );
        Ok(task)
    }

    /// Advance a task by exactly one status step and log the change.
    ///
    /// Nothing is written when the task is missing or the step is not
    /// `current -> current.next()`.
    pub fn change_status(&self, code: u32, new_status: Status, login_user: &User) -> Result<Task> {
        let _lock = self.data_dir.lock(self.lock_timeout_ms)?;

        let current = self
            .tasks
            .find_by_code(code)?
            .ok_or(Error::TaskNotFound(code))?;

        if !current.status.can_advance_to(new_status) {
            return Err(Error::InvalidTransition {
                code,
                from: current.status,
                to: new_status,
            });
        }

        let from = current.status;
        let updated = current.with_status(new_status);
        let log = self.change_log(&updated, login_user);

        self.apply(
            |tasks| tasks.update(&updated).map(|_| ()),
            |logs| logs.save(&log),
        )?;

        tracing::info!(
            task = code,
            from = from.code(),
            to = new_status.code(),
            by = login_user.code,
            "task status changed"
        );
        Ok(updated)
    }

    /// Remove a task and its whole log history.
    pub fn delete(&self, code: u32) -> Result<DeleteOutcome> {
        let _lock = self.data_dir.lock(self.lock_timeout_ms)?;

        let task = self
            .tasks
            .find_by_code(code)?
            .ok_or(Error::TaskNotFound(code))?;

        let mut removed_tasks = 0;
        let removed_logs = self.apply(
            |tasks| {
                removed_tasks = tasks.delete(code)?;
                Ok(())
            },
            |logs| logs.delete_by_task_code(code),
        )?;

        tracing::info!(task = code, removed_tasks, removed_logs, "task deleted");
        Ok(DeleteOutcome {
            task,
            removed_tasks,
            removed_logs,
        })
    }

    /// Audit rows, optionally restricted to one task.
    pub fn logs(&self, task_code: Option<u32>) -> Result<Vec<Log>> {
        match task_code {
            Some(code) => self.logs.find_by_task_code(code),
            None => self.logs.find_all(),
        }
    }

    fn change_log(&self, task: &Task, login_user: &User) -> Log {
        Log {
            task_code: task.code,
            change_user_code: login_user.code,
            status: task.status,
            change_date: self.clock.today(),
        }
    }

    /// Run a tasks change followed by a logs change as one unit.
    ///
    /// On any failure `tasks.csv` is put back to the bytes it had before.
    fn apply<T>(
        &self,
        change_tasks: impl FnOnce(&TaskStore) -> Result<()>,
        change_logs: impl FnOnce(&LogStore) -> Result<T>,
    ) -> Result<T> {
        let snapshot = self.tasks.table().snapshot()?;
        let err = match change_tasks(&self.tasks).and_then(|()| change_logs(&self.logs)) {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        tracing::warn!(error = %err, "write failed; restoring tasks file");
        if let Err(restore_err) = self.tasks.table().restore(&snapshot) {
            tracing::error!(error = %restore_err, "restoring tasks file failed");
            return Err(Error::OperationFailed(format!(
                "write failed ({err}) and tasks file could not be restored ({restore_err})"
            )));
        }
        Err(err)
    }
}
