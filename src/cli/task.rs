//! taskapp task command implementation
//!
//! `list`, `new`, `status` and `rm` all require a logged-in user.

use serde::Serialize;

use crate::cli::Context;
use crate::error::{Error, Result};
use crate::logic::{TaskListing, TaskLogic};
use crate::model::{RepUser, Status, Task};
use crate::output::{emit_success, HumanOutput};

/// Options for `taskapp task list`
pub struct ListOptions {
    pub context: Context,
}

/// Options for `taskapp task new`
pub struct NewOptions {
    pub code: u32,
    pub name: String,
    pub rep_user_code: u32,
    pub context: Context,
}

/// Options for `taskapp task status`
pub struct StatusOptions {
    pub code: u32,
    pub status: u8,
    pub context: Context,
}

/// Options for `taskapp task rm`
pub struct RmOptions {
    pub code: u32,
    pub context: Context,
}

#[derive(Serialize)]
struct ViewerRef {
    code: u32,
    name: String,
}

#[derive(Serialize)]
struct TaskListReport {
    viewer: ViewerRef,
    tasks: Vec<TaskListing>,
}

#[derive(Serialize)]
struct TaskReport {
    task: Task,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let (data_dir, config) = options.context.open()?;
    let user = options.context.login(&data_dir)?;

    let tasks = TaskLogic::new(&data_dir, &config).show_all(&user)?;

    let header = if tasks.is_empty() {
        "taskapp task list: no tasks".to_string()
    } else {
        format!("taskapp task list: {} task(s)", tasks.len())
    };
    let mut human = HumanOutput::new(header);
    for (idx, listing) in tasks.iter().enumerate() {
        human.push_line(listing.line(idx + 1));
    }
    if tasks.is_empty() {
        human.push_next_step("taskapp task new <code> <name> <rep_user_code>");
    }

    let report = TaskListReport {
        viewer: ViewerRef {
            code: user.code,
            name: user.name,
        },
        tasks,
    };
    emit_success(options.context.output, "task list", &report, Some(&human))
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let (data_dir, config) = options.context.open()?;
    validate_name(&options.name, config.tasks.name_max_len)?;
    let user = options.context.login(&data_dir)?;

    let task = TaskLogic::new(&data_dir, &config).save(
        options.code,
        &options.name,
        options.rep_user_code,
        &user,
    )?;

    let mut human = HumanOutput::new(format!("taskapp task new: registered task {}", task.code));
    human.push_summary("name", task.name.clone());
    human.push_summary("status", task.status.label());
    human.push_summary("rep user", rep_user_name(&task.rep_user));
    human.push_next_step(format!("taskapp task status {} 1", task.code));

    emit_success(
        options.context.output,
        "task new",
        &TaskReport { task },
        Some(&human),
    )
}

pub fn run_status(options: StatusOptions) -> Result<()> {
    let status = Status::from_code(options.status).ok_or_else(|| {
        Error::InvalidArgument(format!("unknown status code: {}", options.status))
    })?;

    let (data_dir, config) = options.context.open()?;
    let user = options.context.login(&data_dir)?;

    let task = TaskLogic::new(&data_dir, &config).change_status(options.code, status, &user)?;

    let mut human = HumanOutput::new(format!(
        "taskapp task status: task {} is now {}",
        task.code,
        task.status.label()
    ));
    human.push_summary("name", task.name.clone());
    human.push_summary("changed by", user.name);
    if let Some(next) = task.status.next() {
        human.push_next_step(format!("taskapp task status {} {next}", task.code));
    }

    emit_success(
        options.context.output,
        "task status",
        &TaskReport { task },
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let (data_dir, config) = options.context.open()?;
    options.context.login(&data_dir)?;

    let outcome = TaskLogic::new(&data_dir, &config).delete(options.code)?;

    let mut human = HumanOutput::new(format!("taskapp task rm: deleted task {}", outcome.task.code));
    human.push_summary("name", outcome.task.name.clone());
    human.push_summary("task rows removed", outcome.removed_tasks.to_string());
    human.push_summary("log rows removed", outcome.removed_logs.to_string());
    if outcome.removed_tasks > 1 {
        human.push_warning(format!(
            "{} rows shared code {}",
            outcome.removed_tasks, outcome.task.code
        ));
    }

    emit_success(options.context.output, "task rm", &outcome, Some(&human))
}

/// A task name must be non-empty, at most `max_len` characters, and must
/// not contain the column separator or a line break.
fn validate_name(name: &str, max_len: usize) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "task name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > max_len {
        return Err(Error::InvalidArgument(format!(
            "task name must be at most {max_len} characters"
        )));
    }
    if name.contains([',', '\n', '\r']) {
        return Err(Error::InvalidArgument(
            "task name must not contain a comma or line break".to_string(),
        ));
    }
    Ok(())
}

fn rep_user_name(rep_user: &RepUser) -> String {
    rep_user
        .user()
        .map(|user| user.name.clone())
        .unwrap_or_else(|| format!("unknown user {}", rep_user.code()))
}
