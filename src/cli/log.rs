//! taskapp log command implementation

use serde::Serialize;

use crate::cli::Context;
use crate::error::Result;
use crate::logic::TaskLogic;
use crate::model::Log;
use crate::output::{emit_success, HumanOutput};

/// Options for `taskapp log list`
pub struct ListOptions {
    pub task: Option<u32>,
    pub context: Context,
}

#[derive(Serialize)]
struct LogListReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<u32>,
    logs: Vec<Log>,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let (data_dir, config) = options.context.open()?;
    options.context.login(&data_dir)?;

    let logs = TaskLogic::new(&data_dir, &config).logs(options.task)?;

    let header = match options.task {
        Some(code) => format!("taskapp log list: {} record(s) for task {code}", logs.len()),
        None => format!("taskapp log list: {} record(s)", logs.len()),
    };
    let mut human = HumanOutput::new(header);
    for log in &logs {
        human.push_line(format!(
            "{} task {} -> {} by user {}",
            log.change_date,
            log.task_code,
            log.status.label(),
            log.change_user_code
        ));
    }

    emit_success(
        options.context.output,
        "log list",
        &LogListReport {
            task: options.task,
            logs,
        },
        Some(&human),
    )
}
