//! taskapp init command implementation
//!
//! Creates the data directory with header-only tables and a default config.

use crate::cli::Context;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

pub fn run(context: Context) -> Result<()> {
    let (data_dir, config) = context.resolve()?;
    let report = data_dir.init()?;

    let mut created = Vec::new();
    if report.config {
        created.push(crate::config::CONFIG_FILE.to_string());
    }
    if report.users {
        created.push(config.files.users.clone());
    }
    if report.tasks {
        created.push(config.files.tasks.clone());
    }
    if report.logs {
        created.push(config.files.logs.clone());
    }

    let header = if report.created_any() {
        "taskapp init: initialized data directory"
    } else {
        "taskapp init: nothing to do"
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("data dir", report.data_dir.display().to_string());
    human.push_summary(
        "created",
        if created.is_empty() {
            "none".to_string()
        } else {
            created.join(", ")
        },
    );
    if report.users {
        human.push_warning(format!(
            "{} has no users yet; add rows as Code,Name,Email,Password",
            config.files.users
        ));
    }
    human.push_next_step("taskapp --email <email> --password <password> task list");

    emit_success(context.output, "init", &report, Some(&human))
}
