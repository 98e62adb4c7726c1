//! taskapp login and user commands

use serde::Serialize;

use crate::cli::Context;
use crate::error::Result;
use crate::logic::UserLogic;
use crate::model::User;
use crate::output::{emit_success, HumanOutput};

/// Options for `taskapp login`
pub struct LoginOptions {
    pub context: Context,
}

/// Options for `taskapp user list`
pub struct ListOptions {
    pub context: Context,
}

#[derive(Serialize)]
struct LoginReport {
    user: User,
}

#[derive(Serialize)]
struct UserListReport {
    users: Vec<User>,
}

pub fn run_login(options: LoginOptions) -> Result<()> {
    let (data_dir, _config) = options.context.open()?;
    let user = options.context.login(&data_dir)?;

    let mut human = HumanOutput::new(format!("taskapp login: logged in as {}", user.name));
    human.push_summary("code", user.code.to_string());
    human.push_summary("email", user.email.clone());
    human.push_next_step("taskapp task list");

    emit_success(
        options.context.output,
        "login",
        &LoginReport { user },
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let (data_dir, _config) = options.context.open()?;
    options.context.login(&data_dir)?;

    let users = UserLogic::from_data_dir(&data_dir).users()?;

    let mut human = HumanOutput::new(format!("taskapp user list: {} user(s)", users.len()));
    for user in &users {
        human.push_line(format!("{}. {} <{}>", user.code, user.name, user.email));
    }

    emit_success(
        options.context.output,
        "user list",
        &UserListReport { users },
        Some(&human),
    )
}
