mod support;

use predicates::str::contains;

use support::{TestData, LOGS_HEADER, TASKS_HEADER};

#[test]
fn init_creates_tables_and_config() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::empty()?;

    let output = data
        .cmd()
        .args(["init", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = support::parse_json(&output);
    assert_eq!(value["command"], "init");
    assert_eq!(value["data"]["config"], true);
    assert_eq!(value["data"]["tasks"], true);

    assert_eq!(data.read("users.csv")?, "Code,Name,Email,Password\n");
    assert_eq!(data.read("tasks.csv")?, TASKS_HEADER);
    assert_eq!(data.read("logs.csv")?, LOGS_HEADER);
    assert!(data.read("taskapp.toml")?.contains("name_max_len = 10"));
    Ok(())
}

#[test]
fn init_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::seeded()?;
    data.write("tasks.csv", &format!("{TASKS_HEADER}1,Design,0,1\n"))?;

    data.cmd()
        .arg("init")
        .assert()
        .success();
    data.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("nothing to do"));

    assert_eq!(data.read("users.csv")?, support::USERS);
    assert_eq!(data.read("tasks.csv")?, format!("{TASKS_HEADER}1,Design,0,1\n"));
    Ok(())
}

#[test]
fn init_follows_configured_file_names() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::empty()?;
    data.write("taskapp.toml", "[files]\ntasks = \"todo.csv\"\n")?;

    data.cmd().arg("init").assert().success();

    assert_eq!(data.read("todo.csv")?, TASKS_HEADER);
    assert!(!data.file("tasks.csv").exists());
    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::seeded()?;
    data.write("taskapp.toml", "[files]\nlogs = \"../logs.csv\"\n")?;

    data.cmd()
        .arg("init")
        .assert()
        .code(2)
        .stderr(contains("Invalid configuration"))
        .stderr(contains("taskapp.toml"));
    Ok(())
}

#[test]
fn data_dir_can_come_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::empty()?;

    support::taskapp_cmd()
        .env("TASKAPP_DATA_DIR", data.path())
        .arg("init")
        .assert()
        .success();
    assert!(data.file("logs.csv").exists());
    Ok(())
}
