use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const NOW: &str = "2024-03-04T08:05";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pillbox"))
}

/// Isolated config and data homes for one test.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir should succeed");
        for sub in ["config", "data", "store"] {
            std::fs::create_dir_all(dir.path().join(sub)).expect("create dir");
        }
        Self { dir }
    }

    fn config_home(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    fn store_dir(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("PILLBOX_DATA", self.store_dir())
            .env("PILLBOX_NOW", NOW)
            .env_remove("PILLBOX_CONFIG")
            .env_remove("PILLBOX_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("run pillbox")
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("parse json output")
    }
}

fn occurrence<'a>(today: &'a serde_json::Value, schedule_id: &str) -> &'a serde_json::Value {
    today["occurrences"]
        .as_array()
        .expect("occurrences array")
        .iter()
        .find(|o| o["scheduleId"] == schedule_id)
        .expect("occurrence present")
}

fn names(list: &serde_json::Value) -> Vec<String> {
    list.as_array()
        .expect("list array")
        .iter()
        .filter_map(|m| m["name"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn test_cli_first_run_seeds_samples() {
    let sandbox = Sandbox::new();
    let list = sandbox.json(&["list", "--json"]);
    assert_eq!(names(&list), vec!["Aspirin", "Vitamin D", "Metformin"]);

    // Seeding is persisted to the data directory
    assert!(std::fs::read_dir(sandbox.store_dir())
        .expect("read store dir")
        .next()
        .is_some());
}

#[test]
fn test_cli_today_statuses() {
    let sandbox = Sandbox::new();
    let today = sandbox.json(&["today", "--json"]);

    assert_eq!(today["summary"]["total"], 5);
    assert_eq!(today["summary"]["available"], 2);
    assert_eq!(today["summary"]["upcoming"], 3);
    assert_eq!(occurrence(&today, "1-1")["status"], "available");
    assert_eq!(occurrence(&today, "3-1")["status"], "available");
    assert_eq!(occurrence(&today, "2-1")["status"], "upcoming");
    assert_eq!(occurrence(&today, "1-1")["remainingMinutes"], 10);
}

#[test]
fn test_cli_today_at_later_time() {
    let sandbox = Sandbox::new();
    let today = sandbox.json(&["today", "--at", "09:00", "--json"]);
    assert_eq!(occurrence(&today, "1-1")["status"], "overdue");
    assert_eq!(today["summary"]["overdue"], 2);
}

#[test]
fn test_cli_take_and_untake() {
    let sandbox = Sandbox::new();

    let take = sandbox.json(&["take", "1", "1-1", "--json"]);
    assert_eq!(take["taken"], true);
    assert_eq!(take["date"], "2024-03-04");

    let today = sandbox.json(&["today", "--json"]);
    assert_eq!(occurrence(&today, "1-1")["status"], "taken");
    assert_eq!(occurrence(&today, "1-1")["taken"], true);
    assert_eq!(today["summary"]["taken"], 1);

    sandbox.json(&["untake", "1", "1-1", "--json"]);
    let today = sandbox.json(&["today", "--json"]);
    assert_eq!(occurrence(&today, "1-1")["status"], "available");
}

#[test]
fn test_cli_take_for_yesterday_leaves_today_open() {
    let sandbox = Sandbox::new();

    let take = sandbox.json(&["take", "1", "1-1", "--date", "2024-03-03", "--json"]);
    assert_eq!(take["date"], "2024-03-03");

    let today = sandbox.json(&["today", "--json"]);
    assert_eq!(occurrence(&today, "1-1")["taken"], false);
    assert_eq!(occurrence(&today, "1-1")["status"], "available");
    assert_eq!(today["summary"]["taken"], 0);
}

#[test]
fn test_cli_next_occurrence() {
    let sandbox = Sandbox::new();
    let next = sandbox.json(&["next", "--json"]);
    assert_eq!(next["timeOfDay"], "12:00");
    assert_eq!(next["medicationName"], "Vitamin D");

    let late = sandbox.json(&["next", "--at", "21:00", "--json"]);
    assert!(late.is_null());
}

#[test]
fn test_cli_add_show_remove() {
    let sandbox = Sandbox::new();
    let added = sandbox.json(&[
        "add",
        "--name",
        "Ibuprofen",
        "--dosage",
        "200mg",
        "--time",
        "14:00",
        "--time",
        "22:00",
        "--days",
        "mon,fri",
        "--window",
        "-30,60",
        "--json",
    ]);
    let id = added["id"].as_str().expect("medication id").to_string();
    assert_eq!(added["schedules"].as_array().map(Vec::len), Some(2));

    let shown = sandbox.json(&["show", &id, "--json"]);
    assert_eq!(shown["name"], "Ibuprofen");
    assert_eq!(shown["schedules"][0]["timeOfDay"], "14:00");
    assert_eq!(shown["schedules"][0]["daysOfWeek"], serde_json::json!([1, 5]));
    assert_eq!(shown["schedules"][0]["windowStart"], -30);

    let show_text = sandbox.run(&["show", &id]);
    assert!(show_text.status.success());
    assert!(String::from_utf8_lossy(&show_text.stdout).contains("200mg"));

    sandbox.json(&["remove", &id, "--json"]);
    let list = sandbox.json(&["list", "--json"]);
    assert!(!names(&list).contains(&"Ibuprofen".to_string()));
}

#[test]
fn test_cli_deactivate_hides_from_today() {
    let sandbox = Sandbox::new();
    sandbox.json(&["deactivate", "3", "--json"]);

    let today = sandbox.json(&["today", "--json"]);
    assert_eq!(today["summary"]["total"], 3);

    let active = sandbox.json(&["list", "--json"]);
    assert_eq!(names(&active), vec!["Aspirin", "Vitamin D"]);
    let all = sandbox.json(&["list", "--all", "--json"]);
    assert_eq!(names(&all).len(), 3);
}

#[test]
fn test_cli_unknown_medication_is_not_found() {
    let sandbox = Sandbox::new();
    let show = sandbox.run(&["show", "does-not-exist"]);
    assert_eq!(show.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&show.stderr).contains("does-not-exist"));

    let take = sandbox.run(&["take", "1", "nope"]);
    assert_eq!(take.status.code(), Some(3));
}

#[test]
fn test_cli_invalid_input_exit_code() {
    let sandbox = Sandbox::new();
    let add = sandbox.run(&["add", "--name", "X", "--dosage", "1", "--time", "25:00"]);
    assert_eq!(add.status.code(), Some(4));

    let window = sandbox.run(&[
        "add", "--name", "X", "--dosage", "1", "--time", "08:00", "--window", "30,-30",
    ]);
    assert_eq!(window.status.code(), Some(4));
}

#[test]
fn test_cli_settings_disable_cancels_reminders() {
    let sandbox = Sandbox::new();
    let pending = sandbox.json(&["reminders", "--json"]);
    assert!(!pending.as_array().expect("reminders array").is_empty());

    let settings = sandbox.json(&["settings", "--enabled", "false", "--json"]);
    assert_eq!(settings["enabled"], false);

    let pending = sandbox.json(&["reminders", "--json"]);
    assert!(pending.as_array().expect("reminders array").is_empty());

    let compiled = sandbox.json(&["reminders", "--compiled", "--json"]);
    assert!(compiled.as_array().expect("reminders array").is_empty());
}

#[test]
fn test_cli_reminder_lead_time_zero_drops_heads_up() {
    let sandbox = Sandbox::new();
    let before = sandbox.json(&["reminders", "--json"]);
    let before = before.as_array().expect("reminders array").len();

    sandbox.json(&["settings", "--reminder-minutes", "0", "--json"]);
    let after = sandbox.json(&["reminders", "--json"]);
    let after = after.as_array().expect("reminders array").len();
    assert!(after < before);
}

#[test]
fn test_cli_refills_within_horizon() {
    let sandbox = Sandbox::new();
    let due = sandbox.json(&["refills", "--within", "20", "--json"]);
    let due = due.as_array().expect("refills array");
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["name"], "Aspirin");
    assert_eq!(due[0]["daysLeft"], 15);

    let wide = sandbox.json(&["refills", "--within", "60", "--json"]);
    assert_eq!(wide.as_array().map(Vec::len), Some(3));
}

#[test]
fn test_cli_clear_requires_confirmation() {
    let sandbox = Sandbox::new();
    sandbox.json(&["add", "--name", "Extra", "--dosage", "1", "--time", "10:00", "--json"]);

    let refused = sandbox.run(&["clear"]);
    assert_eq!(refused.status.code(), Some(4));
    assert_eq!(names(&sandbox.json(&["list", "--json"])).len(), 4);

    let cleared = sandbox.run(&["clear", "--yes"]);
    assert!(cleared.status.success());
    // The next start seeds the samples again
    assert_eq!(names(&sandbox.json(&["list", "--json"])).len(), 3);
}

#[test]
fn test_cli_init_writes_config() {
    let sandbox = Sandbox::new();
    let data = sandbox.dir.path().join("custom");
    let data_arg = data.to_string_lossy().to_string();

    let mut init = sandbox.command();
    init.env_remove("PILLBOX_DATA")
        .args(["init", &data_arg, "--timezone", "Europe/Berlin", "--json"]);
    let init = init.output().expect("run init");
    assert!(init.status.success());

    let value: serde_json::Value = serde_json::from_slice(&init.stdout).expect("parse init json");
    assert_eq!(value["timezone"], "Europe/Berlin");
    assert_eq!(value["medications"], 3);

    let config_path = sandbox.config_home().join("pillbox").join("config.toml");
    let contents = std::fs::read_to_string(&config_path).expect("read config");
    assert!(contents.contains("Europe/Berlin"));
    assert!(contents.contains(&data_arg));
    assert!(data.exists());

    let again = sandbox.run(&["init"]);
    assert_eq!(again.status.code(), Some(4));
}

#[test]
fn test_cli_config_data_path_used_without_flag() {
    let sandbox = Sandbox::new();
    let data = sandbox.dir.path().join("from-config");
    write_config(&sandbox.config_home(), &data);

    let mut list = sandbox.command();
    list.env_remove("PILLBOX_DATA").args(["list", "--json"]);
    let list = list.output().expect("run list");
    assert!(list.status.success());
    assert!(data.exists());
}

fn write_config(config_home: &Path, data: &Path) {
    let path = config_home.join("pillbox").join("config.toml");
    std::fs::create_dir_all(path.parent().expect("config parent")).expect("create config dir");
    let contents = format!("[data]\npath = \"{}\"\n", data.to_string_lossy());
    std::fs::write(&path, contents).expect("write config");
}

#[test]
fn test_cli_reset_clears_other_days() {
    let sandbox = Sandbox::new();
    sandbox.json(&["take", "3", "3-1", "--json"]);

    // Same day: the bit survives
    let same = sandbox.json(&["reset", "--json"]);
    assert_eq!(same["cleared"], 0);

    let next_day = sandbox.json(&["reset", "--date", "2024-03-05", "--json"]);
    assert_eq!(next_day["cleared"], 1);
}

#[test]
fn test_cli_plain_today_output() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["today"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Aspirin"));
    assert!(stdout.contains("available"));
}

#[test]
fn test_cli_completions() {
    let output = Command::new(bin())
        .args(["completions", "bash"])
        .output()
        .expect("run completions");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("pillbox"));
}
