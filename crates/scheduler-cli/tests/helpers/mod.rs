use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    _temp_dir: TempDir,
    db_path: PathBuf,
    password: Option<String>,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self {
            _temp_dir: temp_dir,
            db_path,
            password: None,
        }
    }

    /// Same as [`CliTestHarness::new`], with a shared password configured.
    pub fn with_password(password: &str) -> Self {
        let mut harness = Self::new();
        harness.password = Some(password.to_string());
        harness
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("scheduler").expect("Failed to find scheduler binary");

        cmd.env("SCHEDULER_DATABASE_PATH", &self.db_path)
            .env_remove("SCHEDULER_TOKEN")
            .env_remove("SCHEDULER_SIGNIN_PASSWORD")
            .env_remove("RUST_LOG");
        match &self.password {
            Some(password) => cmd.env("SCHEDULER_PASSWORD", password),
            None => cmd.env_remove("SCHEDULER_PASSWORD"),
        };

        cmd
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs a command expected to succeed and parses its JSON output.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run_success(args).get_output().stdout.clone();
        serde_json::from_slice(&output).expect("stdout is not valid JSON")
    }

    /// Adds a task and returns its id.
    pub fn add(&self, args: &[&str]) -> String {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let response = self.run_json(&full);
        response["id"]
            .as_str()
            .expect("add returns an id")
            .to_string()
    }
}
