use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use scheduler_core::models::DEFAULT_LIST_LIMIT;
use scheduler_core::recurrence::{EngineConfig, LeapDayPolicy};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "scheduler.toml";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file
    pub database_path: String,
    /// Shared password; when unset every request is authorized
    pub password: Option<String>,
    /// Default tracing level, overridden by `RUST_LOG`
    pub log_level: String,
    /// Maximum number of tasks returned by `list`
    pub list_limit: u32,
    /// How yearly rules anchored on February 29th behave in common years
    pub leap_day: LeapDayPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "scheduler.db".to_string(),
            password: None,
            log_level: "warn".to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            leap_day: LeapDayPolicy::default(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("SCHEDULER_").only(&[
                "database_path",
                "password",
                "log_level",
                "list_limit",
                "leap_day",
            ]))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            leap_day: self.leap_day,
            ..Default::default()
        }
    }
}
