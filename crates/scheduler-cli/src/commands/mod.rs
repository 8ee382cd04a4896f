use scheduler_core::gateway::SchedulingGateway;

use crate::cli::OutputFormat;

pub mod add;
pub mod delete;
pub mod done;
pub mod edit;
pub mod list;
pub mod nextdate;
pub mod show;
pub mod signin;

/// Everything a command handler needs to serve one invocation.
pub struct Context {
    pub gateway: SchedulingGateway,
    pub token: Option<String>,
    pub format: OutputFormat,
}

impl Context {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
