use std::sync::Arc;

use clap::Parser;
use owo_colors::{OwoColorize, Style};
use scheduler_core::auth::PasswordAuthenticator;
use scheduler_core::db;
use scheduler_core::error::CoreError;
use scheduler_core::gateway::{SchedulingGateway, SystemClock};
use scheduler_core::lifecycle::TaskLifecycle;
use scheduler_core::recurrence::RecurrenceEngine;
use scheduler_core::repository::SqliteRepository;
use tracing::warn;

use crate::cli::{Commands, OutputFormat};
use crate::commands::Context;
use crate::views::response::Response;

mod cli;
mod commands;
mod config;
mod logging;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let (config, config_error) = match config::Config::new() {
        Ok(config) => (config, None),
        Err(e) => (config::Config::default(), Some(e)),
    };
    logging::init(&config.log_level);
    if let Some(e) = config_error {
        warn!(error = %e, "falling back to default configuration");
    }

    let format = cli.format;
    let engine = RecurrenceEngine::new(config.engine_config());
    let auth = Arc::new(PasswordAuthenticator::new(config.password.clone()));

    // nextdate and signin never touch storage
    let command = match cli.command {
        Commands::NextDate(command) => {
            exit_on_error(commands::nextdate::next_date(&engine, command), format);
            return;
        }
        Commands::SignIn(command) => {
            exit_on_error(commands::signin::sign_in(auth.as_ref(), format, command), format);
            return;
        }
        command => command,
    };

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            handle_error(e.into(), format);
            std::process::exit(1);
        }
    };

    let gateway = SchedulingGateway::new(
        Arc::new(SqliteRepository::new(db_pool)),
        auth,
        Arc::new(SystemClock),
        TaskLifecycle::new(engine),
    )
    .with_list_limit(config.list_limit);

    let ctx = Context {
        gateway,
        token: cli.token,
        format,
    };

    let result = match command {
        Commands::Add(command) => commands::add::add_task(&ctx, command).await,
        Commands::List(command) => commands::list::list_tasks(&ctx, command).await,
        Commands::Show(command) => commands::show::show_task(&ctx, command).await,
        Commands::Edit(command) => commands::edit::edit_task(&ctx, command).await,
        Commands::Done(command) => commands::done::complete_task(&ctx, command).await,
        Commands::Delete(command) => commands::delete::delete_task(&ctx, command).await,
        Commands::NextDate(_) | Commands::SignIn(_) => Ok(()),
    };

    exit_on_error(result, format);
}

fn exit_on_error(result: anyhow::Result<()>, format: OutputFormat) {
    if let Err(e) = result {
        handle_error(e, format);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error, format: OutputFormat) {
    let message = match err.downcast_ref::<CoreError>() {
        Some(core_error) if !core_error.is_client_error() => {
            warn!(error = ?core_error, "storage failure");
            core_error.to_string()
        }
        Some(core_error) => core_error.to_string(),
        None => err.to_string(),
    };

    if format == OutputFormat::Json {
        match serde_json::to_string(&Response::error(message.clone())) {
            Ok(body) => println!("{}", body),
            Err(_) => eprintln!("{}", message),
        }
        return;
    }

    let error_style = Style::new().red().bold();
    match err.downcast_ref::<CoreError>() {
        Some(CoreError::Unauthorized) => {
            eprintln!(
                "{} {} (run `signin` and pass the token with --token)",
                "Error:".style(error_style),
                message
            );
        }
        Some(CoreError::Conflict(id)) => {
            eprintln!(
                "{} Task {} changed while being completed; try again",
                "Error:".style(error_style),
                id.yellow()
            );
        }
        _ => eprintln!("{} {}", "Error:".style(error_style), message),
    }
}
