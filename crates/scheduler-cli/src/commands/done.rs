use anyhow::Result;
use owo_colors::OwoColorize;
use scheduler_core::dates::format_date;
use scheduler_core::models::CompletionResult;

use crate::cli::DoneCommand;
use crate::commands::Context;
use crate::views::response::{print_json, Response};

pub async fn complete_task(ctx: &Context, command: DoneCommand) -> Result<()> {
    let result = ctx.gateway.complete_task(ctx.token(), &command.id).await?;

    if ctx.is_json() {
        return print_json(&Response::empty());
    }

    match result {
        CompletionResult::Deleted(task) => {
            println!("Completed task: '{}'", task.title);
        }
        CompletionResult::Rescheduled { task, previous } => {
            println!(
                "Completed task: '{}' ({}), next on {}",
                task.title,
                format_date(previous),
                format_date(task.date).green()
            );
        }
    }
    Ok(())
}
