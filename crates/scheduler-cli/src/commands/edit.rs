use anyhow::Result;
use owo_colors::OwoColorize;
use scheduler_core::dates::format_date;
use scheduler_core::models::{Task, TaskRequest};

use crate::cli::EditCommand;
use crate::commands::Context;
use crate::views::response::{print_json, Response};

/// Applies the flags given on the command line on top of the stored task.
/// Fields without a flag keep their current value.
pub async fn edit_task(ctx: &Context, command: EditCommand) -> Result<()> {
    let existing = ctx.gateway.get_task(ctx.token(), &command.id).await?;
    let request = merge(existing, command);
    let task = ctx.gateway.edit_task(ctx.token(), request).await?;

    if ctx.is_json() {
        print_json(&Response::empty())
    } else {
        println!(
            "Updated task '{}' ({})",
            task.title.bold(),
            format_date(task.date)
        );
        Ok(())
    }
}

fn merge(existing: Task, command: EditCommand) -> TaskRequest {
    let comment = if command.comment_clear {
        String::new()
    } else {
        command.comment.unwrap_or(existing.comment)
    };
    let repeat = if command.repeat_clear {
        String::new()
    } else {
        command.repeat.unwrap_or(existing.repeat)
    };

    TaskRequest {
        id: Some(existing.id),
        date: Some(command.date.unwrap_or_else(|| format_date(existing.date))),
        title: command.title.unwrap_or(existing.title),
        comment: Some(comment),
        repeat: Some(repeat),
    }
}
