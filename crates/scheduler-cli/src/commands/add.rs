use anyhow::Result;
use owo_colors::OwoColorize;
use scheduler_core::models::TaskRequest;

use crate::cli::AddCommand;
use crate::commands::Context;
use crate::views::response::{print_json, Response};

pub async fn add_task(ctx: &Context, command: AddCommand) -> Result<()> {
    let request = TaskRequest {
        id: None,
        date: command.date,
        title: command.title,
        comment: command.comment,
        repeat: command.repeat,
    };
    let id = ctx.gateway.create_task(ctx.token(), request).await?;

    if ctx.is_json() {
        print_json(&Response::id(id))
    } else {
        println!("Added task {}", id.cyan());
        Ok(())
    }
}
