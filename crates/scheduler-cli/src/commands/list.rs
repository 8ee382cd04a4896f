use anyhow::Result;

use crate::cli::ListCommand;
use crate::commands::Context;
use crate::views::response::{print_json, Response};
use crate::views::table::display_tasks;

pub async fn list_tasks(ctx: &Context, command: ListCommand) -> Result<()> {
    let search = command.search.filter(|s| !s.trim().is_empty());
    let tasks = ctx.gateway.list_tasks(ctx.token(), search).await?;

    if ctx.is_json() {
        print_json(&Response::tasks(tasks))
    } else {
        display_tasks(&tasks);
        Ok(())
    }
}
