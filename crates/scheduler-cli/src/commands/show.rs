use anyhow::Result;

use crate::cli::ShowCommand;
use crate::commands::Context;
use crate::views::response::print_json;
use crate::views::table::display_tasks;

pub async fn show_task(ctx: &Context, command: ShowCommand) -> Result<()> {
    let task = ctx.gateway.get_task(ctx.token(), &command.id).await?;

    if ctx.is_json() {
        print_json(&task)
    } else {
        display_tasks(std::slice::from_ref(&task));
        Ok(())
    }
}
