use anyhow::Result;
use dialoguer::Confirm;

use crate::cli::DeleteCommand;
use crate::commands::Context;
use crate::views::response::{print_json, Response};

pub async fn delete_task(ctx: &Context, command: DeleteCommand) -> Result<()> {
    if !ctx.is_json() && !command.force {
        let task = ctx.gateway.get_task(ctx.token(), &command.id).await?;
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete task '{}'?",
                task.title
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    ctx.gateway.delete_task(ctx.token(), &command.id).await?;

    if ctx.is_json() {
        print_json(&Response::empty())
    } else {
        println!("Deleted task {}", command.id);
        Ok(())
    }
}
