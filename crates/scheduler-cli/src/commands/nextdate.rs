use anyhow::Result;
use scheduler_core::dates::parse_date;
use scheduler_core::recurrence::RecurrenceEngine;

use crate::cli::NextDateCommand;

/// Prints the bare date so the output can be piped into other tools.
pub fn next_date(engine: &RecurrenceEngine, command: NextDateCommand) -> Result<()> {
    let now = parse_date(&command.now)?;
    let next = engine.next_date(now, &command.date, &command.repeat)?;
    println!("{}", next);
    Ok(())
}
