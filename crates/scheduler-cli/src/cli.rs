use clap::{Parser, Subcommand, ValueEnum};

/// Recurring to-do scheduler with a compact repeat grammar
///
/// Repeat rules: `d <n>` every n days, `y` yearly, `w 1,3` on weekdays
/// (1 = Monday), `m 1,-1 [1,6]` on days of the month (negative counts from
/// the month's end), optionally limited to the listed months.
#[derive(Parser, Debug)]
#[command(name = "scheduler", author, version, about, long_about = None)]
pub struct Cli {
    /// Token returned by `signin`
    #[arg(long, global = true, env = "SCHEDULER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compute the next date of a repeat rule
    #[command(name = "nextdate")]
    NextDate(NextDateCommand),
    /// Exchange the password for a token
    #[command(name = "signin")]
    SignIn(SignInCommand),
    /// Add a new task
    Add(AddCommand),
    /// List tasks ordered by date
    List(ListCommand),
    /// Show a single task
    Show(ShowCommand),
    /// Edit a task
    Edit(EditCommand),
    /// Mark a task as done
    Done(DoneCommand),
    /// Delete a task
    Delete(DeleteCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct NextDateCommand {
    /// Reference day, YYYYMMDD
    #[arg(long)]
    pub now: String,
    /// Last occurrence, YYYYMMDD
    #[arg(long)]
    pub date: String,
    /// Repeat rule
    #[arg(long)]
    pub repeat: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SignInCommand {
    #[arg(long, env = "SCHEDULER_SIGNIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The date of the task, YYYYMMDD (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,
    /// A free-form comment
    #[arg(short, long)]
    pub comment: Option<String>,
    /// Repeat rule (e.g. "d 7", "y", "w 1,5", "m -1")
    #[arg(short, long)]
    pub repeat: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Text to look for in title or comment, or a date as DD.MM.YYYY
    #[arg(short, long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID of the task
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the task to edit
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,
    #[arg(long, conflicts_with = "comment")]
    pub comment_clear: bool,

    #[arg(long)]
    pub repeat: Option<String>,
    #[arg(long, conflicts_with = "repeat", help = "Remove the repeat rule (make the task one-shot)")]
    pub repeat_clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DoneCommand {
    /// The ID of the task to mark as done
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Delete without confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_nextdate() {
        let cli = Cli::try_parse_from([
            "scheduler", "nextdate", "--now", "20240126", "--date", "20240113", "--repeat", "d 7",
        ])
        .unwrap();
        match cli.command {
            Commands::NextDate(cmd) => {
                assert_eq!(cmd.now, "20240126");
                assert_eq!(cmd.repeat, "d 7");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_edit_clear_conflicts() {
        let result = Cli::try_parse_from([
            "scheduler", "edit", "abc", "--repeat", "d 1", "--repeat-clear",
        ]);
        assert!(result.is_err());
    }
}
