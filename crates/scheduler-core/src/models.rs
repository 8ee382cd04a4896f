use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::dates::{self, parse_date};
use crate::error::CoreError;

pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// A to-do item. `repeat` empty means a one-shot task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(with = "yyyymmdd")]
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        !self.repeat.trim().is_empty()
    }
}

/// Row shape of the `scheduler` table; dates are stored as `YYYYMMDD` text.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: String,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = CoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            date: parse_date(&row.date)?,
            id: row.id,
            title: row.title,
            comment: row.comment,
            repeat: row.repeat,
        })
    }
}

/// Validated data for a task about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    pub date: NaiveDate,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// A create or edit request as it arrives from the transport layer. Every
/// field is raw text; the gateway validates and normalizes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub repeat: Option<String>,
}

/// Filter for listing tasks.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Either a `DD.MM.YYYY` date or free text matched against title and comment.
    pub search: Option<String>,
    pub limit: u32,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            search: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriterion {
    All,
    Date(NaiveDate),
    Text(String),
}

impl TaskFilter {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn criterion(&self) -> SearchCriterion {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => SearchCriterion::All,
            Some(text) => match dates::parse_search_date(text) {
                Some(date) => SearchCriterion::Date(date),
                None => SearchCriterion::Text(text.to_string()),
            },
        }
    }
}

/// Outcome of marking a task done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// One-shot task; it has been removed.
    Deleted(Task),
    /// Recurring task moved forward to its next occurrence.
    Rescheduled { task: Task, previous: NaiveDate },
}

/// Serde adapter for `YYYYMMDD` dates.
pub mod yyyymmdd {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::dates::{format_date, parse_date};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(serde::de::Error::custom)
    }
}
