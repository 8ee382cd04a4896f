//! Pending/recurring task state machine.
//!
//! A task with an empty repeat string is *pending*: completing it deletes it.
//! A task with a repeat rule is *recurring*: completing it moves its date to
//! the next occurrence and keeps the row.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::grammar::{self, RecurrenceRule};
use crate::models::{CompletionResult, Task};
use crate::recurrence::RecurrenceEngine;
use crate::repository::TaskRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Recurring(RecurrenceRule),
}

impl TaskState {
    pub fn of(task: &Task) -> Result<Self, CoreError> {
        Self::from_repeat(&task.repeat)
    }

    pub fn from_repeat(repeat: &str) -> Result<Self, CoreError> {
        let rule = grammar::parse(repeat).map_err(|e| CoreError::InvalidRule(e.to_string()))?;
        Ok(match rule {
            RecurrenceRule::None => TaskState::Pending,
            rule => TaskState::Recurring(rule),
        })
    }
}

/// What completing a task will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Delete,
    Reschedule(NaiveDate),
}

#[derive(Debug, Clone, Default)]
pub struct TaskLifecycle {
    engine: RecurrenceEngine,
}

impl TaskLifecycle {
    pub fn new(engine: RecurrenceEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &RecurrenceEngine {
        &self.engine
    }

    /// Decides the completion outcome without touching storage.
    ///
    /// Recurring tasks step from the later of their stored date and `today`,
    /// with `today` as the not-before bound, so the new date is strictly after
    /// both the old date and today.
    pub fn plan_completion(&self, task: &Task, today: NaiveDate) -> Result<Completion, CoreError> {
        match TaskState::of(task)? {
            TaskState::Pending => Ok(Completion::Delete),
            TaskState::Recurring(rule) => {
                let base = task.date.max(today);
                let next = self.engine.next_occurrence(base, &rule, today)?;
                Ok(Completion::Reschedule(next))
            }
        }
    }

    /// Marks a task done: deletes a pending task, reschedules a recurring one.
    pub async fn complete(
        &self,
        repo: &dyn TaskRepository,
        id: &str,
        today: NaiveDate,
    ) -> Result<CompletionResult, CoreError> {
        let task = repo
            .find_task(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        match self.plan_completion(&task, today)? {
            Completion::Delete => {
                repo.delete_task(id).await?;
                info!(task_id = id, "completed one-shot task, deleted");
                Ok(CompletionResult::Deleted(task))
            }
            Completion::Reschedule(next) => {
                if !repo.update_task_date(&task, next).await? {
                    warn!(task_id = id, "task changed while completing");
                    return Err(CoreError::Conflict(id.to_string()));
                }
                info!(task_id = id, repeat = %task.repeat, next = %next, "rescheduled recurring task");
                let previous = task.date;
                Ok(CompletionResult::Rescheduled {
                    task: Task { date: next, ..task },
                    previous,
                })
            }
        }
    }

    /// Checks that a date/repeat pair may be committed.
    pub fn validate_edit(&self, repeat: &str) -> Result<TaskState, CoreError> {
        TaskState::from_repeat(repeat)
    }
}
