//! Request-level façade used by the transport layer.
//!
//! Every task operation checks the caller's token, validates and normalizes
//! the request, and delegates to the lifecycle and the repository.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::auth::Authenticator;
use crate::dates::parse_date;
use crate::error::CoreError;
use crate::lifecycle::{TaskLifecycle, TaskState};
use crate::models::{CompletionResult, NewTaskData, Task, TaskFilter, TaskRequest};
use crate::repository::TaskRepository;

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub struct SchedulingGateway {
    repo: Arc<dyn TaskRepository>,
    auth: Arc<dyn Authenticator>,
    clock: Arc<dyn Clock>,
    lifecycle: TaskLifecycle,
    list_limit: u32,
}

impl SchedulingGateway {
    pub fn new(
        repo: Arc<dyn TaskRepository>,
        auth: Arc<dyn Authenticator>,
        clock: Arc<dyn Clock>,
        lifecycle: TaskLifecycle,
    ) -> Self {
        Self {
            repo,
            auth,
            clock,
            lifecycle,
            list_limit: crate::models::DEFAULT_LIST_LIMIT,
        }
    }

    pub fn with_list_limit(mut self, limit: u32) -> Self {
        self.list_limit = limit;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn authorize(&self, token: Option<&str>) -> Result<(), CoreError> {
        if self.auth.verify(token) {
            Ok(())
        } else {
            Err(CoreError::Unauthorized)
        }
    }

    /// Next date for `repeat` after `date`, not earlier than `now`. Needs no
    /// token: it reads and writes nothing.
    pub fn next_date(&self, now: &str, date: &str, repeat: &str) -> Result<String, CoreError> {
        let now = parse_date(now)?;
        self.lifecycle.engine().next_date(now, date, repeat)
    }

    pub fn sign_in(&self, password: &str) -> Result<String, CoreError> {
        self.auth.issue_token(password)
    }

    /// Validates a create/edit request into storable data.
    ///
    /// # Behavior
    /// - title is required
    /// - blank date means today
    /// - a past date becomes today for one-shot tasks, or the next occurrence
    ///   on or after today for recurring ones
    /// - a repeat rule with no occurrence at all is `Unsatisfiable`
    pub fn normalize(&self, request: &TaskRequest) -> Result<NewTaskData, CoreError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(CoreError::ValidationFailed("title is required".to_string()));
        }

        let today = self.today();
        let repeat = request.repeat.as_deref().unwrap_or("").trim().to_string();
        let state = self.lifecycle.validate_edit(&repeat)?;

        let date = match request.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => parse_date(raw)?,
        };

        let date = match state {
            TaskState::Pending => date.max(today),
            TaskState::Recurring(rule) => {
                // a rule that never fires is refused even for a future date
                let next = self.lifecycle.engine().next_occurrence(date, &rule, today)?;
                if date >= today {
                    date
                } else {
                    next
                }
            }
        };

        Ok(NewTaskData {
            date,
            title: title.to_string(),
            comment: request.comment.clone().unwrap_or_default(),
            repeat,
        })
    }

    #[instrument(skip(self, token, request), fields(title = %request.title))]
    pub async fn create_task(
        &self,
        token: Option<&str>,
        request: TaskRequest,
    ) -> Result<String, CoreError> {
        self.authorize(token)?;
        let data = self.normalize(&request)?;
        let task = self.repo.insert_task(data).await?;
        info!(task_id = %task.id, date = %task.date, "task created");
        Ok(task.id)
    }

    pub async fn get_task(&self, token: Option<&str>, id: &str) -> Result<Task, CoreError> {
        self.authorize(token)?;
        let id = require_id(Some(id))?;
        self.repo
            .find_task(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    pub async fn list_tasks(
        &self,
        token: Option<&str>,
        search: Option<String>,
    ) -> Result<Vec<Task>, CoreError> {
        self.authorize(token)?;
        let filter = TaskFilter {
            search,
            limit: self.list_limit,
        };
        self.repo.list_tasks(&filter).await
    }

    #[instrument(skip(self, token, request), fields(task_id = ?request.id))]
    pub async fn edit_task(&self, token: Option<&str>, request: TaskRequest) -> Result<Task, CoreError> {
        self.authorize(token)?;
        let id = require_id(request.id.as_deref())?.to_string();
        let data = self.normalize(&request)?;

        let task = Task {
            id,
            date: data.date,
            title: data.title,
            comment: data.comment,
            repeat: data.repeat,
        };
        self.repo.update_task(&task).await?;
        info!(date = %task.date, "task updated");
        Ok(task)
    }

    #[instrument(skip(self, token))]
    pub async fn complete_task(
        &self,
        token: Option<&str>,
        id: &str,
    ) -> Result<CompletionResult, CoreError> {
        self.authorize(token)?;
        let id = require_id(Some(id))?;
        self.lifecycle.complete(self.repo.as_ref(), id, self.today()).await
    }

    #[instrument(skip(self, token))]
    pub async fn delete_task(&self, token: Option<&str>, id: &str) -> Result<(), CoreError> {
        self.authorize(token)?;
        let id = require_id(Some(id))?;
        self.repo.delete_task(id).await?;
        info!("task deleted");
        Ok(())
    }
}

fn require_id(id: Option<&str>) -> Result<&str, CoreError> {
    match id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(CoreError::ValidationFailed("task id is required".to_string())),
    }
}
