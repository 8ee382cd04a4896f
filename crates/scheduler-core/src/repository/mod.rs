use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{NewTaskData, Task, TaskFilter};
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod tasks;

/// Storage for task rows.
///
/// Implementations own the rows exclusively. The lifecycle never holds a row
/// across calls; it re-reads, decides, and writes back through
/// [`TaskRepository::update_task_date`], whose compare-and-set on the date and
/// repeat rule makes concurrent completions and edits of the same task
/// detectable.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task(&self, id: &str) -> Result<Option<Task>, CoreError>;
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, CoreError>;
    /// Overwrites every column of an existing row; `NotFound` if it is gone.
    async fn update_task(&self, task: &Task) -> Result<(), CoreError>;
    /// Moves `current`'s row to `next`. Returns `false` when the row no longer
    /// holds `current`'s date and repeat rule (or no longer exists).
    async fn update_task_date(&self, current: &Task, next: NaiveDate) -> Result<bool, CoreError>;
    async fn delete_task(&self, id: &str) -> Result<(), CoreError>;
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
