use crate::dates::format_date;
use crate::error::CoreError;
use crate::models::{NewTaskData, SearchCriterion, Task, TaskFilter, TaskRow};
use crate::repository::{SqliteRepository, TaskRepository};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::QueryBuilder;
use uuid::Uuid;

const SELECT_TASKS: &str = "SELECT id, date, title, comment, repeat FROM scheduler";

/// Escapes LIKE wildcards so user text matches literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl TaskRepository for SqliteRepository {
    async fn insert_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        let task = Task {
            id: Uuid::now_v7().to_string(),
            date: data.date,
            title: data.title,
            comment: data.comment,
            repeat: data.repeat,
        };

        sqlx::query(
            r#"INSERT INTO scheduler (id, date, title, comment, repeat)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&task.id)
        .bind(format_date(task.date))
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .execute(self.pool())
        .await?;

        Ok(task)
    }

    async fn find_task(&self, id: &str) -> Result<Option<Task>, CoreError> {
        let row: Option<TaskRow> =
            sqlx::query_as("SELECT id, date, title, comment, repeat FROM scheduler WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        row.map(Task::try_from).transpose()
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, CoreError> {
        let mut query_builder: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(SELECT_TASKS);

        match filter.criterion() {
            SearchCriterion::All => {}
            SearchCriterion::Date(date) => {
                query_builder.push(" WHERE date = ");
                query_builder.push_bind(format_date(date));
            }
            SearchCriterion::Text(text) => {
                let pattern = like_pattern(&text);
                query_builder.push(" WHERE title LIKE ");
                query_builder.push_bind(pattern.clone());
                query_builder.push(" ESCAPE '\\' OR comment LIKE ");
                query_builder.push_bind(pattern);
                query_builder.push(" ESCAPE '\\'");
            }
        }

        query_builder.push(" ORDER BY date, id LIMIT ");
        query_builder.push_bind(i64::from(filter.limit));

        let rows: Vec<TaskRow> = query_builder.build_query_as().fetch_all(self.pool()).await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn update_task(&self, task: &Task) -> Result<(), CoreError> {
        let result = sqlx::query(
            r#"UPDATE scheduler
            SET date = $1, title = $2, comment = $3, repeat = $4
            WHERE id = $5
            "#,
        )
        .bind(format_date(task.date))
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .bind(&task.id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(task.id.clone()));
        }
        Ok(())
    }

    async fn update_task_date(&self, current: &Task, next: NaiveDate) -> Result<bool, CoreError> {
        let result = sqlx::query(
            "UPDATE scheduler SET date = $1 WHERE id = $2 AND date = $3 AND repeat = $4",
        )
        .bind(format_date(next))
        .bind(&current.id)
        .bind(format_date(current.date))
        .bind(&current.repeat)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_task(&self, id: &str) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM scheduler WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
