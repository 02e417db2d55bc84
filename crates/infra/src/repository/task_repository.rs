//! # TaskRepository
//!
//! タスクの永続化を担当するリポジトリ。

use async_trait::async_trait;
use dailylog_domain::task::{Task, TaskDescription, TaskId};
use sqlx::SqlitePool;

use crate::{db::TxContext, error::InfraError};

/// タスクリポジトリトレイト
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 全タスクを ID 順で取得する
    async fn find_all(&self) -> Result<Vec<Task>, InfraError>;

    /// タスクを挿入し、採番された ID 付きのタスクを返す
    async fn insert(
        &self,
        tx: &mut TxContext,
        description: &TaskDescription,
    ) -> Result<Task, InfraError>;

    /// タスクを削除する
    ///
    /// # 戻り値
    ///
    /// - `Ok(true)`: 削除した
    /// - `Ok(false)`: 該当するタスクが存在しなかった
    async fn delete(&self, tx: &mut TxContext, id: TaskId) -> Result<bool, InfraError>;
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id:          i64,
    description: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = InfraError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let description = TaskDescription::new(row.description)
            .map_err(|e| InfraError::unexpected(e.to_string()))?;
        Ok(Task::from_db(TaskId::new(row.id), description))
    }
}

/// SQLite 実装の TaskRepository
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Task>, InfraError> {
        let rows: Vec<TaskRow> = sqlx::query_as("SELECT id, description FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(
        &self,
        tx: &mut TxContext,
        description: &TaskDescription,
    ) -> Result<Task, InfraError> {
        let result = sqlx::query("INSERT INTO tasks (description) VALUES (?)")
            .bind(description.as_str())
            .execute(tx.conn())
            .await?;

        Ok(Task::from_db(
            TaskId::new(result.last_insert_rowid()),
            description.clone(),
        ))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, tx: &mut TxContext, id: TaskId) -> Result<bool, InfraError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.as_i64())
            .execute(tx.conn())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
