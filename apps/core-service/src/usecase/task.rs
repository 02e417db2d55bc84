//! タスクユースケース

use std::sync::Arc;

use dailylog_domain::{
    DomainError,
    task::{Task, TaskDescription, TaskId},
};
use dailylog_infra::{TransactionManager, repository::TaskRepository};

use crate::error::CoreError;

/// タスクユースケース
pub struct TaskUseCaseImpl {
    task_repo:  Arc<dyn TaskRepository>,
    tx_manager: Arc<dyn TransactionManager>,
}

impl TaskUseCaseImpl {
    pub fn new(task_repo: Arc<dyn TaskRepository>, tx_manager: Arc<dyn TransactionManager>) -> Self {
        Self {
            task_repo,
            tx_manager,
        }
    }

    /// タスクを作成する
    pub async fn create_task(&self, description: String) -> Result<Task, CoreError> {
        let description = TaskDescription::new(description)?;

        let mut tx = self.tx_manager.begin().await?;
        let task = self.task_repo.insert(&mut tx, &description).await?;
        tx.commit().await?;

        Ok(task)
    }

    /// 全タスクを ID 順で取得する
    pub async fn list_tasks(&self) -> Result<Vec<Task>, CoreError> {
        Ok(self.task_repo.find_all().await?)
    }

    /// タスクを削除する
    ///
    /// 存在しない ID は NotFound。
    pub async fn delete_task(&self, id: TaskId) -> Result<(), CoreError> {
        let mut tx = self.tx_manager.begin().await?;
        let deleted = self.task_repo.delete(&mut tx, id).await?;
        tx.commit().await?;

        if !deleted {
            return Err(DomainError::NotFound {
                entity_type: "Task",
                id:          id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
