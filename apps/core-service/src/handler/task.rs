//! # タスク API ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dailylog_domain::task::{Task, TaskId};
use dailylog_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{error::CoreError, usecase::TaskUseCaseImpl};

/// タスクハンドラーの State
pub struct TaskState {
    pub usecase: TaskUseCaseImpl,
}

/// タスク作成リクエスト
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub description: String,
}

/// タスク DTO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id:          i64,
    pub description: String,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id:          task.id().as_i64(),
            description: task.description().to_string(),
        }
    }
}

/// タスクを作成する
///
/// ## エンドポイント
/// POST /tasks
#[tracing::instrument(skip_all)]
pub async fn create_task(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Response, CoreError> {
    let Json(req) = payload?;
    let task = state.usecase.create_task(req.description).await?;

    let response = ApiResponse::new(TaskDto::from(&task));
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// タスク一覧を取得する
///
/// ## エンドポイント
/// GET /tasks
#[tracing::instrument(skip_all)]
pub async fn list_tasks(State(state): State<Arc<TaskState>>) -> Result<Response, CoreError> {
    let tasks = state.usecase.list_tasks().await?;

    let dtos: Vec<TaskDto> = tasks.iter().map(TaskDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

/// タスクを削除する
///
/// ## エンドポイント
/// DELETE /tasks/{id}
#[tracing::instrument(skip_all)]
pub async fn delete_task(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, CoreError> {
    state.usecase.delete_task(TaskId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        routing::{delete, get},
    };
    use dailylog_infra::mock::{MockTaskRepository, MockTransactionManager};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    fn create_test_app(repo: MockTaskRepository) -> Router {
        let usecase = TaskUseCaseImpl::new(Arc::new(repo), Arc::new(MockTransactionManager));

        Router::new()
            .route("/tasks", get(list_tasks).post(create_task))
            .route("/tasks/{id}", delete(delete_task))
            .with_state(Arc::new(TaskState { usecase }))
    }

    fn request(method: Method, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn response_body<T: serde::de::DeserializeOwned>(
        response: axum::http::Response<Body>,
    ) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_post_tasks_201で作成したタスクを返す() {
        // Given
        let repo = MockTaskRepository::new();
        let sut = create_test_app(repo.clone());

        // When
        let response = sut
            .oneshot(request(
                Method::POST,
                "/tasks",
                Some(json!({ "description": "Buy milk" })),
            ))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: ApiResponse<TaskDto> = response_body(response).await;
        assert_eq!(
            body.data,
            TaskDto {
                id:          1,
                description: "Buy milk".to_string(),
            }
        );
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_post_tasks_説明文がなければ400を返す() {
        let sut = create_test_app(MockTaskRepository::new());

        let response = sut
            .oneshot(request(Method::POST, "/tasks", Some(json!({}))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_tasks_作成順の一覧を返す() {
        let repo = MockTaskRepository::new();
        repo.add_task("Buy milk");
        repo.add_task("Walk dog");
        let sut = create_test_app(repo);

        let response = sut
            .oneshot(request(Method::GET, "/tasks", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response_body(response).await;
        assert_eq!(
            body,
            json!({
                "data": [
                    { "id": 1, "description": "Buy milk" },
                    { "id": 2, "description": "Walk dog" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_delete_tasks_存在するタスクは204を返す() {
        let repo = MockTaskRepository::new();
        let task = repo.add_task("Buy milk");
        let sut = create_test_app(repo.clone());

        let response = sut
            .oneshot(request(
                Method::DELETE,
                &format!("/tasks/{}", task.id()),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_delete_tasks_存在しないタスクは404を返す() {
        let sut = create_test_app(MockTaskRepository::new());

        let response = sut
            .oneshot(request(Method::DELETE, "/tasks/99", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_tasks_整数でないidは400を返す() {
        let sut = create_test_app(MockTaskRepository::new());

        let response = sut
            .oneshot(request(Method::DELETE, "/tasks/abc", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
