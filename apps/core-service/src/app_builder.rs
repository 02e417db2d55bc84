//! # アプリケーション構築
//!
//! DI（リポジトリ・ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use dailylog_domain::clock::Clock;
use dailylog_infra::{
    SqliteTransactionManager,
    TransactionManager,
    repository::{SqliteTaskRepository, SqliteWorkoutRepository},
};
use dailylog_shared::observability::make_request_span;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        ReadinessState,
        TaskState,
        WorkoutState,
        create_task,
        delete_task,
        get_workout,
        health_check,
        list_tasks,
        list_workouts,
        readiness_check,
        upsert_workout,
    },
    usecase::{TaskUseCaseImpl, WorkoutUseCaseImpl},
};

/// DI の構築とルーター定義を行う
///
/// 接続済みの `pool` を受け取り、リポジトリ → ユースケース → State → Router の
/// 順に組み立てる。`clock` は「今日」の解決に使う。
pub fn build_app(pool: SqlitePool, clock: Arc<dyn Clock>) -> Router {
    let tx_manager: Arc<dyn TransactionManager> =
        Arc::new(SqliteTransactionManager::new(pool.clone()));

    let workout_state = Arc::new(WorkoutState {
        usecase: WorkoutUseCaseImpl::new(
            Arc::new(SqliteWorkoutRepository::new(pool.clone())),
            tx_manager.clone(),
            clock,
        ),
    });

    let task_state = Arc::new(TaskState {
        usecase: TaskUseCaseImpl::new(
            Arc::new(SqliteTaskRepository::new(pool.clone())),
            tx_manager,
        ),
    });

    let readiness_state = Arc::new(ReadinessState { pool });

    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/workout", post(upsert_workout).get(get_workout))
                .route("/workouts", get(list_workouts))
                .with_state(workout_state),
        )
        .merge(
            Router::new()
                .route("/tasks", get(list_tasks).post(create_task))
                .route("/tasks/{id}", delete(delete_task))
                .with_state(task_state),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}
