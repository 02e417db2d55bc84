//! # ワークアウト API ハンドラ
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 成功時 |
//! |---------|------|-------|
//! | POST | `/workout` | 201（作成）/ 200（更新） |
//! | GET | `/workout?date=YYYY-MM-DD` | 200（記録がなければゼロレコード） |
//! | GET | `/workouts` | 200 |
//!
//! リクエストボディの未知のキー、数値でない値、負の値、整数メトリクスへの
//! 小数はすべて 400 として扱い、ストアには触れない。

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query,
        State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dailylog_domain::workout::{DailyWorkout, Workout, WorkoutMetrics, WorkoutPatch};
use dailylog_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    error::CoreError,
    usecase::{UpsertOutcome, UpsertWorkoutInput, WorkoutUseCaseImpl},
};

/// ワークアウトハンドラーの State
pub struct WorkoutState {
    pub usecase: WorkoutUseCaseImpl,
}

/// upsert リクエスト
///
/// 指定されなかったメトリクスは、作成時は 0、更新時は既存の値のまま。
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpsertWorkoutRequest {
    pub date:    Option<String>,
    pub pushups: Option<i64>,
    pub situps:  Option<i64>,
    pub squats:  Option<i64>,
    pub miles:   Option<f64>,
}

/// GET /workout のクエリ
#[derive(Debug, Deserialize)]
pub struct WorkoutQuery {
    pub date: Option<String>,
}

/// ワークアウト DTO
///
/// 記録がない日のゼロレコードは `id` が `null` になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDto {
    pub id:      Option<i64>,
    pub date:    String,
    pub pushups: i64,
    pub situps:  i64,
    pub squats:  i64,
    pub miles:   f64,
}

impl WorkoutDto {
    fn new(id: Option<i64>, date: String, metrics: &WorkoutMetrics) -> Self {
        Self {
            id,
            date,
            pushups: metrics.pushups(),
            situps: metrics.situps(),
            squats: metrics.squats(),
            miles: metrics.miles(),
        }
    }
}

impl From<&Workout> for WorkoutDto {
    fn from(workout: &Workout) -> Self {
        Self::new(
            Some(workout.id().as_i64()),
            workout.date().to_string(),
            workout.metrics(),
        )
    }
}

impl From<&DailyWorkout> for WorkoutDto {
    fn from(daily: &DailyWorkout) -> Self {
        Self::new(
            daily.id().map(|id| id.as_i64()),
            daily.date().to_string(),
            &daily.metrics(),
        )
    }
}

/// ワークアウトを日付単位で作成・更新する
///
/// ## エンドポイント
/// POST /workout
#[tracing::instrument(skip_all)]
pub async fn upsert_workout(
    State(state): State<Arc<WorkoutState>>,
    payload: Result<Json<UpsertWorkoutRequest>, JsonRejection>,
) -> Result<Response, CoreError> {
    let Json(req) = payload?;
    let patch = WorkoutPatch::new(req.pushups, req.situps, req.squats, req.miles)?;

    let (workout, outcome) = state
        .usecase
        .upsert_workout(UpsertWorkoutInput {
            date: req.date,
            patch,
        })
        .await?;

    let status = match outcome {
        UpsertOutcome::Created => StatusCode::CREATED,
        UpsertOutcome::Updated => StatusCode::OK,
    };
    let response = ApiResponse::new(WorkoutDto::from(&workout));
    Ok((status, Json(response)).into_response())
}

/// 指定日（未指定なら今日）のワークアウトを取得する
///
/// ## エンドポイント
/// GET /workout?date={date}
#[tracing::instrument(skip_all)]
pub async fn get_workout(
    State(state): State<Arc<WorkoutState>>,
    query: Result<Query<WorkoutQuery>, QueryRejection>,
) -> Result<Response, CoreError> {
    let Query(query) = query?;
    let daily = state
        .usecase
        .get_workout_by_date(query.date.as_deref())
        .await?;

    let response = ApiResponse::new(WorkoutDto::from(&daily));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 全ワークアウトを取得する
///
/// ## エンドポイント
/// GET /workouts
#[tracing::instrument(skip_all)]
pub async fn list_workouts(
    State(state): State<Arc<WorkoutState>>,
) -> Result<Response, CoreError> {
    let workouts = state.usecase.list_workouts().await?;

    let dtos: Vec<WorkoutDto> = workouts.iter().map(WorkoutDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        routing::{get, post},
    };
    use chrono::{DateTime, Local};
    use dailylog_domain::{
        clock::FixedClock,
        workout::{WorkoutDate, WorkoutMetrics},
    };
    use dailylog_infra::mock::{MockTransactionManager, MockWorkoutRepository};
    use dailylog_shared::ErrorResponse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    const FIXED_TIMESTAMP: i64 = 1_700_000_000;

    fn today() -> String {
        DateTime::from_timestamp(FIXED_TIMESTAMP, 0)
            .unwrap()
            .with_timezone(&Local)
            .date_naive()
            .format("%Y-%m-%d")
            .to_string()
    }

    fn create_test_app(repo: MockWorkoutRepository) -> Router {
        let usecase = WorkoutUseCaseImpl::new(
            Arc::new(repo),
            Arc::new(MockTransactionManager),
            Arc::new(FixedClock::new(
                DateTime::from_timestamp(FIXED_TIMESTAMP, 0).unwrap(),
            )),
        );

        Router::new()
            .route("/workout", post(upsert_workout).get(get_workout))
            .route("/workouts", get(list_workouts))
            .with_state(Arc::new(WorkoutState { usecase }))
    }

    fn post_json(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/workout")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn response_body<T: serde::de::DeserializeOwned>(
        response: axum::http::Response<Body>,
    ) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn dto(
        id: Option<i64>,
        date: &str,
        pushups: i64,
        situps: i64,
        squats: i64,
        miles: f64,
    ) -> WorkoutDto {
        WorkoutDto {
            id,
            date: date.to_string(),
            pushups,
            situps,
            squats,
            miles,
        }
    }

    // ===== POST /workout =====

    #[tokio::test]
    async fn test_post_新しい日付は201で全メトリクス0の記録を返す() {
        // Given
        let sut = create_test_app(MockWorkoutRepository::new());

        // When
        let response = sut.oneshot(post_json(json!({}))).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: ApiResponse<WorkoutDto> = response_body(response).await;
        assert_eq!(body.data, dto(Some(1), &today(), 0, 0, 0, 0.0));
    }

    #[tokio::test]
    async fn test_post_既存の日付は200で指定したメトリクスのみ更新する() {
        // Given
        let repo = MockWorkoutRepository::new();
        repo.add_workout(
            WorkoutDate::parse("2024-01-01").unwrap(),
            WorkoutMetrics::new(10, 5, 0, 1.5).unwrap(),
        );
        let sut = create_test_app(repo);

        // When
        let response = sut
            .oneshot(post_json(json!({ "date": "2024-01-01", "pushups": 20 })))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body: ApiResponse<WorkoutDto> = response_body(response).await;
        assert_eq!(body.data, dto(Some(1), "2024-01-01", 20, 5, 0, 1.5));
    }

    #[rstest]
    #[case::未知のキー(json!({ "pushups": 1, "burpees": 3 }))]
    #[case::数値でない値(json!({ "pushups": "ten" }))]
    #[case::負の値(json!({ "situps": -1 }))]
    #[case::負の距離(json!({ "miles": -0.5 }))]
    #[case::整数メトリクスへの小数(json!({ "squats": 1.5 }))]
    #[case::不正な日付(json!({ "date": "01/01/2024" }))]
    #[case::配列のボディ(json!([1, 2, 3]))]
    #[tokio::test]
    async fn test_post_不正な入力は400でストアに触れない(#[case] body: serde_json::Value) {
        // Given
        let repo = MockWorkoutRepository::new();
        let sut = create_test_app(repo.clone());

        // When
        let response = sut.oneshot(post_json(body)).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let problem: serde_json::Value = response_body(response).await;
        assert_eq!(problem["status"], 400);
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_post_構文エラーのjsonは400を返す() {
        let sut = create_test_app(MockWorkoutRepository::new());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/workout")
            .header("content-type", "application/json")
            .body(Body::from("{\"pushups\": "))
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_ストアの障害は500で詳細を返さない() {
        let sut = create_test_app(MockWorkoutRepository::failing());

        let response = sut
            .oneshot(post_json(json!({ "pushups": 1 })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let problem: serde_json::Value = response_body(response).await;
        assert_eq!(problem["detail"], "内部エラーが発生しました");
    }

    // ===== GET /workout =====

    #[tokio::test]
    async fn test_get_記録のない日付はidがnullのゼロレコードを返す() {
        let sut = create_test_app(MockWorkoutRepository::new());

        let response = sut
            .oneshot(get_request("/workout?date=2024-05-05"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response_body(response).await;
        assert_eq!(
            body,
            json!({
                "data": {
                    "id": null,
                    "date": "2024-05-05",
                    "pushups": 0,
                    "situps": 0,
                    "squats": 0,
                    "miles": 0.0
                }
            })
        );
    }

    #[tokio::test]
    async fn test_get_日付未指定は今日の記録を返す() {
        let repo = MockWorkoutRepository::new();
        repo.add_workout(
            WorkoutDate::parse(&today()).unwrap(),
            WorkoutMetrics::new(3, 0, 0, 2.0).unwrap(),
        );
        let sut = create_test_app(repo);

        let response = sut.oneshot(get_request("/workout")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ApiResponse<WorkoutDto> = response_body(response).await;
        assert_eq!(body.data, dto(Some(1), &today(), 3, 0, 0, 2.0));
    }

    #[tokio::test]
    async fn test_get_不正な日付は400を返す() {
        let sut = create_test_app(MockWorkoutRepository::new());

        let response = sut
            .oneshot(get_request("/workout?date=2024-13-01"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_解釈できないクエリは400のproblem_detailsを返す() {
        let sut = create_test_app(MockWorkoutRepository::failing());

        let response = sut
            .oneshot(get_request("/workout?date=2024-01-01&date=2024-01-02"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response_body(response).await;
        assert_eq!(body.status, 400);
        assert!(body.detail.contains("date"), "detail: {}", body.detail);
    }

    // ===== シナリオ =====

    #[tokio::test]
    async fn test_同じ日に2回記録すると1件に集約される() {
        let sut = create_test_app(MockWorkoutRepository::new());

        // 1 回目: 作成
        let response = sut.clone().oneshot(post_json(json!({}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // 2 回目: 更新
        let response = sut
            .clone()
            .oneshot(post_json(json!({ "pushups": 15 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: ApiResponse<WorkoutDto> = response_body(response).await;
        assert_eq!(body.data, dto(Some(1), &today(), 15, 0, 0, 0.0));

        // 一覧は 1 件
        let response = sut.oneshot(get_request("/workouts")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: ApiResponse<Vec<WorkoutDto>> = response_body(response).await;
        assert_eq!(body.data, vec![dto(Some(1), &today(), 15, 0, 0, 0.0)]);
    }
}
