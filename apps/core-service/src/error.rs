//! # Core Service エラー定義
//!
//! Core Service 固有のエラーと、HTTP レスポンスへの変換を定義する。

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dailylog_domain::DomainError;
use dailylog_infra::InfraError;
use dailylog_shared::ErrorResponse;
use thiserror::Error;

/// Core Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// データベースエラー
    ///
    /// メッセージは [`InfraError`] のものをそのまま使う。
    #[error(transparent)]
    Database(#[from] InfraError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => CoreError::BadRequest(msg),
            DomainError::NotFound { .. } => CoreError::NotFound(err.to_string()),
        }
    }
}

/// JSON ボディの構文エラー・型エラー・未知のキーはすべて 400 として扱う
impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

/// クエリパラメータのデシリアライズ失敗も 400 の problem details で返す
impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let body = match &self {
            CoreError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
            CoreError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            CoreError::Database(e) => {
                tracing::error!(
                    error = %e,
                    span_trace = %e.span_trace(),
                    "データベースエラー"
                );
                ErrorResponse::internal_error()
            }
            CoreError::Internal(msg) => {
                tracing::error!("内部エラー: {}", msg);
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use rstest::rstest;

    use super::*;

    async fn into_problem(err: CoreError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(CoreError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST)]
    #[case(CoreError::NotFound("x".to_string()), StatusCode::NOT_FOUND)]
    #[case(CoreError::Internal("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[tokio::test]
    async fn test_エラー種別ごとのステータスコード(
        #[case] err: CoreError,
        #[case] expected: StatusCode,
    ) {
        let (status, body) = into_problem(err).await;

        assert_eq!(status, expected);
        assert_eq!(body.status, expected.as_u16());
    }

    #[tokio::test]
    async fn test_データベースエラーは詳細を隠して500を返す() {
        let err = CoreError::from(InfraError::unexpected("disk I/O error"));

        let (status, body) = into_problem(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, "内部エラーが発生しました");
    }

    #[test]
    fn test_データベースエラーのメッセージは二重に前置きされない() {
        let infra = InfraError::conflict("Workout", "2024-01-01");
        let expected = infra.to_string();

        let err = CoreError::from(infra);

        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_バリデーションエラーはbad_requestに変換される() {
        let err = CoreError::from(DomainError::Validation("pushups は 0 以上".to_string()));

        assert!(matches!(err, CoreError::BadRequest(msg) if msg == "pushups は 0 以上"));
    }

    #[test]
    fn test_not_foundはnot_foundに変換される() {
        let err = CoreError::from(DomainError::NotFound {
            entity_type: "Task",
            id:          "42".to_string(),
        });

        assert!(matches!(err, CoreError::NotFound(msg) if msg.contains("42")));
    }
}
