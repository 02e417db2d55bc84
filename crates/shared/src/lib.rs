//! # Dailylog 共有ユーティリティ
//!
//! Dailylog の全クレートから利用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - domain / infra / core-service のいずれからも依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（`IntoResponse` 変換は各サービスの責務）

pub mod api_response;
pub mod error_response;
pub mod health;
pub mod observability;

pub use api_response::ApiResponse;
pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
