//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケース層に委譲

pub mod health;
pub mod task;
pub mod workout;

pub use health::{ReadinessState, health_check, readiness_check};
pub use task::{TaskState, create_task, delete_task, list_tasks};
pub use workout::{WorkoutState, get_workout, list_workouts, upsert_workout};
