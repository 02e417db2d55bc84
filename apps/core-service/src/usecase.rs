//! # ユースケース層
//!
//! Core Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・時計・トランザクション管理を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - `workout`: 日付単位のワークアウト記録（upsert・取得・一覧）
//! - `task`: タスクの作成・一覧・削除

pub mod task;
pub mod workout;

pub use task::TaskUseCaseImpl;
pub use workout::{UpsertOutcome, UpsertWorkoutInput, WorkoutUseCaseImpl};
