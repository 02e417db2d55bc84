//! # リポジトリ実装
//!
//! ドメインモデルを SQLite に永続化するトレイトと実装を提供する。
//!
//! ## 設計方針
//!
//! - **トレイト経由のアクセス**: ユースケース層は `Arc<dyn XxxRepository>` に依存し、
//!   テストではインメモリのモックに差し替える
//! - **書き込みは TxContext 必須**: 読み取りと書き込みを同じトランザクションで
//!   行う必要がある処理（日付単位の upsert）を型で表現する

pub mod task_repository;
pub mod workout_repository;

pub use task_repository::{SqliteTaskRepository, TaskRepository};
pub use workout_repository::{SqliteWorkoutRepository, WorkoutRepository};
