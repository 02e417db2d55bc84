//! # Dailylog インフラ層
//!
//! SQLite への接続とリポジトリ実装を担当する。
//!
//! ## 設計方針
//!
//! ドメイン層のエンティティを永続化するリポジトリトレイトと、その
//! SQLite 実装を提供する。ユースケース層はトレイト経由でのみ
//! ストアにアクセスし、`SqlitePool` に直接触れない。
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、マイグレーション、トランザクション
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリトレイトと SQLite 実装
//! - `mock` - インメモリモック（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use dailylog_infra::{db, repository::SqliteWorkoutRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("sqlite://dailylog.db", 5).await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let workouts = SqliteWorkoutRepository::new(pool.clone());
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use db::{SqliteTransactionManager, TransactionManager, TxContext};
pub use error::{InfraError, InfraErrorKind};
