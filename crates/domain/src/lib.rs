//! # Dailylog ドメイン層
//!
//! 日々の記録（ワークアウト・タスク）のドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! core-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`workout`] - 日付単位のワークアウト記録と部分更新（パッチ）
//! - [`task`] - タスク
//! - [`clock`] - 時刻プロバイダ（「今日」の解決に使用）
//! - [`error`] - ドメインエラー
//!
//! ## 使用例
//!
//! ```rust
//! use dailylog_domain::workout::{WorkoutMetrics, WorkoutPatch};
//!
//! let patch = WorkoutPatch::new(Some(15), None, None, None)?;
//! let metrics = patch.apply_to(&WorkoutMetrics::zero());
//! assert_eq!(metrics.pushups(), 15);
//! assert_eq!(metrics.situps(), 0);
//! # Ok::<(), dailylog_domain::DomainError>(())
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod task;
pub mod workout;

pub use error::DomainError;
