//! # Core Service ライブラリ
//!
//! Core Service の設定・ユースケース・ハンドラ・ルーター構築を公開する。
//! バイナリ（`main.rs`）と結合テストの両方から利用する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;

pub use app_builder::build_app;
