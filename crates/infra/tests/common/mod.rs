//! テスト共通フィクスチャ
//!
//! マイグレーションを適用したプール（インメモリ / 一時ファイル）と、
//! ドメインオブジェクト生成ヘルパーを提供する。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use dailylog_domain::workout::{WorkoutDate, WorkoutMetrics, WorkoutPatch};
use dailylog_infra::db;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// マイグレーション適用済みのインメモリプールを作成する
pub async fn setup_pool() -> SqlitePool {
    let pool = db::create_in_memory_pool().await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

/// マイグレーション適用済みのファイル DB プールを作成する
///
/// インメモリプールは接続が 1 本のため、複数接続からの同時書き込みを
/// 検証するテストではこちらを使う。`TempDir` をドロップすると DB ファイルも消える。
pub async fn setup_file_pool(max_connections: u32) -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("dailylog.db").display());
    let pool = db::create_pool(&url, max_connections).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    (dir, pool)
}

pub fn date(s: &str) -> WorkoutDate {
    WorkoutDate::parse(s).unwrap()
}

pub fn metrics(pushups: i64, situps: i64, squats: i64, miles: f64) -> WorkoutMetrics {
    WorkoutMetrics::new(pushups, situps, squats, miles).unwrap()
}

pub fn pushups_only(pushups: i64) -> WorkoutPatch {
    WorkoutPatch::new(Some(pushups), None, None, None).unwrap()
}
