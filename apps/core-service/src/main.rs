//! # Core Service サーバー
//!
//! ワークアウトとタスクを記録する HTTP サーバー。
//!
//! ## 役割
//!
//! - **ワークアウト**: 日付単位の記録（同じ日付への記録は 1 行に集約）
//! - **タスク**: やることリストの作成・一覧・削除
//! - **データ永続化**: ローカルの SQLite ファイル
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `APP_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `APP_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `DATABASE_URL` | No | SQLite 接続 URL（デフォルト: `sqlite://dailylog.db`） |
//! | `DATABASE_MAX_CONNECTIONS` | No | 最大接続数（デフォルト: `5`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p dailylog-core-service
//!
//! # ポートと DB ファイルを指定
//! APP_PORT=8080 DATABASE_URL=sqlite:///var/lib/dailylog/dailylog.db \
//!   cargo run -p dailylog-core-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use dailylog_core_service::{build_app, config::CoreConfig};
use dailylog_domain::clock::SystemClock;
use dailylog_infra::db;
use dailylog_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Core Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    init_tracing(TracingConfig::from_env("core-service"));
    let _tracing_guard = tracing::info_span!("app", service = "core-service").entered();

    // 設定読み込み
    let config = CoreConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Core Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!(database_url = %config.database_url, "データベースに接続しました");

    // マイグレーション実行
    db::run_migrations(&pool)
        .await
        .context("マイグレーションの実行に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    let app = build_app(pool.clone(), Arc::new(SystemClock));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Core Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 処理中のリクエストが終わってからプールを閉じる
    pool.close().await;
    tracing::info!("Core Service サーバーを停止しました");

    Ok(())
}

/// Ctrl+C を待つ
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "シグナルハンドラの登録に失敗しました");
        return;
    }
    tracing::info!("シャットダウンシグナルを受信しました");
}
