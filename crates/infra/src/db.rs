//! # SQLite データベース接続管理
//!
//! 接続プールの作成、マイグレーション、トランザクションを管理する。
//!
//! ## 設計方針
//!
//! - **明示的なライフサイクル**: プールは `main` で 1 度だけ作成し、
//!   リポジトリに注入する。終了時は `SqlitePool::close` で閉じる
//! - **sqlx 採用**: 非同期サポート、パラメータバインドによる安全なクエリ
//! - **書き込みはトランザクション必須**: [`TxContext`] を書き込みメソッドの
//!   引数に要求し、トランザクションなしの書き込みをコンパイルエラーにする
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use dailylog_infra::db;
//!
//! async fn example() -> Result<(), sqlx::Error> {
//!     let pool = db::create_pool("sqlite://dailylog.db", 5).await?;
//!
//!     let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workout")
//!         .fetch_one(&pool)
//!         .await?;
//!
//!     pool.close().await;
//!     Ok(())
//! }
//! ```

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::{
    Sqlite,
    SqliteConnection,
    SqlitePool,
    Transaction,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::error::InfraError;

/// ロック待ちの上限
///
/// SQLite は書き込みを直列化するため、同時書き込みはこの時間まで待機する。
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// 書き込みトランザクションの開始文
const BEGIN_WRITE_TRANSACTION: &str = "BEGIN IMMEDIATE";

/// 接続 URL から接続オプションを組み立てる
///
/// - ファイルが存在しなければ作成する
/// - WAL モードで読み取りと書き込みの競合を減らす
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT))
}

/// SQLite 接続プールを作成する
///
/// アプリケーション起動時に一度だけ呼び出し、作成したプールを
/// リポジトリ間で共有する（`SqlitePool` の clone は参照カウントの増加のみ）。
///
/// # 引数
///
/// * `database_url` - 例: `sqlite://dailylog.db`、`sqlite::memory:`
/// * `max_connections` - 最大接続数
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options(database_url)?)
        .await
}

/// インメモリ SQLite の接続プールを作成する
///
/// インメモリ DB は接続ごとに別のデータベースになるため、接続数を 1 に固定し、
/// アイドル切断でデータが消えないようにタイムアウトを無効化する。
/// テストやローカルでの動作確認に使用する。
pub async fn create_in_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
        .await
}

/// データベースマイグレーションを実行する
///
/// `sqlx::migrate!()` マクロで埋め込まれたマイグレーションファイルを
/// 順番に適用する。適用済みのマイグレーションはスキップされる。
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// データベースへの疎通を確認する（readiness check 用）
pub async fn ping(pool: &SqlitePool) -> Result<(), InfraError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

// =============================================================================
// TxContext
// =============================================================================

/// トランザクションコンテキスト
///
/// 書き込みリポジトリメソッドの必須引数。
///
/// # ライフサイクル
///
/// 1. `TransactionManager::begin()` で作成
/// 2. 読み取り・書き込みメソッドに `&mut TxContext` として渡す
/// 3. `commit()` でコミット、またはドロップでロールバック
pub struct TxContext(TxContextInner);

enum TxContextInner {
    Sqlite(Transaction<'static, Sqlite>),
    #[cfg(any(test, feature = "test-utils"))]
    Mock,
}

impl TxContext {
    /// SQLite トランザクションを開始する
    ///
    /// `BEGIN IMMEDIATE` で開始時に書き込みロックを取得する。他の接続が
    /// 書き込み中であれば [`BUSY_TIMEOUT`] まで待機するため、読み取り後の
    /// 書き込みが `SQLITE_BUSY` で失敗することはない。
    ///
    /// ユースケース層は `TransactionManager` trait 経由で TxContext を取得する。
    pub(crate) async fn begin_sqlite(pool: &SqlitePool) -> Result<Self, InfraError> {
        Ok(Self(TxContextInner::Sqlite(
            pool.begin_with(BEGIN_WRITE_TRANSACTION).await?,
        )))
    }

    /// テスト用のモック TxContext を作成する
    ///
    /// Mock リポジトリはインメモリ実装のため、実際のトランザクションは不要。
    #[cfg(any(test, feature = "test-utils"))]
    pub fn mock() -> Self {
        Self(TxContextInner::Mock)
    }

    /// トランザクションをコミットする
    ///
    /// 呼ばずにドロップすると、sqlx が自動的にロールバックする。
    pub async fn commit(self) -> Result<(), InfraError> {
        match self.0 {
            TxContextInner::Sqlite(tx) => {
                tx.commit().await?;
                Ok(())
            }
            #[cfg(any(test, feature = "test-utils"))]
            TxContextInner::Mock => Ok(()),
        }
    }

    /// トランザクション内の DB コネクションを取得する
    ///
    /// SQLite リポジトリ実装が `.execute(tx.conn())` として使用する。
    pub(crate) fn conn(&mut self) -> &mut SqliteConnection {
        match &mut self.0 {
            TxContextInner::Sqlite(tx) => tx,
            #[cfg(any(test, feature = "test-utils"))]
            TxContextInner::Mock => {
                panic!("BUG: conn() called on Mock TxContext. Mock repos should not call conn().")
            }
        }
    }
}

// =============================================================================
// TransactionManager
// =============================================================================

/// トランザクション管理 trait
///
/// ユースケース層は SqlitePool に直接依存せず、この trait 経由で
/// トランザクションを開始する。
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<TxContext, InfraError>;
}

/// SQLite 用 TransactionManager 実装
#[derive(Debug, Clone)]
pub struct SqliteTransactionManager {
    pool: SqlitePool,
}

impl SqliteTransactionManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for SqliteTransactionManager {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn begin(&self) -> Result<TxContext, InfraError> {
        TxContext::begin_sqlite(&self.pool).await
    }
}
