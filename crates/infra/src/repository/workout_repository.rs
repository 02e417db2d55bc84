//! # WorkoutRepository
//!
//! 日付単位のワークアウト記録を永続化するリポジトリ。
//!
//! ## 設計方針
//!
//! - **日付がビジネスキー**: `workout.date` に UNIQUE 制約を持ち、
//!   検索は `YYYY-MM-DD` 文字列の完全一致で行う
//! - **行全体の書き込み**: 更新はマージ済みの [`Workout`] をそのまま書き込む。
//!   メトリクスごとの個別 UPDATE は行わない
//! - **一意制約違反は Conflict**: 同じ日付の同時作成で負けた側は
//!   [`InfraError::conflict`] を受け取り、ユースケース層で再試行する

use async_trait::async_trait;
use dailylog_domain::workout::{NewWorkout, Workout, WorkoutDate, WorkoutId, WorkoutMetrics};
use sqlx::SqlitePool;

use crate::{db::TxContext, error::InfraError};

/// ワークアウトリポジトリトレイト
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// 全記録を ID 順で取得する
    async fn find_all(&self) -> Result<Vec<Workout>, InfraError>;

    /// 日付で記録を検索する
    async fn find_by_date(&self, date: WorkoutDate) -> Result<Option<Workout>, InfraError>;

    /// トランザクション内で日付検索する
    ///
    /// upsert の読み取りと書き込みを同じトランザクションで行うために使う。
    async fn find_by_date_in_tx(
        &self,
        tx: &mut TxContext,
        date: WorkoutDate,
    ) -> Result<Option<Workout>, InfraError>;

    /// 記録を挿入し、採番された ID 付きの記録を返す
    ///
    /// 同じ日付の記録が既に存在する場合は Conflict を返す。
    async fn insert(
        &self,
        tx: &mut TxContext,
        workout: &NewWorkout,
    ) -> Result<Workout, InfraError>;

    /// 記録のメトリクスを 1 回の UPDATE で書き込む
    async fn update(&self, tx: &mut TxContext, workout: &Workout) -> Result<(), InfraError>;
}

/// DB の workout テーブルの行
#[derive(sqlx::FromRow)]
struct WorkoutRow {
    id:      i64,
    date:    String,
    pushups: i64,
    situps:  i64,
    squats:  i64,
    miles:   f64,
}

impl TryFrom<WorkoutRow> for Workout {
    type Error = InfraError;

    fn try_from(row: WorkoutRow) -> Result<Self, Self::Error> {
        let date = WorkoutDate::parse(&row.date)
            .map_err(|e| InfraError::unexpected(format!("不正な日付: {e}")))?;
        let metrics = WorkoutMetrics::new(row.pushups, row.situps, row.squats, row.miles)
            .map_err(|e| InfraError::unexpected(e.to_string()))?;

        Ok(Workout::from_db(WorkoutId::new(row.id), date, metrics))
    }
}

const FIND_ALL_SQL: &str = r#"
    SELECT id, date, pushups, situps, squats, miles
    FROM workout
    ORDER BY id
"#;

const FIND_BY_DATE_SQL: &str = r#"
    SELECT id, date, pushups, situps, squats, miles
    FROM workout
    WHERE date = ?
"#;

/// SQLite 実装の WorkoutRepository
#[derive(Debug, Clone)]
pub struct SqliteWorkoutRepository {
    pool: SqlitePool,
}

impl SqliteWorkoutRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkoutRepository for SqliteWorkoutRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Workout>, InfraError> {
        let rows: Vec<WorkoutRow> = sqlx::query_as(FIND_ALL_SQL)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Workout::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%date))]
    async fn find_by_date(&self, date: WorkoutDate) -> Result<Option<Workout>, InfraError> {
        let row: Option<WorkoutRow> = sqlx::query_as(FIND_BY_DATE_SQL)
            .bind(date.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Workout::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%date))]
    async fn find_by_date_in_tx(
        &self,
        tx: &mut TxContext,
        date: WorkoutDate,
    ) -> Result<Option<Workout>, InfraError> {
        let row: Option<WorkoutRow> = sqlx::query_as(FIND_BY_DATE_SQL)
            .bind(date.to_string())
            .fetch_optional(tx.conn())
            .await?;

        row.map(Workout::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(date = %workout.date))]
    async fn insert(
        &self,
        tx: &mut TxContext,
        workout: &NewWorkout,
    ) -> Result<Workout, InfraError> {
        let date = workout.date.to_string();
        let metrics = workout.metrics;

        let result = sqlx::query(
            r#"
            INSERT INTO workout (date, pushups, situps, squats, miles)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(date.as_str())
        .bind(metrics.pushups())
        .bind(metrics.situps())
        .bind(metrics.squats())
        .bind(metrics.miles())
        .execute(tx.conn())
        .await
        .map_err(|e| InfraError::from_write(e, "Workout", date.as_str()))?;

        Ok(workout
            .clone()
            .into_workout(WorkoutId::new(result.last_insert_rowid())))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %workout.id(), date = %workout.date()))]
    async fn update(&self, tx: &mut TxContext, workout: &Workout) -> Result<(), InfraError> {
        let metrics = workout.metrics();

        let result = sqlx::query(
            r#"
            UPDATE workout SET
               pushups = ?,
               situps = ?,
               squats = ?,
               miles = ?
            WHERE id = ?
            "#,
        )
        .bind(metrics.pushups())
        .bind(metrics.situps())
        .bind(metrics.squats())
        .bind(metrics.miles())
        .bind(workout.id().as_i64())
        .execute(tx.conn())
        .await
        .map_err(|e| InfraError::from_write(e, "Workout", workout.date().to_string()))?;

        if result.rows_affected() == 0 {
            return Err(InfraError::conflict("Workout", workout.id().to_string()));
        }

        Ok(())
    }
}
