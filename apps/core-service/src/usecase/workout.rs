//! ワークアウトユースケース
//!
//! 1 日 1 レコードのワークアウト記録を upsert・取得する。
//!
//! ## upsert の手順
//!
//! 1. 記録日を解決する（未指定・空文字列は今日）
//! 2. トランザクション内で同じ日付の記録を検索する
//! 3. 見つかれば指定されたメトリクスのみ上書きして 1 回の UPDATE で書き込む
//! 4. 見つからなければ未指定のメトリクスを 0 として INSERT する
//!
//! 同じ日付の同時作成で一意制約違反になった場合は、もう 1 度だけ
//! 最初からやり直す（2 回目は既存行の更新になる）。

use std::sync::Arc;

use dailylog_domain::{
    clock::Clock,
    workout::{DailyWorkout, NewWorkout, Workout, WorkoutDate, WorkoutPatch},
};
use dailylog_infra::{TransactionManager, repository::WorkoutRepository};

use crate::error::CoreError;

/// upsert の入力
#[derive(Debug, Clone, Default)]
pub struct UpsertWorkoutInput {
    /// 記録日（`YYYY-MM-DD`）。未指定・空文字列は今日
    pub date:  Option<String>,
    /// 指定されたメトリクス
    pub patch: WorkoutPatch,
}

/// upsert の結果種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// 新しい日付の記録を作成した
    Created,
    /// 既存の記録を更新した
    Updated,
}

/// ワークアウトユースケース
pub struct WorkoutUseCaseImpl {
    workout_repo: Arc<dyn WorkoutRepository>,
    tx_manager:   Arc<dyn TransactionManager>,
    clock:        Arc<dyn Clock>,
}

impl WorkoutUseCaseImpl {
    pub fn new(
        workout_repo: Arc<dyn WorkoutRepository>,
        tx_manager: Arc<dyn TransactionManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            workout_repo,
            tx_manager,
            clock,
        }
    }

    /// 日付単位でワークアウトを作成または更新する
    ///
    /// 日付の検証はストアへのアクセス前に行う。
    pub async fn upsert_workout(
        &self,
        input: UpsertWorkoutInput,
    ) -> Result<(Workout, UpsertOutcome), CoreError> {
        let date = WorkoutDate::resolve(input.date.as_deref(), self.clock.as_ref())?;

        match self.try_upsert(date, &input.patch).await {
            Err(CoreError::Database(e)) if e.is_conflict() => {
                tracing::warn!(%date, "同じ日付の記録が同時に作成されたため再試行します");
                self.try_upsert(date, &input.patch).await
            }
            result => result,
        }
    }

    async fn try_upsert(
        &self,
        date: WorkoutDate,
        patch: &WorkoutPatch,
    ) -> Result<(Workout, UpsertOutcome), CoreError> {
        let mut tx = self.tx_manager.begin().await?;

        let result = match self.workout_repo.find_by_date_in_tx(&mut tx, date).await? {
            Some(existing) => {
                let updated = existing.apply(patch);
                // 何も指定されていなければ書き込みは不要
                if !patch.is_empty() {
                    self.workout_repo.update(&mut tx, &updated).await?;
                }
                (updated, UpsertOutcome::Updated)
            }
            None => {
                let created = self
                    .workout_repo
                    .insert(&mut tx, &NewWorkout::from_patch(date, patch))
                    .await?;
                (created, UpsertOutcome::Created)
            }
        };

        tx.commit().await?;

        tracing::debug!(
            id = %result.0.id(),
            %date,
            outcome = ?result.1,
            "ワークアウトを保存しました"
        );
        Ok(result)
    }

    /// 指定日のワークアウトを取得する
    ///
    /// 記録がない日は、その日付のゼロレコードを返す。
    pub async fn get_workout_by_date(
        &self,
        date: Option<&str>,
    ) -> Result<DailyWorkout, CoreError> {
        let date = WorkoutDate::resolve(date, self.clock.as_ref())?;

        Ok(match self.workout_repo.find_by_date(date).await? {
            Some(workout) => DailyWorkout::Recorded(workout),
            None => DailyWorkout::Empty(date),
        })
    }

    /// 全ワークアウトを ID 順で取得する
    pub async fn list_workouts(&self) -> Result<Vec<Workout>, CoreError> {
        Ok(self.workout_repo.find_all().await?)
    }
}
