//! # テスト用モックリポジトリ
//!
//! ユースケーステスト・ハンドラテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! dailylog-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! モックはトランザクションを持たないため、書き込みは即座に反映される。

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicBool, AtomicI64, Ordering},
};

use async_trait::async_trait;
use dailylog_domain::{
    task::{Task, TaskDescription, TaskId},
    workout::{NewWorkout, Workout, WorkoutDate, WorkoutId, WorkoutMetrics},
};

use crate::{
    db::{TransactionManager, TxContext},
    error::InfraError,
    repository::{TaskRepository, WorkoutRepository},
};

// ===== MockTransactionManager =====

/// 常に Mock の TxContext を返す TransactionManager
#[derive(Clone, Default)]
pub struct MockTransactionManager;

#[async_trait]
impl TransactionManager for MockTransactionManager {
    async fn begin(&self) -> Result<TxContext, InfraError> {
        Ok(TxContext::mock())
    }
}

// ===== MockWorkoutRepository =====

#[derive(Clone, Default)]
pub struct MockWorkoutRepository {
    workouts:         Arc<Mutex<Vec<Workout>>>,
    next_id:          Arc<AtomicI64>,
    failing:          Arc<AtomicBool>,
    race_next_insert: Arc<AtomicBool>,
}

impl MockWorkoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全操作がデータベースエラーを返すモック
    pub fn failing() -> Self {
        let repo = Self::default();
        repo.failing.store(true, Ordering::SeqCst);
        repo
    }

    /// 次の insert の直前に、同じ日付の記録を別リクエストが作成した状態を再現する
    ///
    /// insert は Conflict を返し、記録（全メトリクス 0）が残る。
    pub fn race_on_next_insert(&self) {
        self.race_next_insert.store(true, Ordering::SeqCst);
    }

    /// 既存の記録を追加する（ID は自動採番）
    pub fn add_workout(&self, date: WorkoutDate, metrics: WorkoutMetrics) -> Workout {
        let workout = Workout::from_db(self.next_id(), date, metrics);
        self.workouts.lock().unwrap().push(workout.clone());
        workout
    }

    /// 保存されている全記録のスナップショット
    pub fn snapshot(&self) -> Vec<Workout> {
        self.workouts.lock().unwrap().clone()
    }

    fn next_id(&self) -> WorkoutId {
        WorkoutId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn check_failing(&self) -> Result<(), InfraError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }

    fn find(&self, date: WorkoutDate) -> Option<Workout> {
        self.workouts
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.date() == date)
            .cloned()
    }
}

#[async_trait]
impl WorkoutRepository for MockWorkoutRepository {
    async fn find_all(&self) -> Result<Vec<Workout>, InfraError> {
        self.check_failing()?;
        let mut all = self.snapshot();
        all.sort_by_key(Workout::id);
        Ok(all)
    }

    async fn find_by_date(&self, date: WorkoutDate) -> Result<Option<Workout>, InfraError> {
        self.check_failing()?;
        Ok(self.find(date))
    }

    async fn find_by_date_in_tx(
        &self,
        _tx: &mut TxContext,
        date: WorkoutDate,
    ) -> Result<Option<Workout>, InfraError> {
        self.check_failing()?;
        Ok(self.find(date))
    }

    async fn insert(
        &self,
        _tx: &mut TxContext,
        workout: &NewWorkout,
    ) -> Result<Workout, InfraError> {
        self.check_failing()?;

        if self.race_next_insert.swap(false, Ordering::SeqCst) {
            self.add_workout(workout.date, WorkoutMetrics::zero());
        }

        if self.find(workout.date).is_some() {
            return Err(InfraError::conflict("Workout", workout.date.to_string()));
        }

        let created = workout.clone().into_workout(self.next_id());
        self.workouts.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, _tx: &mut TxContext, workout: &Workout) -> Result<(), InfraError> {
        self.check_failing()?;

        let mut workouts = self.workouts.lock().unwrap();
        let Some(stored) = workouts.iter_mut().find(|w| w.id() == workout.id()) else {
            return Err(InfraError::conflict("Workout", workout.id().to_string()));
        };
        *stored = workout.clone();
        Ok(())
    }
}

// ===== MockTaskRepository =====

#[derive(Clone, Default)]
pub struct MockTaskRepository {
    tasks:   Arc<Mutex<Vec<Task>>>,
    next_id: Arc<AtomicI64>,
    failing: Arc<AtomicBool>,
}

impl MockTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全操作がデータベースエラーを返すモック
    pub fn failing() -> Self {
        let repo = Self::default();
        repo.failing.store(true, Ordering::SeqCst);
        repo
    }

    pub fn add_task(&self, description: &str) -> Task {
        let task = Task::from_db(
            self.next_id(),
            TaskDescription::new(description).unwrap(),
        );
        self.tasks.lock().unwrap().push(task.clone());
        task
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    fn next_id(&self) -> TaskId {
        TaskId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn check_failing(&self) -> Result<(), InfraError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn find_all(&self) -> Result<Vec<Task>, InfraError> {
        self.check_failing()?;
        Ok(self.snapshot())
    }

    async fn insert(
        &self,
        _tx: &mut TxContext,
        description: &TaskDescription,
    ) -> Result<Task, InfraError> {
        self.check_failing()?;
        let task = Task::from_db(self.next_id(), description.clone());
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn delete(&self, _tx: &mut TxContext, id: TaskId) -> Result<bool, InfraError> {
        self.check_failing()?;
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.id() != id);
        Ok(tasks.len() < before)
    }
}
