//! # ワークアウト
//!
//! 1 日 1 レコードの運動記録を表現するドメインモデル。
//!
//! ## 日付単位の集約
//!
//! 同じ日付への記録は新しい行を作らず、既存の行に集約される。
//! 日付（[`WorkoutDate`]）がビジネスキーであり、ストアが採番する
//! [`WorkoutId`] とは独立している。
//!
//! - 作成時: 指定されなかったメトリクスは 0 で埋める
//! - 更新時: 指定されたメトリクスのみ上書きし、他は保持する
//!
//! この 2 つの規則は [`WorkoutPatch`] に集約されている。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dailylog_domain::workout::{
//!     Workout, WorkoutDate, WorkoutId, WorkoutMetrics, WorkoutPatch,
//! };
//!
//! let date = WorkoutDate::parse("2024-01-01")?;
//! let existing = Workout::from_db(
//!     WorkoutId::new(1),
//!     date,
//!     WorkoutMetrics::new(10, 5, 0, 1.5)?,
//! );
//!
//! let patch = WorkoutPatch::new(Some(20), None, None, None)?;
//! let updated = existing.apply(&patch);
//!
//! assert_eq!(updated.metrics().pushups(), 20);
//! assert_eq!(updated.metrics().situps(), 5);
//! assert_eq!(updated.id(), existing.id());
//! # Ok(())
//! # }
//! ```

use std::fmt;

use chrono::NaiveDate;

use crate::{DomainError, clock::Clock};

define_integer_id! {
    /// ワークアウト記録の識別子（ストアが採番）
    pub struct WorkoutId;
}

// =========================================================================
// WorkoutDate（記録日）
// =========================================================================

/// 記録日（値オブジェクト）
///
/// 文字列表現は常に `YYYY-MM-DD`。DB の `workout.date` カラムにも
/// この形式で格納し、完全一致で検索する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkoutDate(NaiveDate);

impl WorkoutDate {
    /// 文字列表現のフォーマット
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// `YYYY-MM-DD` 形式の文字列をパースする
    ///
    /// `2024-1-1` のようなゼロ埋めなしの表記は、DB 上の完全一致検索で
    /// 別の日付として扱われるのを防ぐため拒否する。
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = || {
            DomainError::Validation(format!(
                "date は YYYY-MM-DD 形式である必要があります: {value}"
            ))
        };

        if value.len() != 10 {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(value, Self::FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// 入力値から記録日を解決する
    ///
    /// 未指定または空文字列（前後の空白のみを含む）の場合は
    /// `clock` のローカル日付（今日）を使う。
    pub fn resolve(value: Option<&str>, clock: &dyn Clock) -> Result<Self, DomainError> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self::parse(v),
            _ => Ok(Self(clock.today())),
        }
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for WorkoutDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

// =========================================================================
// WorkoutMetrics（メトリクス）
// =========================================================================

/// 1 日分のメトリクス（値オブジェクト）
///
/// # 不変条件
///
/// - 回数系（pushups / situps / squats）は 0 以上
/// - 距離（miles）は 0 以上の有限値
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutMetrics {
    pushups: i64,
    situps:  i64,
    squats:  i64,
    miles:   f64,
}

impl WorkoutMetrics {
    pub fn new(pushups: i64, situps: i64, squats: i64, miles: f64) -> Result<Self, DomainError> {
        Ok(Self {
            pushups: validate_count("pushups", pushups)?,
            situps:  validate_count("situps", situps)?,
            squats:  validate_count("squats", squats)?,
            miles:   validate_miles(miles)?,
        })
    }

    /// すべて 0 のメトリクス
    pub fn zero() -> Self {
        Self {
            pushups: 0,
            situps:  0,
            squats:  0,
            miles:   0.0,
        }
    }

    pub fn pushups(&self) -> i64 {
        self.pushups
    }

    pub fn situps(&self) -> i64 {
        self.situps
    }

    pub fn squats(&self) -> i64 {
        self.squats
    }

    pub fn miles(&self) -> f64 {
        self.miles
    }
}

fn validate_count(field: &str, value: i64) -> Result<i64, DomainError> {
    if value < 0 {
        return Err(DomainError::Validation(format!(
            "{field} は 0 以上である必要があります: {value}"
        )));
    }
    Ok(value)
}

fn validate_miles(value: f64) -> Result<f64, DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::Validation(format!(
            "miles は 0 以上の数値である必要があります: {value}"
        )));
    }
    Ok(value)
}

// =========================================================================
// WorkoutPatch（部分更新）
// =========================================================================

/// メトリクスの部分指定
///
/// `None` は「指定なし」を表す。日付はパッチに含めない
/// （記録日は更新対象ではないため）。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorkoutPatch {
    pushups: Option<i64>,
    situps:  Option<i64>,
    squats:  Option<i64>,
    miles:   Option<f64>,
}

impl WorkoutPatch {
    /// 指定された値を検証してパッチを作成する
    pub fn new(
        pushups: Option<i64>,
        situps: Option<i64>,
        squats: Option<i64>,
        miles: Option<f64>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            pushups: pushups.map(|v| validate_count("pushups", v)).transpose()?,
            situps:  situps.map(|v| validate_count("situps", v)).transpose()?,
            squats:  squats.map(|v| validate_count("squats", v)).transpose()?,
            miles:   miles.map(validate_miles).transpose()?,
        })
    }

    /// どのメトリクスも指定されていないか
    pub fn is_empty(&self) -> bool {
        self.pushups.is_none()
            && self.situps.is_none()
            && self.squats.is_none()
            && self.miles.is_none()
    }

    /// 指定されたメトリクスのみ `base` に上書きした値を返す
    ///
    /// 作成時は `WorkoutMetrics::zero()` を `base` にすることで
    /// 「未指定は 0」の規則になる。
    pub fn apply_to(&self, base: &WorkoutMetrics) -> WorkoutMetrics {
        WorkoutMetrics {
            pushups: self.pushups.unwrap_or(base.pushups),
            situps:  self.situps.unwrap_or(base.situps),
            squats:  self.squats.unwrap_or(base.squats),
            miles:   self.miles.unwrap_or(base.miles),
        }
    }
}

// =========================================================================
// Workout（ワークアウトエンティティ）
// =========================================================================

/// 永続化済みのワークアウト記録
///
/// # 不変条件
///
/// - `id` と `date` は作成後に変わらない
/// - 同じ `date` を持つ記録は高々 1 件（DB の UNIQUE 制約とユースケースで保証）
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id:      WorkoutId,
    date:    WorkoutDate,
    metrics: WorkoutMetrics,
}

impl Workout {
    /// データベースから復元する
    pub fn from_db(id: WorkoutId, date: WorkoutDate, metrics: WorkoutMetrics) -> Self {
        Self { id, date, metrics }
    }

    /// パッチを適用した新インスタンスを返す
    ///
    /// `id` と `date` は保持され、指定されたメトリクスのみ変わる。
    pub fn apply(&self, patch: &WorkoutPatch) -> Self {
        Self {
            id:      self.id,
            date:    self.date,
            metrics: patch.apply_to(&self.metrics),
        }
    }

    pub fn id(&self) -> WorkoutId {
        self.id
    }

    pub fn date(&self) -> WorkoutDate {
        self.date
    }

    pub fn metrics(&self) -> &WorkoutMetrics {
        &self.metrics
    }
}

/// 挿入前のワークアウト（ID 未採番）
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub date:    WorkoutDate,
    pub metrics: WorkoutMetrics,
}

impl NewWorkout {
    /// パッチから新規記録を作る（未指定のメトリクスは 0）
    pub fn from_patch(date: WorkoutDate, patch: &WorkoutPatch) -> Self {
        Self {
            date,
            metrics: patch.apply_to(&WorkoutMetrics::zero()),
        }
    }

    /// 採番された ID を付与して永続化済みの記録にする
    pub fn into_workout(self, id: WorkoutId) -> Workout {
        Workout::from_db(id, self.date, self.metrics)
    }
}

// =========================================================================
// DailyWorkout（日付指定の読み取り結果）
// =========================================================================

/// 日付指定で取得したワークアウト
///
/// 記録がない日は「まだ何もしていない」という正常な状態であり、
/// エラーではなく [`DailyWorkout::Empty`]（すべて 0 の記録）として扱う。
#[derive(Debug, Clone, PartialEq)]
pub enum DailyWorkout {
    /// 記録済み
    Recorded(Workout),
    /// 記録なし（ゼロレコード）
    Empty(WorkoutDate),
}

impl DailyWorkout {
    /// 記録済みなら ID を返す
    pub fn id(&self) -> Option<WorkoutId> {
        match self {
            Self::Recorded(w) => Some(w.id()),
            Self::Empty(_) => None,
        }
    }

    pub fn date(&self) -> WorkoutDate {
        match self {
            Self::Recorded(w) => w.date(),
            Self::Empty(date) => *date,
        }
    }

    pub fn metrics(&self) -> WorkoutMetrics {
        match self {
            Self::Recorded(w) => *w.metrics(),
            Self::Empty(_) => WorkoutMetrics::zero(),
        }
    }
}
