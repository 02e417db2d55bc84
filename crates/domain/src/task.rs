//! # タスク
//!
//! やることリストの 1 項目。説明文のみを持つ。

use std::fmt;

use crate::DomainError;

define_integer_id! {
    /// タスクの識別子（ストアが採番）
    pub struct TaskId;
}

/// 説明文の最大文字数
const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// タスクの説明文（値オブジェクト）
///
/// # 不変条件
///
/// - 前後の空白を除いて空ではない
/// - 最大 1000 文字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescription(String);

impl TaskDescription {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "description は必須です".to_string(),
            ));
        }

        if value.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(DomainError::Validation(format!(
                "description は {MAX_DESCRIPTION_LENGTH} 文字以内である必要があります"
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// タスクエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id:          TaskId,
    description: TaskDescription,
}

impl Task {
    pub fn from_db(id: TaskId, description: TaskDescription) -> Self {
        Self { id, description }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &TaskDescription {
        &self.description
    }
}
