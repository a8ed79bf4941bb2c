use crate::errors::DomainError;
use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Todo 識別子（ストアが作成時に ULID で払い出す）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// 永続化済みの値から復元します。ULID として解釈できない値は拒否します。
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        ulid::Ulid::from_string(id)
            .map(|ulid| Self(ulid.to_string()))
            .map_err(|_| DomainError::InvalidTodoId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn timestamp_ms(&self) -> Option<u64> {
        ulid::Ulid::from_string(&self.0)
            .ok()
            .map(|ulid| ulid.timestamp_ms())
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Todo の状態。現状サーバーが書き込むのは `Incomplete` のみ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum TodoStatus {
    #[default]
    Incomplete,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Incomplete => "incomplete",
        }
    }
}

impl FromStr for TodoStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(TodoStatus::Incomplete),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// 検証済みの本文。空文字・空白のみは構築できない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoContent(String);

impl TodoContent {
    /// 本文は前後の空白も含めてそのまま保持します。
    pub fn parse(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::Validation(
                "content must not be empty".to_string(),
            ));
        }
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// 永続化済みの Todo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub content: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

/// ストアに渡す作成要求。サーバー側のフィールドはすべてここで確定する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub content: TodoContent,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

impl NewTodo {
    /// 所有者と作成時刻をサーバー側で刻印します。
    pub fn stamped(content: TodoContent, owner: &UserId, now: DateTime<Utc>) -> Self {
        Self {
            content,
            status: TodoStatus::Incomplete,
            created_at: now,
            user_id: owner.clone(),
        }
    }

    /// ストアが払い出した ID を付与して確定します。
    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            content: self.content.into_inner(),
            status: self.status,
            created_at: self.created_at,
            user_id: self.user_id,
        }
    }
}
