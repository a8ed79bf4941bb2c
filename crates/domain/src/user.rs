use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 認証プロバイダが払い出すユーザー識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// 空文字列は拒否します。
    pub fn parse(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidUserId("empty user id".to_string()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// セッションが指すユーザー（Todo サービスからは読み取り専用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// 表示名
    pub name: Option<String>,
    /// アバター画像 URL
    pub image: Option<String>,
}

/// 検証済みのセッション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub expires: DateTime<Utc>,
}

impl Session {
    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_blank() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("   ").is_err());
        assert_eq!(UserId::parse("u1").unwrap().as_str(), "u1");
    }

    #[test]
    fn session_serializes_user_fields() {
        let session = Session {
            user: User {
                id: UserId::parse("u1").unwrap(),
                name: Some("Alice".into()),
                image: None,
            },
            expires: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["user"]["id"], "u1");
        assert_eq!(json["user"]["name"], "Alice");
        assert!(json["user"]["image"].is_null());
        assert_eq!(json["expires"], "2023-11-14T22:13:20Z");
    }
}
