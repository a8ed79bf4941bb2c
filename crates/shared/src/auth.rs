use crate::errors::AppError;
use chrono::{DateTime, Duration, Utc};
use domain::{Session, User, UserId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// セッショントークンのクレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// ユーザーID
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// アバター画像 URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn into_session(self) -> Result<Session, AppError> {
        let id = UserId::parse(self.sub)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;
        let expires = DateTime::from_timestamp(self.exp, 0)
            .ok_or_else(|| AppError::Unauthorized(format!("invalid exp: {}", self.exp)))?;

        Ok(Session {
            user: User {
                id,
                name: self.name,
                image: self.picture,
            },
            expires,
        })
    }
}

/// HS256 セッショントークンの署名・検証鍵
///
/// 発行は本来 ID プロバイダ側の責務。`issue` はテストとローカル検証用。
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// 指定ユーザーのトークンを発行
    pub fn issue(&self, user: &User, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.as_str().to_string(),
            name: user.name.clone(),
            picture: user.image.clone(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token encode: {e}")))
    }

    /// トークンを検証してセッションを復元
    pub fn verify(&self, token: &str) -> Result<Session, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| AppError::Unauthorized(format!("invalid session token: {e}")))?;
        data.claims.into_session()
    }
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKeys(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: UserId::parse("u1").unwrap(),
            name: Some("Alice".into()),
            image: Some("https://cdn.example.com/a.png".into()),
        }
    }

    #[test]
    fn issued_token_verifies_to_same_user() {
        let keys = SessionKeys::from_secret(b"secret");
        let token = keys.issue(&alice(), Duration::hours(1)).unwrap();

        let session = keys.verify(&token).unwrap();
        assert_eq!(session.user, alice());
        assert!(session.expires > Utc::now());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = SessionKeys::from_secret(b"other")
            .issue(&alice(), Duration::hours(1))
            .unwrap();

        let err = SessionKeys::from_secret(b"secret").verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::from_secret(b"secret");
        let token = keys.issue(&alice(), Duration::hours(-2)).unwrap();

        assert!(matches!(keys.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = SessionKeys::from_secret(b"secret");
        assert!(keys.verify("not.a.jwt").is_err());
        assert!(keys.verify("").is_err());
    }

    #[test]
    fn blank_subject_is_rejected() {
        let claims = Claims {
            sub: " ".into(),
            name: None,
            picture: None,
            exp: Utc::now().timestamp() + 60,
            iat: Utc::now().timestamp(),
        };
        assert!(matches!(claims.into_session(), Err(AppError::Unauthorized(_))));
    }
}
