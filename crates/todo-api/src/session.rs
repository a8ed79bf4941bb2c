use axum::http::{header, HeaderMap};
use domain::Session;
use shared::SessionKeys;
use tracing::warn;

/// セッショントークンを載せる Cookie 名
pub const SESSION_COOKIE: &str = "todo.session-token";

/// リクエストヘッダから現在のセッションを取得
///
/// `Authorization: Bearer` を優先し、なければ Cookie を見る。
/// 不正・期限切れのトークンは未ログインとして扱う。
pub fn current_session(keys: &SessionKeys, headers: &HeaderMap) -> Option<Session> {
    let token = bearer_token(headers).or_else(|| cookie_token(headers))?;

    match keys.verify(token) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(error = %e, "ignoring invalid session token");
            None
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|token| !token.is_empty())
}
