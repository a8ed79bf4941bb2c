use domain::Session;
use infrastructure::TodoRepository;
use shared::AppError;
use std::sync::Arc;

/// リクエスト単位のコンテキスト。ハンドラには常に明示的に渡す。
#[derive(Clone)]
pub struct RequestContext {
    /// 検証済みセッション（未ログインなら None）
    pub session: Option<Session>,
    pub todos: Arc<dyn TodoRepository>,
    pub request_id: String,
}

impl RequestContext {
    pub fn new(
        session: Option<Session>,
        todos: Arc<dyn TodoRepository>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            session,
            todos,
            request_id: request_id.into(),
        }
    }

    /// ログイン必須の操作で使用
    pub fn require_session(&self) -> Result<&Session, AppError> {
        self.session
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("no active session".to_string()))
    }
}
