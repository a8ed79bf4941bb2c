//! Todo アプリの RPC API（axum）
//!
//! `auth.*` と `todo.*` の 2 つの名前空間を `/api/trpc/{procedure}` で公開します。

pub mod context;
pub mod error;
pub mod procedures;
pub mod router;
pub mod service;
pub mod session;
pub mod transformer;

use axum::Router;
use infrastructure::TodoRepository;
use shared::{Config, SessionKeys};
use std::sync::Arc;

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<dyn TodoRepository>,
    pub sessions: SessionKeys,
    /// エラー詳細をクライアントへ返すか（開発環境のみ）
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(
        todos: Arc<dyn TodoRepository>,
        sessions: SessionKeys,
        expose_error_details: bool,
    ) -> Self {
        Self {
            todos,
            sessions,
            expose_error_details,
        }
    }

    pub fn from_config(config: &Config, todos: Arc<dyn TodoRepository>) -> Self {
        Self::new(
            todos,
            SessionKeys::from_secret(config.session_secret.as_bytes()),
            config.expose_error_details(),
        )
    }
}

/// 外部から状態を注入してルータを構築
pub fn app_with_state(state: AppState) -> Router {
    router::build(state)
}
