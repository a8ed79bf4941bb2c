use serde::{Deserialize, Serialize};
use thiserror::Error;

/// アプリケーション全体で使用されるエラー型
#[derive(Debug, Clone, Error)]
pub enum AppError {
    // ドメインエラー
    #[error("Domain error: {0}")]
    Domain(#[from] domain::DomainError),

    // 入力エラー
    #[error("Malformed input: {0}")]
    Parse(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // 認証エラー
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    // ルーティングエラー
    #[error("Procedure not found: {0}")]
    NotFound(String),

    #[error("Method not supported: {0}")]
    MethodNotSupported(String),

    // システムエラー
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// クライアントエラー（4xx相当）
    Client,
    /// サーバーエラー（5xx相当）
    Server,
}

impl AppError {
    /// ワイヤ上で返す記号コード
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Parse(_) => "PARSE_ERROR",
            AppError::Domain(_) | AppError::Validation(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::MethodNotSupported(_) => "METHOD_NOT_SUPPORTED",
            AppError::Storage(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                "INTERNAL_SERVER_ERROR"
            }
        }
    }

    /// JSON-RPC 互換の数値コード
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            AppError::Parse(_) => -32700,
            AppError::Domain(_) | AppError::Validation(_) => -32600,
            AppError::Unauthorized(_) => -32001,
            AppError::NotFound(_) => -32004,
            AppError::MethodNotSupported(_) => -32005,
            AppError::Storage(_) | AppError::Configuration(_) | AppError::Internal(_) => -32603,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        if self.http_status_code() < 500 {
            ErrorCategory::Client
        } else {
            ErrorCategory::Server
        }
    }

    /// HTTPステータスコードを取得
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Parse(_) | AppError::Domain(_) | AppError::Validation(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::NotFound(_) => 404,
            AppError::MethodNotSupported(_) => 405,
            AppError::Storage(_) | AppError::Configuration(_) | AppError::Internal(_) => 500,
        }
    }

    /// ユーザー向けメッセージを取得
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "ログインしてください".to_string(),
            AppError::Parse(_) => "リクエストの形式が不正です".to_string(),
            AppError::Domain(_) | AppError::Validation(_) => "入力データが無効です".to_string(),
            AppError::NotFound(_) => "リソースが見つかりません".to_string(),
            AppError::MethodNotSupported(_) => "サポートされていない操作です".to_string(),
            _ => "予期しないエラーが発生しました".to_string(),
        }
    }
}

/// 標準化されたエラーレスポンス（`data` 部）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    /// 記号コード
    pub code: String,
    pub http_status: u16,
    /// 呼び出されたプロシージャ名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub request_id: String,
    /// 詳細情報（開発環境のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// 標準化されたエラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: i32,
    pub data: ErrorData,
}

impl ErrorResponse {
    /// AppErrorからErrorResponseを作成
    pub fn from_app_error(
        error: &AppError,
        path: Option<String>,
        request_id: String,
        include_details: bool,
    ) -> Self {
        Self {
            message: error.user_message(),
            code: error.json_rpc_code(),
            data: ErrorData {
                code: error.code().to_string(),
                http_status: error.http_status_code(),
                path,
                request_id,
                details: include_details.then(|| error.to_string()),
            },
        }
    }
}
