use crate::errors::AppError;
use std::env;
use std::net::{IpAddr, SocketAddr};

const DEV_ENVIRONMENT: &str = "dev";
const DEV_SESSION_SECRET: &str = "todo-rpc-insecure-dev-secret";

/// ストアのバックエンド種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    DynamoDb,
}

/// ログの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub bind_addr: SocketAddr,
    pub store_backend: StoreBackend,
    pub dynamodb_table: String,
    pub dynamodb_endpoint: Option<String>,
    pub aws_region: String,
    pub session_secret: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を組み立てます（テストでは HashMap を渡す）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| DEV_ENVIRONMENT.to_string());

        let host: IpAddr = lookup("HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse()
            .map_err(|e| AppError::Configuration(format!("HOST: {e}")))?;
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Configuration(format!("PORT: {e}")))?,
            None => 3000,
        };

        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("dynamodb") => StoreBackend::DynamoDb,
            Some(other) => {
                return Err(AppError::Configuration(format!(
                    "STORE_BACKEND: unknown backend {other}"
                )))
            }
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => {
                return Err(AppError::Configuration(format!(
                    "LOG_FORMAT: unknown format {other}"
                )))
            }
        };

        let session_secret = match lookup("SESSION_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ if environment == DEV_ENVIRONMENT => DEV_SESSION_SECRET.to_string(),
            _ => {
                return Err(AppError::Configuration(
                    "SESSION_SECRET is required outside dev".to_string(),
                ))
            }
        };

        Ok(Config {
            bind_addr: SocketAddr::new(host, port),
            store_backend,
            dynamodb_table: lookup("DYNAMODB_TABLE").unwrap_or_else(|| "todo-rpc-dev".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT"),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "ap-northeast-1".to_string()),
            session_secret,
            log_format,
            environment,
        })
    }

    /// 開発環境ではエラー詳細をクライアントに返す
    pub fn expose_error_details(&self) -> bool {
        self.environment == DEV_ENVIRONMENT
    }
}
