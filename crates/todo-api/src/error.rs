use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::{AppError, ErrorResponse};

/// ワイヤ上のエラーエンベロープに変換するためのラッパー
#[derive(Debug)]
pub struct ProcedureError {
    pub error: AppError,
    pub path: Option<String>,
    pub request_id: String,
    pub include_details: bool,
}

impl IntoResponse for ProcedureError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::from_app_error(
            &self.error,
            self.path,
            self.request_id,
            self.include_details,
        );

        (status, Json(json!({ "id": null, "error": { "json": body } }))).into_response()
    }
}
