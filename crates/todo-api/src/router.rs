use crate::context::RequestContext;
use crate::error::ProcedureError;
use crate::procedures::{dispatch, Call, Output, Procedure, ProcedureKind};
use crate::session::current_session;
use crate::transformer;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use shared::{AppError, ErrorCategory};
use std::collections::HashMap;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// ルータを構築
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/trpc/:procedure", get(query).post(mutation))
        .with_state(state)
}

/// GET: クエリ（入力は `?input=` の JSON）
async fn query(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let input = match params.get("input") {
        Some(raw) => parse_json(raw.as_bytes()),
        None => Ok(None),
    };
    call_procedure(state, path, ProcedureKind::Query, headers, input).await
}

/// POST: ミューテーション（入力はリクエストボディ）
async fn mutation(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let input = parse_json(&body);
    call_procedure(state, path, ProcedureKind::Mutation, headers, input).await
}

fn parse_json(raw: &[u8]) -> Result<Option<Value>, AppError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| AppError::Parse(format!("invalid JSON: {e}")))?;
    Ok(transformer::deserialize_input(value))
}

async fn call_procedure(
    state: AppState,
    path: String,
    method_kind: ProcedureKind,
    headers: HeaderMap,
    input: Result<Option<Value>, AppError>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("procedure", procedure = %path, request_id = %request_id);

    async move {
        let session = current_session(&state.sessions, &headers);
        let ctx = RequestContext::new(session, state.todos.clone(), request_id);

        let result = resolve(&ctx, &path, method_kind, input)
            .await
            .and_then(|output| transformer::serialize(&output));
        match result {
            Ok(data) => {
                info!("procedure completed");
                (StatusCode::OK, Json(success_envelope(data))).into_response()
            }
            Err(e) => failure(&state, &ctx, e, path),
        }
    }
    .instrument(span)
    .await
}

/// パス解決 → 種別確認 → 入力検証 → ハンドラ実行
async fn resolve(
    ctx: &RequestContext,
    path: &str,
    method_kind: ProcedureKind,
    input: Result<Option<Value>, AppError>,
) -> Result<Output, AppError> {
    let procedure = Procedure::from_path(path)?;
    if procedure.kind() != method_kind {
        return Err(AppError::MethodNotSupported(format!(
            "{path} is a {:?}, called as a {method_kind:?}",
            procedure.kind()
        )));
    }

    let call = Call::parse(procedure, input?)?;
    dispatch(ctx, call).await
}

fn failure(state: &AppState, ctx: &RequestContext, error: AppError, path: String) -> Response {
    match error.category() {
        ErrorCategory::Client => warn!(error = %error, code = error.code(), "procedure rejected"),
        ErrorCategory::Server => error!(error = %error, code = error.code(), "procedure failed"),
    }

    ProcedureError {
        error,
        path: Some(path),
        request_id: ctx.request_id.clone(),
        include_details: state.expose_error_details,
    }
    .into_response()
}

fn success_envelope(data: Value) -> Value {
    json!({ "id": null, "result": { "type": "data", "data": data } })
}

#[derive(Debug, Serialize)]
struct HealthBody {
    /// サービスの簡易ステータス
    status: &'static str,
}

/// ヘルスチェック用ハンドラ
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}
