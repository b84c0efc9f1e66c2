use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::Uri,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use super::openapi::ApiDoc;
use super::NOT_FOUND;
use crate::codes::{CodeRegistry, OperationCode};
use crate::context::OpContext;
use crate::response::{OpError, OpResult, ResponseBody, ResponseWriter};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub writer: ResponseWriter,
    pub instance_id: String,
}

/// Registered operation code
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CodeInfo {
    /// Operation code
    pub code: String,
    /// HTTP status sent for this code
    pub status: u16,
    /// Default message
    pub message: String,
}

/// Operation result to send back
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResultRequest {
    /// Registered operation code
    #[schema(value_type = String, example = "BadArguments")]
    pub code: OperationCode,
    /// Message; the code's default is used when empty
    #[serde(default)]
    pub message: String,
    /// Optional payload
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = ResponseBody)
    )
)]
pub async fn health(State(state): State<AppState>) -> Response {
    state.writer.ok_data(serde_json::json!({
        "status": "healthy",
        "service": "opres",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// List registered operation codes
#[utoipa::path(
    get,
    path = "/codes",
    tag = "codes",
    responses(
        (status = 200, description = "Registered codes in the `data` field", body = ResponseBody)
    )
)]
pub async fn list_codes(State(state): State<AppState>) -> Response {
    let codes: Vec<CodeInfo> = state
        .writer
        .registry()
        .iter()
        .map(|(code, meta)| CodeInfo {
            code: code.to_string(),
            status: meta.status().as_u16(),
            message: meta.message().to_string(),
        })
        .collect();

    state.writer.ok_data(codes)
}

/// Respond with an operation code and its default message
#[utoipa::path(
    get,
    path = "/codes/{code}",
    tag = "codes",
    params(
        ("code" = String, Path, description = "Operation code, e.g. ServiceUnavailable")
    ),
    responses(
        (status = 200, description = "Ok, or any registered code with its own status", body = ResponseBody),
        (status = 400, description = "Code is not registered", body = ResponseBody)
    )
)]
pub async fn get_code(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    if !state.writer.registry().contains(&code) {
        info!(code = %code, "Unknown operation code requested");
        return state.writer.code_message(
            OperationCode::BAD_ARGUMENTS,
            &format!("Unknown operation code: {code}"),
        );
    }

    state.writer.code(code)
}

/// Send an arbitrary operation result
#[utoipa::path(
    post,
    path = "/results",
    tag = "codes",
    request_body = ResultRequest,
    responses(
        (status = 200, description = "Result sent with the status of its code", body = ResponseBody),
        (status = 400, description = "Malformed request or unknown code", body = ResponseBody)
    )
)]
pub async fn send_result(
    State(state): State<AppState>,
    Extension(ctx): Extension<OpContext>,
    payload: Result<Json<ResultRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected result request");
            return state
                .writer
                .code_message(OperationCode::BAD_ARGUMENTS, &rejection.body_text());
        }
    };

    debug!(
        code = %request.code,
        operation_id = ctx.operation_id(),
        "Sending requested result"
    );
    state.writer.outcome(to_result(state.writer.registry(), request))
}

fn to_result(registry: &CodeRegistry, request: ResultRequest) -> Result<OpResult, OpError> {
    if !registry.contains(&request.code) {
        return Err(OpResult::bad_arguments(format!(
            "Unknown operation code: {}",
            request.code
        ))
        .into());
    }

    let result = OpResult::new(request.code, request.message);
    Ok(match request.data {
        Some(data) => result.with_data(data),
        None => result,
    })
}

/// OpenAPI document
pub async fn openapi_json() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(ApiDoc::openapi())
}

/// Fallback for unmatched paths
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    state
        .writer
        .code_message(NOT_FOUND, &format!("No route for {}", uri.path()))
}
