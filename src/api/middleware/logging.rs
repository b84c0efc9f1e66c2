use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn, Instrument};

use crate::context::{OpContext, OPERATION_ID_HEADER, REQUEST_ID_HEADER};

/// Log every request with its operation context.
///
/// The context is stored in request extensions for handlers, the rest of the
/// request runs inside its span, and both ids are echoed back as headers.
pub async fn logging_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let ctx = OpContext::from_headers(request.headers());
    let span = ctx.span();

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("").to_string();

    request.extensions_mut().insert(ctx.clone());

    async move {
        info!(
            method = %method,
            path = %path,
            query = %sanitize_query(&query),
            "Incoming request"
        );

        let mut response = next.run(request).await;

        let duration_ms = start.elapsed().as_millis();
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            warn!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms = %duration_ms,
                "Request failed"
            );
        } else {
            info!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms = %duration_ms,
                "Request completed"
            );
        }

        let headers = response.headers_mut();
        for (name, value) in [
            (REQUEST_ID_HEADER, ctx.request_id()),
            (OPERATION_ID_HEADER, ctx.operation_id()),
        ] {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }

        response
    }
    .instrument(span)
    .await
}

/// Mask values of sensitive query parameters
fn sanitize_query(query: &str) -> String {
    const SENSITIVE: [&str; 4] = ["api_key", "token", "password", "secret"];

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SENSITIVE.contains(&key) => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}
