use utoipa::OpenApi;

use crate::api::handlers::{CodeInfo, ResultRequest};
use crate::response::ResponseBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Operation Result Service",
        version = "0.1.0",
        description = "Maps operation codes to HTTP statuses and JSON bodies. Every response carries a `code`, a `message` and an optional `data` payload."
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::list_codes,
        crate::api::handlers::get_code,
        crate::api::handlers::send_result,
    ),
    components(
        schemas(
            ResponseBody,
            CodeInfo,
            ResultRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "codes", description = "Operation code registry and result endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_paths_and_schemas() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        assert!(doc["paths"]["/codes/{code}"]["get"].is_object());
        assert!(doc["paths"]["/results"]["post"].is_object());
        assert!(doc["components"]["schemas"]["ResponseBody"].is_object());
    }
}
