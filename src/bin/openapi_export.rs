// Prints the OpenAPI document of the demo server.
// Usage: cargo run --bin openapi_export > openapi.json

use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let json = opres::api::openapi::ApiDoc::openapi().to_pretty_json()?;
    println!("{json}");
    Ok(())
}
