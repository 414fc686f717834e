//! services/web/src/bin/openapi.rs
//!
//! This binary generates the OpenAPI 3.0 description of the HTTP routes
//! and saves it to a file named `openapi.json`.

use study_hub_lib::web::api_doc::ApiDoc;
use utoipa::OpenApi;

/// Generates the OpenAPI description and writes it to a file.
fn write_openapi(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = api_doc.to_pretty_json()?;
    std::fs::write(path, json)?;
    println!("OpenAPI description generated at {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());
    write_openapi(ApiDoc::openapi(), &path)?;
    Ok(())
}
