//! services/api/src/bin/openapi.rs
//!
//! Writes the back-office OpenAPI document to disk, for client generation.
//! Usage: `openapi [PATH]` (defaults to `openapi.json`).

use api_lib::web::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    let doc = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, doc)?;
    println!(
        "Wrote OpenAPI document ({} paths) to {}",
        ApiDoc::openapi().paths.paths.len(),
        path.display()
    );
    Ok(())
}
