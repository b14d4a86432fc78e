//! services/api/src/bin/openapi.rs
//!
//! Dumps the OpenAPI document of the authoring API.
//!
//! Usage: `openapi [PATH]`. Writes to `openapi.json` by default; `-` prints to
//! stdout.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let mut doc = ApiDoc::openapi();
    doc.info.title = "Course Authoring API".to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    let json = doc.to_pretty_json()?;

    if output == "-" {
        println!("{}", json);
    } else {
        std::fs::write(&output, json)?;
        eprintln!("Wrote {}", output);
    }
    Ok(())
}
