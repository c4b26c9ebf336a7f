//! Catalog loading from JSON or YAML documents

use std::path::Path;

use crate::catalog::{Catalog, CatalogDocument};
use crate::error::{Result, catalog_not_found, catalog_parse_failed, file_read_failed};

/// Load and shape-check a catalog document.
///
/// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.is_file() {
        return Err(catalog_not_found(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| file_read_failed(path.display().to_string(), e.to_string()))?;

    let doc = parse_document(path, &content)?;
    let catalog = Catalog::from_document(doc)?;

    tracing::info!(
        path = %path.display(),
        version = catalog.version(),
        tools = catalog.len(),
        "loaded tool catalog"
    );
    Ok(catalog)
}

fn parse_document(path: &Path, content: &str) -> Result<CatalogDocument> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| catalog_parse_failed(path.display().to_string(), reason))
}
