use crate::error::{Error, Result};
use toml_edit::DocumentMut;

/// Tables every generated version catalog must declare
const CATALOG_TABLES: &[&str] = &["versions", "libraries", "bundles", "plugins"];

/// Parses generated catalog text and checks that it is a complete version catalog
pub fn validate_catalog(content: &str) -> Result<DocumentMut> {
    let doc = content
        .parse::<DocumentMut>()
        .map_err(|e| Error::InvalidCatalog(format!("Failed to parse TOML: {}", e)))?;

    for &table in CATALOG_TABLES {
        if !doc.get(table).is_some_and(|item| item.is_table()) {
            return Err(Error::InvalidCatalog(format!(
                "Missing [{}] section",
                table
            )));
        }
    }

    Ok(doc)
}

/// Number of entries in a table of a parsed catalog
pub fn count_entries(doc: &DocumentMut, table: &str) -> usize {
    doc.get(table)
        .and_then(|item| item.as_table())
        .map_or(0, |table| table.len())
}
