use crate::models::DependencyRecord;
use crate::utils::case::kebab_to_dot_case;
use std::collections::HashSet;

/// Accessor prefix of the generated version catalog
pub const CATALOG_ACCESSOR: &str = "libs";

/// Generates a `dependencies` block referencing catalog entries.
///
/// Records are deduplicated by their version key (first one wins) and records
/// without an artifact id are skipped.
pub fn generate_dependencies_block(records: &[DependencyRecord]) -> String {
    let mut block = String::from("dependencies {\n");
    let mut seen = HashSet::new();

    for record in records {
        let (Some(artifact), Some(key)) = (&record.artifact, record.version_key()) else {
            continue;
        };
        if !seen.insert(key) {
            continue;
        }
        block.push_str(&format!(
            "{} {}.{}\n",
            record.scope,
            CATALOG_ACCESSOR,
            kebab_to_dot_case(artifact)
        ));
    }

    block.push_str("}\n");
    block
}
