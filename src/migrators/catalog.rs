//! Generation of the `libs.versions.toml` version catalog.
//!
//! The catalog is emitted as text in a single pass. Besides the entries
//! derived from the parsed dependencies it always declares the Gradle plugins
//! used by the project template, plus the lombok plugin when lombok is one of
//! the dependencies.

use crate::models::DependencyRecord;
use std::collections::HashSet;
use toml::{Table, Value};

/// Group of the lombok annotation processor
pub const LOMBOK_GROUP: &str = "org.projectlombok";

/// Group of the JUnit 5 test framework
pub const JUNIT_JUPITER_GROUP: &str = "org.junit.jupiter";

/// Name of the bundle holding the unit test libraries
pub const UNIT_TESTING_BUNDLE: &str = "unit-testing";

/// A Gradle plugin declared in every generated catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogPlugin {
    /// Key in the `[plugins]` section
    pub name: &'static str,
    /// Gradle plugin id
    pub id: &'static str,
    /// Key in the `[versions]` section
    pub version_key: &'static str,
    /// Pinned plugin version
    pub version: &'static str,
}

/// Build tooling plugins declared regardless of the dependencies
pub const TOOLING_PLUGINS: &[CatalogPlugin] = &[
    CatalogPlugin {
        name: "grgit-gradle",
        id: "org.ajoberstar.grgit",
        version_key: "gradle-plugin-grgit-version",
        version: "5.3.0",
    },
    CatalogPlugin {
        name: "license-gradle-plugin",
        id: "com.github.hierynomus.license",
        version_key: "gradle-plugin-license-version",
        version: "0.16.1",
    },
    CatalogPlugin {
        name: "spotless-plugin-gradle",
        id: "com.diffplug.spotless",
        version_key: "gradle-plugin-spotless-version",
        version: "7.0.2",
    },
    CatalogPlugin {
        name: "version-catalog-update",
        id: "nl.littlerobots.version-catalog-update",
        version_key: "gradle-plugin-version-catalog-update-version",
        version: "0.8.5",
    },
    CatalogPlugin {
        name: "gradle-versions-plugin",
        id: "com.github.ben-manes.versions",
        version_key: "gradle-plugin-versions-version",
        version: "0.52.0",
    },
];

/// Plugin declared only when lombok is a dependency
pub const LOMBOK_PLUGIN: CatalogPlugin = CatalogPlugin {
    name: "lombok-plugin",
    id: "io.freefair.lombok",
    version_key: "gradle-plugin-lombok-version",
    version: "8.12.1",
};

/// Utility test libraries listed in the unit testing bundle
const TEST_UTILITY_LIBRARIES: &[&str] = &["meanbean", "test-object"];

/// Generates the version catalog text for resolved dependency records.
///
/// Versions are deduplicated by `<artifact>-version` and libraries by
/// artifact id; in both cases the first record wins.
pub fn generate_catalog(records: &[DependencyRecord]) -> String {
    let with_lombok = records.iter().any(|r| r.has_group(LOMBOK_GROUP));
    let with_junit = records.iter().any(|r| r.has_group(JUNIT_JUPITER_GROUP));

    let mut catalog = String::new();
    catalog.push_str("[versions]\n");
    let mut version_keys = HashSet::new();
    for record in records {
        let (Some(version), Some(key)) = (&record.version, record.version_key()) else {
            continue;
        };
        if version_keys.insert(key.clone()) {
            catalog.push_str(&format!("{} = \"{}\"\n", key, version));
        }
    }
    for plugin in TOOLING_PLUGINS {
        catalog.push_str(&format!("{} = \"{}\"\n", plugin.version_key, plugin.version));
    }
    if with_lombok {
        catalog.push_str(&format!(
            "{} = \"{}\"\n",
            LOMBOK_PLUGIN.version_key, LOMBOK_PLUGIN.version
        ));
    }

    catalog.push_str("\n[libraries]\n");
    let mut library_keys = HashSet::new();
    for record in records {
        let (Some(group), Some(artifact)) = (&record.group, &record.artifact) else {
            continue;
        };
        if !library_keys.insert(artifact.as_str()) {
            continue;
        }
        catalog.push_str(&format!(
            "{} = {{ module = \"{}:{}\"",
            artifact, group, artifact
        ));
        if record.version.is_some() {
            catalog.push_str(&format!(", version.ref = \"{}-version\"", artifact));
        }
        catalog.push_str(" }\n");
    }

    catalog.push_str("\n[bundles]\n");
    let framework = if with_junit { "junit-jupiter" } else { "testng" };
    let members: Vec<String> = std::iter::once(framework)
        .chain(TEST_UTILITY_LIBRARIES.iter().copied())
        .map(|name| format!("\"{}\"", name))
        .collect();
    catalog.push_str(&format!(
        "{} = [ {} ]\n",
        UNIT_TESTING_BUNDLE,
        members.join(", ")
    ));

    catalog.push_str("\n[plugins]\n");
    let conditional = with_lombok.then_some(&LOMBOK_PLUGIN);
    for plugin in TOOLING_PLUGINS.iter().chain(conditional) {
        catalog.push_str(&format!(
            "{} = {{ id = \"{}\", version.ref = \"{}\" }}\n",
            plugin.name, plugin.id, plugin.version_key
        ));
    }

    catalog
}

/// Nested-table form of the `[versions]` and `[libraries]` sections
#[allow(dead_code)]
pub fn catalog_table(records: &[DependencyRecord]) -> Table {
    let mut versions = Table::new();
    let mut libraries = Table::new();

    for record in records {
        if let (Some(version), Some(key)) = (&record.version, record.version_key()) {
            versions
                .entry(key)
                .or_insert_with(|| Value::String(version.clone()));
        }

        let (Some(group), Some(artifact)) = (&record.group, &record.artifact) else {
            continue;
        };
        if libraries.contains_key(artifact) {
            continue;
        }
        let mut library = Table::new();
        library.insert(
            "module".to_string(),
            Value::String(format!("{}:{}", group, artifact)),
        );
        if record.version.is_some() {
            let mut version_ref = Table::new();
            version_ref.insert(
                "ref".to_string(),
                Value::String(format!("{}-version", artifact)),
            );
            library.insert("version".to_string(), Value::Table(version_ref));
        }
        libraries.insert(artifact.clone(), Value::Table(library));
    }

    let mut catalog = Table::new();
    catalog.insert("versions".to_string(), Value::Table(versions));
    catalog.insert("libraries".to_string(), Value::Table(libraries));
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lombok(version: &str) -> DependencyRecord {
        DependencyRecord::new("compileOnly", LOMBOK_GROUP, "lombok").with_version(version)
    }

    #[test]
    fn test_first_version_wins() {
        let catalog = generate_catalog(&[lombok("8.5"), lombok("8.6")]);
        assert_eq!(catalog.matches("lombok-version = ").count(), 1);
        assert!(catalog.contains("lombok-version = \"8.5\"\n"));
        assert!(!catalog.contains("8.6"));
        assert_eq!(catalog.matches("lombok = { module").count(), 1);
    }

    #[test]
    fn test_full_catalog_layout() {
        let records = vec![
            lombok("1.18.32"),
            DependencyRecord::new("testImplementation", JUNIT_JUPITER_GROUP, "junit-jupiter")
                .with_version("5.10.2"),
            DependencyRecord::new("implementation", "org.slf4j", "slf4j-api"),
        ];
        let expected = r#"[versions]
lombok-version = "1.18.32"
junit-jupiter-version = "5.10.2"
gradle-plugin-grgit-version = "5.3.0"
gradle-plugin-license-version = "0.16.1"
gradle-plugin-spotless-version = "7.0.2"
gradle-plugin-version-catalog-update-version = "0.8.5"
gradle-plugin-versions-version = "0.52.0"
gradle-plugin-lombok-version = "8.12.1"

[libraries]
lombok = { module = "org.projectlombok:lombok", version.ref = "lombok-version" }
junit-jupiter = { module = "org.junit.jupiter:junit-jupiter", version.ref = "junit-jupiter-version" }
slf4j-api = { module = "org.slf4j:slf4j-api" }

[bundles]
unit-testing = [ "junit-jupiter", "meanbean", "test-object" ]

[plugins]
grgit-gradle = { id = "org.ajoberstar.grgit", version.ref = "gradle-plugin-grgit-version" }
license-gradle-plugin = { id = "com.github.hierynomus.license", version.ref = "gradle-plugin-license-version" }
spotless-plugin-gradle = { id = "com.diffplug.spotless", version.ref = "gradle-plugin-spotless-version" }
version-catalog-update = { id = "nl.littlerobots.version-catalog-update", version.ref = "gradle-plugin-version-catalog-update-version" }
gradle-versions-plugin = { id = "com.github.ben-manes.versions", version.ref = "gradle-plugin-versions-version" }
lombok-plugin = { id = "io.freefair.lombok", version.ref = "gradle-plugin-lombok-version" }
"#;
        assert_eq!(generate_catalog(&records), expected);
    }

    #[test]
    fn test_without_lombok_and_junit() {
        let records = vec![
            DependencyRecord::new("implementation", "org.slf4j", "slf4j-api").with_version("2.0.13"),
        ];
        let catalog = generate_catalog(&records);
        assert!(!catalog.contains(LOMBOK_PLUGIN.id));
        assert!(!catalog.contains(LOMBOK_PLUGIN.version_key));
        assert!(catalog.contains("unit-testing = [ \"testng\", \"meanbean\", \"test-object\" ]"));
        for plugin in TOOLING_PLUGINS {
            assert!(catalog.contains(plugin.id));
        }
    }

    #[test]
    fn test_records_without_coordinates_are_skipped() {
        let records = vec![DependencyRecord::scope_only("implementation")];
        let catalog = generate_catalog(&records);
        let libraries = catalog
            .split("[libraries]\n")
            .nth(1)
            .and_then(|rest| rest.split("\n[bundles]").next())
            .unwrap();
        assert!(libraries.trim().is_empty());
    }

    #[test]
    fn test_catalog_table_mirror() {
        let records = vec![
            lombok("8.5"),
            lombok("8.6"),
            DependencyRecord::new("implementation", "org.slf4j", "slf4j-api"),
        ];
        let table = catalog_table(&records);

        let versions = table["versions"].as_table().unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions["lombok-version"].as_str(), Some("8.5"));

        let libraries = table["libraries"].as_table().unwrap();
        let keys: Vec<&String> = libraries.keys().collect();
        assert_eq!(keys, vec!["lombok", "slf4j-api"]);
        assert_eq!(
            libraries["lombok"]["version"]["ref"].as_str(),
            Some("lombok-version")
        );
        assert!(libraries["slf4j-api"].get("version").is_none());
    }
}
