use crate::error::{Error, Result};
use crate::migrators::section::section_body_lines;
use crate::models::{DependencyRecord, VersionMap};
use log::{debug, warn};

/// Decomposes one line of a dependencies block.
///
/// Returns `Ok(None)` for lines that are not declarations (blank lines,
/// closing braces, comments, anything without an opening parenthesis).
/// A declaration without a quoted coordinate is malformed input.
pub fn parse_dependency_line(line: &str) -> Result<Option<DependencyRecord>> {
    let trimmed = line.trim();
    if is_comment(trimmed) {
        return Ok(None);
    }

    let Some(paren) = trimmed.find('(') else {
        return Ok(None);
    };
    let scope = trimmed[..paren].trim();

    let coordinate = first_quoted_token(trimmed).ok_or_else(|| {
        Error::MalformedInput(format!("No quoted dependency coordinate in line '{}'", trimmed))
    })?;

    let parts: Vec<&str> = coordinate.split(':').collect();
    let record = match parts.as_slice() {
        [group, artifact] => DependencyRecord::new(scope, *group, *artifact),
        [group, artifact, version] => {
            DependencyRecord::new(scope, *group, *artifact).with_version(*version)
        }
        _ => {
            debug!(
                "Coordinate '{}' has {} parts, keeping scope only",
                coordinate,
                parts.len()
            );
            DependencyRecord::scope_only(scope)
        }
    };

    Ok(Some(record))
}

/// Replaces alias versions (e.g. `$lombokVersion`) with their literal value.
///
/// A missing alias leaves the record without a version; the miss is logged.
pub fn resolve_aliases(
    records: Vec<DependencyRecord>,
    version_map: &VersionMap,
) -> Vec<DependencyRecord> {
    records
        .into_iter()
        .map(|mut record| {
            if let Some(alias) = record.version_alias() {
                let resolved = version_map.get(alias).map(str::to_string);
                if resolved.is_none() {
                    warn!(
                        "No version found for alias '{}' of {}",
                        alias,
                        record.artifact.as_deref().unwrap_or(&record.scope)
                    );
                }
                record.version = resolved;
            }
            record
        })
        .collect()
}

/// Declarations found in a dependencies section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSection {
    /// Parsed records with resolved versions, in section order
    pub records: Vec<DependencyRecord>,
    /// Trimmed lines that are neither declarations nor braces or comments
    pub skipped_lines: Vec<String>,
}

/// Parses every line of an extracted dependencies section and resolves aliases.
///
/// Lines that do not parse to a record are dropped from the migrated block,
/// so every such line that carries content is logged as a warning and
/// returned in `skipped_lines`.
pub fn parse_dependency_section(
    section_content: &str,
    version_map: &VersionMap,
) -> Result<ParsedSection> {
    let mut records = Vec::new();
    let mut skipped_lines = Vec::new();
    for line in section_body_lines(section_content) {
        let trimmed = line.trim();
        match parse_dependency_line(line)? {
            Some(record) => records.push(record),
            None if trimmed == "}" || is_comment(trimmed) => {
                debug!("Skipping non-declaration line '{}'", trimmed)
            }
            None => {
                warn!(
                    "Line '{}' is not a parenthesized dependency declaration and will not be migrated",
                    trimmed
                );
                skipped_lines.push(trimmed.to_string());
            }
        }
    }
    Ok(ParsedSection {
        records: resolve_aliases(records, version_map),
        skipped_lines,
    })
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

/// Content between the first quote character and the next matching one
fn first_quoted_token(line: &str) -> Option<&str> {
    let (open, quote) = line.char_indices().find(|(_, c)| *c == '"' || *c == '\'')?;
    let rest = &line[open + 1..];
    let close = rest.find(quote)?;
    Some(&rest[..close])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliased_line() {
        let record = parse_dependency_line(
            "   testImplementation(\"org.junit.jupiter:junit-jupiter:$jupiterVersion\")",
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            record,
            DependencyRecord::new("testImplementation", "org.junit.jupiter", "junit-jupiter")
                .with_version("$jupiterVersion")
        );
    }

    #[test]
    fn test_parse_single_quoted_line() {
        let record = parse_dependency_line("    compileOnly('org.projectlombok:lombok:1.18.32')")
            .unwrap()
            .unwrap();
        assert_eq!(record.scope, "compileOnly");
        assert_eq!(record.version.as_deref(), Some("1.18.32"));
    }

    #[test]
    fn test_parse_versionless_line() {
        let record = parse_dependency_line("    implementation(\"org.slf4j:slf4j-api\")")
            .unwrap()
            .unwrap();
        assert_eq!(record.group.as_deref(), Some("org.slf4j"));
        assert_eq!(record.artifact.as_deref(), Some("slf4j-api"));
        assert_eq!(record.version, None);
    }

    #[test]
    fn test_parse_exotic_coordinate_keeps_scope() {
        let record = parse_dependency_line("    implementation(\"a:b:c:jdk8\")")
            .unwrap()
            .unwrap();
        assert_eq!(record, DependencyRecord::scope_only("implementation"));
    }

    #[test]
    fn test_coordinate_round_trip() {
        let line = "    api(\"io.github.astrapi69:silly-collection:27.1\")";
        let record = parse_dependency_line(line).unwrap().unwrap();
        assert_eq!(
            record.coordinate().as_deref(),
            Some("io.github.astrapi69:silly-collection:27.1")
        );
    }

    #[test]
    fn test_non_declaration_lines() {
        assert_eq!(parse_dependency_line("}").unwrap(), None);
        assert_eq!(parse_dependency_line("").unwrap(), None);
        assert_eq!(parse_dependency_line("  // testImplementation(\"x:y:1\")").unwrap(), None);
    }

    #[test]
    fn test_missing_quoted_token_is_malformed() {
        let err = parse_dependency_line("    implementation(libs.lombok)").unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_resolve_aliases() {
        let mut versions = VersionMap::new();
        versions.insert("jupiterVersion", "5.10.2");

        let records = vec![
            DependencyRecord::new("testImplementation", "org.junit.jupiter", "junit-jupiter")
                .with_version("$jupiterVersion"),
            DependencyRecord::new("implementation", "org.slf4j", "slf4j-api").with_version("2.0.13"),
            DependencyRecord::new("compileOnly", "org.projectlombok", "lombok")
                .with_version("$lombokVersion"),
            DependencyRecord::scope_only("implementation"),
        ];

        let resolved = resolve_aliases(records, &versions);
        assert_eq!(resolved.len(), 4);
        assert_eq!(resolved[0].version.as_deref(), Some("5.10.2"));
        assert_eq!(resolved[1].version.as_deref(), Some("2.0.13"));
        assert_eq!(resolved[2].version, None);
        assert_eq!(resolved[3], DependencyRecord::scope_only("implementation"));
    }

    #[test]
    fn test_parse_dependency_section() {
        let section = "dependencies {\n    compileOnly(\"org.projectlombok:lombok:$lombokVersion\")\n\n    // comment\n    testImplementation(\"org.junit.jupiter:junit-jupiter:$jupiterVersion\")\n}";
        let mut versions = VersionMap::new();
        versions.insert("lombokVersion", "1.18.32");
        versions.insert("jupiterVersion", "5.10.2");

        let parsed = parse_dependency_section(section, &versions).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].version.as_deref(), Some("1.18.32"));
        assert_eq!(parsed.records[1].artifact.as_deref(), Some("junit-jupiter"));
        assert!(parsed.skipped_lines.is_empty());
    }

    #[test]
    fn test_groovy_declaration_without_parentheses_is_reported() {
        let section = "dependencies {\n implementation 'org.slf4j:slf4j-api:2.0.13'\n compileOnly(\"org.projectlombok:lombok:1.18.32\")\n}";
        let parsed = parse_dependency_section(section, &VersionMap::new()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].artifact.as_deref(), Some("lombok"));
        assert_eq!(
            parsed.skipped_lines,
            vec!["implementation 'org.slf4j:slf4j-api:2.0.13'"]
        );
    }
}
