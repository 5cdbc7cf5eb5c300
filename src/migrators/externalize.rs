use crate::migrators::section::section_body_lines;
use crate::models::{ALIAS_MARKER, VersionMap};
use crate::utils::case::version_property_key;
use log::{debug, info};
use regex::Regex;
use std::sync::OnceLock;

/// Property key that receives the literal project version
pub const PROJECT_VERSION_KEY: &str = "projectVersion";

static RE_PROJECT_VERSION: OnceLock<Regex> = OnceLock::new();

/// Matches a top-level `version = '1.0.0'` assignment
fn re_project_version() -> &'static Regex {
    RE_PROJECT_VERSION.get_or_init(|| {
        Regex::new(r#"(?m)^(version\s*=\s*)(['"])([^'"]+)['"]"#)
            .expect("project version pattern is valid")
    })
}

/// Dependency lines with literal versions replaced by property references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalizedVersions {
    /// Rewritten lines, in input order
    pub lines: Vec<String>,
    /// Newly created property keys mapped to the extracted literal versions
    pub properties: VersionMap,
}

/// Replaces literal versions in single-quoted `'group:artifact:version'`
/// coordinates with `$<artifactCamelCase><suffix>` references.
///
/// Lines without a single-quoted token are dropped. Coordinates that are not
/// a three-part literal (no version, already an alias) are kept unchanged.
#[allow(dead_code)]
pub fn externalize_versions<S: AsRef<str>>(lines: &[S], suffix: &str) -> ExternalizedVersions {
    let mut externalized = ExternalizedVersions::default();

    for line in lines {
        let line = line.as_ref();
        match externalize_line(line, suffix, &mut externalized.properties) {
            Some(rewritten) => externalized.lines.push(rewritten),
            None => info!("No dependency coordinate found in line '{}', skipping", line.trim()),
        }
    }

    externalized
}

/// Externalizes the version of a single line.
///
/// Returns `None` when the line has no single-quoted token, otherwise the
/// line with its coordinate rewritten (or unchanged when there is no literal
/// version to move).
pub fn externalize_line(line: &str, suffix: &str, properties: &mut VersionMap) -> Option<String> {
    let coordinate = single_quoted_token(line)?;

    let parts: Vec<&str> = coordinate.split(':').collect();
    let [group, artifact, version] = parts.as_slice() else {
        debug!(
            "Coordinate '{}' has no literal version to externalize",
            coordinate
        );
        return Some(line.to_string());
    };
    if version.starts_with(ALIAS_MARKER) {
        debug!("Coordinate '{}' already references a property", coordinate);
        return Some(line.to_string());
    }

    let key = version_property_key(artifact, suffix);
    properties.insert(key.clone(), *version);
    let replacement = format!("{}:{}:{}{}", group, artifact, ALIAS_MARKER, key);
    Some(line.replacen(coordinate, &replacement, 1))
}

/// Builds the rewritten dependencies block for a build file.
///
/// Externalized coordinates switch to double quotes so Gradle interpolates
/// the property reference.
pub fn externalized_dependencies_block(externalized: &ExternalizedVersions) -> String {
    let mut block = String::from("dependencies {\n");
    for line in &externalized.lines {
        if line.contains(ALIAS_MARKER) {
            block.push_str(&line.replace('\'', "\""));
        } else {
            block.push_str(line);
        }
        block.push('\n');
    }
    block.push('}');
    block
}

/// Externalizes the dependencies of an extracted build file section.
///
/// Unlike [`externalize_versions`], lines without a single-quoted coordinate
/// (closing braces of nested closures, double-quoted declarations) are kept
/// verbatim so the rewritten section still holds every declaration.
pub fn externalize_section(section_content: &str, suffix: &str) -> ExternalizedVersions {
    let mut externalized = ExternalizedVersions::default();
    for line in section_body_lines(section_content) {
        let rewritten = externalize_line(line, suffix, &mut externalized.properties)
            .unwrap_or_else(|| line.to_string());
        externalized.lines.push(rewritten);
    }
    externalized
}

/// Moves a literal `version = '...'` into the `projectVersion` property.
///
/// Returns the rewritten build file content, or `None` when there is no
/// literal project version.
pub fn externalize_project_version(
    content: &str,
    properties: &mut VersionMap,
) -> Option<String> {
    let captures = re_project_version().captures(content)?;
    let version = captures.get(3)?.as_str();
    if version.starts_with(ALIAS_MARKER) {
        return None;
    }

    properties.insert(PROJECT_VERSION_KEY, version);
    let full = captures.get(0)?;
    let replacement = format!(
        "{}\"{}{}\"",
        &captures[1], ALIAS_MARKER, PROJECT_VERSION_KEY
    );

    let mut rewritten = String::with_capacity(content.len());
    rewritten.push_str(&content[..full.start()]);
    rewritten.push_str(&replacement);
    rewritten.push_str(&content[full.end()..]);
    Some(rewritten)
}

fn single_quoted_token(line: &str) -> Option<&str> {
    let open = line.find('\'')?;
    let rest = &line[open + 1..];
    let close = rest.find('\'')?;
    Some(&rest[..close])
}
