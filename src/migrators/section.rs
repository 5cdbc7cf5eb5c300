use crate::error::{Error, Result};

/// Returns the span of a named brace-delimited section, e.g. `dependencies { ... }`.
///
/// The span starts at the section name and ends with the brace that closes
/// the section. Nested blocks are balanced, so the first occurrence of
/// `"<section> {"` decides which block is returned.
pub fn get_content_of<'a>(section: &str, content: &'a str) -> Result<&'a str> {
    let (start, end) = section_bounds(section, content)?;
    Ok(&content[start..end])
}

/// Byte range `start..end` of a section inside `content`
pub fn section_bounds(section: &str, content: &str) -> Result<(usize, usize)> {
    let opening = format!("{} {{", section);
    let start = content
        .find(&opening)
        .ok_or_else(|| Error::SectionNotFound {
            section: section.to_string(),
        })?;

    let body_start = start + opening.len();
    let closing = find_closing_brace(&content[body_start..]).ok_or_else(|| {
        Error::UnbalancedBraces {
            section: section.to_string(),
        }
    })?;

    Ok((start, body_start + closing + 1))
}

/// Replaces the span of a section with new text, leaving the rest untouched
pub fn replace_section(section: &str, content: &str, replacement: &str) -> Result<String> {
    let (start, end) = section_bounds(section, content)?;
    let mut replaced = String::with_capacity(content.len() + replacement.len());
    replaced.push_str(&content[..start]);
    replaced.push_str(replacement);
    replaced.push_str(&content[end..]);
    Ok(replaced)
}

/// Checks that a generated block is exactly one balanced section.
///
/// Fails with `UnbalancedBraces` when the section never closes or closes
/// before the end of the block.
pub fn ensure_balanced(section: &str, block: &str) -> Result<()> {
    let (_, end) = section_bounds(section, block)?;
    if end != block.trim_end().len() {
        return Err(Error::UnbalancedBraces {
            section: section.to_string(),
        });
    }
    Ok(())
}

/// Lines between the opening and the closing brace of an extracted section
pub fn section_body_lines(section_content: &str) -> Vec<&str> {
    let inner = match (section_content.find('{'), section_content.rfind('}')) {
        (Some(open), Some(close)) if open < close => &section_content[open + 1..close],
        _ => return Vec::new(),
    };
    inner.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// Offset of the brace closing an already opened block
fn find_closing_brace(body: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILD_GRADLE: &str = r#"buildscript {
    repositories {
        maven {
            url "https://plugins.gradle.org/m2/"
        }
    }
    dependencies {
        classpath "com.github.ben-manes:gradle-versions-plugin:$gradlePluginVersionsVersion"
        classpath "org.ajoberstar.grgit:grgit-gradle:$grgitGradlePluginVersion"
    }
}

apply plugin: "java"
"#;

    #[test]
    fn test_simple_section() {
        let content = "plugins {}\ndependencies {\n  a\n  b\n}\ntasks {}\n";
        let section = get_content_of("dependencies", content).unwrap();
        assert_eq!(section, "dependencies {\n  a\n  b\n}");
    }

    #[test]
    fn test_nested_sections() {
        let section = get_content_of("buildscript", BUILD_GRADLE).unwrap();
        assert!(section.starts_with("buildscript {"));
        assert!(section.ends_with("    }\n}"));
        assert_eq!(
            section.matches('{').count(),
            section.matches('}').count(),
            "extracted section must be balanced"
        );

        let repositories = get_content_of("repositories", BUILD_GRADLE).unwrap();
        assert_eq!(
            repositories,
            "repositories {\n        maven {\n            url \"https://plugins.gradle.org/m2/\"\n        }\n    }"
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let section = get_content_of("dependencies", BUILD_GRADLE).unwrap();
        assert!(section.contains("gradle-versions-plugin"));
        assert!(section.ends_with("    }"));
    }

    #[test]
    fn test_missing_section() {
        let err = get_content_of("nonExistingSection", BUILD_GRADLE).unwrap_err();
        assert!(matches!(err, Error::SectionNotFound { .. }));
        assert!(err.contains("nonExistingSection"));
    }

    #[test]
    fn test_unbalanced_section() {
        let err = get_content_of("dependencies", "dependencies {\n  a {\n}\n").unwrap_err();
        assert!(matches!(err, Error::UnbalancedBraces { .. }));
    }

    #[test]
    fn test_replace_section_keeps_surroundings() {
        let content = "before\ndependencies {\n  old\n}\nafter\n";
        let replaced = replace_section("dependencies", content, "dependencies {\n  new\n}").unwrap();
        assert_eq!(replaced, "before\ndependencies {\n  new\n}\nafter\n");
    }

    #[test]
    fn test_body_lines() {
        let lines = section_body_lines("dependencies {\n  a\n\n  b\n}");
        assert_eq!(lines, vec!["  a", "  b"]);
        assert!(section_body_lines("dependencies {}").is_empty());
    }

    #[test]
    fn test_ensure_balanced() {
        assert!(ensure_balanced("dependencies", "dependencies {\n  a {\n  }\n}").is_ok());

        let err = ensure_balanced("dependencies", "dependencies {\n  a {\n}").unwrap_err();
        assert!(matches!(err, Error::UnbalancedBraces { .. }));

        let err = ensure_balanced("dependencies", "dependencies {\n  a\n}\n}").unwrap_err();
        assert!(matches!(err, Error::UnbalancedBraces { .. }));
    }
}
