/// Converts a kebab-case identifier to camelCase.
///
/// The first segment is kept as-is, every following segment gets its first
/// character upper-cased (e.g. `foo-bar-baz` becomes `fooBarBaz`).
pub fn kebab_to_camel_case(kebab: &str) -> String {
    let mut camel = String::with_capacity(kebab.len());
    for (index, segment) in kebab.split('-').enumerate() {
        if index == 0 {
            camel.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            camel.extend(first.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }
    camel
}

/// Converts a kebab-case identifier to dot case, the accessor form of catalog entries
pub fn kebab_to_dot_case(kebab: &str) -> String {
    kebab.replace('-', ".")
}

/// Derives a gradle.properties key for an artifact (e.g. `lib-one` -> `libOneVersion`)
pub fn version_property_key(artifact: &str, suffix: &str) -> String {
    format!("{}{}", kebab_to_camel_case(artifact).trim(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_to_camel_case() {
        assert_eq!(kebab_to_camel_case("foo-bar-baz"), "fooBarBaz");
        assert_eq!(kebab_to_camel_case("lombok"), "lombok");
        assert_eq!(kebab_to_camel_case("java-library-template"), "javaLibraryTemplate");
        assert_eq!(kebab_to_camel_case(""), "");
    }

    #[test]
    fn test_kebab_to_dot_case() {
        assert_eq!(kebab_to_dot_case("junit-jupiter-api"), "junit.jupiter.api");
        assert_eq!(kebab_to_dot_case("lombok"), "lombok");
    }

    #[test]
    fn test_version_property_key() {
        assert_eq!(version_property_key("lib-one", "Version"), "libOneVersion");
        assert_eq!(
            version_property_key("gradle-versions-plugin", "Version"),
            "gradleVersionsPluginVersion"
        );
    }
}
