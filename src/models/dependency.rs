/// Marker that starts a version alias reference (e.g. `$lombokVersion`)
pub const ALIAS_MARKER: char = '$';

/// Represents one dependency declaration of a Gradle `dependencies` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    /// The declaration keyword (e.g. implementation, testImplementation)
    pub scope: String,

    /// The organization identifier of the coordinate
    pub group: Option<String>,

    /// The library identifier within the group
    pub artifact: Option<String>,

    /// Literal version, alias reference, or none for version-less declarations
    pub version: Option<String>,
}

impl DependencyRecord {
    /// Creates a record carrying only the scope of a line that could not be decomposed
    pub fn scope_only(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            group: None,
            artifact: None,
            version: None,
        }
    }

    /// Creates a record for a `group:artifact` coordinate
    pub fn new(
        scope: impl Into<String>,
        group: impl Into<String>,
        artifact: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            group: Some(group.into()),
            artifact: Some(artifact.into()),
            version: None,
        }
    }

    /// Adds a version (literal or alias reference) to the record
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Returns the alias name if the version is an alias reference.
    ///
    /// Both `$name` and `${name}` forms are recognised.
    pub fn version_alias(&self) -> Option<&str> {
        let alias = self.version.as_deref()?.strip_prefix(ALIAS_MARKER)?;
        Some(
            alias
                .strip_prefix('{')
                .and_then(|inner| inner.strip_suffix('}'))
                .unwrap_or(alias),
        )
    }

    /// Key of the catalog `[versions]` entry derived from the artifact id
    pub fn version_key(&self) -> Option<String> {
        self.artifact
            .as_ref()
            .map(|artifact| format!("{}-version", artifact))
    }

    /// Whether the record belongs to the given group
    pub fn has_group(&self, group: &str) -> bool {
        self.group.as_deref() == Some(group)
    }

    /// Reassembles the `group:artifact[:version]` coordinate
    #[allow(dead_code)]
    pub fn coordinate(&self) -> Option<String> {
        let group = self.group.as_ref()?;
        let artifact = self.artifact.as_ref()?;
        Some(match &self.version {
            Some(version) => format!("{}:{}:{}", group, artifact, version),
            None => format!("{}:{}", group, artifact),
        })
    }
}

/// Ordered mapping from alias name to literal version.
///
/// Inserting an existing key overwrites its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionMap {
    entries: Vec<(String, String)>,
}

impl VersionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from property entries, keeping only keys ending with `suffix`
    pub fn from_properties<I>(properties: I, suffix: &str) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = Self::new();
        for (key, value) in properties {
            if key.ends_with(suffix) {
                map.insert(key, value);
            }
        }
        map
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for VersionMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
