use std::fmt;
use std::io;
use std::path::PathBuf;

/// Custom error type for Gradle migrator operations
#[derive(Debug)]
pub enum Error {
    /// I/O errors (file access, permissions, etc.)
    Io(io::Error),

    /// TOML parsing errors
    Toml(toml_edit::TomlError),

    /// A named brace-delimited section does not occur in the build file
    SectionNotFound { section: String },

    /// A required input file is missing
    FileNotFound { path: PathBuf },

    /// The braces of a section never balance before the input ends
    UnbalancedBraces { section: String },

    /// A dependency declaration could not be decomposed
    MalformedInput(String),

    /// The generated catalog is not a usable version catalog
    InvalidCatalog(String),

    /// Errors from shell command execution
    ShellCommand(String),

    /// Errors from git command execution
    GitCommand(String),

    /// Errors related to file operations
    FileOperation { path: PathBuf, message: String },

    /// General errors
    General(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Toml(err) => write!(f, "TOML parsing error: {}", err),
            Error::SectionNotFound { section } => write!(f, "Section not found: {}", section),
            Error::FileNotFound { path } => {
                write!(f, "Could not find file {}", path.display())
            }
            Error::UnbalancedBraces { section } => write!(
                f,
                "No matching closing brace found for section '{}'",
                section
            ),
            Error::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            Error::InvalidCatalog(msg) => write!(f, "Invalid version catalog: {}", msg),
            Error::ShellCommand(msg) => write!(f, "Shell command failed: {}", msg),
            Error::GitCommand(msg) => write!(f, "Git command failed: {}", msg),
            Error::FileOperation { path, message } => {
                write!(f, "File operation error on {}: {}", path.display(), message)
            }
            Error::General(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error {
    /// Check if the error message contains a specific string
    #[allow(dead_code)]
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            Error::FileOperation { path: _, message } => message.contains(needle),
            _ => self.to_string().contains(needle),
        }
    }

    /// Whether the error means something required was absent
    #[allow(dead_code)]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::SectionNotFound { .. } | Error::FileNotFound { .. }
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Toml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml_edit::TomlError> for Error {
    fn from(err: toml_edit::TomlError) -> Self {
        Error::Toml(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::General(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::General(err.to_string())
    }
}

/// Result type alias for Gradle migrator operations
pub type Result<T> = std::result::Result<T, Error>;
