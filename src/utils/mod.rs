pub mod case;
pub mod file_ops;
pub mod git;
pub mod properties;
pub mod shell;
pub(crate) mod toml;

pub use file_ops::FileTrackerGuard;
pub use git::check_git_requirements;
#[allow(unused_imports)]
pub use properties::parse_properties;
pub use properties::read_properties;
