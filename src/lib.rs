// Declare modules for the library build
pub mod cli;
pub mod error;
pub mod migrators;
pub mod models;
pub mod utils;

// Expose execute function for library use
pub fn execute_with_args(args: &cli::Args) -> crate::error::Result<()> {
    use env_logger::{Builder, Env};

    // Initialize logger with default info level
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .try_init();

    cli::execute(args)
}
