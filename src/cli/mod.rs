use crate::error::Result;
use crate::migrators::{
    MigrationOptions, externalize_build_versions, migrate_to_version_catalog,
};
use crate::utils::shell::DEFAULT_SHELL;
use clap::{Arg, ArgAction, Command};
use log::info;
use std::path::PathBuf;

/// Command line arguments for the Gradle migrator
#[derive(Debug)]
pub struct Args {
    /// Path to the project directory
    pub path: PathBuf,

    /// Directory holding dependencies.gradle and the version catalog
    pub gradle_dir: PathBuf,

    /// Suffix of version alias keys in gradle.properties
    pub version_suffix: String,

    /// Whether to externalize build.gradle versions instead of migrating to a catalog
    pub externalize_versions: bool,

    /// Whether to replace an existing libs.versions.toml
    pub overwrite_catalog: bool,

    /// Whether to print the results without writing files
    pub dry_run: bool,

    /// Whether to stage written files with git
    pub git_add: bool,

    /// Shell used for git commands
    pub shell: String,

    /// Whether to disable automatic restore on error
    pub disable_restore: bool,
}

impl From<&Args> for MigrationOptions {
    fn from(args: &Args) -> Self {
        Self {
            gradle_dir: args.gradle_dir.clone(),
            version_suffix: args.version_suffix.clone(),
            overwrite_catalog: args.overwrite_catalog,
            dry_run: args.dry_run,
            git_add: args.git_add,
            shell: args.shell.clone(),
            restore_enabled: !args.disable_restore,
        }
    }
}

fn build_command() -> Command {
    let mut cmd = Command::new("gradle-migrator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for migrating Gradle projects to version catalogs")
        .long_about(
            "Gradle Migrator converts the dependency declarations of a Gradle project into a \
            libs.versions.toml version catalog. Version aliases from gradle.properties are \
            resolved, and the dependencies block is rewritten to reference the catalog entries. \
            It can also move literal versions of build.gradle into gradle.properties.",
        );

    cmd = cmd.arg(
        Arg::new("PATH")
            .help("The path to the project directory to migrate")
            .long_help(
                "Specifies the root directory of the Gradle project. This is the directory \
                containing build.gradle and gradle.properties.",
            )
            .value_parser(clap::value_parser!(PathBuf))
            .default_value("."),
    );

    cmd = cmd.arg(
        Arg::new("gradle-dir")
            .long("gradle-dir")
            .value_name("NAME")
            .help("Directory holding dependencies.gradle and libs.versions.toml")
            .value_parser(clap::value_parser!(PathBuf))
            .default_value("gradle"),
    );

    cmd = cmd.arg(
        Arg::new("version-suffix")
            .long("version-suffix")
            .value_name("SUFFIX")
            .help("Suffix of version alias keys in gradle.properties")
            .long_help(
                "Only keys of gradle.properties ending with this suffix are used to resolve \
                version aliases. Externalized versions get keys ending with it as well.",
            )
            .value_parser(clap::value_parser!(String))
            .default_value("Version"),
    );

    cmd = cmd.arg(
        Arg::new("externalize-versions")
            .long("externalize-versions")
            .help("Move literal versions of build.gradle into gradle.properties")
            .long_help(
                "Instead of generating a version catalog, rewrites single-quoted dependency \
                coordinates of build.gradle to reference gradle.properties entries and stores \
                the literal versions there. The project version is externalized too.",
            )
            .action(ArgAction::SetTrue),
    );

    cmd = cmd.arg(
        Arg::new("overwrite-catalog")
            .long("overwrite-catalog")
            .help("Replace an existing libs.versions.toml")
            .action(ArgAction::SetTrue),
    );

    cmd = cmd.arg(
        Arg::new("dry-run")
            .long("dry-run")
            .help("Print the generated content without writing any file")
            .action(ArgAction::SetTrue),
    );

    cmd = cmd.arg(
        Arg::new("git-add")
            .long("git-add")
            .help("Stage the written files with git")
            .action(ArgAction::SetTrue),
    );

    cmd = cmd.arg(
        Arg::new("shell")
            .long("shell")
            .value_name("PATH")
            .help("Shell used to run git commands")
            .value_parser(clap::value_parser!(String))
            .default_value(DEFAULT_SHELL),
    );

    cmd = cmd.arg(
        Arg::new("disable-restore")
            .long("disable-restore")
            .help("Disable automatic file restore on error")
            .long_help(
                "When this flag is set, the migrator will not attempt to restore files to their \
                original state if an error occurs while writing them. This can be useful when \
                you want to inspect the partial migration state.",
            )
            .action(ArgAction::SetTrue),
    );

    let after_help = "EXAMPLES:
# Migrate the project in the current directory to a version catalog
gradle-migrator .

# Show the generated catalog without touching any file
gradle-migrator . --dry-run

# Replace an existing catalog and stage the result with git
gradle-migrator . --overwrite-catalog --git-add

# Move literal build.gradle versions into gradle.properties
gradle-migrator . --externalize-versions";

    cmd.after_help(after_help)
}

/// Configures and runs the CLI
pub fn run() -> Result<Args> {
    let matches = build_command().get_matches();

    let args = Args {
        path: matches
            .get_one::<PathBuf>("PATH")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        gradle_dir: matches
            .get_one::<PathBuf>("gradle-dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("gradle")),
        version_suffix: matches
            .get_one::<String>("version-suffix")
            .cloned()
            .unwrap_or_else(|| "Version".to_string()),
        externalize_versions: matches.get_flag("externalize-versions"),
        overwrite_catalog: matches.get_flag("overwrite-catalog"),
        dry_run: matches.get_flag("dry-run"),
        git_add: matches.get_flag("git-add"),
        shell: matches
            .get_one::<String>("shell")
            .cloned()
            .unwrap_or_else(|| DEFAULT_SHELL.to_string()),
        disable_restore: matches.get_flag("disable-restore"),
    };

    execute(&args)?;
    Ok(args)
}

/// Execute the migration with the provided arguments
pub fn execute(args: &Args) -> Result<()> {
    info!("Starting Gradle migrator...");
    info!("Migrating project at: {}", args.path.display());

    let options = MigrationOptions::from(args);

    if args.externalize_versions {
        let report = externalize_build_versions(&args.path, &options)?;
        if args.dry_run {
            println!("{}", report.dependencies_block);
            println!();
            print!(
                "{}",
                crate::utils::properties::format_properties(report.properties.iter())
            );
        }
        info!(
            "Externalized {} versions into gradle.properties",
            report.properties.len()
        );
    } else {
        let report = migrate_to_version_catalog(&args.path, &options)?;
        if args.dry_run {
            print!("{}", report.dependencies_block);
            println!();
            print!("{}", report.catalog);
        }
        info!(
            "Migrated {} dependency declarations, {} lines skipped",
            report.records.len(),
            report.skipped_lines.len()
        );
    }

    info!("Migration completed successfully!");
    Ok(())
}
