use crate::error::{Error, Result};
use crate::models::{DependencyRecord, VersionMap};
use crate::utils::properties::upsert_properties;
use crate::utils::{FileTrackerGuard, check_git_requirements, git, read_properties, shell};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub mod catalog;
pub mod dependencies_block;
pub mod dependency_line;
pub mod externalize;
pub mod section;

/// Name of the block holding dependency declarations
pub const DEPENDENCIES_SECTION: &str = "dependencies";

/// Dependency declarations extracted from the build script
pub const DEPENDENCIES_FILE: &str = "dependencies.gradle";

/// Generated version catalog
pub const CATALOG_FILE: &str = "libs.versions.toml";

/// Properties file holding version aliases
pub const PROPERTIES_FILE: &str = "gradle.properties";

/// Main build script
pub const BUILD_FILE: &str = "build.gradle";

/// Settings shared by both migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Directory, relative to the project, holding the dependencies file and the catalog
    pub gradle_dir: PathBuf,

    /// Suffix of version alias keys in gradle.properties
    pub version_suffix: String,

    /// Replace an existing catalog instead of keeping it
    pub overwrite_catalog: bool,

    /// Compute everything but write nothing
    pub dry_run: bool,

    /// Stage written files with git
    pub git_add: bool,

    /// Shell used to run git commands
    pub shell: String,

    /// Restore written files when the migration fails
    pub restore_enabled: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            gradle_dir: PathBuf::from("gradle"),
            version_suffix: "Version".to_string(),
            overwrite_catalog: false,
            dry_run: false,
            git_add: false,
            shell: shell::DEFAULT_SHELL.to_string(),
            restore_enabled: true,
        }
    }
}

impl MigrationOptions {
    pub fn dependencies_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.gradle_dir).join(DEPENDENCIES_FILE)
    }

    pub fn catalog_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.gradle_dir).join(CATALOG_FILE)
    }
}

/// Outcome of a version catalog migration
#[derive(Debug, Clone)]
pub struct MigrationReport {
    /// Parsed declarations with resolved versions
    pub records: Vec<DependencyRecord>,
    /// Generated block referencing catalog entries
    pub dependencies_block: String,
    /// Generated catalog text
    pub catalog: String,
    /// Lines of the dependencies block that could not be migrated
    pub skipped_lines: Vec<String>,
    /// Files written, empty on a dry run
    pub written: Vec<PathBuf>,
}

/// Outcome of a build file version externalization
#[derive(Debug, Clone)]
pub struct ExternalizeReport {
    /// Properties created from literal versions
    pub properties: VersionMap,
    /// Rewritten dependencies block of the build file
    pub dependencies_block: String,
    /// Files written, empty on a dry run
    pub written: Vec<PathBuf>,
}

/// Migrates `dependencies.gradle` to a version catalog.
///
/// The catalog and the new dependencies block are derived and validated in
/// memory first. Files are written afterwards and restored if a write fails.
pub fn migrate_to_version_catalog(
    project_dir: &Path,
    options: &MigrationOptions,
) -> Result<MigrationReport> {
    let dependencies_path = options.dependencies_path(project_dir);
    let catalog_path = options.catalog_path(project_dir);

    if !dependencies_path.exists() {
        return Err(Error::FileNotFound {
            path: dependencies_path,
        });
    }
    let content = read_file(&dependencies_path)?;
    let version_map = load_version_map(project_dir, &options.version_suffix)?;

    let section_content = section::get_content_of(DEPENDENCIES_SECTION, &content)?;
    let parsed = dependency_line::parse_dependency_section(section_content, &version_map)?;
    let records = parsed.records;
    info!("Parsed {} dependency declarations", records.len());
    if !parsed.skipped_lines.is_empty() {
        warn!(
            "{} lines of the dependencies block are not declarations and will be removed, review the migrated file",
            parsed.skipped_lines.len()
        );
    }

    let dependencies_block = dependencies_block::generate_dependencies_block(&records);
    let catalog = catalog::generate_catalog(&records);
    let doc = crate::utils::toml::validate_catalog(&catalog)?;
    info!(
        "Generated catalog with {} versions and {} libraries",
        crate::utils::toml::count_entries(&doc, "versions"),
        crate::utils::toml::count_entries(&doc, "libraries")
    );

    let new_content =
        section::replace_section(DEPENDENCIES_SECTION, &content, dependencies_block.trim_end())?;

    let mut report = MigrationReport {
        records,
        dependencies_block,
        catalog,
        skipped_lines: parsed.skipped_lines,
        written: Vec::new(),
    };
    if options.dry_run {
        info!("Dry run, no files written");
        return Ok(report);
    }

    let mut file_tracker = FileTrackerGuard::new_with_restore(options.restore_enabled);
    let result = (|| -> Result<()> {
        file_tracker.write(&dependencies_path, &new_content)?;

        if catalog_path.exists() && !options.overwrite_catalog {
            info!(
                "{} already exists, keeping it (use --overwrite-catalog to replace it)",
                catalog_path.display()
            );
        } else {
            file_tracker.write(&catalog_path, &report.catalog)?;
        }
        Ok(())
    })();
    report.written = finish_writes(file_tracker, result, options)?;

    if options.git_add {
        stage_files(project_dir, &report.written, options);
    }

    Ok(report)
}

/// Moves literal versions of `build.gradle` into `gradle.properties`
pub fn externalize_build_versions(
    project_dir: &Path,
    options: &MigrationOptions,
) -> Result<ExternalizeReport> {
    let build_path = project_dir.join(BUILD_FILE);
    let properties_path = project_dir.join(PROPERTIES_FILE);

    if !build_path.exists() {
        return Err(Error::FileNotFound { path: build_path });
    }
    let content = read_file(&build_path)?;

    let section_content = section::get_content_of(DEPENDENCIES_SECTION, &content)?;
    let mut externalized =
        externalize::externalize_section(section_content, &options.version_suffix);
    let dependencies_block = externalize::externalized_dependencies_block(&externalized);
    section::ensure_balanced(DEPENDENCIES_SECTION, &dependencies_block)?;
    let mut new_content =
        section::replace_section(DEPENDENCIES_SECTION, &content, &dependencies_block)?;

    if let Some(rewritten) =
        externalize::externalize_project_version(&new_content, &mut externalized.properties)
    {
        info!("Externalized project version");
        new_content = rewritten;
    }
    section::section_bounds(DEPENDENCIES_SECTION, &new_content)?;
    info!(
        "Externalized {} versions from {}",
        externalized.properties.len(),
        build_path.display()
    );

    let mut report = ExternalizeReport {
        properties: externalized.properties,
        dependencies_block,
        written: Vec::new(),
    };
    if options.dry_run {
        info!("Dry run, no files written");
        return Ok(report);
    }

    let existing_properties = if properties_path.exists() {
        read_file(&properties_path)?
    } else {
        String::new()
    };
    let new_properties = upsert_properties(&existing_properties, report.properties.iter());

    let mut file_tracker = FileTrackerGuard::new_with_restore(options.restore_enabled);
    let result = (|| -> Result<()> {
        file_tracker.write(&build_path, &new_content)?;
        if !report.properties.is_empty() {
            file_tracker.write(&properties_path, &new_properties)?;
        }
        Ok(())
    })();
    report.written = finish_writes(file_tracker, result, options)?;

    if options.git_add {
        stage_files(project_dir, &report.written, options);
    }

    Ok(report)
}

/// Loads the version aliases of `gradle.properties`, empty when the file is missing
fn load_version_map(project_dir: &Path, suffix: &str) -> Result<VersionMap> {
    let properties_path = project_dir.join(PROPERTIES_FILE);
    if !properties_path.exists() {
        info!(
            "No {} found, version aliases stay unresolved",
            properties_path.display()
        );
        return Ok(VersionMap::new());
    }

    let version_map = VersionMap::from_properties(read_properties(&properties_path)?, suffix);
    info!(
        "Loaded {} version aliases from {}",
        version_map.len(),
        properties_path.display()
    );
    Ok(version_map)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::FileOperation {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })
}

/// Rolls the tracked files back when writing failed, returns the written paths otherwise
fn finish_writes(
    mut file_tracker: FileTrackerGuard,
    result: Result<()>,
    options: &MigrationOptions,
) -> Result<Vec<PathBuf>> {
    if let Err(error) = result {
        if !options.restore_enabled {
            return Err(Error::General(format!(
                "{}\nNote: Automatic restore is disabled, written files were left as they are.",
                error
            )));
        }

        info!("An error occurred during migration. Rolling back changes...");
        file_tracker.force_rollback();
        drop(file_tracker);
        return Err(Error::General(format!(
            "{}\nNote: File changes have been rolled back to their original state.",
            error
        )));
    }

    Ok(file_tracker.tracked_paths())
}

/// Stages written files with git; failures are only reported
fn stage_files(project_dir: &Path, written: &[PathBuf], options: &MigrationOptions) {
    if written.is_empty() {
        return;
    }
    if let Err(e) = check_git_requirements() {
        warn!("Skipping git staging: {}", e);
        return;
    }

    let files: Vec<String> = written
        .iter()
        .map(|path| {
            path.strip_prefix(project_dir)
                .unwrap_or(path)
                .display()
                .to_string()
        })
        .collect();
    let execution_path = project_dir.to_string_lossy();
    if let Err(e) = git::add_files_to_git(&files, &options.shell, &execution_path) {
        warn!("Failed to stage migrated files: {}", e);
    }
}
