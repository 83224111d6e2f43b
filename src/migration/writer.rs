// ABOUTME: Names and writes the per-table migration file triple
// ABOUTME: Writes dump, down, and up files in that order, stopping at the first failure

use super::classify::MigrationScripts;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Paths of the three artifacts generated for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFiles {
    pub dump: PathBuf,
    pub up: PathBuf,
    pub down: PathBuf,
}

impl MigrationFiles {
    /// `<dir>/<version>_<table>.{dump,up,down}.sql`
    pub fn new(dir: &Path, version: &str, table: &str) -> Self {
        let stem = format!("{}_{}", version, table);
        Self {
            dump: dir.join(format!("{}.dump.sql", stem)),
            up: dir.join(format!("{}.up.sql", stem)),
            down: dir.join(format!("{}.down.sql", stem)),
        }
    }
}

/// Create the target folder (and parents) if it does not exist yet
pub fn ensure_target_folder(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create target folder {}", dir.display()))
}

/// Write the raw dump and both scripts.
///
/// Files are written directly, not through a temp file, and nothing already
/// written is removed when a later write fails.
pub fn write_migration(
    files: &MigrationFiles,
    raw_dump: &[u8],
    scripts: &MigrationScripts,
) -> Result<()> {
    write_file(&files.dump, raw_dump)?;
    write_file(&files.down, &scripts.down)?;
    write_file(&files.up, &scripts.up)?;
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}
