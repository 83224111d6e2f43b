// ABOUTME: Generate command implementation
// ABOUTME: Enumerates tables and writes a dump/up/down file triple for each, in order

use crate::config::GeneratorConfig;
use crate::migration::{
    dump_table, ensure_target_folder, list_tables, split_dump, write_migration, MigrationFiles,
};
use crate::utils::{check_required_tools, sanitize_identifier};
use anyhow::{Context, Result};

/// Generate migrations for every table in the configured schema
///
/// Steps:
/// 1. Check that psql and pg_dump can be found
/// 2. Create the target folder if needed
/// 3. List base tables in the schema, minus the skip-list
/// 4. For table `i` (0-indexed), write `<i+1>_<table>.{dump,down,up}.sql`
///
/// Tables are handled strictly one after another. The first failure stops the
/// run; files already written for earlier tables are left in place.
///
/// # Returns
///
/// The artifact paths written, in table order.
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use pg_migration_gen::commands::generate;
/// # use pg_migration_gen::config::GeneratorConfig;
/// # async fn example() -> Result<()> {
/// let config = GeneratorConfig::default();
/// let written = generate(&config).await?;
/// println!("Wrote {} migrations", written.len());
/// # Ok(())
/// # }
/// ```
pub async fn generate(config: &GeneratorConfig) -> Result<Vec<MigrationFiles>> {
    tracing::info!("Starting migration generation...");

    check_required_tools(&[config.psql_bin.as_str(), config.pg_dump_bin.as_str()])?;
    ensure_target_folder(&config.target_folder)?;

    let tables = list_tables(config).await.with_context(|| {
        format!(
            "Failed to list tables in schema '{}'",
            config.connection.schema
        )
    })?;

    let mut written = Vec::with_capacity(tables.len());
    for (i, table) in tables.iter().enumerate() {
        let version = (i + 1).to_string();
        tracing::info!("Generate migration for '{}'", sanitize_identifier(table));

        let files = generate_migration(config, &version, table)
            .await
            .with_context(|| {
                format!(
                    "Failed to generate migration for table '{}'",
                    sanitize_identifier(table)
                )
            })?;
        written.push(files);
    }

    tracing::info!(
        "✓ Generated {} migration(s) in {}",
        written.len(),
        config.target_folder.display()
    );
    Ok(written)
}

/// Dump one table, split the dump, and write its three files
///
/// Nothing is written for the table if pg_dump fails.
pub async fn generate_migration(
    config: &GeneratorConfig,
    version: &str,
    table: &str,
) -> Result<MigrationFiles> {
    let raw = dump_table(config, table).await?;
    let scripts = split_dump(&raw);

    let files = MigrationFiles::new(&config.target_folder, version, table);
    write_migration(&files, &raw, &scripts)?;

    tracing::debug!(
        "Migration {} for '{}': {} up bytes, {} down bytes",
        version,
        sanitize_identifier(table),
        scripts.up.len(),
        scripts.down.len()
    );
    Ok(files)
}
