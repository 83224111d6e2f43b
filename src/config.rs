// ABOUTME: Immutable generator configuration built once at startup
// ABOUTME: Resolves CLI flags, an optional TOML config file, and built-in defaults

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_USER: &str = "user";
pub const DEFAULT_DB_PASSWORD: &str = "pass";
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5434;
pub const DEFAULT_DB_NAME: &str = "user";
pub const DEFAULT_DB_SCHEMA: &str = "public";
pub const DEFAULT_TARGET_FOLDER: &str = "migrations";
pub const DEFAULT_PSQL_BIN: &str = "psql";
pub const DEFAULT_PG_DUMP_BIN: &str = "pg_dump";

/// Tables never turned into migrations unless the skip-list is overridden
pub const DEFAULT_SKIP_TABLES: &[&str] = &["schema_migrations"];

/// Connection parameters handed to every `psql` / `pg_dump` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub schema: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            database: DEFAULT_DB_NAME.to_string(),
            schema: DEFAULT_DB_SCHEMA.to_string(),
        }
    }
}

/// Everything a generation run needs, passed by reference to each operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub connection: ConnectionSettings,
    pub target_folder: PathBuf,
    pub skip_tables: Vec<String>,
    pub psql_bin: String,
    pub pg_dump_bin: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            target_folder: PathBuf::from(DEFAULT_TARGET_FOLDER),
            skip_tables: DEFAULT_SKIP_TABLES.iter().map(|t| t.to_string()).collect(),
            psql_bin: DEFAULT_PSQL_BIN.to_string(),
            pg_dump_bin: DEFAULT_PG_DUMP_BIN.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Whether `table` is on the skip-list
    pub fn is_skipped_table(&self, table: &str) -> bool {
        self.skip_tables.iter().any(|t| t == table)
    }

    /// Build the final configuration.
    ///
    /// Precedence per setting: explicit CLI value, then the config file, then
    /// the built-in default.
    pub fn resolve(overrides: ConfigOverrides, file: Option<FileConfig>) -> Self {
        let file = file.unwrap_or_default();
        let db = file.database;
        let tools = file.tools;
        let defaults = Self::default();

        Self {
            connection: ConnectionSettings {
                user: pick(overrides.user, db.user, defaults.connection.user),
                password: pick(overrides.password, db.password, defaults.connection.password),
                host: pick(overrides.host, db.host, defaults.connection.host),
                port: pick(overrides.port, db.port, defaults.connection.port),
                database: pick(overrides.database, db.name, defaults.connection.database),
                schema: pick(overrides.schema, db.schema, defaults.connection.schema),
            },
            target_folder: pick(
                overrides.target_folder,
                file.target_folder,
                defaults.target_folder,
            ),
            skip_tables: pick(overrides.skip_tables, file.skip_tables, defaults.skip_tables),
            psql_bin: pick(overrides.psql_bin, tools.psql, defaults.psql_bin),
            pg_dump_bin: pick(overrides.pg_dump_bin, tools.pg_dump, defaults.pg_dump_bin),
        }
    }
}

fn pick<T>(cli: Option<T>, file: Option<T>, default: T) -> T {
    cli.or(file).unwrap_or(default)
}

/// Values given explicitly on the command line; `None` means "not passed"
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub target_folder: Option<PathBuf>,
    pub skip_tables: Option<Vec<String>>,
    pub psql_bin: Option<String>,
    pub pg_dump_bin: Option<String>,
}

/// On-disk TOML configuration; every key is optional
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    database: DatabaseSection,
    #[serde(default)]
    tools: ToolsSection,
    target_folder: Option<PathBuf>,
    skip_tables: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DatabaseSection {
    user: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    name: Option<String>,
    schema: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ToolsSection {
    psql: Option<String>,
    pg_dump: Option<String>,
}

pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let parsed: FileConfig = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse TOML config at {}", path.display()))?;
    Ok(parsed)
}
