// ABOUTME: CLI entry point for pg-migration-gen
// ABOUTME: Parses flags, builds the immutable configuration, and runs generation

use clap::Parser;
use pg_migration_gen::commands;
use pg_migration_gen::config::{load_config_file, ConfigOverrides, GeneratorConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pg-migration-gen")]
#[command(
    about = "Generate per-table up/down SQL migrations from a PostgreSQL schema",
    long_about = None
)]
struct Cli {
    /// Database user [default: user]
    #[arg(long)]
    dbuser: Option<String>,
    /// Database password, passed to psql and pg_dump as PGPASSWORD [default: pass]
    #[arg(long)]
    dbpass: Option<String>,
    /// Database host [default: localhost]
    #[arg(long)]
    dbhost: Option<String>,
    /// Database port [default: 5434]
    #[arg(long)]
    dbport: Option<u16>,
    /// Database name [default: user]
    #[arg(long)]
    dbname: Option<String>,
    /// Schema whose base tables are turned into migrations [default: public]
    #[arg(long)]
    dbschema: Option<String>,
    /// Where to put generated files [default: migrations]
    #[arg(long)]
    target_folder: Option<PathBuf>,
    /// Tables to leave out (comma-separated) [default: schema_migrations]
    #[arg(long, value_delimiter = ',')]
    skip_tables: Option<Vec<String>>,
    /// psql executable name or path [default: psql]
    #[arg(long)]
    psql_bin: Option<String>,
    /// pg_dump executable name or path [default: pg_dump]
    #[arg(long)]
    pg_dump_bin: Option<String>,
    /// TOML file with defaults; explicit flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<GeneratorConfig> {
        let file = self
            .config
            .as_deref()
            .map(load_config_file)
            .transpose()?;

        let overrides = ConfigOverrides {
            user: self.dbuser,
            password: self.dbpass,
            host: self.dbhost,
            port: self.dbport,
            database: self.dbname,
            schema: self.dbschema,
            target_folder: self.target_folder,
            skip_tables: self.skip_tables,
            psql_bin: self.psql_bin,
            pg_dump_bin: self.pg_dump_bin,
        };

        Ok(GeneratorConfig::resolve(overrides, file))
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.into_config() {
        Ok(config) => commands::generate(&config).await.map(|_| ()),
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
