// ABOUTME: Wrapper for pg_dump to export the schema of a single table
// ABOUTME: Returns the raw dump bytes, stdout and stderr combined

use crate::config::GeneratorConfig;
use crate::postgres::{output_combined, pg_dump_command};
use anyhow::Result;

/// Dump the schema (DDL) of one table as a clean, schema-only script.
///
/// The returned bytes are exactly what pg_dump wrote, warnings included.
/// A non-zero exit returns that same text as the error message.
pub async fn dump_table(config: &GeneratorConfig, table: &str) -> Result<Vec<u8>> {
    tracing::debug!("Dumping schema for table '{}'", table);

    let mut cmd = pg_dump_command(config, table);
    let dump = output_combined(&mut cmd, &config.pg_dump_bin).await?;

    tracing::debug!("pg_dump produced {} bytes for '{}'", dump.len(), table);
    Ok(dump)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_dump_table() {
        let mut config = GeneratorConfig::default();
        if let Ok(host) = std::env::var("TEST_DB_HOST") {
            config.connection.host = host;
        }
        if let Ok(password) = std::env::var("TEST_DB_PASSWORD") {
            config.connection.password = password;
        }
        let table = std::env::var("TEST_TABLE").unwrap();

        let dump = dump_table(&config, &table).await.unwrap();
        let text = String::from_utf8_lossy(&dump);
        assert!(text.contains("CREATE TABLE"));
        assert!(text.contains("DROP TABLE"));
    }

    #[tokio::test]
    async fn test_dump_table_missing_pg_dump() {
        let config = GeneratorConfig {
            pg_dump_bin: "pg-migration-gen-no-such-pg-dump".to_string(),
            ..Default::default()
        };

        let err = dump_table(&config, "users").await.unwrap_err();
        assert!(err
            .to_string()
            .contains("Failed to execute pg-migration-gen-no-such-pg-dump"));
    }
}
