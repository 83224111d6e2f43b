// ABOUTME: Enumerates the base tables of a schema through psql
// ABOUTME: Parses psql's aligned table output into an ordered list of table names

use crate::config::GeneratorConfig;
use crate::postgres::{output_combined, psql_command};
use anyhow::Result;

/// Header lines psql prints before the first row (column title, separator)
const HEADER_LINES: usize = 2;

/// Footer lines after the last row: `(N rows)`, a blank line, and the empty
/// string left by the final newline
const FOOTER_LINES: usize = 3;

/// Query listing the base tables of `schema`.
///
/// The schema name is used as-is inside a string literal, with embedded
/// single quotes doubled.
pub fn table_list_query(schema: &str) -> String {
    format!(
        "SELECT table_name FROM information_schema.tables WHERE table_schema={} AND table_type='BASE TABLE';",
        quote_literal(schema)
    )
}

/// Render `value` as a standard-conforming SQL string literal
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// List base tables in the configured schema, minus the skip-list
///
/// # Errors
///
/// - psql cannot be started
/// - psql exits non-zero; the error is psql's combined output verbatim
pub async fn list_tables(config: &GeneratorConfig) -> Result<Vec<String>> {
    let schema = &config.connection.schema;
    tracing::info!("Listing tables in schema '{}'", schema);

    let mut cmd = psql_command(config, &table_list_query(schema));
    let output = output_combined(&mut cmd, &config.psql_bin).await?;
    let raw = String::from_utf8_lossy(&output);

    let tables = parse_table_list(&raw, &config.skip_tables);
    tracing::info!("Found {} table(s) in schema '{}'", tables.len(), schema);
    Ok(tables)
}

/// Parse psql's aligned output of a single-column query.
///
/// Only the line layout is relied on: two header lines, one row per line, then
/// three footer lines. Output shorter than five lines yields no tables rather
/// than an error. Names are trimmed and anything in `skip_tables` is dropped.
///
/// ```
/// # use pg_migration_gen::migration::schema::parse_table_list;
/// let raw = " table_name \n------------\n users\n schema_migrations\n(2 rows)\n\n";
/// let skip = vec!["schema_migrations".to_string()];
/// assert_eq!(parse_table_list(raw, &skip), vec!["users"]);
/// ```
pub fn parse_table_list(raw: &str, skip_tables: &[String]) -> Vec<String> {
    let lines: Vec<&str> = raw.split('\n').collect();
    if lines.len() < HEADER_LINES + FOOTER_LINES {
        return Vec::new();
    }

    lines[HEADER_LINES..lines.len() - FOOTER_LINES]
        .iter()
        .map(|line| line.trim())
        .filter(|table| !skip_tables.iter().any(|skip| skip == table))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_skip() -> Vec<String> {
        vec!["schema_migrations".to_string()]
    }

    #[test]
    fn test_table_list_query() {
        assert_eq!(
            table_list_query("public"),
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema='public' AND table_type='BASE TABLE';"
        );
    }

    #[test]
    fn test_parse_psql_output() {
        let raw = "    table_name     \n\
                   -------------------\n \
                   users\n \
                   schema_migrations\n \
                   orders\n \
                   order_items\n\
                   (4 rows)\n\
                   \n";

        assert_eq!(
            parse_table_list(raw, &default_skip()),
            vec!["users", "orders", "order_items"]
        );
    }

    #[test]
    fn test_parse_keeps_result_order() {
        let raw = " table_name \n---\n zeta\n alpha\n mid\n(3 rows)\n\n";
        assert_eq!(parse_table_list(raw, &[]), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_zero_rows() {
        let raw = " table_name \n------------\n(0 rows)\n\n";
        assert!(parse_table_list(raw, &default_skip()).is_empty());
    }

    #[test]
    fn test_parse_short_output_is_empty_not_error() {
        assert!(parse_table_list("", &default_skip()).is_empty());
        assert!(parse_table_list("a\nb\nc\nd", &default_skip()).is_empty());
    }

    #[test]
    fn test_skip_list_is_exact_match_after_trim() {
        let raw = " table_name \n---\n schema_migrations \n schema_migrations_old\n(2 rows)\n\n";
        assert_eq!(
            parse_table_list(raw, &default_skip()),
            vec!["schema_migrations_old"]
        );
    }

    #[test]
    fn test_custom_skip_list() {
        let raw = " table_name \n---\n users\n ar_internal_metadata\n schema_migrations\n(3 rows)\n\n";
        let skip = vec!["ar_internal_metadata".to_string()];
        assert_eq!(
            parse_table_list(raw, &skip),
            vec!["users", "schema_migrations"]
        );
    }

    #[test]
    fn test_table_list_query_quotes_schema() {
        assert_eq!(
            table_list_query("o'brien"),
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema='o''brien' AND table_type='BASE TABLE';"
        );
        assert!(table_list_query("tenant-a").contains("table_schema='tenant-a'"));
        assert!(table_list_query("café").contains("table_schema='café'"));
        // Used exactly as configured, surrounding whitespace included
        assert!(table_list_query(" public ").contains("table_schema=' public '"));
        assert!(table_list_query("x'; DROP SCHEMA public; --")
            .contains("table_schema='x''; DROP SCHEMA public; --'"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_tables_accepts_quoted_schema_names() {
        // `true` exits 0 without output, so any schema reaching psql lists nothing
        let mut config = GeneratorConfig {
            psql_bin: "true".to_string(),
            ..Default::default()
        };

        for schema in ["tenant-a", "o'brien", "Mixed Case"] {
            config.connection.schema = schema.to_string();
            let tables = list_tables(&config).await.unwrap();
            assert!(tables.is_empty(), "schema {}", schema);
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_list_tables_against_server() {
        let mut config = GeneratorConfig::default();
        if let Ok(host) = std::env::var("TEST_DB_HOST") {
            config.connection.host = host;
        }
        if let Ok(password) = std::env::var("TEST_DB_PASSWORD") {
            config.connection.password = password;
        }

        let tables = list_tables(&config).await.unwrap();
        assert!(!tables.iter().any(|t| t == "schema_migrations"));
        println!("Found {} tables", tables.len());
    }
}
