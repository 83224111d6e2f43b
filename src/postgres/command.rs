// ABOUTME: Builds psql and pg_dump invocations from the generator configuration
// ABOUTME: Runs them with stdout and stderr captured into one combined buffer

use crate::config::{ConnectionSettings, GeneratorConfig};
use anyhow::{anyhow, Context, Result};
use std::io::{Read, Seek, SeekFrom};
use std::process::Stdio;
use tokio::process::Command;

/// pg_dump flags producing a schema-only, drop-before-create dump without
/// ownership, privileges, comments or other cluster-specific noise
pub const PG_DUMP_SCHEMA_ARGS: &[&str] = &[
    "--no-comments",
    "--no-publications",
    "--no-security-labels",
    "--no-subscriptions",
    "--no-synchronized-snapshots",
    "--no-tablespaces",
    "--no-unlogged-table-data",
    "--no-owner",
    "--no-privileges",
    "--no-blobs",
    "--schema-only",
    "--clean",
];

/// Environment variable libpq clients read the password from
pub const PASSWORD_ENV_VAR: &str = "PGPASSWORD";

/// Arguments for running a single query through psql
pub fn psql_args(conn: &ConnectionSettings, query: &str) -> Vec<String> {
    vec![
        "-h".to_string(),
        conn.host.clone(),
        "-p".to_string(),
        conn.port.to_string(),
        "-U".to_string(),
        conn.user.clone(),
        "-d".to_string(),
        conn.database.clone(),
        "-c".to_string(),
        query.to_string(),
    ]
}

/// Arguments for dumping the schema of exactly one table
pub fn pg_dump_args(conn: &ConnectionSettings, table: &str) -> Vec<String> {
    let mut args: Vec<String> = PG_DUMP_SCHEMA_ARGS.iter().map(|a| a.to_string()).collect();
    args.extend([
        "--username".to_string(),
        conn.user.clone(),
        "--port".to_string(),
        conn.port.to_string(),
        "--host".to_string(),
        conn.host.clone(),
        "--table".to_string(),
        table.to_string(),
        conn.database.clone(),
    ]);
    args
}

pub fn psql_command(config: &GeneratorConfig, query: &str) -> Command {
    tool_command(
        &config.psql_bin,
        psql_args(&config.connection, query),
        &config.connection.password,
    )
}

pub fn pg_dump_command(config: &GeneratorConfig, table: &str) -> Command {
    tool_command(
        &config.pg_dump_bin,
        pg_dump_args(&config.connection, table),
        &config.connection.password,
    )
}

fn tool_command(program: &str, args: Vec<String>, password: &str) -> Command {
    tracing::debug!("Prepared command: {} {}", program, args.join(" "));

    let mut cmd = Command::new(program);
    cmd.args(args).env(PASSWORD_ENV_VAR, password);
    cmd
}

/// Run a command to completion and return everything it wrote to stdout and
/// stderr, interleaved in write order.
///
/// Both streams are pointed at the same anonymous temp file, so the result
/// matches what a terminal would have shown.
///
/// # Errors
///
/// - The program cannot be spawned (not installed, not executable)
/// - The program exits non-zero: the error message is the captured output,
///   verbatim and without any added wording
pub async fn output_combined(cmd: &mut Command, program: &str) -> Result<Vec<u8>> {
    let mut capture =
        tempfile::tempfile().context("Failed to create capture file for subprocess output")?;

    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(
            capture
                .try_clone()
                .context("Failed to share capture file with subprocess stdout")?,
        ))
        .stderr(Stdio::from(
            capture
                .try_clone()
                .context("Failed to share capture file with subprocess stderr")?,
        ));

    let status = cmd.status().await.with_context(|| {
        format!(
            "Failed to execute {}. Is PostgreSQL client installed?\n\
             Install with:\n\
             - Ubuntu/Debian: sudo apt-get install postgresql-client\n\
             - macOS: brew install postgresql\n\
             - RHEL/CentOS: sudo yum install postgresql",
            program
        )
    })?;

    let mut output = Vec::new();
    capture
        .seek(SeekFrom::Start(0))
        .and_then(|_| capture.read_to_end(&mut output))
        .with_context(|| format!("Failed to read captured output of {}", program))?;

    if !status.success() {
        tracing::debug!("{} exited with {}", program, status);
        return Err(anyhow!(String::from_utf8_lossy(&output).into_owned()));
    }

    Ok(output)
}
