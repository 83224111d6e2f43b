// ABOUTME: PostgreSQL client tool plumbing
// ABOUTME: Exposes psql/pg_dump command builders and combined-output execution

pub mod command;

pub use command::{output_combined, pg_dump_command, psql_command};
