// ABOUTME: Migration generation building blocks
// ABOUTME: Table enumeration, per-table dumps, line classification, and file output

pub mod classify;
pub mod dump;
pub mod schema;
pub mod writer;

pub use classify::{classify_line, split_dump, LineKind, MigrationScripts};
pub use dump::dump_table;
pub use schema::{list_tables, parse_table_list};
pub use writer::{ensure_target_folder, write_migration, MigrationFiles};
