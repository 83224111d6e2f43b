// ABOUTME: Command implementations
// ABOUTME: Exports the migration generation pipeline

pub mod generate;

pub use generate::{generate, generate_migration};
