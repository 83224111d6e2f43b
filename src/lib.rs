// ABOUTME: Library module for pg-migration-gen
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod config;
pub mod migration;
pub mod postgres;
pub mod utils;
