// ABOUTME: Utility functions for preflight validation
// ABOUTME: Checks client tool availability and sanitizes identifiers for display

use anyhow::{bail, Result};
use which::which;

/// Check that the PostgreSQL client tools used by the generator are available
///
/// Each entry may be a bare program name resolved through `PATH` or a path to
/// an executable.
///
/// # Arguments
///
/// * `tools` - Program names or paths, e.g. `["psql", "pg_dump"]`
///
/// # Errors
///
/// Returns an error with installation instructions listing every tool that
/// could not be found.
///
/// # Examples
///
/// ```no_run
/// # use pg_migration_gen::utils::check_required_tools;
/// # use anyhow::Result;
/// # fn example() -> Result<()> {
/// check_required_tools(&["psql", "pg_dump"])?;
/// # Ok(())
/// # }
/// ```
pub fn check_required_tools(tools: &[&str]) -> Result<()> {
    let missing: Vec<&str> = tools
        .iter()
        .copied()
        .filter(|tool| which(tool).is_err())
        .collect();

    if !missing.is_empty() {
        bail!(
            "Missing required PostgreSQL client tools: {}\n\
             \n\
             Please install PostgreSQL client tools:\n\
             - Ubuntu/Debian: sudo apt-get install postgresql-client\n\
             - macOS: brew install postgresql\n\
             - RHEL/CentOS: sudo yum install postgresql\n\
             - Windows: Download from https://www.postgresql.org/download/windows/",
            missing.join(", ")
        );
    }

    Ok(())
}

/// Sanitize an identifier for display in logs and error messages
///
/// Table names come straight from `psql` output, so control characters are
/// removed and the length is capped at 100 characters.
///
/// # Examples
///
/// ```
/// # use pg_migration_gen::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("users"), "users");
/// assert_eq!(sanitize_identifier("us\x1b[2Jers"), "us[2Jers");
/// ```
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_required_tools_reports_missing() {
        let err = check_required_tools(&["pg-migration-gen-missing-tool"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Missing required PostgreSQL client tools"));
        assert!(msg.contains("pg-migration-gen-missing-tool"));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_required_tools_finds_present_programs() {
        assert!(check_required_tools(&["sh"]).is_ok());
        assert!(check_required_tools(&["/bin/sh"]).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_check_required_tools_lists_only_missing() {
        let msg = check_required_tools(&["sh", "pg-migration-gen-missing-tool"])
            .unwrap_err()
            .to_string();
        assert!(msg.contains("tools: pg-migration-gen-missing-tool\n"));
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("normal_table"), "normal_table");
        assert_eq!(sanitize_identifier("table\x00name"), "tablename");
        assert_eq!(sanitize_identifier("table\nname"), "tablename");
        assert_eq!(sanitize_identifier(&"a".repeat(200)).len(), 100);
    }
}
