// ABOUTME: Splits a pg_dump schema dump into up and down migration scripts
// ABOUTME: Classifies each line by literal prefix and substring matching on raw bytes

/// Line prefixes that never end up in either script: comments, session
/// settings and `SELECT pg_catalog.set_config(...)` calls
pub const SKIP_PREFIXES: &[&[u8]] = &[b"--", b"SET ", b"SELECT "];

/// Any non-skipped line containing this goes to the down script
pub const DOWN_MARKER: &[u8] = b"DROP";

/// Bucket a dump line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Skip,
    Down,
    Up,
}

/// Up and down scripts generated from one table dump.
///
/// Kept as bytes: pg_dump writes in the database encoding, which need not be
/// UTF-8, and the scripts must carry the dumped lines unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationScripts {
    pub up: Vec<u8>,
    pub down: Vec<u8>,
}

/// Classify a single dump line.
///
/// Skip rules win over the down rule, so `-- DROP ...` is a skipped comment.
pub fn classify_line(line: &[u8]) -> LineKind {
    if line.is_empty() || SKIP_PREFIXES.iter().any(|p| line.starts_with(p)) {
        LineKind::Skip
    } else if contains(line, DOWN_MARKER) {
        LineKind::Down
    } else {
        LineKind::Up
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Split raw dump output on `\n` and assemble the up and down scripts.
///
/// Lines keep their original relative order inside each script and are
/// joined with `\n` without a trailing newline.
pub fn split_dump(raw: &[u8]) -> MigrationScripts {
    let mut up: Vec<&[u8]> = Vec::new();
    let mut down: Vec<&[u8]> = Vec::new();

    for line in raw.split(|b| *b == b'\n') {
        match classify_line(line) {
            LineKind::Skip => {}
            LineKind::Down => down.push(line),
            LineKind::Up => up.push(line),
        }
    }

    MigrationScripts {
        up: up.join(&b'\n'),
        down: down.join(&b'\n'),
    }
}
