//! File system helpers shared by the workflows

use camino::Utf8Path;
use std::io;

/// Returns true iff listing `dir` yields zero entries.
///
/// A missing directory is an error, not "empty".
pub fn directory_is_empty(dir: &Utf8Path) -> io::Result<bool> {
    Ok(std::fs::read_dir(dir)?.next().is_none())
}
