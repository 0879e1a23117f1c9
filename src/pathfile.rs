//! AS-path file line tokenizing: spec.md §6. Grounded on
//! `original_source/io.cpp`'s `loadPaths`. Unlike the AS-set and
//! relationship formats, a path-file line isn't comment-stripped: any line
//! containing `#` anywhere is dropped in its entirety, and blank lines are
//! skipped.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::types::AS;

/// Reads `path` and tokenizes every accepted line into a raw AS path
/// (whitespace-separated AS numbers, in file order). A file that can't be
/// read is logged and treated as contributing zero paths (DESIGN.md, Open
/// Question 4).
pub fn load_path_lines(path: &Path) -> Vec<Vec<AS>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read path file, treating as empty");
            return Vec::new();
        }
    };
    parse_path_lines(&text)
}

/// Tokenizes path-file text already loaded into memory.
pub fn parse_path_lines(text: &str) -> Vec<Vec<AS>> {
    text.lines()
        .filter(|line| !line.is_empty() && !line.contains('#'))
        .map(tokenize_path)
        .filter(|path| !path.is_empty())
        .collect()
}

/// Parses whitespace-separated AS numbers off the front of a line; stops
/// at the first unparseable token, mirroring `istream::operator>>`
/// leaving the rest of the line unconsumed once extraction fails.
fn tokenize_path(line: &str) -> Vec<AS> {
    let mut path = Vec::new();
    for token in line.split_whitespace() {
        match token.parse::<AS>() {
            Ok(as_num) => path.push(as_num),
            Err(_) => break,
        }
    }
    path
}
