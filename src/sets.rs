//! AS-number set file parsing (IXP and clique sets): spec.md §6. Grounded
//! on `original_source/io.cpp`'s `loadASSet`.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::types::AS;

/// Parses one AS-list file: whitespace-separated AS numbers, `#` comments
/// the rest of its line. A file that doesn't exist or can't be parsed logs
/// a warning and contributes nothing, mirroring the original's silent
/// `ifstream` EOF-on-missing-file behavior (DESIGN.md, Open Question 4).
pub fn load_as_set(path: &Path) -> BTreeSet<AS> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read AS set file, treating as empty");
            return BTreeSet::new();
        }
    };
    parse_as_set(&text)
}

/// Parses an AS-list file already loaded into memory.
pub fn parse_as_set(text: &str) -> BTreeSet<AS> {
    let mut set = BTreeSet::new();
    for line in text.lines() {
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        };
        for token in line.split_whitespace() {
            match token.parse::<AS>() {
                Ok(as_num) => {
                    set.insert(as_num);
                }
                Err(e) => warn!(token, error = %e, "skipping unparseable AS number"),
            }
        }
    }
    set
}

/// Loads and unions several AS-list files, in the order given.
pub fn load_as_sets(paths: &[impl AsRef<Path>]) -> BTreeSet<AS> {
    let mut set = BTreeSet::new();
    for p in paths {
        set.extend(load_as_set(p.as_ref()));
    }
    set
}
