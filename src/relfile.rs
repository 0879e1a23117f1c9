//! Relationship file parsing and application: spec.md §6. Grounded on
//! `original_source/io.cpp`'s `loadRelationships`. The CAIDA `a|b|r` line
//! format; `#` comments the rest of its line.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::types::{Data, Rel, AS};

/// Applies every well-formed `a|b|r` line in `path` to `data` via
/// [`Data::set_relationship`]. A file that can't be read is logged and
/// treated as empty (DESIGN.md, Open Question 4); a malformed individual
/// line is logged and skipped without aborting the rest of the file.
pub fn load_relationships(path: &Path, data: &mut Data) {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read relationship file, treating as empty");
            return;
        }
    };
    apply_relationships(&text, data);
}

/// Parses and applies relationship lines already loaded into memory.
pub fn apply_relationships(text: &str, data: &mut Data) {
    for line in text.lines() {
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_relationship_line(line) {
            Some((a, b, rel)) => {
                data.set_relationship(a, b, rel);
            }
            None => warn!(line, "skipping malformed relationship line"),
        }
    }
}

fn parse_relationship_line(line: &str) -> Option<(AS, AS, Rel)> {
    let mut fields = line.split('|');
    let a: AS = fields.next()?.trim().parse().ok()?;
    let b: AS = fields.next()?.trim().parse().ok()?;
    let code: i8 = fields.next()?.trim().parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((a, b, Rel::from_code(code)?))
}
