//! Output emission: spec.md §6 (`a|b|r` text format), plus a `--json` mode
//! grounded in the teacher's `serde_json` idiom (SPEC_FULL.md §6.1). Text
//! form grounded on `original_source/io.cpp`'s `printGraph`.

use std::collections::BTreeSet;
use std::io::{self, Write};

use serde::Serialize;

use crate::types::{Data, Rel, AS};

/// Writes the classic `# N visible AS` / `# Clique : ...` / `a|b|r` text
/// format to `out`, exactly as `printGraph` does.
pub fn emit_text(data: &Data, clique: &BTreeSet<AS>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "# {} visible AS", data.len())?;

    write!(out, "# Clique :")?;
    for &c in clique {
        write!(out, " {c}")?;
    }
    writeln!(out)?;

    for (&a, ad) in &data.ases {
        for (&b, link) in &ad.links {
            if a < b {
                writeln!(out, "{a}|{b}|{}", link.relationship.code())?;
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct LinkOut {
    a: AS,
    b: AS,
    relationship: Rel,
}

#[derive(Serialize)]
struct GraphOut<'a> {
    visible_as: usize,
    clique: &'a BTreeSet<AS>,
    links: Vec<LinkOut>,
}

/// Writes the inferred graph as pretty-printed JSON, supplementary to the
/// classic text format.
pub fn emit_json(data: &Data, clique: &BTreeSet<AS>, out: &mut impl Write) -> io::Result<()> {
    let links = data
        .ases
        .iter()
        .flat_map(|(&a, ad)| {
            ad.links
                .iter()
                .filter(move |&(&b, _)| a < b)
                .map(move |(&b, link)| LinkOut { a, b, relationship: link.relationship })
        })
        .collect();

    let graph = GraphOut { visible_as: data.len(), clique, links };
    let json = serde_json::to_string_pretty(&graph)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(out, "{json}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Data;

    #[test]
    fn emits_only_the_ascending_half_of_each_mirrored_link() {
        let mut data = Data::new();
        data.set_relationship(1, 2, Rel::P2P);
        let mut out = Vec::new();
        emit_text(&data, &BTreeSet::new(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1|2|0"));
        assert!(!text.contains("2|1|0"));
    }

    #[test]
    fn json_output_is_well_formed() {
        let mut data = Data::new();
        data.set_relationship(1, 2, Rel::P2C);
        let mut out = Vec::new();
        emit_json(&data, &BTreeSet::new(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["visible_as"], 2);
        assert_eq!(value["links"][0]["a"], 1);
    }
}
