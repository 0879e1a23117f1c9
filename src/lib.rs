//! AS relationship inference pipeline: set loading, path ingest, ranking,
//! clique discovery, the seven inference phases, and emission. `main.rs`
//! is a thin `clap` CLI wrapper around [`run`].

pub mod clique;
pub mod data;
pub mod emit;
pub mod inference;
pub mod pathfile;
pub mod ranker;
pub mod relfile;
pub mod sets;
pub mod types;

use std::io::Write;
use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use types::{Data, AS};

/// Runs the full pipeline and writes the inferred graph to `out`.
///
/// Path files are read in parallel (`rayon`) but folded into `Data` in
/// command-line order, so the result is independent of how the reads
/// happen to interleave (SPEC_FULL.md §5).
pub fn run(
    ixp_files: &[impl AsRef<Path> + Sync],
    rel_files: &[impl AsRef<Path>],
    clique_file: Option<&impl AsRef<Path>>,
    path_files: &[impl AsRef<Path> + Sync],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let ixp = sets::load_as_sets(ixp_files);
    info!(ixp_ases = ixp.len(), "loaded IXP set");

    let raw_paths: Vec<Vec<AS>> = path_files
        .par_iter()
        .map(|p| pathfile::load_path_lines(p.as_ref()))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();
    info!(paths = raw_paths.len(), "loaded AS paths");

    let clique = match clique_file {
        Some(p) => sets::load_as_set(p.as_ref()),
        None => clique::compute_clique(&raw_paths, &ixp),
    };
    info!(clique_size = clique.len(), "clique determined");

    let mut data = Data::new();
    for raw in &raw_paths {
        data.ingest_path(raw, &ixp, &clique);
    }

    for p in rel_files {
        relfile::load_relationships(p.as_ref(), &mut data);
    }

    data.seed_clique(&clique);
    ranker::compute_transit_degrees(&mut data);
    ranker::compute_as_ranks(&mut data);
    info!(visible_as = data.len(), "ranking complete");

    inference::infer(&mut data, &clique);
    info!("inference complete");

    if json {
        emit::emit_json(&data, &clique, out)?;
    } else {
        emit::emit_text(&data, &clique, out)?;
    }

    Ok(())
}
