use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};

/// Infers AS-to-AS business relationships from observed BGP AS-path data.
#[derive(Parser, Debug)]
struct Opts {
    /// IXP AS-number set file (repeatable).
    #[arg(long = "ixp")]
    ixp: Vec<PathBuf>,

    /// Pre-known relationship file, CAIDA `a|b|r` format (repeatable).
    #[arg(long = "rel")]
    rel: Vec<PathBuf>,

    /// Tier-1 clique seed file; if omitted, the clique is inferred.
    #[arg(long)]
    clique: Option<PathBuf>,

    /// Emit the inferred graph as JSON instead of the classic `a|b|r` text.
    #[arg(long)]
    json: bool,

    /// Raise log verbosity.
    #[arg(long)]
    debug: bool,

    /// AS-path files (at least one required).
    path_files: Vec<PathBuf>,
}

fn main() {
    let opts = Opts::parse();

    if opts.debug {
        tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    if opts.path_files.is_empty() {
        eprintln!(
            "Usage : asrank [--ixp ixpFile] [--rel relationshipFile] [--clique cliqueFile] file1 [file 2 ...]."
        );
        std::process::exit(1);
    }

    eprintln!(
        "# ixp={:?} rel={:?} clique={:?} data={:?}",
        opts.ixp, opts.rel, opts.clique, opts.path_files
    );

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    asrank::run(
        &opts.ixp,
        &opts.rel,
        opts.clique.as_ref(),
        &opts.path_files,
        opts.json,
        &mut handle,
    )
    .unwrap();

    info!("finished");
}
