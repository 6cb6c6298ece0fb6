//! CLI entry point for the collage workflow

use clap::Parser;
use collagist::io::cli::{Cli, CollageProcessor};

fn main() -> collagist::Result<()> {
    let cli = Cli::parse();
    collagist::io::logging::init(cli.verbosity());
    let mut processor = CollageProcessor::new(cli);
    processor.process()
}
