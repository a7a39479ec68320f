//! Lexicon command - mine a category lexicon from a MediaWiki dump

use clap::Parser;
use std::path::PathBuf;

use crate::io::read_vectors;
use crate::wiki::{CategoryExtractor, PageReader};

/// Build a category lexicon from a MediaWiki dump
#[derive(Parser, Debug)]
pub struct LexiconArgs {
    /// MediaWiki XML dump with articles (plain or .bz2)
    #[arg(short, long, value_name = "PATH")]
    pub dump: PathBuf,

    /// Word vectors whose vocabulary selects the article titles
    #[arg(long, value_name = "PATH")]
    pub vectors: PathBuf,

    /// Output lexicon path (.gz or .bz2 to compress)
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Keep titles with brackets, e.g. "Mercury (planet)"
    #[arg(long)]
    pub include_multi_sense: bool,
}

/// Execute `retrofit lexicon`.
pub fn run(args: LexiconArgs) -> Result<(), String> {
    let vocabulary = read_vectors(&args.vectors)
        .map_err(|e| format!("Failed to read vectors: {}", e))?;
    let pages = PageReader::open(&args.dump)
        .map_err(|e| format!("Failed to open dump: {}", e))?;

    let lexicon = CategoryExtractor::new()
        .with_multi_sense(args.include_multi_sense)
        .extract(pages, &vocabulary)
        .map_err(|e| format!("Failed to read dump: {}", e))?;

    lexicon
        .save(&args.output)
        .map_err(|e| format!("Failed to write lexicon: {}", e))?;
    Ok(())
}
