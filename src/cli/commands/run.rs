//! Run command - retrofit vectors to a lexicon

use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use crate::io::{read_vectors, save_vectors};
use crate::lexicon::read_lexicon;
use crate::RetrofitConfig;

/// Retrofit vectors to a lexicon
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Input word vectors (word2vec text, plain or .gz)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Lexicon file, one group of related words per line
    #[arg(short, long, value_name = "PATH")]
    pub lexicon: PathBuf,

    /// Output path for the retrofitted vectors (.gz or .bz2 to compress)
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Number of passes [default: 10, or the config file's value]
    #[arg(short = 'n', long = "numiter", value_name = "N")]
    pub iterations: Option<usize>,

    /// TOML config file (iterations, precision, write_header)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a word2vec `count dim` header line
    #[arg(long)]
    pub header: bool,
}

impl RunArgs {
    /// Merge the config file (if any) with command-line overrides.
    pub fn resolve_config(&self) -> Result<RetrofitConfig, String> {
        let mut config = match &self.config {
            Some(path) => RetrofitConfig::load(path).map_err(|e| e.to_string())?,
            None => RetrofitConfig::default(),
        };
        if let Some(n) = self.iterations {
            config.iterations = n;
        }
        if self.header {
            config.write_header = true;
        }
        Ok(config)
    }
}

/// Execute `retrofit run`.
pub fn run(args: RunArgs) -> Result<(), String> {
    let config = args.resolve_config()?;
    let start = Instant::now();

    let vectors = read_vectors(&args.input)
        .map_err(|e| format!("Failed to read vectors: {}", e))?;
    let graph = read_lexicon(&args.lexicon, &vectors)
        .map_err(|e| format!("Failed to read lexicon: {}", e))?;
    if graph.is_empty() {
        log::warn!("Lexicon has no usable groups; vectors will be written unchanged");
    }

    let fitted = config
        .retrofitter()
        .run(&vectors, &graph)
        .map_err(|e| format!("Retrofitting failed: {}", e))?;

    save_vectors(&fitted, &args.output, config.write_options())
        .map_err(|e| format!("Failed to write vectors: {}", e))?;

    log::info!(
        "Done in {:.2}s ({} words retrofitted)",
        start.elapsed().as_secs_f64(),
        graph.word_count()
    );
    Ok(())
}
