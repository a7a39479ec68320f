//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand};

/// Retrofit word vectors to a semantic lexicon
#[derive(Parser, Debug)]
#[command(name = "retrofit")]
#[command(
    author,
    version,
    about = "Retrofit word vectors to a semantic lexicon",
    long_about = r#"
retrofit - pull related words together in a pre-trained vector space

WORKFLOW:
  1. retrofit lexicon  - mine category groups from a MediaWiki dump
  2. retrofit run      - retrofit vectors to a lexicon (one group per line)

FORMATS:
  vectors : word2vec text (`word c1 ... cd`), optional `count dim` header,
            plain or .gz
  lexicon : whitespace-separated words, one group per line, plain or .gz
  dump    : MediaWiki XML export, plain or .bz2

EXAMPLES:
  retrofit run -i vectors.txt -l categories.txt -o retrofitted.txt -n 10
  retrofit lexicon --dump jawiki-pages-articles.xml.bz2 --vectors vectors.txt -o categories.txt
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logging (per-pass convergence, skipped records)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrofit vectors to a lexicon
    #[command(visible_alias = "r")]
    Run(crate::cli::commands::RunArgs),

    /// Build a category lexicon from a MediaWiki dump
    #[command(visible_alias = "l")]
    Lexicon(crate::cli::commands::LexiconArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
