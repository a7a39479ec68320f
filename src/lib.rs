//! # retrofit
//!
//! Retrofit pre-trained word vectors to a semantic lexicon.
//!
//! Words that share a group in the lexicon (for example, articles filed under
//! the same encyclopedia category) are pulled towards each other, while each
//! word keeps a pull towards its original, distributional vector.
//!
//! - **Lexicon graph**: plain-text groups filtered against the vector
//!   vocabulary ([`LexiconGraph`])
//! - **Retrofitting**: iterative neighbour averaging ([`retrofit`],
//!   [`Retrofitter`])
//! - **Vector I/O**: word2vec text format, plain or gzip ([`io`])
//! - **Lexicon mining**: category lexicons from MediaWiki dumps ([`wiki`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use retrofit::{io, lexicon, Retrofitter};
//!
//! let vectors = io::read_vectors("vectors.txt")?;
//! let graph = lexicon::read_lexicon("categories.txt", &vectors)?;
//! let fitted = Retrofitter::new().with_iterations(10).run(&vectors, &graph)?;
//! io::save_vectors(&fitted, "retrofitted.txt", io::WriteOptions::default())?;
//! # Ok::<(), retrofit::Error>(())
//! ```
//!
//! ## Determinism
//!
//! Words are visited in first-occurrence order across the lexicon and updates
//! within a pass are visible to later words in that pass. Given the same
//! files, two runs write byte-identical output.

#![warn(missing_docs)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod io;
pub mod lexicon;
pub mod retrofit;
pub mod wiki;

pub use retrofit_core::{normalize, Error, Result, VectorSpace, Vocabulary, NORM_EPSILON};

pub use config::RetrofitConfig;
pub use lexicon::{Group, LexiconGraph};
pub use retrofit::{retrofit, Retrofitter, DEFAULT_ITERATIONS};
