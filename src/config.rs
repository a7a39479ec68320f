//! Run configuration, loadable from TOML.
//!
//! ```toml
//! # retrofit.toml
//! iterations = 10
//! precision = 4
//! write_header = false
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.
//! Command-line flags override values read from a file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::WriteOptions;
use crate::retrofit::{Retrofitter, DEFAULT_ITERATIONS};
use crate::{Error, Result};

/// Settings for one retrofitting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrofitConfig {
    /// Number of passes over the relation graph.
    pub iterations: usize,
    /// Decimal digits written per vector component.
    pub precision: usize,
    /// Write a word2vec `count dimension` header before the vectors.
    pub write_header: bool,
}

impl Default for RetrofitConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            precision: WriteOptions::default().precision,
            write_header: false,
        }
    }
}

impl RetrofitConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] on malformed TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::config(e.to_string()))
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, [`Error::Config`] if it does
    /// not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Engine configured with these settings.
    #[must_use]
    pub fn retrofitter(&self) -> Retrofitter {
        Retrofitter::new().with_iterations(self.iterations)
    }

    /// Sink options for these settings.
    #[must_use]
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            precision: self.precision,
            header: self.write_header,
        }
    }
}
