//! Command implementations for the retrofit CLI
//!
//! Each command has its own module/file.

pub mod lexicon;
pub mod run;

// Re-export argument types for parser
pub use lexicon::LexiconArgs;
pub use run::RunArgs;
