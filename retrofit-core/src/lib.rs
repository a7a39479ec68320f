//! # retrofit-core
//!
//! Core types shared across the retrofit workspace.
//!
//! This crate provides:
//! - **Vectors**: `VectorSpace`, an insertion-ordered word → vector map with a
//!   single fixed dimensionality
//! - **Vocabularies**: the `Vocabulary` trait used to filter lexicon tokens
//! - **Errors**: `Error` and the `Result` alias used by every crate
//!
//! All other crates in the workspace depend on `retrofit-core` so that a
//! vector space loaded by one component can be handed to any other.

pub mod error;
pub mod vector;

pub use error::{Error, Result};
pub use vector::{normalize, VectorSpace, Vocabulary, NORM_EPSILON};
