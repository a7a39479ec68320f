//! Word vector spaces and vocabularies.
//!
//! A [`VectorSpace`] keeps words in insertion order. That order is what the
//! vector sink writes out, and it is stable across runs, so two runs over the
//! same input produce byte-identical files.

use std::collections::{BTreeSet, HashSet};

use indexmap::{IndexMap, IndexSet};

use crate::{Error, Result};

/// Added to the squared norm before the square root in [`normalize`].
///
/// Keeps all-zero vectors finite (they stay all-zero).
pub const NORM_EPSILON: f64 = 1e-6;

/// Scale `values` to (almost) unit L2 norm in place.
///
/// Divides by `sqrt(Σv² + NORM_EPSILON)`, so the resulting norm is slightly
/// below 1.0 for small vectors and never a division by zero.
///
/// # Examples
///
/// ```
/// use retrofit_core::normalize;
///
/// let mut v = vec![3.0, 4.0];
/// normalize(&mut v);
/// let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
/// assert!((norm - 1.0).abs() < 1e-6);
/// ```
pub fn normalize(values: &mut [f64]) {
    let squared: f64 = values.iter().map(|v| v * v).sum();
    let denom = (squared + NORM_EPSILON).sqrt();
    for v in values.iter_mut() {
        *v /= denom;
    }
}

// =============================================================================
// Vocabulary
// =============================================================================

/// A set of known words that lexicon tokens are filtered against.
///
/// Implemented for [`VectorSpace`] (its key set) and for plain string sets,
/// so a lexicon can be built against a vocabulary without loading vectors.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use retrofit_core::Vocabulary;
///
/// let vocab: HashSet<String> = ["cat", "dog"].iter().map(|s| s.to_string()).collect();
/// assert!(vocab.contains_word("cat"));
/// assert!(!vocab.contains_word("fish"));
/// ```
pub trait Vocabulary {
    /// Check whether `word` is known.
    fn contains_word(&self, word: &str) -> bool;

    /// Number of known words.
    fn word_count(&self) -> usize;

    /// Check whether the vocabulary has no words.
    fn is_empty_vocabulary(&self) -> bool {
        self.word_count() == 0
    }
}

impl Vocabulary for HashSet<String> {
    fn contains_word(&self, word: &str) -> bool {
        self.contains(word)
    }

    fn word_count(&self) -> usize {
        self.len()
    }
}

impl Vocabulary for BTreeSet<String> {
    fn contains_word(&self, word: &str) -> bool {
        self.contains(word)
    }

    fn word_count(&self) -> usize {
        self.len()
    }
}

impl Vocabulary for IndexSet<String> {
    fn contains_word(&self, word: &str) -> bool {
        self.contains(word)
    }

    fn word_count(&self) -> usize {
        self.len()
    }
}

impl<V: Vocabulary + ?Sized> Vocabulary for &V {
    fn contains_word(&self, word: &str) -> bool {
        (**self).contains_word(word)
    }

    fn word_count(&self) -> usize {
        (**self).word_count()
    }
}

// =============================================================================
// VectorSpace
// =============================================================================

/// Insertion-ordered mapping from word to a dense vector.
///
/// Every vector in a space has the same length. The first insert fixes the
/// dimension unless the space was created with [`VectorSpace::with_dimension`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorSpace {
    vectors: IndexMap<String, Vec<f64>>,
    dimension: Option<usize>,
}

impl VectorSpace {
    /// Create an empty space; the first insert fixes the dimension.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty space with a known dimension.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            vectors: IndexMap::new(),
            dimension: Some(dimension),
        }
    }

    /// Insert (or replace) the vector for `word`.
    ///
    /// A replaced word keeps its original position. Returns the previous
    /// vector, if any.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `vector` does not have the space's
    /// dimension, [`Error::InvalidInput`] for an empty word or vector.
    pub fn insert(&mut self, word: impl Into<String>, vector: Vec<f64>) -> Result<Option<Vec<f64>>> {
        let word = word.into();
        if word.is_empty() {
            return Err(Error::invalid_input("word must not be empty"));
        }
        if vector.is_empty() {
            return Err(Error::invalid_input(format!(
                "vector for '{word}' has no components"
            )));
        }
        match self.dimension {
            Some(d) if d != vector.len() => {
                return Err(Error::dimension_mismatch(d, vector.len()));
            }
            Some(_) => {}
            None => self.dimension = Some(vector.len()),
        }
        Ok(self.vectors.insert(word, vector))
    }

    /// Build a space from `(word, vector)` pairs, normalizing each vector.
    ///
    /// # Errors
    ///
    /// Same as [`VectorSpace::insert`].
    pub fn from_raw<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut space = Self::new();
        for (word, mut vector) in entries {
            normalize(&mut vector);
            space.insert(word, vector)?;
        }
        Ok(space)
    }

    /// Vector for `word`.
    #[must_use]
    pub fn get(&self, word: &str) -> Option<&[f64]> {
        self.vectors.get(word).map(Vec::as_slice)
    }

    /// Position of `word` in insertion order.
    #[must_use]
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.vectors.get_index_of(word)
    }

    /// Word and vector at insertion position `index`.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&str, &[f64])> {
        self.vectors
            .get_index(index)
            .map(|(w, v)| (w.as_str(), v.as_slice()))
    }

    /// Mutable vector at insertion position `index`.
    ///
    /// Length changes are impossible through a slice, so the dimension
    /// invariant holds.
    pub fn vector_at_mut(&mut self, index: usize) -> Option<&mut [f64]> {
        self.vectors
            .get_index_mut(index)
            .map(|(_, v)| v.as_mut_slice())
    }

    /// Check whether `word` has a vector.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(word)
    }

    /// Number of words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Check whether the space has no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimensionality shared by all vectors, once known.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Iterate `(word, vector)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> + '_ {
        self.vectors.iter().map(|(w, v)| (w.as_str(), v.as_slice()))
    }

    /// Iterate words in insertion order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.vectors.keys().map(String::as_str)
    }
}

impl Vocabulary for VectorSpace {
    fn contains_word(&self, word: &str) -> bool {
        self.contains(word)
    }

    fn word_count(&self) -> usize {
        self.len()
    }
}
