//! Retrofitting engine.
//!
//! Each pass visits every word of the relation graph and replaces its vector
//! with a blend of its original vector and its neighbours' current vectors:
//!
//! ```text
//! new[w] = (k * original[w] + Σ_{n ∈ N(w)} working[n]) / 2k      k = |N(w)|
//! ```
//!
//! The original vector carries weight `k`, each neighbour weight 1, so the
//! prior and the neighbourhood have equal total weight whatever the degree.
//!
//! # Visit order
//!
//! Updates are Gauss–Seidel style: a vector written earlier in a pass is what
//! later words in the same pass read. The result therefore depends on the
//! visit order, which is fixed to the graph's first-occurrence order (the
//! order in which words first appear across lexicon lines). Neighbour sums
//! are taken in [`LexiconGraph::neighbors`] order. Both orders are stable, so
//! identical inputs give bit-identical output.
//!
//! Words outside the graph are never touched, and neither are words whose
//! groups only ever repeat the word itself (no neighbours, nothing to divide).

use crate::lexicon::LexiconGraph;
use crate::{Error, Result, VectorSpace};

/// Number of passes used when none is given.
pub const DEFAULT_ITERATIONS: usize = 10;

/// Retrofit `original` to `graph` for `iterations` passes.
///
/// Shorthand for `Retrofitter::new().with_iterations(iterations).run(..)`.
///
/// # Errors
///
/// [`Error::UnknownWord`] if the graph names a word `original` has no vector
/// for.
///
/// # Example
///
/// ```
/// use ::retrofit::{retrofit, LexiconGraph, VectorSpace};
///
/// let vectors = VectorSpace::from_raw(vec![
///     ("a", vec![1.0, 0.0]),
///     ("b", vec![0.0, 1.0]),
///     ("c", vec![1.0, 1.0]),
/// ])?;
/// let graph = LexiconGraph::build(["a b"], &vectors);
/// let fitted = retrofit(&vectors, &graph, 10)?;
///
/// assert_eq!(fitted.get("c"), vectors.get("c"));
/// # Ok::<(), ::retrofit::Error>(())
/// ```
pub fn retrofit(original: &VectorSpace, graph: &LexiconGraph, iterations: usize) -> Result<VectorSpace> {
    Retrofitter::new()
        .with_iterations(iterations)
        .run(original, graph)
}

/// Configurable retrofitting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retrofitter {
    iterations: usize,
}

impl Default for Retrofitter {
    fn default() -> Self {
        Self::new()
    }
}

/// A graph word resolved to positions in the vector space.
struct Node {
    index: usize,
    neighbors: Vec<usize>,
}

impl Retrofitter {
    /// Create a retrofitter running [`DEFAULT_ITERATIONS`] passes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Set the number of passes. Zero returns an unchanged copy.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Number of passes this retrofitter runs.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Run all passes and return the retrofitted space.
    ///
    /// `original` is only read; the result is a fresh space with the same
    /// words in the same order.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownWord`] if the graph names a word missing from
    /// `original`.
    pub fn run(&self, original: &VectorSpace, graph: &LexiconGraph) -> Result<VectorSpace> {
        self.run_traced(original, graph).map(|(space, _)| space)
    }

    /// Run all passes, also returning the largest L2 shift of any vector in
    /// each pass.
    ///
    /// The shifts shrink as the passes converge; they are logged at debug
    /// level.
    ///
    /// # Errors
    ///
    /// Same as [`Retrofitter::run`].
    pub fn run_traced(
        &self,
        original: &VectorSpace,
        graph: &LexiconGraph,
    ) -> Result<(VectorSpace, Vec<f64>)> {
        let nodes = resolve(original, graph)?;
        let mut working = original.clone();
        let mut shifts = Vec::with_capacity(self.iterations);
        let dim = original.dimension().unwrap_or(0);
        let mut candidate = vec![0.0; dim];

        log::info!(
            "Retrofitting {} of {} words over {} passes",
            nodes.len(),
            original.len(),
            self.iterations
        );

        for pass in 0..self.iterations {
            let mut max_shift = 0.0_f64;
            for node in &nodes {
                if node.neighbors.is_empty() {
                    continue;
                }
                let k = node.neighbors.len() as f64;

                let Some((_, prior)) = original.get_index(node.index) else {
                    continue;
                };
                for (c, p) in candidate.iter_mut().zip(prior) {
                    *c = k * p;
                }
                for &n in &node.neighbors {
                    if let Some((_, current)) = working.get_index(n) {
                        for (c, v) in candidate.iter_mut().zip(current) {
                            *c += v;
                        }
                    }
                }

                if let Some(target) = working.vector_at_mut(node.index) {
                    let mut shift = 0.0_f64;
                    for (t, c) in target.iter_mut().zip(&candidate) {
                        let updated = c / (2.0 * k);
                        shift += (updated - *t) * (updated - *t);
                        *t = updated;
                    }
                    max_shift = max_shift.max(shift.sqrt());
                }
            }
            log::debug!("Pass {}: max shift {:.6}", pass + 1, max_shift);
            shifts.push(max_shift);
        }

        Ok((working, shifts))
    }
}

/// Resolve graph words and their neighbour sets to vector-space positions.
fn resolve(original: &VectorSpace, graph: &LexiconGraph) -> Result<Vec<Node>> {
    let position = |word: &str| {
        original
            .index_of(word)
            .ok_or_else(|| Error::unknown_word(word))
    };
    graph
        .words()
        .map(|word| {
            let neighbors = graph
                .neighbors(word)
                .into_iter()
                .map(position)
                .collect::<Result<Vec<_>>>()?;
            Ok(Node {
                index: position(word)?,
                neighbors,
            })
        })
        .collect()
}
