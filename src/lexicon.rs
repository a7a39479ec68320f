//! Relation graph built from a plain-text lexicon.
//!
//! A lexicon has one semantic group per line (for instance, every title in one
//! encyclopedia category), tokens separated by whitespace. Building the graph
//! keeps only tokens the vector vocabulary knows about and drops lines left
//! with fewer than two tokens.
//!
//! ```
//! use std::collections::HashSet;
//! use retrofit::lexicon::LexiconGraph;
//!
//! let vocab: HashSet<String> = ["cat", "dog", "fish", "whale"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let graph = LexiconGraph::build(["cat dog", "cat", "fish whale shark"], &vocab);
//!
//! assert_eq!(graph.groups().len(), 2);
//! assert_eq!(graph.group_ids("fish"), Some(&[1][..]));
//! assert_eq!(graph.group_ids("shark"), None);
//! ```

use std::io::BufRead;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};

use crate::io::{byte_lines, open_text};
use crate::{Result, Vocabulary};

/// One retained lexicon line: the known tokens in source order, repeats kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    words: Vec<String>,
}

impl Group {
    /// Words of the group, in source order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of tokens (repeats counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check whether the group has no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Groups plus a reverse index from word to the groups it occurs in.
///
/// The reverse index lists a group id once per occurrence of the word in that
/// group's line, so ids may repeat. Its key order is first-occurrence order
/// across the lexicon, which is the order the retrofitting engine visits
/// words in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexiconGraph {
    groups: Vec<Group>,
    index: IndexMap<String, Vec<usize>>,
    skipped_lines: usize,
    undecodable_lines: usize,
}

impl LexiconGraph {
    /// Build the graph from lexicon lines, filtered against `vocabulary`.
    pub fn build<I, S, V>(lines: I, vocabulary: &V) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        V: Vocabulary + ?Sized,
    {
        let mut graph = Self::default();
        for line in lines {
            graph.push_line(line.as_ref(), vocabulary);
        }
        graph.log_summary();
        graph
    }

    /// Build the graph from a reader of lexicon text.
    ///
    /// A line that is not valid UTF-8 is skipped and counted; the rest of the
    /// lexicon is still read.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Io`] if reading fails.
    pub fn from_reader<R, V>(reader: R, vocabulary: &V) -> Result<Self>
    where
        R: BufRead,
        V: Vocabulary + ?Sized,
    {
        let mut graph = Self::default();
        for (idx, raw) in byte_lines(reader).enumerate() {
            let raw = raw?;
            match std::str::from_utf8(&raw) {
                Ok(line) => graph.push_line(line, vocabulary),
                Err(_) => {
                    log::debug!("Skipping undecodable lexicon line {}", idx + 1);
                    graph.undecodable_lines += 1;
                }
            }
        }
        graph.log_summary();
        Ok(graph)
    }

    fn push_line<V: Vocabulary + ?Sized>(&mut self, line: &str, vocabulary: &V) {
        let words: Vec<String> = line
            .split_whitespace()
            .filter(|w| vocabulary.contains_word(w))
            .map(str::to_owned)
            .collect();
        if words.len() < 2 {
            self.skipped_lines += 1;
            return;
        }

        let id = self.groups.len();
        for word in &words {
            self.index.entry(word.clone()).or_default().push(id);
        }
        self.groups.push(Group { words });
    }

    fn log_summary(&self) {
        log::info!(
            "Lexicon graph: {} groups over {} words ({} lines skipped, {} undecodable)",
            self.groups.len(),
            self.index.len(),
            self.skipped_lines,
            self.undecodable_lines
        );
    }

    /// Retained groups, in lexicon order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group ids `word` occurs in (one entry per occurrence).
    #[must_use]
    pub fn group_ids(&self, word: &str) -> Option<&[usize]> {
        self.index.get(word).map(Vec::as_slice)
    }

    /// Words with at least one group, in first-occurrence order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    /// Number of words in the reverse index.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.index.len()
    }

    /// Check whether `word` takes part in any group.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Check whether no group was retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Lines dropped because fewer than two tokens were known.
    #[must_use]
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Lines dropped because they were not valid UTF-8.
    #[must_use]
    pub fn undecodable_lines(&self) -> usize {
        self.undecodable_lines
    }

    /// Distinct co-members of `word` across its groups, excluding `word`.
    ///
    /// Ordered by first appearance (group order, then position in the group).
    /// Empty when `word` is unknown or only ever grouped with itself.
    #[must_use]
    pub fn neighbors(&self, word: &str) -> IndexSet<&str> {
        let mut neighbors = IndexSet::new();
        let Some(ids) = self.index.get(word) else {
            return neighbors;
        };
        for &id in ids {
            for other in &self.groups[id].words {
                if other != word {
                    neighbors.insert(other.as_str());
                }
            }
        }
        neighbors
    }
}

/// Read a lexicon file (plain or `.gz`) and build its graph.
///
/// # Errors
///
/// [`crate::Error::Io`] if the file cannot be opened or read.
pub fn read_lexicon<V>(path: impl AsRef<Path>, vocabulary: &V) -> Result<LexiconGraph>
where
    V: Vocabulary + ?Sized,
{
    let path = path.as_ref();
    log::info!("Reading lexicon from {}", path.display());
    LexiconGraph::from_reader(open_text(path)?, vocabulary)
}
