//! Category lexicon extraction from a MediaWiki XML dump.
//!
//! Produces the plain-text lexicon the retrofitting engine consumes: one line
//! per category, listing the titles of every article in it that also has a
//! word vector.
//!
//! The dump is read as a lazy stream of [`Page`] records (one per
//! `<page>`…`</page>` block), so multi-gigabyte `.bz2` dumps never need to be
//! held in memory. [`CategoryExtractor`] is the predicate and mining stage on
//! top of that stream.
//!
//! ```
//! use std::collections::HashSet;
//! use std::io::Cursor;
//! use retrofit::wiki::{CategoryExtractor, PageReader};
//!
//! let dump = "<page>\n<title>Cat</title>\n<text>[[Category:Felines]]</text>\n</page>\n\
//!             <page>\n<title>Lion</title>\n<text>[[Category:Felines]]</text>\n</page>\n";
//! let vocab: HashSet<String> = ["Cat", "Lion"].iter().map(|s| s.to_string()).collect();
//!
//! let lexicon = CategoryExtractor::new()
//!     .extract(PageReader::new(Cursor::new(dump)), &vocab)?;
//! assert_eq!(lexicon.lines().collect::<Vec<_>>(), vec!["Cat Lion"]);
//! # Ok::<(), retrofit::Error>(())
//! ```

use std::io::{BufRead, Write};
use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::io::{create_text, decode_lossy, open_text};
use crate::{Result, Vocabulary};

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<title>(.*?)</title>").unwrap());
static TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<text\b[^>]*?(?:/>|>(.*?)</text>)").unwrap());
static CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[[Cc]ategory:([^\[\]]+)\]\]").unwrap());

// =============================================================================
// Page stream
// =============================================================================

/// One article from the dump.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    /// Article title, XML entities decoded.
    pub title: String,
    /// Wikitext body, XML entities decoded. Empty when the page has none.
    pub text: String,
}

impl Page {
    /// Parse one `<page>`…`</page>` block.
    ///
    /// Returns `None` when the block has no `<title>`.
    #[must_use]
    pub fn parse(block: &str) -> Option<Self> {
        let title = TITLE.captures(block)?.get(1)?.as_str();
        let text = TEXT
            .captures(block)
            .and_then(|c| c.get(1))
            .map_or("", |m| m.as_str());
        Some(Self {
            title: unescape(title),
            text: unescape(text),
        })
    }

    /// Category names linked from the body, in order of appearance.
    ///
    /// Sort keys (`[[Category:Name|key]]`) are dropped.
    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        CATEGORY.captures_iter(&self.text).filter_map(|c| {
            let name = c.get(1)?.as_str();
            let name = name.split('|').next().unwrap_or(name).trim();
            (!name.is_empty()).then_some(name)
        })
    }
}

fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_owned();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Lazy iterator over the pages of a dump.
///
/// Finite and not restartable: once a page is yielded the underlying reader
/// has moved past it. A trailing unterminated `<page>` block is dropped.
pub struct PageReader<R: BufRead> {
    lines: std::io::Split<R>,
}

impl<R: BufRead> PageReader<R> {
    /// Wrap a reader positioned anywhere before the first `<page>`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.split(b'\n'),
        }
    }

    fn next_block(&mut self) -> Result<Option<String>> {
        let mut block = String::new();
        let mut started = false;
        for raw in self.lines.by_ref() {
            let line = decode_lossy(&raw?);
            if !started {
                if let Some(pos) = line.find("<page>") {
                    started = true;
                    block.push_str(&line[pos..]);
                    block.push('\n');
                    if line[pos..].contains("</page>") {
                        return Ok(Some(block));
                    }
                }
                continue;
            }
            block.push_str(&line);
            block.push('\n');
            if line.contains("</page>") {
                return Ok(Some(block));
            }
        }
        if started {
            log::warn!("Dump ended inside an unterminated <page> block");
        }
        Ok(None)
    }
}

impl PageReader<Box<dyn BufRead>> {
    /// Open a dump file (plain or `.bz2`/`.gz`).
    ///
    /// # Errors
    ///
    /// [`crate::Error::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(open_text(path)?))
    }
}

impl<R: BufRead> Iterator for PageReader<R> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_block() {
                Ok(Some(block)) => match Page::parse(&block) {
                    Some(page) => return Some(Ok(page)),
                    None => {
                        log::debug!("Skipping <page> block without a title");
                        continue;
                    }
                },
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Selects articles and mines their category links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryExtractor {
    include_multi_sense: bool,
}

impl CategoryExtractor {
    /// Create an extractor that skips parenthesised (multi-sense) titles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep titles with brackets, e.g. `Mercury (planet)`.
    #[must_use]
    pub fn with_multi_sense(mut self, include: bool) -> Self {
        self.include_multi_sense = include;
        self
    }

    /// Check whether a title is an article worth mining.
    ///
    /// Namespaced titles (`Category:…`, `Template:…`) are never accepted,
    /// bracketed titles only with multi-sense enabled, and the title must be
    /// in `vocabulary`.
    pub fn accepts<V: Vocabulary + ?Sized>(&self, title: &str, vocabulary: &V) -> bool {
        if title.contains(':') {
            return false;
        }
        if !self.include_multi_sense && (title.contains('(') || title.contains(')')) {
            return false;
        }
        vocabulary.contains_word(title)
    }

    /// Group accepted titles by category.
    ///
    /// # Errors
    ///
    /// Propagates the first read error from `pages`.
    pub fn extract<I, V>(&self, pages: I, vocabulary: &V) -> Result<CategoryLexicon>
    where
        I: IntoIterator<Item = Result<Page>>,
        V: Vocabulary + ?Sized,
    {
        let mut lexicon = CategoryLexicon::default();
        let mut seen = 0usize;
        let mut kept = 0usize;
        for page in pages {
            let page = page?;
            seen += 1;
            if !self.accepts(&page.title, vocabulary) {
                continue;
            }
            kept += 1;
            for category in page.categories() {
                lexicon.add(category, &page.title);
            }
        }
        log::info!(
            "Scanned {} pages, {} matched the vocabulary, {} categories",
            seen,
            kept,
            lexicon.categories.len()
        );
        Ok(lexicon)
    }
}

/// Category name → member titles, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLexicon {
    categories: IndexMap<String, Vec<String>>,
}

impl CategoryLexicon {
    /// Record `title` as a member of `category`.
    pub fn add(&mut self, category: &str, title: &str) {
        self.categories
            .entry(category.to_owned())
            .or_default()
            .push(title.to_owned());
    }

    /// Members of `category`.
    #[must_use]
    pub fn members(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Number of categories, including single-member ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check whether no category was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Lexicon lines: space-joined members of every category with more than
    /// one member.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.categories
            .values()
            .filter(|titles| titles.len() > 1)
            .map(|titles| titles.join(" "))
    }

    /// Write the lexicon lines to `writer`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Io`] on write failure.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<usize> {
        let mut written = 0;
        for line in self.lines() {
            writeln!(writer, "{line}")?;
            written += 1;
        }
        writer.flush()?;
        Ok(written)
    }

    /// Write the lexicon to `path`, compressed when it ends in `.gz` or
    /// `.bz2`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Io`] if the file cannot be created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let mut sink = create_text(path)?;
        let written = self.write(&mut sink)?;
        sink.finish()?;
        log::info!("Wrote {} lexicon lines to {}", written, path.display());
        Ok(written)
    }
}
