//! Reading and writing word vector files.
//!
//! The format is the plain-text word2vec layout: one record per line, the
//! word followed by its components, all whitespace separated. An optional
//! first line holding exactly two integers (vocabulary size, dimension) is a
//! header and is skipped.
//!
//! | Path suffix | Read as | Written as |
//! |-------------|---------|------------|
//! | `.gz` | gzip text | gzip text |
//! | `.bz2` | bzip2 text | bzip2 text |
//! | anything else | plain text | plain text |
//!
//! Decoding is best-effort: bytes that are not valid UTF-8 are dropped from
//! the line instead of failing the whole file.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, IntoInnerError, Write};
use std::path::Path;

use bzip2::read::MultiBzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::{normalize, Error, Result, VectorSpace};

// =============================================================================
// Opening resources
// =============================================================================

/// Compression applied to a text resource, chosen from the path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Uncompressed text.
    Plain,
    /// gzip (`.gz`).
    Gzip,
    /// bzip2 (`.bz2`).
    Bzip2,
}

impl Codec {
    /// Codec for `path`: `.gz` and `.bz2` are compressed, anything else is
    /// plain.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Self::Gzip,
            Some("bz2") => Self::Bzip2,
            _ => Self::Plain,
        }
    }
}

/// Open a text resource, transparently decompressing `.gz` and `.bz2` files.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be opened.
pub fn open_text(path: impl AsRef<Path>) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| with_path(path, e))?;
    let reader: Box<dyn BufRead> = match Codec::from_path(path) {
        Codec::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        Codec::Bzip2 => Box::new(BufReader::new(MultiBzDecoder::new(file))),
        Codec::Plain => Box::new(BufReader::new(file)),
    };
    Ok(reader)
}

/// Create a text sink, compressing according to the path suffix.
///
/// The sink must be closed with [`TextSink::finish`]; dropping it instead
/// loses any error from writing the compressed trailer.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be created.
pub fn create_text(path: impl AsRef<Path>) -> Result<TextSink> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| with_path(path, e))?;
    Ok(TextSink::new(file, Codec::from_path(path)))
}

fn with_path(path: &Path, e: std::io::Error) -> std::io::Error {
    std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
}

/// Buffered, optionally compressed writer over a file.
pub enum TextSink {
    /// Uncompressed.
    Plain(BufWriter<File>),
    /// gzip stream.
    Gzip(GzEncoder<BufWriter<File>>),
    /// bzip2 stream.
    Bzip2(BzEncoder<BufWriter<File>>),
}

impl TextSink {
    /// Wrap an open file.
    #[must_use]
    pub fn new(file: File, codec: Codec) -> Self {
        let file = BufWriter::new(file);
        match codec {
            Codec::Plain => Self::Plain(file),
            Codec::Gzip => Self::Gzip(GzEncoder::new(file, flate2::Compression::default())),
            Codec::Bzip2 => Self::Bzip2(BzEncoder::new(file, bzip2::Compression::default())),
        }
    }

    /// Write the compressed trailer (if any) and flush everything to the
    /// file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if any of the remaining bytes cannot be written.
    pub fn finish(self) -> Result<()> {
        let buffered = match self {
            Self::Plain(w) => w,
            Self::Gzip(enc) => enc.finish()?,
            Self::Bzip2(enc) => enc.finish()?,
        };
        buffered.into_inner().map_err(IntoInnerError::into_error)?;
        Ok(())
    }

    fn inner(&mut self) -> &mut dyn Write {
        match self {
            Self::Plain(w) => w,
            Self::Gzip(enc) => enc,
            Self::Bzip2(enc) => enc,
        }
    }
}

impl Write for TextSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner().flush()
    }
}

impl std::fmt::Debug for TextSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codec = match self {
            Self::Plain(_) => Codec::Plain,
            Self::Gzip(_) => Codec::Gzip,
            Self::Bzip2(_) => Codec::Bzip2,
        };
        f.debug_tuple("TextSink").field(&codec).finish()
    }
}

/// Decode a raw line, dropping any bytes that are not valid UTF-8.
///
/// A trailing `\r` (CRLF files) is removed as well.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => s.to_owned(),
        Cow::Owned(s) => s.replace(char::REPLACEMENT_CHARACTER, ""),
    }
}

/// Iterate the raw byte lines of `reader`, without the trailing newline.
pub(crate) fn byte_lines<R: BufRead>(reader: R) -> impl Iterator<Item = std::io::Result<Vec<u8>>> {
    reader.split(b'\n')
}

// =============================================================================
// Vector source
// =============================================================================

/// Counters collected while reading a vector file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records stored in the space.
    pub loaded: usize,
    /// Records skipped because a component was not a number or was missing.
    pub malformed: usize,
    /// `(count, dimension)` from the header line, if there was one.
    pub header: Option<(usize, usize)>,
}

/// Read and normalize a vector file.
///
/// # Errors
///
/// - [`Error::Io`] if the file cannot be opened or read
/// - [`Error::DimensionMismatch`] if records disagree on dimensionality
/// - [`Error::EmptyVocabulary`] if no record survives
pub fn read_vectors(path: impl AsRef<Path>) -> Result<VectorSpace> {
    let path = path.as_ref();
    let (space, stats) = parse_vectors(open_text(path)?)?;
    if space.is_empty() {
        return Err(Error::empty_vocabulary(path.display().to_string()));
    }
    log::info!(
        "Vectors read from {}: {} words, dimension {}",
        path.display(),
        stats.loaded,
        space.dimension().unwrap_or(0)
    );
    Ok(space)
}

/// Parse vector records from `reader`, normalizing every vector.
///
/// Returns the space together with the load counters. An empty result is not
/// an error here; [`read_vectors`] rejects it.
///
/// # Errors
///
/// [`Error::Io`] on read failure, [`Error::DimensionMismatch`] (with the line
/// number) when a record's length differs from the header or from the first
/// record.
pub fn parse_vectors<R: BufRead>(reader: R) -> Result<(VectorSpace, LoadStats)> {
    let mut space = VectorSpace::new();
    let mut stats = LoadStats::default();

    for (idx, raw) in byte_lines(reader).enumerate() {
        let line_no = idx + 1;
        let line = decode_lossy(&raw?);
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            continue;
        };
        let rest: Vec<&str> = tokens.collect();

        if line_no == 1 {
            if let Some((count, dim)) = parse_header(word, &rest) {
                stats.header = Some((count, dim));
                space = VectorSpace::with_dimension(dim);
                continue;
            }
        }

        let Some(mut vector) = parse_components(&rest) else {
            log::debug!("Skipping malformed vector record at line {line_no}");
            stats.malformed += 1;
            continue;
        };
        normalize(&mut vector);
        space
            .insert(word, vector)
            .map_err(|e| e.at_line(line_no))?;
        stats.loaded += 1;
    }

    if stats.malformed > 0 {
        log::warn!("Skipped {} malformed vector records", stats.malformed);
    }
    if let Some((count, _)) = stats.header {
        if count != space.len() {
            log::warn!(
                "Header announced {} vectors, read {}",
                count,
                space.len()
            );
        }
    }
    Ok((space, stats))
}

fn parse_header(first: &str, rest: &[&str]) -> Option<(usize, usize)> {
    match rest {
        [dim] => Some((first.parse().ok()?, dim.parse().ok()?)),
        _ => None,
    }
}

fn parse_components(tokens: &[&str]) -> Option<Vec<f64>> {
    if tokens.is_empty() {
        return None;
    }
    tokens.iter().map(|t| t.parse::<f64>().ok()).collect()
}

// =============================================================================
// Vector sink
// =============================================================================

/// Formatting options for the vector sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Decimal digits per component.
    pub precision: usize,
    /// Emit a `count dimension` header line first.
    pub header: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            precision: 4,
            header: false,
        }
    }
}

/// Write `space` as text, one `word c1 ... cd` record per line, in the
/// space's insertion order.
///
/// # Errors
///
/// [`Error::Io`] on write failure.
pub fn write_vectors<W: Write>(space: &VectorSpace, mut writer: W, options: WriteOptions) -> Result<()> {
    if options.header {
        writeln!(writer, "{} {}", space.len(), space.dimension().unwrap_or(0))?;
    }
    for (word, vector) in space.iter() {
        writer.write_all(word.as_bytes())?;
        for value in vector {
            write!(writer, " {:.*}", options.precision, value)?;
        }
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `space` to `path`, compressed when it ends in `.gz` or `.bz2`.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be created or written.
pub fn save_vectors(space: &VectorSpace, path: impl AsRef<Path>, options: WriteOptions) -> Result<()> {
    let path = path.as_ref();
    log::info!("Writing {} vectors to {}", space.len(), path.display());
    let mut sink = create_text(path)?;
    write_vectors(space, &mut sink, options)?;
    sink.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn parse(text: &str) -> Result<(VectorSpace, LoadStats)> {
        parse_vectors(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_parse_plain() {
        let (space, stats) = parse("a 1 0\nb 0 1\n").unwrap();
        assert_eq!(space.len(), 2);
        assert_eq!(space.dimension(), Some(2));
        assert_eq!(stats.loaded, 2);
        assert_eq!(stats.header, None);
    }

    #[test]
    fn test_header_skipped() {
        let (space, stats) = parse("2 3\na 1 0 0\nb 0 1 0\n").unwrap();
        assert_eq!(stats.header, Some((2, 3)));
        assert_eq!(space.len(), 2);
        assert!(!space.contains("2"));
    }

    #[test]
    fn test_header_dimension_enforced() {
        let err = parse("1 3\na 1 0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 3,
                found: 2,
                line: Some(2)
            }
        ));
    }

    #[test]
    fn test_two_token_line_later_is_a_vector() {
        let (space, _) = parse("a 1\nb 2\n").unwrap();
        assert_eq!(space.len(), 2);
        assert_eq!(space.dimension(), Some(1));
    }

    #[test]
    fn test_malformed_record_skipped() {
        let (space, stats) = parse("a 1 0\nb 0 x\nc\n\nd 1 1\n").unwrap();
        assert_eq!(space.words().collect::<Vec<_>>(), vec!["a", "d"]);
        assert_eq!(stats.malformed, 2);
    }

    #[test]
    fn test_dimension_mismatch_fatal() {
        let err = parse("a 1 0\nb 1 0 0\n").unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { line: Some(2), .. }));
    }

    #[test]
    fn test_invalid_utf8_dropped() {
        let mut bytes = b"ca".to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice(b"t 1 0\r\n");
        let (space, _) = parse_vectors(Cursor::new(bytes)).unwrap();
        assert!(space.contains("cat"));
    }

    #[test]
    fn test_vectors_normalized() {
        let (space, _) = parse("a 3 4\n").unwrap();
        let v = space.get("a").unwrap();
        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_write_format() {
        let space = VectorSpace::from_raw(vec![("a", vec![1.0, 0.0])]).unwrap();
        let mut out = Vec::new();
        write_vectors(&space, &mut out, WriteOptions::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a 1.0000 0.0000\n");
    }

    #[test]
    fn test_write_header() {
        let space = VectorSpace::from_raw(vec![("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]).unwrap();
        let mut out = Vec::new();
        let options = WriteOptions {
            precision: 2,
            header: true,
        };
        write_vectors(&space, &mut out, options).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2 2\na 1.00 0.00\nb 0.00 1.00\n"
        );
    }

    #[test]
    fn test_decode_lossy_clean() {
        assert_eq!(decode_lossy(b"hello world"), "hello world");
        assert_eq!(decode_lossy(b"crlf\r"), "crlf");
    }

    #[test]
    fn test_codec_from_path() {
        assert_eq!(Codec::from_path(Path::new("v.txt.gz")), Codec::Gzip);
        assert_eq!(Codec::from_path(Path::new("dump.xml.bz2")), Codec::Bzip2);
        assert_eq!(Codec::from_path(Path::new("v.txt")), Codec::Plain);
        assert_eq!(Codec::from_path(Path::new("noext")), Codec::Plain);
    }

    #[test]
    fn test_gzip_sink_finish_writes_trailer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt.gz");
        let mut sink = create_text(&path).unwrap();
        sink.write_all(b"a 1.0000\n").unwrap();
        sink.finish().unwrap();

        // A truncated stream (no CRC/size trailer) fails to decode.
        let mut text = String::new();
        MultiGzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "a 1.0000\n");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_finish_reports_deferred_write_errors() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        for codec in [Codec::Plain, Codec::Gzip, Codec::Bzip2] {
            let mut sink = TextSink::new(File::create(full).unwrap(), codec);
            // Small enough to stay buffered until finish.
            sink.write_all(b"a 1.0000 0.0000\n").unwrap();
            assert!(
                matches!(sink.finish(), Err(Error::Io(_))),
                "{codec:?} sink swallowed the write error"
            );
        }
    }
}
