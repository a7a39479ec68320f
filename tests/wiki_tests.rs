//! Category lexicon extraction over a compressed dump.

use std::collections::HashSet;
use std::fs;
use std::io::Write;

use bzip2::write::BzEncoder;
use bzip2::Compression;
use retrofit::wiki::{CategoryExtractor, PageReader};
use retrofit::lexicon::read_lexicon;
use retrofit::LexiconGraph;

const DUMP: &str = r#"<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.10/">
  <siteinfo>
    <sitename>Wikipedia</sitename>
  </siteinfo>
  <page>
    <title>Tokyo</title>
    <ns>0</ns>
    <revision>
      <text xml:space="preserve">'''Tokyo''' is a city.
[[Category:Capitals in Asia]]
[[Category:Cities in Japan]]</text>
    </revision>
  </page>
  <page>
    <title>Osaka</title>
    <ns>0</ns>
    <revision>
      <text xml:space="preserve">[[Category:Cities in Japan]]</text>
    </revision>
  </page>
  <page>
    <title>Seoul</title>
    <ns>0</ns>
    <revision>
      <text xml:space="preserve">[[category:Capitals in Asia]]</text>
    </revision>
  </page>
  <page>
    <title>Category:Cities in Japan</title>
    <ns>14</ns>
    <revision>
      <text xml:space="preserve">[[Category:Cities in Japan]]</text>
    </revision>
  </page>
  <page>
    <title>Kobe (city)</title>
    <ns>0</ns>
    <revision>
      <text xml:space="preserve">[[Category:Cities in Japan]]</text>
    </revision>
  </page>
  <page>
    <title>Nagoya</title>
    <ns>0</ns>
    <revision>
      <text xml:space="preserve">[[Category:Cities in Japan]]</text>
    </revision>
  </page>
</mediawiki>
"#;

fn vocab() -> HashSet<String> {
    ["Tokyo", "Osaka", "Seoul", "Kobe (city)", "Category:Cities in Japan"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_bz2_dump_to_lexicon() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dump.xml.bz2");
    let mut enc = BzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
    enc.write_all(DUMP.as_bytes()).unwrap();
    enc.finish().unwrap();

    let pages = PageReader::open(&path).unwrap();
    let lexicon = CategoryExtractor::new().extract(pages, &vocab()).unwrap();

    // Nagoya has no vector, Kobe (city) is multi-sense, the category page is
    // namespaced.
    assert_eq!(
        lexicon.lines().collect::<Vec<_>>(),
        vec!["Tokyo Seoul", "Tokyo Osaka"]
    );
}

#[test]
fn test_multi_sense_titles_included_on_request() {
    let pages = PageReader::new(std::io::Cursor::new(DUMP));
    let lexicon = CategoryExtractor::new()
        .with_multi_sense(true)
        .extract(pages, &vocab())
        .unwrap();
    assert_eq!(
        lexicon.members("Cities in Japan").unwrap(),
        &["Tokyo", "Osaka", "Kobe (city)"]
    );
}

#[test]
fn test_lexicon_feeds_graph_builder() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.txt");

    let pages = PageReader::new(std::io::Cursor::new(DUMP));
    let lexicon = CategoryExtractor::new().extract(pages, &vocab()).unwrap();
    assert_eq!(lexicon.save(&path).unwrap(), 2);

    let text = fs::read_to_string(&path).unwrap();
    let graph = LexiconGraph::build(text.lines(), &vocab());
    assert_eq!(graph.groups().len(), 2);
    assert_eq!(graph.group_ids("Tokyo"), Some(&[0, 1][..]));
}

#[test]
fn test_compressed_lexicon_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let pages = PageReader::new(std::io::Cursor::new(DUMP));
    let lexicon = CategoryExtractor::new().extract(pages, &vocab()).unwrap();
    let plain = dir.path().join("lexicon.txt");
    lexicon.save(&plain).unwrap();
    let expected = read_lexicon(&plain, &vocab()).unwrap();

    for name in ["lexicon.txt.gz", "lexicon.txt.bz2"] {
        let path = dir.path().join(name);
        assert_eq!(lexicon.save(&path).unwrap(), 2);
        assert_ne!(fs::read(&path).unwrap(), fs::read(&plain).unwrap());
        assert_eq!(read_lexicon(&path, &vocab()).unwrap(), expected, "{name}");
    }
}
