use log::info;
use rstest::rstest;

use helpers::index::TestCollection;
use term_index::{
    base::{load_information, Len, INDEX_CBOR},
    builder::{index_collection, index_documents, IndexOptions},
    compress::Codec,
    error::Error,
    index::{IndexManager, Postings, PostingsVisitor},
    parser::{Token, TokenKind},
    reader::CompressedIndex,
    serialize::save_index,
};

/// Initialize the logger
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn alpha(term: &str) -> Token<'_> {
    Token::new(TokenKind::Alpha, term.as_bytes())
}

#[rstest]
#[case(Codec::None, 100, 200, 20., 50, Some(1))]
#[case(Codec::VariableByte, 100, 200, 20., 50, Some(1))]
#[case(Codec::BitPacked, 100, 200, 20., 50, Some(1))]
// Large vocabulary, long documents
#[case(Codec::VariableByte, 5000, 300, 100., 500, None)]
#[case(Codec::BitPacked, 5000, 300, 100., 500, None)]
fn test_collection(
    #[case] codec: Codec,
    #[case] vocabulary_size: usize,
    #[case] document_count: usize,
    #[case] lambda_words: f32,
    #[case] max_words: usize,
    #[case] seed: Option<u64>,
    #[values(true, false)] in_memory: bool,
) {
    init_logger();
    let data = TestCollection::new(vocabulary_size, document_count, lambda_words, max_words, seed);

    let options = IndexOptions {
        codec,
        progress_frequency: 50,
        top_terms: 5,
        in_memory,
        ..Default::default()
    };
    let summary = index_collection(&data.collection_path(), &data.index_path(), &options)
        .expect("Error while indexing the collection");
    info!("Index built in {}", data.index_path().display());

    assert_eq!(summary.documents, document_count);
    assert_eq!(summary.terms, data.expected.len());

    let mut expected_top: Vec<_> = data
        .expected
        .iter()
        .map(|(term, postings)| (term.clone(), postings.len()))
        .collect();
    expected_top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    expected_top.truncate(5);
    assert_eq!(summary.top_terms, expected_top);
    // Every document contains "doc"
    assert_eq!(summary.top_terms[0].1, document_count);

    let index = CompressedIndex::load(&data.index_path(), in_memory).expect("Cannot load index");
    assert_eq!(index.codec(), codec);
    assert_eq!(index.len(), data.expected.len());
    for (ix, key) in index.documents().iter().enumerate() {
        assert_eq!(key, &data.documents[ix].primary_key);
    }

    let mut expected = data.expected.iter();
    for entry in index.iter() {
        let (term, observed) = entry.expect("Cannot read postings");
        let (expected_term, expected_postings) =
            expected.next().expect("The index has too many terms");
        assert_eq!(term, expected_term);
        assert!(
            &observed == expected_postings,
            "Postings differ for term {}: {:?} vs {:?}",
            term,
            observed,
            expected_postings
        );
    }
    assert!(expected.next().is_none(), "The index has too few terms");
}

#[test]
fn test_same_output() {
    init_logger();
    let data = TestCollection::new(300, 100, 30., 100, Some(7));
    let collection = std::fs::read(data.collection_path()).unwrap();

    // Two runs over the same collection give byte-identical files
    let mut outputs = Vec::new();
    for run in 0..2 {
        let path = data.dir.path().join(format!("run-{}", run));
        let index = index_documents(&collection, &IndexOptions::default()).unwrap();
        save_index(&index, &path, Codec::BitPacked).unwrap();
        outputs.push((
            std::fs::read(path.join("postings.dat")).unwrap(),
            std::fs::read(path.join(INDEX_CBOR)).unwrap(),
        ));
    }
    assert_eq!(outputs[0], outputs[1]);

    let information = load_information(&data.dir.path().join("run-0")).unwrap();
    assert_eq!(information.codec, Codec::BitPacked);
    assert_eq!(information.documents.len(), 100);
}

#[test]
fn test_protocol() {
    let mut index = IndexManager::new();

    // No document open
    assert!(matches!(
        index.term(&alpha("early")),
        Err(Error::NoOpenDocument { .. })
    ));
    assert!(matches!(
        index.end_document(),
        Err(Error::NoOpenDocument { .. })
    ));

    assert_eq!(index.begin_document("first").unwrap(), 0);
    index.term(&alpha("Hello")).unwrap();
    assert!(matches!(
        index.begin_document("second"),
        Err(Error::DocumentAlreadyOpen { ordinal: 0, .. })
    ));

    // The failed calls left no trace
    index.term(&alpha("hello")).unwrap();
    index.end_document().unwrap();
    assert_eq!(index.begin_document("second").unwrap(), 1);
    index.end_document().unwrap();

    assert_eq!(index.primary_keys(), &["first", "second"]);
    assert_eq!(index.term_count(), 1);
    let hello = index.postings("hello").unwrap();
    assert_eq!(hello.document_ids(), &[0]);
    assert_eq!(hello.frequencies(), &[2]);
}

#[test]
fn test_empty_document() {
    let mut index = IndexManager::new();
    index.begin_document("empty").unwrap();
    index.end_document().unwrap();
    index.begin_document("full").unwrap();
    index.term(&alpha("word")).unwrap();
    index.end_document().unwrap();

    assert_eq!(index.document_count(), 2);
    assert_eq!(index.postings("word").unwrap().document_ids(), &[1]);
}

struct Collect(Vec<(String, usize)>);

impl PostingsVisitor for Collect {
    fn term(&mut self, term: &str, postings: &Postings) -> term_index::error::Result<()> {
        self.0.push((term.to_string(), postings.len()));
        Ok(())
    }
}

#[test]
fn test_visit_sorted() {
    let text = "zebra apple Mango apple zebra kiwi";
    let mut index = IndexManager::new();
    index.begin_document("d").unwrap();
    for word in text.split(' ') {
        index.term(&alpha(word)).unwrap();
    }
    index.end_document().unwrap();

    let mut visitor = Collect(Vec::new());
    index.iterate(&mut visitor).unwrap();
    let terms: Vec<_> = visitor.0.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(terms, vec!["apple", "kiwi", "mango", "zebra"]);
}
