use std::collections::BTreeMap;
use std::path::PathBuf;

use log::info;
use rand::{rngs::StdRng, SeedableRng};
use temp_dir::TempDir;

use crate::documents::{create_document, TestDocument};
use term_index::{base::Integer, index::Postings};

/// A random TREC collection written in a temporary directory, along
/// with the postings lists it should produce
pub struct TestCollection {
    pub dir: TempDir,
    pub documents: Vec<TestDocument>,
    pub expected: BTreeMap<String, Postings>,
}

impl TestCollection {
    pub fn new(
        vocabulary_size: usize,
        document_count: usize,
        lambda_words: f32,
        max_words: usize,
        seed: Option<u64>,
    ) -> Self {
        let dir = TempDir::new().expect("Could not create temporary directory");
        let mut rng = if let Some(seed) = seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        let mut expected = BTreeMap::<String, Postings>::new();
        let mut documents = Vec::new();
        let mut trec = String::new();

        for ix in 0..document_count {
            let document = create_document(
                format!("DOC-{:05}", ix),
                lambda_words,
                max_words,
                vocabulary_size,
                &mut rng,
            );
            document.to_trec(&mut trec);

            // The primary key is tokenized as "doc" and a number
            let mut frequencies = document.term_frequencies();
            *frequencies.entry("doc".to_string()).or_insert(0) += 1;
            *frequencies.entry(format!("{:05}", ix)).or_insert(0) += 1;

            for (term, frequency) in frequencies {
                let postings = expected.entry(term).or_default();
                for _ in 0..frequency {
                    postings.push(ix as Integer);
                }
            }
            documents.push(document);
        }

        std::fs::write(dir.path().join("collection.trec"), trec)
            .expect("Could not write the collection");
        info!(
            "Created a collection with {} documents and {} terms",
            documents.len(),
            expected.len()
        );

        Self {
            dir,
            documents,
            expected,
        }
    }

    pub fn collection_path(&self) -> PathBuf {
        self.dir.path().join("collection.trec")
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.path().join("index")
    }
}
