use rand::{self, Rng, RngCore};
use rand_distr::{Distribution, Poisson, Zipf};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Returns the word for a vocabulary index (letters only, so that the
/// tokenizer sees a single alphabetic token)
pub fn word(mut term_ix: usize) -> String {
    let mut word = String::new();
    loop {
        word.push((b'a' + (term_ix % 26) as u8) as char);
        term_ix /= 26;
        if term_ix == 0 {
            break;
        }
    }
    word
}

pub struct TestDocument {
    pub primary_key: String,
    pub words: Vec<String>,
}

impl TestDocument {
    /// Term frequencies of the (lower-cased) words
    pub fn term_frequencies(&self) -> BTreeMap<String, u32> {
        let mut frequencies = BTreeMap::new();
        for w in self.words.iter() {
            *frequencies.entry(w.to_ascii_lowercase()).or_insert(0) += 1;
        }
        frequencies
    }

    /// Writes the document in the TREC format
    pub fn to_trec(&self, output: &mut String) {
        write!(output, "<DOC>\n<DOCNO>{}</DOCNO>\n<TEXT>\n", self.primary_key).unwrap();
        for (ix, w) in self.words.iter().enumerate() {
            if ix > 0 {
                output.push(if ix % 12 == 0 { '\n' } else { ' ' });
            }
            output.push_str(w);
        }
        output.push_str("\n</TEXT>\n</DOC>\n");
    }
}

/// Creates a document whose words follow a Zipf distribution over the
/// vocabulary, with a Poisson distributed length
pub fn create_document(
    primary_key: String,
    lambda_words: f32,
    max_words: usize,
    vocabulary_size: usize,
    rng: &mut dyn RngCore,
) -> TestDocument {
    let poi = Poisson::new(lambda_words).unwrap();
    let num_words = (1 + poi.sample(rng) as usize).min(max_words);
    let zipf = Zipf::<f64>::new(vocabulary_size as u64, 1.1).unwrap();

    let words = (0..num_words)
        .map(|_| {
            let w = word(zipf.sample(rng) as usize - 1);
            // Mix cases to exercise case folding
            if rng.gen_bool(0.1) {
                w.to_ascii_uppercase()
            } else {
                w
            }
        })
        .collect();

    TestDocument { primary_key, words }
}
