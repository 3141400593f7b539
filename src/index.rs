//! Accumulation of the postings lists from a stream of document and term events

use std::collections::BTreeMap;

use log::debug;

use crate::base::{DocumentOrdinal, Len};
use crate::error::{Error, Result};
use crate::parser::Token;
use crate::search::TopK;

pub mod postings;

pub use postings::{Posting, Postings};

/// The document currently being indexed
#[derive(Clone, Debug)]
struct DocumentContext {
    primary_key: String,
    ordinal: DocumentOrdinal,
}

/// Consumer of a finished index (e.g. a serializer)
pub trait PostingsVisitor {
    /// Called once, before the terms, with the primary keys indexed by ordinal
    fn documents(&mut self, _primary_keys: &[String]) -> Result<()> {
        Ok(())
    }

    /// Called for each term, in lexicographic order
    fn term(&mut self, term: &str, postings: &Postings) -> Result<()>;
}

/// Builds the term to postings list mapping of one indexing run
///
/// Events must be bracketed: `begin_document`, any number of `term`,
/// `end_document`. Document ordinals are assigned from 0 in order of
/// appearance.
#[derive(Default)]
pub struct IndexManager {
    terms: BTreeMap<String, Postings>,
    primary_keys: Vec<String>,
    current: Option<DocumentContext>,

    /// Normalized form of the last term
    key: String,
}

impl IndexManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new document, returning its ordinal
    pub fn begin_document(&mut self, primary_key: &str) -> Result<DocumentOrdinal> {
        if let Some(open) = &self.current {
            return Err(Error::DocumentAlreadyOpen {
                open: open.primary_key.clone(),
                ordinal: open.ordinal,
                requested: primary_key.to_string(),
            });
        }

        let ordinal = DocumentOrdinal::try_from(self.primary_keys.len())
            .map_err(|_| Error::OrdinalOverflow(self.primary_keys.len()))?;
        debug!("Begin document {} ({})", ordinal, primary_key);

        self.primary_keys.push(primary_key.to_string());
        self.current = Some(DocumentContext {
            primary_key: primary_key.to_string(),
            ordinal,
        });
        Ok(ordinal)
    }

    /// Adds an occurrence of the token (ASCII case-folded) to the open document
    pub fn term(&mut self, token: &Token<'_>) -> Result<()> {
        let ordinal = match &self.current {
            Some(document) => document.ordinal,
            None => return Err(Error::NoOpenDocument { operation: "term" }),
        };

        self.key.clear();
        self.key.push_str(&String::from_utf8_lossy(token.lexeme));
        self.key.make_ascii_lowercase();

        match self.terms.get_mut(self.key.as_str()) {
            Some(postings) => postings.push(ordinal),
            None => {
                let mut postings = Postings::new();
                postings.push(ordinal);
                self.terms.insert(self.key.clone(), postings);
            }
        }
        Ok(())
    }

    /// Closes the open document
    pub fn end_document(&mut self) -> Result<()> {
        match self.current.take() {
            Some(document) => {
                debug!("End document {}", document.ordinal);
                Ok(())
            }
            None => Err(Error::NoOpenDocument {
                operation: "end_document",
            }),
        }
    }

    pub fn is_document_open(&self) -> bool {
        self.current.is_some()
    }

    /// Visits the primary keys then every term in lexicographic order
    ///
    /// Fails if a document is still open.
    pub fn iterate<V>(&self, visitor: &mut V) -> Result<()>
    where
        V: PostingsVisitor + ?Sized,
    {
        if let Some(open) = &self.current {
            return Err(Error::DocumentStillOpen(open.primary_key.clone()));
        }

        visitor.documents(&self.primary_keys)?;
        for (term, postings) in self.terms.iter() {
            visitor.term(term, postings)?;
        }
        Ok(())
    }

    pub fn postings(&self, term: &str) -> Option<&Postings> {
        self.terms.get(term)
    }

    pub fn document_count(&self) -> usize {
        self.primary_keys.len()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    /// The `k` terms with the highest document frequency (ties: first in term order)
    pub fn top_terms(&self, k: usize) -> Vec<(String, usize)> {
        let mut top = TopK::new(k, |a: &(usize, &str), b: &(usize, &str)| {
            a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1))
        });
        for (term, postings) in self.terms.iter() {
            top.push((postings.len(), term.as_str()));
        }

        top.into_sorted_vec()
            .into_iter()
            .map(|(df, term)| (term.to_string(), df))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TokenKind;

    fn alpha(text: &str) -> Token<'_> {
        Token::new(TokenKind::Alpha, text.as_bytes())
    }

    #[test]
    fn test_two_documents() {
        let mut index = IndexManager::new();
        for (key, ordinal) in [("d0", 0), ("d1", 1)] {
            assert_eq!(index.begin_document(key).unwrap(), ordinal);
            for term in ["a", "b", "a"] {
                index.term(&alpha(term)).unwrap();
            }
            index.end_document().unwrap();
        }

        let a = index.postings("a").unwrap();
        assert_eq!(a.document_ids(), &[0, 1]);
        assert_eq!(a.frequencies(), &[2, 2]);

        let b = index.postings("b").unwrap();
        assert_eq!(b.document_ids(), &[0, 1]);
        assert_eq!(b.frequencies(), &[1, 1]);

        assert_eq!(index.document_count(), 2);
        assert_eq!(index.term_count(), 2);
        assert_eq!(index.primary_keys(), &["d0".to_string(), "d1".to_string()]);
    }

    #[test]
    fn test_case_folding() {
        let mut index = IndexManager::new();
        index.begin_document("d").unwrap();
        index.term(&alpha("Hello")).unwrap();
        index.term(&alpha("HELLO")).unwrap();
        index
            .term(&Token::new(TokenKind::Numeric, b"42"))
            .unwrap();
        index.end_document().unwrap();

        assert_eq!(index.postings("hello").unwrap().frequencies(), &[2]);
        assert!(index.postings("Hello").is_none());
        assert_eq!(index.postings("42").unwrap().len(), 1);
    }

    #[test]
    fn test_protocol_violations() {
        let mut index = IndexManager::new();
        assert!(matches!(
            index.term(&alpha("a")),
            Err(Error::NoOpenDocument { operation: "term" })
        ));
        assert!(matches!(
            index.end_document(),
            Err(Error::NoOpenDocument { .. })
        ));

        index.begin_document("first").unwrap();
        match index.begin_document("second") {
            Err(Error::DocumentAlreadyOpen {
                open,
                ordinal,
                requested,
            }) => {
                assert_eq!(open, "first");
                assert_eq!(ordinal, 0);
                assert_eq!(requested, "second");
            }
            _ => panic!("expected a protocol error"),
        }
        assert!(index.is_document_open());
    }

    struct Collect {
        documents: Vec<String>,
        terms: Vec<(String, Vec<Posting>)>,
    }

    impl PostingsVisitor for Collect {
        fn documents(&mut self, primary_keys: &[String]) -> Result<()> {
            self.documents = primary_keys.to_vec();
            Ok(())
        }

        fn term(&mut self, term: &str, postings: &Postings) -> Result<()> {
            self.terms.push((term.to_string(), postings.iter().collect()));
            Ok(())
        }
    }

    #[test]
    fn test_iterate_in_order() {
        let mut index = IndexManager::new();
        index.begin_document("x").unwrap();
        for term in ["zebra", "apple", "mango", "apple"] {
            index.term(&alpha(term)).unwrap();
        }

        let mut visitor = Collect {
            documents: Vec::new(),
            terms: Vec::new(),
        };
        assert!(matches!(
            index.iterate(&mut visitor),
            Err(Error::DocumentStillOpen(_))
        ));

        index.end_document().unwrap();
        index.iterate(&mut visitor).unwrap();

        assert_eq!(visitor.documents, vec!["x".to_string()]);
        let terms: Vec<&str> = visitor.terms.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(terms, vec!["apple", "mango", "zebra"]);
        assert_eq!(
            visitor.terms[0].1,
            vec![Posting {
                docid: 0,
                frequency: 2
            }]
        );
    }

    #[test]
    fn test_top_terms() {
        let mut index = IndexManager::new();
        let documents = [vec!["a", "b", "c"], vec!["b", "c"], vec!["c", "d"]];
        for (ix, document) in documents.iter().enumerate() {
            index.begin_document(&ix.to_string()).unwrap();
            for term in document {
                index.term(&alpha(term)).unwrap();
            }
            index.end_document().unwrap();
        }

        assert_eq!(
            index.top_terms(3),
            vec![
                ("c".to_string(), 3),
                ("b".to_string(), 2),
                ("a".to_string(), 1)
            ]
        );
        assert!(index.top_terms(0).is_empty());
    }
}
