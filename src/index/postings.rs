use std::fmt;

use crate::base::{DocumentOrdinal, Integer, Len};

/// One entry of a postings list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Posting {
    pub docid: DocumentOrdinal,
    pub frequency: Integer,
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.docid, self.frequency)
    }
}

/// The postings list of a term, stored as two parallel arrays
/// (document ordinals, in increasing order, and term frequencies)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Postings {
    document_ids: Vec<DocumentOrdinal>,
    frequencies: Vec<Integer>,
}

impl Postings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a postings list from decoded arrays (which must have the same length)
    pub fn from_parts(document_ids: Vec<DocumentOrdinal>, frequencies: Vec<Integer>) -> Self {
        assert_eq!(
            document_ids.len(),
            frequencies.len(),
            "Document IDs and frequencies should have the same length"
        );
        Self {
            document_ids,
            frequencies,
        }
    }

    /// Records one occurrence of the term in document `docid`
    ///
    /// Occurrences must arrive document by document: a `docid` equal to the
    /// last one increments its frequency, any other starts a new posting.
    #[inline]
    pub fn push(&mut self, docid: DocumentOrdinal) {
        match (self.document_ids.last(), self.frequencies.last_mut()) {
            (Some(&last), Some(frequency)) if last == docid => {
                *frequency = frequency
                    .checked_add(1)
                    .expect("term frequency exceeds the integer width");
            }
            _ => {
                debug_assert!(
                    self.document_ids.last().map_or(true, |&last| last < docid),
                    "Doc ID should be increasing and this is not the case: {:?} vs {}",
                    self.document_ids.last(),
                    docid
                );
                self.document_ids.push(docid);
                self.frequencies.push(1);
            }
        }
    }

    pub fn document_ids(&self) -> &[DocumentOrdinal] {
        &self.document_ids
    }

    pub fn frequencies(&self) -> &[Integer] {
        &self.frequencies
    }

    /// Total number of occurrences of the term
    pub fn collection_frequency(&self) -> u64 {
        self.frequencies.iter().map(|&f| f as u64).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = Posting> + '_ {
        self.document_ids
            .iter()
            .zip(self.frequencies.iter())
            .map(|(&docid, &frequency)| Posting { docid, frequency })
    }
}

impl Len for Postings {
    fn len(&self) -> usize {
        self.document_ids.len()
    }
}
