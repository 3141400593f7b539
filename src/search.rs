//! Top-K selection over unbounded candidate streams

use std::cmp::Ordering;
use std::fmt;

use crate::base::DocumentOrdinal;
use crate::heap::{BoundedMinHeap, Compare};

/// Keeps the `k` best items of a stream, "best" being the greatest for `compare`
pub struct TopK<T, C> {
    buffer: Vec<T>,
    k: usize,
    compare: C,
}

impl<T, C> TopK<T, C>
where
    T: Clone,
    C: Compare<T>,
{
    pub fn new(k: usize, compare: C) -> Self {
        Self {
            buffer: Vec::with_capacity(k),
            k,
            compare,
        }
    }

    /// Offers a candidate, returns true if it was kept
    pub fn push(&mut self, candidate: T) -> bool {
        if self.buffer.len() < self.k {
            self.buffer.push(candidate);
            if self.buffer.len() == self.k {
                self.heap().make_heap();
            }
            return true;
        }

        let admitted = match self.buffer.first() {
            Some(weakest) => self.compare.compare(&candidate, weakest) == Ordering::Greater,
            None => false,
        };
        if admitted {
            self.heap().push_back(candidate);
        }
        admitted
    }

    /// The weakest kept item, once `k` items have been seen
    pub fn threshold(&self) -> Option<&T> {
        if self.k > 0 && self.buffer.len() == self.k {
            self.buffer.first()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the kept items, best first
    pub fn into_sorted_vec(self) -> Vec<T> {
        let compare = self.compare;
        let mut items = self.buffer;
        items.sort_by(|a, b| compare.compare(b, a));
        items
    }

    fn heap(&mut self) -> BoundedMinHeap<'_, T, impl Compare<T> + '_> {
        let compare = &self.compare;
        BoundedMinHeap::new(&mut self.buffer, move |a: &T, b: &T| compare.compare(a, b))
    }
}

/// A document together with its retrieval score
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredDocument {
    pub docid: DocumentOrdinal,
    pub score: f32,
}

impl fmt::Display for ScoredDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.docid, self.score)
    }
}

fn by_score(a: &ScoredDocument, b: &ScoredDocument) -> Ordering {
    a.score.total_cmp(&b.score)
}

type ScoreOrder = fn(&ScoredDocument, &ScoredDocument) -> Ordering;

/// The `top_k` best scored documents seen so far
pub struct TopScoredDocuments {
    top: TopK<ScoredDocument, ScoreOrder>,
}

impl TopScoredDocuments {
    pub fn new(top_k: usize) -> Self {
        Self {
            top: TopK::new(top_k, by_score as ScoreOrder),
        }
    }

    /// Add a new candidate, and returns the new lower bound on scores
    pub fn add(&mut self, candidate: DocumentOrdinal, score: f32) -> f32 {
        self.top.push(ScoredDocument {
            docid: candidate,
            score,
        });

        // If the heap is not full, returns -infinity
        self.top
            .threshold()
            .map_or(f32::NEG_INFINITY, |weakest| weakest.score)
    }

    pub fn into_sorted_vec(self) -> Vec<ScoredDocument> {
        self.top.into_sorted_vec()
    }
}
