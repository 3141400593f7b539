//! In-memory inverted index over a TREC collection, written as a set of
//! compressed postings lists

pub mod base;
pub mod builder;
pub mod compress;
pub mod error;
pub mod heap;
pub mod index;
pub mod parser;
pub mod reader;
pub mod search;
pub mod serialize;
pub mod trec;

pub mod utils {
    pub mod buffer;
}
