//! Error type shared by the indexing pipeline

use std::io;

use thiserror::Error;

use crate::base::DocumentOrdinal;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// `begin_document` while a document is open
    #[error("cannot begin document {requested}: document {open} (ordinal {ordinal}) is still open")]
    DocumentAlreadyOpen {
        open: String,
        ordinal: DocumentOrdinal,
        requested: String,
    },

    /// `term` or `end_document` with no open document
    #[error("{operation} called while no document is open")]
    NoOpenDocument { operation: &'static str },

    #[error("cannot assign an ordinal to document number {0}")]
    OrdinalOverflow(usize),

    /// The term map was requested before the last document was closed
    #[error("document {0} is still open, the index is not finished")]
    DocumentStillOpen(String),

    #[error("could not encode {count} integers of term {term:?} within {capacity} bytes")]
    EncodeOverflow {
        term: String,
        count: usize,
        capacity: usize,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted index: {0}")]
    Corrupted(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ciborium::ser::Error<io::Error>> for Error {
    fn from(error: ciborium::ser::Error<io::Error>) -> Self {
        Error::Serialization(error.to_string())
    }
}

impl From<ciborium::de::Error<io::Error>> for Error {
    fn from(error: ciborium::de::Error<io::Error>) -> Self {
        Error::Serialization(error.to_string())
    }
}
