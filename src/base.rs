use std::fmt;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::compress::Codec;
use crate::error::Result;

/// The integer width used by every codec, delta transform and posting
pub type Integer = u32;

/// Internal identifier of a document, assigned in order of appearance
pub type DocumentOrdinal = Integer;

pub const INDEX_CBOR: &str = "index.cbor";
pub const POSTINGS_DAT: &str = "postings.dat";

/// Marks object that have a length
pub trait Len {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a term record lives within the postings file
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TermInformation {
    pub term: String,

    /// Byte range of the record within the postings file
    pub position_range: (u64, u64),

    /// Number of postings
    pub length: usize,
}

impl fmt::Display for TermInformation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({}: {}-{}, len: {})",
            self.term, self.position_range.0, self.position_range.1, self.length
        )
    }
}

/// Global information on a serialized index
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct IndexInformation {
    /// Codec used for both the document IDs and the frequencies
    pub codec: Codec,

    /// Primary keys, indexed by document ordinal
    pub documents: Vec<String>,

    /// Terms in lexicographic order
    pub terms: Vec<TermInformation>,
}

pub fn save_information(information: &IndexInformation, path: &Path) -> Result<()> {
    let info_file = File::options()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path.join(INDEX_CBOR))?;

    let mut writer = BufWriter::new(info_file);
    ciborium::ser::into_writer(information, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_information(path: &Path) -> Result<IndexInformation> {
    let info_file = File::options().read(true).open(path.join(INDEX_CBOR))?;
    Ok(ciborium::de::from_reader(BufReader::new(info_file))?)
}
