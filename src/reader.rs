//! Reads back an index written by [`crate::serialize::save_index`]

use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use log::info;

use crate::base::{
    load_information, IndexInformation, Integer, Len, TermInformation, POSTINGS_DAT,
};
use crate::compress::{d1_decode_in_place, Codec, IntegerCodec};
use crate::error::{Error, Result};
use crate::index::Postings;
use crate::utils::buffer::{open_buffer, Buffer};

pub struct CompressedIndex {
    information: IndexInformation,

    /// View on the postings file
    buffer: Box<dyn Buffer>,
}

fn corrupted(term: &str, what: &str) -> Error {
    Error::Corrupted(format!("record of term {:?}: {}", term, what))
}

/// Splits `length` bytes from the front of `data`
fn take<'a>(data: &mut &'a [u8], length: usize, term: &str) -> Result<&'a [u8]> {
    if data.len() < length {
        return Err(corrupted(term, "truncated record"));
    }
    let (head, tail) = data.split_at(length);
    *data = tail;
    Ok(head)
}

fn read_length(data: &mut &[u8], term: &str) -> Result<usize> {
    data.read_u32::<BigEndian>()
        .map(|x| x as usize)
        .map_err(|_| corrupted(term, "truncated record"))
}

impl CompressedIndex {
    pub fn load(path: &Path, in_memory: bool) -> Result<Self> {
        let information = load_information(path)?;
        let buffer = open_buffer(&path.join(POSTINGS_DAT), in_memory)?;
        info!(
            "Loaded index with {} terms and {} documents from {}",
            information.terms.len(),
            information.documents.len(),
            path.display()
        );
        Ok(Self {
            information,
            buffer,
        })
    }

    pub fn codec(&self) -> Codec {
        self.information.codec
    }

    /// Primary keys, indexed by document ordinal
    pub fn documents(&self) -> &[String] {
        &self.information.documents
    }

    /// The terms, in lexicographic order
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.information.terms.iter().map(|t| t.term.as_str())
    }

    /// Returns the postings list of `term`, if indexed
    pub fn postings(&self, term: &str) -> Result<Option<Postings>> {
        let terms = &self.information.terms;
        match terms.binary_search_by(|t| t.term.as_str().cmp(term)) {
            Ok(ix) => self.read(&terms[ix]).map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Iterates over all the terms and their postings
    pub fn iter(&self) -> impl Iterator<Item = Result<(&str, Postings)>> + '_ {
        self.information
            .terms
            .iter()
            .map(move |info| self.read(info).map(|postings| (info.term.as_str(), postings)))
    }

    fn read(&self, info: &TermInformation) -> Result<Postings> {
        let term = info.term.as_str();
        let (start, end) = info.position_range;
        let mut data = self.buffer.slice(start as usize, end as usize)?;

        let term_length = read_length(&mut data, term)?;
        if take(&mut data, term_length, term)? != term.as_bytes() {
            return Err(corrupted(term, "stored term differs"));
        }

        let count = read_length(&mut data, term)?;
        if count != info.length {
            return Err(corrupted(
                term,
                &format!("{} postings stored, {} expected", count, info.length),
            ));
        }

        let codec = self.information.codec;

        let docid_length = read_length(&mut data, term)?;
        let mut docids = vec![0 as Integer; count];
        codec.decode(&mut docids, count, take(&mut data, docid_length, term)?);
        d1_decode_in_place(&mut docids);

        let frequency_length = read_length(&mut data, term)?;
        let mut frequencies = vec![0 as Integer; count];
        codec.decode(
            &mut frequencies,
            count,
            take(&mut data, frequency_length, term)?,
        );

        if !data.is_empty() {
            return Err(corrupted(term, "trailing bytes"));
        }

        Ok(Postings::from_parts(docids, frequencies))
    }
}

impl Len for CompressedIndex {
    fn len(&self) -> usize {
        self.information.terms.len()
    }
}
