//! Writes the compressed postings lists of a finished index
//!
//! Each term becomes one record of the postings file (all integers big-endian):
//!
//! ```text
//! u32 term length | term bytes | u32 postings count
//! u32 docid bytes | D1 + codec encoded document ordinals
//! u32 frequency bytes | codec encoded frequencies
//! ```
//!
//! The codec, the primary keys and the position of each record are saved
//! in the index information file.

use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::Path,
};

use byteorder::{BigEndian, WriteBytesExt};
use log::{debug, info};

use crate::base::{
    save_information, IndexInformation, Integer, Len, TermInformation, POSTINGS_DAT,
};
use crate::compress::{d1_encode_in_place, encode_with_retry, Codec};
use crate::error::{Error, Result};
use crate::index::{IndexManager, Postings, PostingsVisitor};

fn length_prefix(length: usize, what: &str, term: &str) -> Result<u32> {
    u32::try_from(length).map_err(|_| {
        Error::Serialization(format!("{} of term {:?} is too large ({})", what, term, length))
    })
}

/// Serializes postings lists into a writer
pub struct Serializer<W: Write> {
    writer: W,
    codec: Codec,

    /// Number of bytes written so far
    position: u64,

    documents: Vec<String>,
    terms: Vec<TermInformation>,

    // Reused between terms
    docids: Vec<Integer>,
    docid_buffer: Vec<u8>,
    frequency_buffer: Vec<u8>,
}

impl<W: Write> Serializer<W> {
    pub fn new(writer: W, codec: Codec) -> Self {
        Self {
            writer,
            codec,
            position: 0,
            documents: Vec::new(),
            terms: Vec::new(),
            docids: Vec::new(),
            docid_buffer: Vec::new(),
            frequency_buffer: Vec::new(),
        }
    }

    /// Flushes the writer and returns it with the index information
    pub fn finish(mut self) -> Result<(W, IndexInformation)> {
        self.writer.flush()?;
        let information = IndexInformation {
            codec: self.codec,
            documents: self.documents,
            terms: self.terms,
        };
        Ok((self.writer, information))
    }

    fn write_record(&mut self, term: &str, postings: &Postings) -> Result<u64> {
        self.docids.clear();
        self.docids.extend_from_slice(postings.document_ids());
        d1_encode_in_place(&mut self.docids);

        let docid_length =
            encode_with_retry(&self.codec, &mut self.docid_buffer, &self.docids, term)?;
        let frequency_length = encode_with_retry(
            &self.codec,
            &mut self.frequency_buffer,
            postings.frequencies(),
            term,
        )?;

        self.writer
            .write_u32::<BigEndian>(length_prefix(term.len(), "length", term)?)?;
        self.writer.write_all(term.as_bytes())?;
        self.writer
            .write_u32::<BigEndian>(length_prefix(postings.len(), "postings count", term)?)?;
        self.writer
            .write_u32::<BigEndian>(length_prefix(docid_length, "docid buffer", term)?)?;
        self.writer.write_all(&self.docid_buffer[..docid_length])?;
        self.writer
            .write_u32::<BigEndian>(length_prefix(frequency_length, "frequency buffer", term)?)?;
        self.writer
            .write_all(&self.frequency_buffer[..frequency_length])?;

        Ok((4 * 4 + term.len() + docid_length + frequency_length) as u64)
    }
}

impl<W: Write> PostingsVisitor for Serializer<W> {
    fn documents(&mut self, primary_keys: &[String]) -> Result<()> {
        self.documents = primary_keys.to_vec();
        Ok(())
    }

    fn term(&mut self, term: &str, postings: &Postings) -> Result<()> {
        let start = self.position;
        self.position += self.write_record(term, postings)?;

        let information = TermInformation {
            term: term.to_string(),
            position_range: (start, self.position),
            length: postings.len(),
        };
        debug!("Wrote {}", information);
        self.terms.push(information);
        Ok(())
    }
}

/// Serializes the index into the directory `path` (created if needed)
pub fn save_index(index: &IndexManager, path: &Path, codec: Codec) -> Result<IndexInformation> {
    if !path.is_dir() {
        info!("Creating path {}", path.display());
        create_dir_all(path)?;
    }

    let postings_file = File::options()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path.join(POSTINGS_DAT))?;

    let mut serializer = Serializer::new(BufWriter::new(postings_file), codec);
    index.iterate(&mut serializer)?;
    let (_, information) = serializer.finish()?;

    info!(
        "Serialized {} terms and {} documents with {:?}",
        information.terms.len(),
        information.documents.len(),
        codec
    );
    save_information(&information, path)?;
    Ok(information)
}
