//! Methods for compressing the posting lists
//!
//! A codec is a raw, stateless transform between a sequence of [`Integer`]s
//! and a byte buffer. It does not record how many integers it holds: the
//! caller stores the count next to the encoded bytes.

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::base::Integer;
use crate::error::{Error, Result};

pub mod bitpack;
pub mod raw;
pub mod variable_byte;

use bitpack::BitPacked;
use raw::Raw;
use variable_byte::VariableByte;

/// Lossless encoding of integer sequences into bytes
pub trait IntegerCodec: Send + Sync {
    /// Encode all of `source` into `encoded`, returning the number of bytes used.
    ///
    /// Returns 0 if the encoding does not fit within `encoded.len()` bytes; in that
    /// case nothing has been written and the caller should retry with a larger buffer.
    fn encode(&self, encoded: &mut [u8], source: &[Integer]) -> usize;

    /// Decode at least `integers_to_decode` integers from `source` into `decoded`.
    ///
    /// Codecs working on fixed-size groups may write more than `integers_to_decode`
    /// values (never beyond `decoded.len()`). Decoding stops at the end of `source`.
    fn decode(&self, decoded: &mut [Integer], integers_to_decode: usize, source: &[u8]);

    /// Upper bound on the number of bytes needed to encode `count` integers
    fn max_encoded_len(&self, count: usize) -> usize;
}

/// Replaces `source` by its successive differences, into `encoded`.
///
/// The first value is kept as is (the implicit previous value is 0). Differences
/// are computed with wrapping arithmetic, so any sequence can be restored with
/// [`d1_decode`]; only non-decreasing input yields small values.
pub fn d1_encode(encoded: &mut [Integer], source: &[Integer]) -> usize {
    let mut prior: Integer = 0;
    for (out, &current) in encoded.iter_mut().zip(source) {
        *out = current.wrapping_sub(prior);
        prior = current;
    }
    source.len().min(encoded.len())
}

/// In-place form of [`d1_encode`]
pub fn d1_encode_in_place(values: &mut [Integer]) -> usize {
    let mut prior: Integer = 0;
    for value in values.iter_mut() {
        // read the slot before overwriting it
        let current = *value;
        *value = current.wrapping_sub(prior);
        prior = current;
    }
    values.len()
}

/// Prefix sum, inverse of [`d1_encode`]
pub fn d1_decode(decoded: &mut [Integer], source: &[Integer]) -> usize {
    let mut sum: Integer = 0;
    for (out, &delta) in decoded.iter_mut().zip(source) {
        sum = sum.wrapping_add(delta);
        *out = sum;
    }
    source.len().min(decoded.len())
}

/// In-place form of [`d1_decode`]
pub fn d1_decode_in_place(values: &mut [Integer]) -> usize {
    let mut sum: Integer = 0;
    for value in values.iter_mut() {
        sum = sum.wrapping_add(*value);
        *value = sum;
    }
    values.len()
}

/// The codecs available to the serializer
#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(tag = "type")]
pub enum Codec {
    /// Four big-endian bytes per integer
    None,

    /// 7 bits per byte, high bit set while more bytes follow
    #[default]
    VariableByte,

    /// Fixed bit width for the whole sequence
    BitPacked,
}

impl IntegerCodec for Codec {
    #[inline]
    fn encode(&self, encoded: &mut [u8], source: &[Integer]) -> usize {
        match self {
            Codec::None => Raw.encode(encoded, source),
            Codec::VariableByte => VariableByte.encode(encoded, source),
            Codec::BitPacked => BitPacked.encode(encoded, source),
        }
    }

    #[inline]
    fn decode(&self, decoded: &mut [Integer], integers_to_decode: usize, source: &[u8]) {
        match self {
            Codec::None => Raw.decode(decoded, integers_to_decode, source),
            Codec::VariableByte => VariableByte.decode(decoded, integers_to_decode, source),
            Codec::BitPacked => BitPacked.decode(decoded, integers_to_decode, source),
        }
    }

    fn max_encoded_len(&self, count: usize) -> usize {
        match self {
            Codec::None => Raw.max_encoded_len(count),
            Codec::VariableByte => VariableByte.max_encoded_len(count),
            Codec::BitPacked => BitPacked.max_encoded_len(count),
        }
    }
}

/// Encodes `source` into `buffer`, growing the buffer each time the codec
/// reports an overflow.
///
/// Returns the number of bytes written at the start of `buffer`. A codec that
/// still overflows once the buffer reaches its own worst-case bound is an error.
pub fn encode_with_retry(
    codec: &dyn IntegerCodec,
    buffer: &mut Vec<u8>,
    source: &[Integer],
    term: &str,
) -> Result<usize> {
    if source.is_empty() {
        return Ok(0);
    }

    let bound = codec.max_encoded_len(source.len());
    if buffer.len() < source.len() {
        buffer.resize(source.len().min(bound), 0);
    }

    loop {
        let written = codec.encode(buffer, source);
        if written > 0 {
            return Ok(written);
        }

        if buffer.len() >= bound {
            return Err(Error::EncodeOverflow {
                term: term.to_string(),
                count: source.len(),
                capacity: buffer.len(),
            });
        }

        let capacity = (buffer.len() * 2).clamp(1, bound);
        debug!(
            "[{}] Growing encoding buffer from {} to {} bytes",
            term,
            buffer.len(),
            capacity
        );
        buffer.resize(capacity, 0);
    }
}
