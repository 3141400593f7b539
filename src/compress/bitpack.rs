//! Fixed-width bit packing
//!
//! A header byte gives the bit width of the largest value; every integer is
//! then stored on that many bits (big-endian bit order), padded to a byte.

use std::io;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use super::IntegerCodec;
use crate::base::Integer;

#[derive(Clone, Copy, Debug, Default)]
pub struct BitPacked;

impl BitPacked {
    /// Number of bits needed for the largest value of the sequence
    pub fn bit_width(source: &[Integer]) -> u32 {
        let max = source.iter().copied().max().unwrap_or(0);
        Integer::BITS - max.leading_zeros()
    }

    fn packed_len(count: usize, width: u32) -> usize {
        1 + (count * width as usize).div_ceil(8)
    }

    fn pack(encoded: &mut [u8], width: u32, source: &[Integer]) -> io::Result<()> {
        let mut bit_writer = BitWriter::endian(encoded, BigEndian);
        for &x in source {
            bit_writer.write(width, x)?;
        }
        bit_writer.byte_align()
    }
}

impl IntegerCodec for BitPacked {
    fn encode(&self, encoded: &mut [u8], source: &[Integer]) -> usize {
        if source.is_empty() {
            return 0;
        }

        let width = Self::bit_width(source);
        let needed = Self::packed_len(source.len(), width);
        if needed > encoded.len() {
            return 0;
        }

        encoded[0] = width as u8;
        if width > 0 && Self::pack(&mut encoded[1..needed], width, source).is_err() {
            return 0;
        }
        needed
    }

    fn decode(&self, decoded: &mut [Integer], integers_to_decode: usize, source: &[u8]) {
        let Some((&width, packed)) = source.split_first() else {
            return;
        };
        let width = width as u32;
        let wanted = integers_to_decode.min(decoded.len());

        if width == 0 {
            decoded[..wanted].fill(0);
            return;
        }

        let available = packed.len() * 8 / width as usize;
        let mut bit_reader = BitReader::endian(packed, BigEndian);
        for out in decoded[..wanted.min(available)].iter_mut() {
            match bit_reader.read::<Integer>(width) {
                Ok(x) => *out = x,
                Err(_) => return,
            }
        }
    }

    fn max_encoded_len(&self, count: usize) -> usize {
        Self::packed_len(count, Integer::BITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut encoded = [0u8; 8];
        // 3 bits each: 101 001 111 + 7 padding bits
        let length = BitPacked.encode(&mut encoded, &[5, 1, 7]);
        assert_eq!(length, 3);
        assert_eq!(encoded[..length], [3, 0b1010_0111, 0b1000_0000]);
    }

    #[test]
    fn test_all_zeros() {
        let mut encoded = [0xFFu8; 4];
        assert_eq!(BitPacked.encode(&mut encoded, &[0, 0, 0, 0]), 1);
        assert_eq!(encoded[0], 0);

        let mut decoded = [9; 4];
        BitPacked.decode(&mut decoded, 4, &encoded[..1]);
        assert_eq!(decoded, [0; 4]);
    }
}
