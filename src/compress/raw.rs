//! Identity encoding: four big-endian bytes per integer

use byteorder::{BigEndian, ByteOrder};

use super::IntegerCodec;
use crate::base::Integer;

const INTEGER_BYTES: usize = std::mem::size_of::<Integer>();

#[derive(Clone, Copy, Debug, Default)]
pub struct Raw;

impl IntegerCodec for Raw {
    fn encode(&self, encoded: &mut [u8], source: &[Integer]) -> usize {
        let needed = source.len() * INTEGER_BYTES;
        if needed == 0 || needed > encoded.len() {
            return 0;
        }
        BigEndian::write_u32_into(source, &mut encoded[..needed]);
        needed
    }

    fn decode(&self, decoded: &mut [Integer], integers_to_decode: usize, source: &[u8]) {
        let count = integers_to_decode
            .min(decoded.len())
            .min(source.len() / INTEGER_BYTES);
        BigEndian::read_u32_into(&source[..count * INTEGER_BYTES], &mut decoded[..count]);
    }

    fn max_encoded_len(&self, count: usize) -> usize {
        count * INTEGER_BYTES
    }
}
