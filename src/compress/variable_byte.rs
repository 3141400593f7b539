//! Variable-byte encoding
//!
//! Each integer is cut into 7-bit groups written most significant first. Every
//! byte but the last of an integer has its high bit set.

use super::IntegerCodec;
use crate::base::Integer;

const PAYLOAD_BITS: u32 = 7;
const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: Integer = 0x7F;

#[derive(Clone, Copy, Debug, Default)]
pub struct VariableByte;

impl VariableByte {
    /// Number of bytes used by `value`
    #[inline]
    pub fn bytes_needed(value: Integer) -> usize {
        let bits = Integer::BITS - value.leading_zeros();
        (bits.max(1)).div_ceil(PAYLOAD_BITS) as usize
    }

    /// Writes `value` at the start of `encoded`, which must be large enough
    #[inline]
    fn write(encoded: &mut [u8], value: Integer) -> usize {
        let length = Self::bytes_needed(value);
        for (ix, byte) in encoded[..length].iter_mut().enumerate() {
            let shift = PAYLOAD_BITS * (length - 1 - ix) as u32;
            let payload = ((value >> shift) & PAYLOAD_MASK) as u8;
            *byte = if ix + 1 < length {
                payload | CONTINUATION
            } else {
                payload
            };
        }
        length
    }
}

impl IntegerCodec for VariableByte {
    fn encode(&self, encoded: &mut [u8], source: &[Integer]) -> usize {
        let needed: usize = source.iter().map(|&x| Self::bytes_needed(x)).sum();
        if needed == 0 || needed > encoded.len() {
            return 0;
        }

        let mut position = 0;
        for &value in source {
            position += Self::write(&mut encoded[position..], value);
        }
        position
    }

    fn decode(&self, decoded: &mut [Integer], integers_to_decode: usize, source: &[u8]) {
        let wanted = integers_to_decode.min(decoded.len());
        let mut bytes = source.iter();

        for out in decoded[..wanted].iter_mut() {
            let mut value: Integer = 0;
            loop {
                match bytes.next() {
                    Some(&byte) => {
                        value = (value << PAYLOAD_BITS) | (byte as Integer & PAYLOAD_MASK);
                        if byte & CONTINUATION == 0 {
                            break;
                        }
                    }
                    None => return,
                }
            }
            *out = value;
        }
    }

    fn max_encoded_len(&self, count: usize) -> usize {
        count * Self::bytes_needed(Integer::MAX)
    }
}
