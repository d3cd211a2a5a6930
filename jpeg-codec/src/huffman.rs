//! Canonical Huffman code construction, encoding and decoding.
//!
//! The code assignment algorithm (JPEG Annex C / spec design note): walk
//! code lengths from 1 to 16, assigning consecutive codes to the symbols of
//! each length in the order they appear in the table's value list, and
//! left-shifting the running code by one bit whenever the length advances.
//!
//! Decoding is a flat 8-bit lookup table for the (overwhelming, in
//! practice) majority of codes that are 8 bits or shorter, with a
//! bit-at-a-time tree walk as a fallback for the rare longer code. This
//! avoids building a full 16-level binary tree (`zune_jpeg` instead keeps a
//! `min_code`/`max_code`/`val_ptr` triple per length per Annex F; a flat LUT
//! is simpler here since code length is capped at 16 and the fallback path
//! is cold).

use crate::errors::{JpegError, JpegResult};
use crate::tables::HuffmanSpec;

/// A built Huffman table, ready for either encoding or decoding.
pub struct HuffmanTable {
    /// `encode_lut[symbol as usize]` gives the `(code, length)` to write for
    /// that symbol, if the table assigns one.
    encode_lut: [Option<(u16, u8)>; 256],
    /// `decode_lut[next_8_bits as usize]` gives `(symbol, length)` for every
    /// code of length <= 8 whose bits form a prefix of `next_8_bits`.
    decode_lut: [Option<(u8, u8)>; 256],
    /// Codes longer than 8 bits, walked one bit at a time on a decode_lut
    /// miss. Small in practice (the standard tables have very few of these).
    long_codes: Vec<(u16, u8, u8)>
}

impl HuffmanTable {
    /// Build a table from a DHT-style specification (bit-length counts and
    /// symbol values in code order).
    #[must_use]
    pub fn build(spec: &HuffmanSpec) -> HuffmanTable {
        HuffmanTable::build_from_parts(&spec.counts, spec.values)
    }

    /// Build a table from raw DHT segment fields: a count of codes for each
    /// bit length 1..=16, and the symbol values in the order codes are
    /// assigned to them. Used directly when parsing a DHT segment, whose
    /// value list is owned (`Vec<u8>`) rather than the `'static` slices the
    /// four standard tables use.
    #[must_use]
    pub fn build_from_parts(counts: &[u8; 16], values: &[u8]) -> HuffmanTable {
        let mut entries = Vec::with_capacity(values.len());
        let mut code: u16 = 0;
        let mut value_idx = 0;

        for length in 1u8..=16 {
            let count = counts[usize::from(length) - 1];
            for _ in 0..count {
                let symbol = values[value_idx];
                value_idx += 1;
                entries.push((symbol, code, length));
                code += 1;
            }
            code <<= 1;
        }

        let mut encode_lut = [None; 256];
        let mut decode_lut = [None; 256];
        let mut long_codes = Vec::new();

        for &(symbol, code, length) in &entries {
            encode_lut[usize::from(symbol)] = Some((code, length));

            if length <= 8 {
                let shift = 8 - length;
                let prefix = code << shift;
                for fill in 0..(1u16 << shift) {
                    decode_lut[usize::from(prefix | fill)] = Some((symbol, length));
                }
            } else {
                long_codes.push((code, length, symbol));
            }
        }

        HuffmanTable { encode_lut, decode_lut, long_codes }
    }

    /// Look up the code and bit length to write for `symbol`.
    pub fn encode(&self, symbol: u8) -> JpegResult<(u16, u8)> {
        self.encode_lut[usize::from(symbol)].ok_or_else(|| {
            JpegError::InternalInvariantViolation(format!(
                "huffman table has no code for symbol {symbol}"
            ))
        })
    }

    /// Decode one symbol from `peek8` (the next 8 bits of the bitstream,
    /// zero-padded if fewer than 8 remain) plus, on a LUT miss, additional
    /// bits pulled one at a time via `next_bit`. Returns the symbol and the
    /// total number of bits consumed so the caller can advance its cursor.
    pub fn decode(&self, peek8: u8, mut next_bit: impl FnMut() -> JpegResult<u8>) -> JpegResult<(u8, u8)> {
        if let Some((symbol, length)) = self.decode_lut[usize::from(peek8)] {
            return Ok((symbol, length));
        }

        let mut code = u16::from(peek8);
        let mut length = 8u8;
        loop {
            if length >= 16 {
                return Err(JpegError::MalformedInput(
                    "no huffman code matched after 16 bits".to_string()
                ));
            }
            code = (code << 1) | u16::from(next_bit()?);
            length += 1;
            if let Some(&(_, _, symbol)) =
                self.long_codes.iter().find(|&&(c, l, _)| l == length && c == code)
            {
                return Ok((symbol, length));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{STD_AC_LUMINANCE, STD_DC_LUMINANCE};

    #[test]
    fn dc_luminance_symbol_zero_is_two_zero_bits() {
        let table = HuffmanTable::build(&STD_DC_LUMINANCE);
        assert_eq!(table.encode(0).unwrap(), (0b00, 2));
    }

    #[test]
    fn every_ac_luminance_symbol_round_trips_through_decode_lut() {
        let table = HuffmanTable::build(&STD_AC_LUMINANCE);
        for symbol in STD_AC_LUMINANCE.values.iter().copied() {
            let (code, length) = table.encode(symbol).unwrap();
            let peek8 = if length <= 8 {
                (code << (8 - length)) as u8
            } else {
                (code >> (length - 8)) as u8
            };
            let mut remaining_bits = if length > 8 {
                (0..(length - 8)).rev().map(|i| ((code >> i) & 1) as u8).collect::<Vec<_>>()
            } else {
                Vec::new()
            };
            let mut idx = 0;
            let (decoded, decoded_len) = table
                .decode(peek8, || {
                    let bit = remaining_bits[idx];
                    idx += 1;
                    Ok(bit)
                })
                .unwrap();
            assert_eq!(decoded, symbol);
            assert_eq!(decoded_len, length);
        }
    }
}
