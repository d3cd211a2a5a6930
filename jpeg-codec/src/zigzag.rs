//! Zig-zag reordering between an 8x8 natural-order coefficient grid and the
//! 64-long sequence the entropy coder consumes.
//!
//! Grounded in `decoder/dezigzag.py`'s `UN_ZIGZAG`-style index table, shared
//! with `zune_jpeg::misc::UN_ZIGZAG`; see [`crate::tables`].

use crate::tables::{NATURAL_TO_ZIGZAG, ZIGZAG_TO_NATURAL};

/// Flatten a natural-order 8x8 grid into the 64-long zig-zag sequence.
#[must_use]
pub fn to_zigzag(levels: &[[i32; 8]; 8]) -> [i32; 64] {
    let mut out = [0i32; 64];
    for (z, slot) in out.iter_mut().enumerate() {
        let natural = ZIGZAG_TO_NATURAL[z];
        *slot = levels[natural / 8][natural % 8];
    }
    out
}

/// Expand a 64-long zig-zag sequence back into a natural-order 8x8 grid.
#[must_use]
pub fn from_zigzag(sequence: &[i32; 64]) -> [[i32; 8]; 8] {
    let mut out = [[0i32; 8]; 8];
    for row in 0..8 {
        for col in 0..8 {
            out[row][col] = sequence[NATURAL_TO_ZIGZAG[row * 8 + col]];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_coefficient_is_always_position_zero() {
        let mut levels = [[0i32; 8]; 8];
        levels[0][0] = 42;
        let zigzag = to_zigzag(&levels);
        assert_eq!(zigzag[0], 42);
    }

    #[test]
    fn round_trips() {
        let mut levels = [[0i32; 8]; 8];
        for row in 0..8 {
            for col in 0..8 {
                levels[row][col] = (row * 8 + col) as i32;
            }
        }
        let zigzag = to_zigzag(&levels);
        assert_eq!(from_zigzag(&zigzag), levels);
    }
}
