//! DC coefficient differential pulse-code modulation (DPCM), and the
//! magnitude-category encoding JPEG uses for both DC diffs and AC level
//! values.
//!
//! Grounded in `encoder/dpcm.py` (difference against the previous block's
//! DC value, predictor reset to 0 at the start of each component's
//! sequence) and `decoder/dpcm_decode.py` (running sum). The
//! category/magnitude-bits scheme (ITU T.81 Annex F.1.2.1) is shared with
//! AC run-length encoding in [`crate::rle`].

/// Difference each DC value against the one before it in sequence (the
/// predictor resets to 0 before the first value, matching the Huffman DC
/// table's implicit starting prediction).
#[must_use]
pub fn encode_diffs(dc_values: &[i32]) -> Vec<i32> {
    let mut diffs = Vec::with_capacity(dc_values.len());
    let mut predictor = 0;
    for &dc in dc_values {
        diffs.push(dc - predictor);
        predictor = dc;
    }
    diffs
}

/// Undo [`encode_diffs`], reconstructing absolute DC values from their
/// differences.
#[must_use]
pub fn decode_diffs(diffs: &[i32]) -> Vec<i32> {
    let mut values = Vec::with_capacity(diffs.len());
    let mut predictor = 0;
    for &diff in diffs {
        predictor += diff;
        values.push(predictor);
    }
    values
}

/// The number of bits needed to represent `value`'s magnitude (0 for
/// `value == 0`).
#[must_use]
pub fn magnitude_category(value: i32) -> u8 {
    if value == 0 {
        return 0;
    }
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// Encode `value` as its magnitude category and the additional bits that
/// distinguish it from the other values of that category: the value itself
/// if positive, or `value + (2^category - 1)` if negative (the standard's
/// "one's complement of the magnitude" rule).
#[must_use]
pub fn encode_magnitude(value: i32) -> (u8, u16) {
    let category = magnitude_category(value);
    if category == 0 {
        return (0, 0);
    }
    let bits = if value > 0 {
        value as u16
    } else {
        (value + (1i32 << category) - 1) as u16
    };
    (category, bits)
}

/// Reconstruct a value from its magnitude category and additional bits.
#[must_use]
pub fn decode_magnitude(category: u8, bits: u16) -> i32 {
    if category == 0 {
        return 0;
    }
    let half = 1i32 << (category - 1);
    let bits = i32::from(bits);
    if bits < half {
        bits - (1i32 << category) + 1
    } else {
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diffs_round_trip() {
        let values = vec![10, 12, 9, 9, -5];
        let diffs = encode_diffs(&values);
        assert_eq!(decode_diffs(&diffs), values);
    }

    #[test]
    fn category_two_negative_values_match_the_standard_table() {
        assert_eq!(encode_magnitude(-3), (2, 0b00));
        assert_eq!(encode_magnitude(-2), (2, 0b01));
        assert_eq!(encode_magnitude(2), (2, 0b10));
        assert_eq!(encode_magnitude(3), (2, 0b11));
    }

    #[test]
    fn magnitude_round_trips_across_a_range() {
        for value in -500..=500 {
            let (category, bits) = encode_magnitude(value);
            assert_eq!(decode_magnitude(category, bits), value);
        }
    }

    #[test]
    fn zero_has_category_zero() {
        assert_eq!(magnitude_category(0), 0);
        assert_eq!(encode_magnitude(0), (0, 0));
    }
}
