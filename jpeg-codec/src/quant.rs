//! Coefficient quantization and dequantization.
//!
//! Grounded in `encoder/quantization.py` / `decoder/quantization_decode.py`:
//! divide each DCT coefficient by its table entry and round to the nearest
//! integer, rounding exact halves away from zero (not banker's rounding,
//! which Rust's default `f64::round` already does the way we want here:
//! `round()` rounds half away from zero).

#[must_use]
pub fn quantize(coeffs: &[[f64; 8]; 8], table: &[u16; 64]) -> [[i32; 8]; 8] {
    let mut out = [[0i32; 8]; 8];
    for row in 0..8 {
        for col in 0..8 {
            let divisor = f64::from(table[row * 8 + col]);
            out[row][col] = (coeffs[row][col] / divisor).round() as i32;
        }
    }
    out
}

#[must_use]
pub fn dequantize(levels: &[[i32; 8]; 8], table: &[u16; 64]) -> [[f64; 8]; 8] {
    let mut out = [[0.0; 8]; 8];
    for row in 0..8 {
        for col in 0..8 {
            out[row][col] = f64::from(levels[row][col]) * f64::from(table[row * 8 + col]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::STD_LUMINANCE_QUANT_TABLE;

    #[test]
    fn rounds_exact_halves_away_from_zero() {
        let mut coeffs = [[0.0; 8]; 8];
        coeffs[0][0] = 8.0; // 8 / 16 == 0.5
        coeffs[0][1] = -8.0;
        let levels = quantize(&coeffs, &STD_LUMINANCE_QUANT_TABLE);
        assert_eq!(levels[0][0], 1);
        assert_eq!(levels[0][1], -1);
    }

    #[test]
    fn dequantize_undoes_the_scaling() {
        let levels = {
            let mut l = [[0i32; 8]; 8];
            l[3][2] = 4;
            l
        };
        let coeffs = dequantize(&levels, &STD_LUMINANCE_QUANT_TABLE);
        assert_eq!(coeffs[3][2], 4.0 * f64::from(STD_LUMINANCE_QUANT_TABLE[3 * 8 + 2]));
    }
}
