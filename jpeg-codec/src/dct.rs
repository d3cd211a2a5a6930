//! The forward and inverse 8x8 discrete cosine transform.
//!
//! `zune_jpeg::idct` implements a fast fixed-point AAN-style transform with
//! AVX2/NEON dispatch, built for decode speed rather than for matching a
//! reference transform exactly. This codec instead needs the **orthonormal**
//! DCT-II/DCT-III pair (`scipy.fft.dct`/`idct` with `norm='ortho')`, per
//! `encoder/transform.py` and `decoder/idct.py` in the original
//! implementation: a separable transform built directly from the
//! orthonormal basis rather than a fast algorithm, since this crate has no
//! performance goal (spec: no streaming/parallelism/SIMD) and correctness
//! against that exact reference matters more than throughput. A future
//! revision could swap in a fast algorithm (AAN, Loeffler) behind the same
//! `forward`/`inverse` signatures if profiling ever calls for it.

use std::f64::consts::PI;

use crate::block::Block;

const SIZE: usize = 8;

fn alpha(k: usize) -> f64 {
    if k == 0 {
        (1.0 / SIZE as f64).sqrt()
    } else {
        (2.0 / SIZE as f64).sqrt()
    }
}

fn basis(k: usize, n: usize) -> f64 {
    (PI / SIZE as f64 * (n as f64 + 0.5) * k as f64).cos()
}

fn dct_1d(input: &[f64; SIZE]) -> [f64; SIZE] {
    let mut out = [0.0; SIZE];
    for (k, slot) in out.iter_mut().enumerate() {
        let sum: f64 = (0..SIZE).map(|n| input[n] * basis(k, n)).sum();
        *slot = alpha(k) * sum;
    }
    out
}

fn idct_1d(input: &[f64; SIZE]) -> [f64; SIZE] {
    let mut out = [0.0; SIZE];
    for (n, slot) in out.iter_mut().enumerate() {
        let sum: f64 = (0..SIZE).map(|k| alpha(k) * input[k] * basis(k, n)).sum();
        *slot = sum;
    }
    out
}

fn transform_rows_then_columns(
    samples: &[[f64; SIZE]; SIZE],
    rows_1d: impl Fn(&[f64; SIZE]) -> [f64; SIZE]
) -> [[f64; SIZE]; SIZE] {
    let mut after_rows = [[0.0; SIZE]; SIZE];
    for row in 0..SIZE {
        after_rows[row] = rows_1d(&samples[row]);
    }

    let mut out = [[0.0; SIZE]; SIZE];
    for col in 0..SIZE {
        let column: [f64; SIZE] = core::array::from_fn(|row| after_rows[row][col]);
        let transformed = rows_1d(&column);
        for row in 0..SIZE {
            out[row][col] = transformed[row];
        }
    }
    out
}

/// Level-shift an 8x8 sample block by -128 and run the orthonormal forward
/// DCT-II, returning real-valued frequency coefficients.
#[must_use]
pub fn forward(block: &Block) -> [[f64; SIZE]; SIZE] {
    let mut shifted = [[0.0; SIZE]; SIZE];
    for row in 0..SIZE {
        for col in 0..SIZE {
            shifted[row][col] = f64::from(block.0[row][col]) - 128.0;
        }
    }
    transform_rows_then_columns(&shifted, dct_1d)
}

/// Run the orthonormal inverse DCT-III and level-shift back by +128,
/// rounding to the nearest integer sample and clipping to `[0, 255]`.
///
/// A reconstructed sample outside `[0, 255]` before clipping is not an
/// error: it is an expected consequence of lossy quantization on the
/// boundary blocks of an image, so it is only logged as a diagnostic.
#[must_use]
pub fn inverse(coeffs: &[[f64; SIZE]; SIZE]) -> Block {
    let spatial = transform_rows_then_columns(coeffs, idct_1d);
    let mut block = Block::zero();
    for row in 0..SIZE {
        for col in 0..SIZE {
            let value = (spatial[row][col] + 128.0).round();
            if !(0.0..=255.0).contains(&value) {
                log::warn!("idct produced out-of-range sample {value} before clipping");
            }
            block.0[row][col] = value.clamp(0.0, 255.0) as i32;
        }
    }
    block
}
