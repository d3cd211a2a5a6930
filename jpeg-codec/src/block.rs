//! 8x8 block partitioning: splitting a channel raster into MCU-ordered
//! blocks with edge replication padding, and reassembling blocks back into
//! a raster.
//!
//! Grounded in `encoder/partitioning.py`: pad the raster up to a multiple
//! of 8 in each dimension by replicating the last row/column (not
//! zero-padding), then walk blocks in raster (MCU) order, left to right,
//! top to bottom. Since this codec has no subsampling (spec: 4:4:4 only,
//! one block per component per MCU), "MCU order" and "block order" are the
//! same walk for every component.

use crate::errors::{JpegError, JpegResult};

pub const BLOCK_SIZE: usize = 8;

/// One 8x8 block of samples, stored in natural (row-major) order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block(pub [[i32; BLOCK_SIZE]; BLOCK_SIZE]);

impl Block {
    #[must_use]
    pub fn zero() -> Block {
        Block([[0; BLOCK_SIZE]; BLOCK_SIZE])
    }
}

/// The block grid dimensions a padded raster of `width` x `height` needs.
#[must_use]
pub fn padded_dims(width: usize, height: usize) -> (usize, usize) {
    (div_ceil(width, BLOCK_SIZE) * BLOCK_SIZE, div_ceil(height, BLOCK_SIZE) * BLOCK_SIZE)
}

fn div_ceil(value: usize, divisor: usize) -> usize {
    (value + divisor - 1) / divisor
}

/// Split a single-channel raster into 8x8 blocks in MCU (raster) order,
/// replicating edge samples to pad up to a whole number of blocks in each
/// dimension.
pub fn partition(plane: &[u8], width: usize, height: usize) -> JpegResult<Vec<Block>> {
    if plane.len() != width * height {
        return Err(JpegError::InternalInvariantViolation(format!(
            "plane length {} does not match {}x{}",
            plane.len(),
            width,
            height
        )));
    }
    if width == 0 || height == 0 {
        return Err(JpegError::MalformedInput("image dimensions must be non-zero".to_string()));
    }

    let (padded_w, padded_h) = padded_dims(width, height);
    let blocks_x = padded_w / BLOCK_SIZE;
    let blocks_y = padded_h / BLOCK_SIZE;

    let sample = |x: usize, y: usize| -> i32 {
        let cx = x.min(width - 1);
        let cy = y.min(height - 1);
        i32::from(plane[cy * width + cx])
    };

    let mut blocks = Vec::with_capacity(blocks_x * blocks_y);
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let mut block = Block::zero();
            for row in 0..BLOCK_SIZE {
                for col in 0..BLOCK_SIZE {
                    block.0[row][col] = sample(bx * BLOCK_SIZE + col, by * BLOCK_SIZE + row);
                }
            }
            blocks.push(block);
        }
    }
    Ok(blocks)
}

/// Reassemble blocks in MCU order back into a `width` x `height` raster,
/// dropping the padding rows/columns added by [`partition`]. Sample values
/// are clipped to `[0, 255]`; callers are expected to have already rounded
/// to integers (e.g. after the inverse DCT).
pub fn unpartition(blocks: &[Block], width: usize, height: usize) -> JpegResult<Vec<u8>> {
    let (padded_w, padded_h) = padded_dims(width, height);
    let blocks_x = padded_w / BLOCK_SIZE;
    let blocks_y = padded_h / BLOCK_SIZE;

    if blocks.len() != blocks_x * blocks_y {
        return Err(JpegError::InternalInvariantViolation(format!(
            "expected {} blocks for a {}x{} image, got {}",
            blocks_x * blocks_y,
            width,
            height,
            blocks.len()
        )));
    }

    let mut raster = vec![0u8; width * height];
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let block = &blocks[by * blocks_x + bx];
            for row in 0..BLOCK_SIZE {
                let y = by * BLOCK_SIZE + row;
                if y >= height {
                    continue;
                }
                for col in 0..BLOCK_SIZE {
                    let x = bx * BLOCK_SIZE + col;
                    if x >= width {
                        continue;
                    }
                    raster[y * width + x] = block.0[row][col].clamp(0, 255) as u8;
                }
            }
        }
    }
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_non_multiple_of_eight() {
        assert_eq!(padded_dims(23, 17), (24, 24));
    }

    #[test]
    fn round_trips_an_exact_multiple_of_eight() {
        let plane: Vec<u8> = (0..64).collect();
        let blocks = partition(&plane, 8, 8).unwrap();
        assert_eq!(blocks.len(), 1);
        let back = unpartition(&blocks, 8, 8).unwrap();
        assert_eq!(back, plane);
    }

    #[test]
    fn padding_replicates_edge_samples() {
        let plane = vec![200u8; 4 * 4];
        let blocks = partition(&plane, 4, 4).unwrap();
        assert_eq!(blocks.len(), 1);
        // every sample in the padded block should still be 200, replicated
        // from the single-valued 4x4 source.
        for row in &blocks[0].0 {
            for &v in row {
                assert_eq!(v, 200);
            }
        }
    }
}
