//! A baseline sequential JPEG/JFIF encoder and decoder.
//!
//! Scope is deliberately narrow, matching `zune_jpeg`'s own baseline path
//! but without its progressive, subsampled or SIMD-accelerated code paths:
//! 8-bit samples, exactly three components (Y, Cb, Cr), no chroma
//! subsampling, no restart markers, and only the standard Annex K.1/K.3
//! quantization and Huffman tables. The crate has no notion of streaming:
//! an entire image is held in memory for the duration of an encode or
//! decode, the same contract `jpeg-core`'s byte reader/writer assume.
//!
//! [`encoder::encode_rgb`] and [`decoder::decode_to_rgb`] are the two
//! entry points most callers want. [`pipeline`] exposes the staged
//! machinery underneath them for callers that need to inspect or resume
//! from an intermediate stage (seed-scenario testing, for instance).

pub mod bitstream;
pub mod block;
pub mod dct;
pub mod decoder;
pub mod dpcm;
pub mod encoder;
pub mod errors;
pub mod headers;
pub mod huffman;
pub mod marker;
pub mod options;
pub mod pipeline;
pub mod quant;
pub mod rle;
pub mod tables;
pub mod zigzag;

pub use decoder::{decode_to_rgb, decode_to_rgb_with_options, decode_to_ycbcr, decode_to_ycbcr_with_options};
pub use encoder::{encode_rgb, encode_ycbcr};
pub use errors::{JpegError, JpegResult};
pub use options::DecoderOptions;
