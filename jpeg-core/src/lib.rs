//! Core routines shared by the baseline JPEG encoder and decoder.
//!
//! This crate provides the two primitives that sit at the boundary of the
//! codec pipeline but are not themselves part of it:
//!
//! - a small endian-aware byte reader/writer over in-memory buffers
//!   (`bytestream`), used by the marker framer to parse and emit segments
//! - RGB <-> YCbCr colorspace conversion (`colorspace`), consumed by the
//!   orchestrator at the encode/decode boundary
//!
//! Unlike the `zune-core` crate it is modelled on, this crate has no `no_std`
//! support and no generic `Read`/`Write` abstraction: the codec it serves
//! never performs I/O itself (whole images are held in memory), so the
//! reader/writer operate directly on `&[u8]`/`Vec<u8>`.

pub mod bytestream;
pub mod colorspace;
