//! Error types produced by the encoder, decoder and pipeline orchestrator.
//!
//! Modelled on `zune_jpeg::errors::DecodeErrors`: a flat enum of coarse
//! variants, each carrying a human-readable `String` payload, with
//! `Display`/`std::error::Error` impls rather than a heavier `thiserror`
//! dependency (the teacher crate has none).

use jpeg_core::bytestream::ByteIoError;

/// Errors that can occur while encoding or decoding a JPEG bitstream.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum JpegError {
    /// The input bytes do not form a valid JPEG bitstream: a marker is
    /// missing, a segment length disagrees with its contents, a table
    /// index is out of range, and so on.
    MalformedInput(String),
    /// The input is a syntactically valid JPEG bitstream but uses a feature
    /// this codec does not implement (progressive scans, subsampling,
    /// arithmetic coding, restart markers, non-3-component color).
    UnsupportedFeature(String),
    /// A codec invariant was violated by this crate's own logic rather than
    /// by the input (e.g. a stage produced a block count that disagrees
    /// with the MCU grid). Indicates a bug, not bad input.
    InternalInvariantViolation(String),
    /// A pipeline stage was asked to resume from a point whose required
    /// input was never produced (e.g. `resume_from: Stage::Rle` but the
    /// `PipelineResult` only carries data up to `Stage::Dpcm`).
    StageInputMissing(String),
}

impl core::fmt::Display for JpegError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            JpegError::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            JpegError::UnsupportedFeature(msg) => write!(f, "unsupported feature: {msg}"),
            JpegError::InternalInvariantViolation(msg) => {
                write!(f, "internal invariant violation: {msg}")
            }
            JpegError::StageInputMissing(msg) => write!(f, "stage input missing: {msg}")
        }
    }
}

impl std::error::Error for JpegError {}

impl From<ByteIoError> for JpegError {
    fn from(err: ByteIoError) -> Self {
        JpegError::MalformedInput(err.0.to_string())
    }
}

pub type JpegResult<T> = Result<T, JpegError>;
