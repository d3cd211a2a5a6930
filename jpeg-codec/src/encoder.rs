//! The public encoding entry point: RGB raster in, a complete JPEG/JFIF
//! bitstream out.
//!
//! Grounded in `encoder/encode.py`'s top-level orchestration (color
//! convert, then the staged transform/quantize/entropy-code pipeline, then
//! wrap the result in markers) and `util/write_bitstream.py` for segment
//! ordering.

use jpeg_core::bytestream::ByteWriter;
use jpeg_core::colorspace;

use crate::errors::JpegResult;
use crate::headers::{self, FrameComponent, ScanComponent};
use crate::huffman::HuffmanTable;
use crate::pipeline::{self, HuffmanTables, PipelineResult, Stage};
use crate::tables::{STD_AC_CHROMINANCE, STD_AC_LUMINANCE, STD_DC_CHROMINANCE, STD_DC_LUMINANCE};
use crate::tables::{STD_CHROMINANCE_QUANT_TABLE, STD_LUMINANCE_QUANT_TABLE};

/// Component ids this codec always writes, in `[Y, Cb, Cr]` order. Not
/// meaningful beyond distinguishing the three components from each other.
const COMPONENT_IDS: [u8; 3] = [1, 2, 3];

fn standard_huffman_tables() -> HuffmanTables {
    HuffmanTables {
        dc: [HuffmanTable::build(&STD_DC_LUMINANCE), HuffmanTable::build(&STD_DC_CHROMINANCE)],
        ac: [HuffmanTable::build(&STD_AC_LUMINANCE), HuffmanTable::build(&STD_AC_CHROMINANCE)]
    }
}

/// Encode a packed RGB raster into a complete baseline sequential JPEG
/// bitstream.
pub fn encode_rgb(rgb: &[u8], width: u16, height: u16) -> JpegResult<Vec<u8>> {
    let (y, cb, cr) = colorspace::rgb_to_ycbcr(rgb, usize::from(width), usize::from(height));
    encode_ycbcr(&y, &cb, &cr, width, height)
}

/// Encode already-converted Y/Cb/Cr planes into a complete JPEG bitstream.
pub fn encode_ycbcr(y: &[u8], cb: &[u8], cr: &[u8], width: u16, height: u16) -> JpegResult<Vec<u8>> {
    let huffman = standard_huffman_tables();
    let result = pipeline::encode(y, cb, cr, width, height, &huffman, Stage::Jpeg)?;
    let scan_bytes = match result {
        PipelineResult::Jpeg(data) => data.bytes,
        _ => unreachable!("encode() with Stage::Jpeg always returns PipelineResult::Jpeg")
    };

    let mut w = ByteWriter::new();
    headers::write_soi(&mut w);
    headers::write_app0_jfif(&mut w);
    headers::write_dqt(&mut w, 0, &STD_LUMINANCE_QUANT_TABLE);
    headers::write_dqt(&mut w, 1, &STD_CHROMINANCE_QUANT_TABLE);
    headers::write_sof0(
        &mut w,
        width,
        height,
        &[
            FrameComponent { id: COMPONENT_IDS[0], quant_table_id: 0 },
            FrameComponent { id: COMPONENT_IDS[1], quant_table_id: 1 },
            FrameComponent { id: COMPONENT_IDS[2], quant_table_id: 1 },
        ]
    );
    headers::write_dht(&mut w, 0, 0, &STD_DC_LUMINANCE);
    headers::write_dht(&mut w, 1, 0, &STD_AC_LUMINANCE);
    headers::write_dht(&mut w, 0, 1, &STD_DC_CHROMINANCE);
    headers::write_dht(&mut w, 1, 1, &STD_AC_CHROMINANCE);
    headers::write_sos(
        &mut w,
        &[
            ScanComponent { id: COMPONENT_IDS[0], dc_table_id: 0, ac_table_id: 0 },
            ScanComponent { id: COMPONENT_IDS[1], dc_table_id: 1, ac_table_id: 1 },
            ScanComponent { id: COMPONENT_IDS[2], dc_table_id: 1, ac_table_id: 1 },
        ]
    );
    w.write_bytes(&scan_bytes);
    headers::write_eoi(&mut w);

    Ok(w.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_minimal_valid_bitstream_shape() {
        let rgb = vec![128u8; 8 * 8 * 3];
        let bytes = encode_rgb(&rgb, 8, 8).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }
}
