//! The public decoding entry point: a JPEG/JFIF bitstream in, Y/Cb/Cr
//! planes (or a packed RGB raster) out.
//!
//! Grounded in `decoder/decode.py`'s top-level orchestration (parse
//! headers, then run the staged inverse pipeline) and `decoder/jpeg_parser.py`
//! for which segments are mandatory before a scan can be decoded.
//!
//! The encoder only ever writes the standard Annex K.1 quantization tables,
//! but the decoder dequantizes against whatever values the file's own DQT
//! segments actually carry, not a hardcoded copy of those constants: a
//! corrupted or hand-edited DQT segment is expected to decode (with bounded,
//! nonzero pixel error), not be rejected, since every frame/scan component
//! already has to reference a *defined* table id to reach this point at all.

use jpeg_core::colorspace;

use crate::bitstream;
use crate::errors::{JpegError, JpegResult};
use crate::headers::{self, ParsedHeaders};
use crate::options::DecoderOptions;
use crate::pipeline::{self, HuffmanTables};

fn validate_headers(parsed: &ParsedHeaders) -> JpegResult<()> {
    if parsed.frame_components.len() != 3 || parsed.scan_components.len() != 3 {
        return Err(JpegError::UnsupportedFeature(
            "only 3-component (YCbCr) frames are supported".to_string()
        ));
    }
    for component in &parsed.frame_components {
        if usize::from(component.quant_table_id) >= parsed.quant_tables.len()
            || parsed.quant_tables[usize::from(component.quant_table_id)].is_none()
        {
            return Err(JpegError::MalformedInput(format!(
                "component id {} references quantization table {}, which was never defined",
                component.id, component.quant_table_id
            )));
        }
    }
    Ok(())
}

/// Decode a complete JPEG bitstream into separate Y, Cb, Cr planes, along
/// with the image dimensions recovered from SOF0, using the default
/// (strict) [`DecoderOptions`].
pub fn decode_to_ycbcr(data: &[u8]) -> JpegResult<(Vec<u8>, Vec<u8>, Vec<u8>, u16, u16)> {
    decode_to_ycbcr_with_options(data, &DecoderOptions::default())
}

/// Decode a complete JPEG bitstream into separate Y, Cb, Cr planes, along
/// with the image dimensions recovered from SOF0.
pub fn decode_to_ycbcr_with_options(
    data: &[u8],
    options: &DecoderOptions
) -> JpegResult<(Vec<u8>, Vec<u8>, Vec<u8>, u16, u16)> {
    log::debug!("parsing marker segments");
    let parsed = headers::parse_headers(data, options)?;
    validate_headers(&parsed)?;

    let ParsedHeaders {
        width, height, frame_components, quant_tables, dc_tables, ac_tables, scan_components, scan_data_start
    } = parsed;

    // The SOS segment gives each component's own DC/AC table selectors; the
    // plane order (Y, Cb, Cr) the rest of the pipeline walks in is the SOF0
    // frame component order, so match each frame component to its scan
    // entry by component id rather than assuming position.
    let mut table_ids: pipeline::ComponentTableIds = [(0, 0); 3];
    let mut component_quant_tables: [[u16; 64]; 3] = [[0; 64]; 3];
    for ((slot, quant_slot), frame_component) in
        table_ids.iter_mut().zip(component_quant_tables.iter_mut()).zip(&frame_components)
    {
        let scan_component = scan_components
            .iter()
            .find(|c| c.id == frame_component.id)
            .ok_or_else(|| {
                JpegError::MalformedInput(format!(
                    "SOS segment has no entry for component id {}",
                    frame_component.id
                ))
            })?;
        if scan_component.dc_table_id > 1 || scan_component.ac_table_id > 1 {
            return Err(JpegError::MalformedInput(format!(
                "component id {} selects a huffman table id outside the supported set {{0, 1}}",
                frame_component.id
            )));
        }
        *slot = (scan_component.dc_table_id, scan_component.ac_table_id);
        // validate_headers already confirmed this component's quant table id
        // is in range and defined.
        *quant_slot = quant_tables[usize::from(frame_component.quant_table_id)].unwrap();
    }

    let [dc0, dc1, _dc2, _dc3] = dc_tables;
    let [ac0, ac1, _ac2, _ac3] = ac_tables;
    let huffman = HuffmanTables {
        dc: [
            dc0.ok_or_else(|| JpegError::MalformedInput("DC huffman table 0 was never defined".to_string()))?,
            dc1.ok_or_else(|| JpegError::MalformedInput("DC huffman table 1 was never defined".to_string()))?,
        ],
        ac: [
            ac0.ok_or_else(|| JpegError::MalformedInput("AC huffman table 0 was never defined".to_string()))?,
            ac1.ok_or_else(|| JpegError::MalformedInput("AC huffman table 1 was never defined".to_string()))?,
        ]
    };

    log::debug!("image is {width}x{height}, destuffing scan data");
    let scan_end = headers::find_scan_end(data, scan_data_start)?;
    let destuffed = bitstream::destuff(&data[scan_data_start..scan_end])?;
    pipeline::decode_bytes(&destuffed, &huffman, &table_ids, &component_quant_tables, width, height)
}

/// Decode a complete JPEG bitstream into a packed RGB raster, using the
/// default (strict) [`DecoderOptions`].
pub fn decode_to_rgb(data: &[u8]) -> JpegResult<(Vec<u8>, u16, u16)> {
    decode_to_rgb_with_options(data, &DecoderOptions::default())
}

/// Decode a complete JPEG bitstream into a packed RGB raster.
pub fn decode_to_rgb_with_options(data: &[u8], options: &DecoderOptions) -> JpegResult<(Vec<u8>, u16, u16)> {
    let (y, cb, cr, width, height) = decode_to_ycbcr_with_options(data, options)?;
    log::debug!("converting ycbcr to rgb");
    let rgb = colorspace::ycbcr_to_rgb(&y, &cb, &cr, usize::from(width), usize::from(height));
    Ok((rgb, width, height))
}
