//! Marker segment emission and parsing: SOI, APP0 (JFIF), DQT, SOF0, DHT,
//! SOS and EOI.
//!
//! Grounded in `zune_jpeg::headers` (`parse_dqt`, `parse_start_of_frame`,
//! `parse_sos`, the generic `un_zig_zag` helper for DQT payloads) for
//! parsing shape, and `decoder/jpeg_parser.py` for which segments this
//! baseline profile must recognize versus skip. Segment field widths and
//! ordering follow ITU T.81 Annex B directly, since neither reference
//! implements the encoder side's segment writer.

use jpeg_core::bytestream::{ByteReader, ByteWriter};

use crate::errors::{JpegError, JpegResult};
use crate::huffman::HuffmanTable;
use crate::marker::Marker;
use crate::options::DecoderOptions;
use crate::tables::{HuffmanSpec, ZIGZAG_TO_NATURAL};

/// One component entry of a SOF0 segment.
#[derive(Debug, Clone, Copy)]
pub struct FrameComponent {
    pub id: u8,
    pub quant_table_id: u8
}

/// One component entry of a SOS segment.
#[derive(Debug, Clone, Copy)]
pub struct ScanComponent {
    pub id: u8,
    pub dc_table_id: u8,
    pub ac_table_id: u8
}

/// Everything recovered from the marker segments that precede the scan's
/// entropy-coded data.
pub struct ParsedHeaders {
    pub width: u16,
    pub height: u16,
    pub frame_components: Vec<FrameComponent>,
    pub quant_tables: [Option<[u16; 64]>; 4],
    pub dc_tables: [Option<HuffmanTable>; 4],
    pub ac_tables: [Option<HuffmanTable>; 4],
    pub scan_components: Vec<ScanComponent>,
    /// Byte offset into the original buffer where entropy-coded scan data
    /// begins (just past the SOS segment).
    pub scan_data_start: usize
}

fn write_marker(w: &mut ByteWriter, marker: Marker) {
    w.write_bytes(&marker.as_bytes());
}

pub fn write_soi(w: &mut ByteWriter) {
    write_marker(w, Marker::Soi);
}

pub fn write_eoi(w: &mut ByteWriter) {
    write_marker(w, Marker::Eoi);
}

/// A minimal JFIF APP0 segment: no thumbnail, no density information beyond
/// "aspect ratio unspecified" (the codec has no notion of physical pixel
/// density).
pub fn write_app0_jfif(w: &mut ByteWriter) {
    write_marker(w, Marker::App(0xE0));
    w.write_u16_be(16);
    w.write_bytes(b"JFIF\0");
    w.write_u8(1);
    w.write_u8(1);
    w.write_u8(0);
    w.write_u16_be(1);
    w.write_u16_be(1);
    w.write_u8(0);
    w.write_u8(0);
}

/// Write a DQT segment. `table` is in natural (row-major) order; the
/// segment payload itself is zig-zag ordered, per Annex B.2.4.
pub fn write_dqt(w: &mut ByteWriter, table_id: u8, table: &[u16; 64]) {
    write_marker(w, Marker::Dqt);
    w.write_u16_be(2 + 1 + 64);
    w.write_u8(table_id & 0x0F);
    for &natural_index in &ZIGZAG_TO_NATURAL {
        w.write_u8(table[natural_index] as u8);
    }
}

/// Write a baseline (SOF0) frame header for a 3-component, non-subsampled
/// image.
pub fn write_sof0(w: &mut ByteWriter, width: u16, height: u16, components: &[FrameComponent]) {
    write_marker(w, Marker::Sof0);
    w.write_u16_be(2 + 1 + 2 + 2 + 1 + (components.len() as u16) * 3);
    w.write_u8(8);
    w.write_u16_be(height);
    w.write_u16_be(width);
    w.write_u8(components.len() as u8);
    for component in components {
        w.write_u8(component.id);
        w.write_u8(0x11); // h=1, v=1: no subsampling
        w.write_u8(component.quant_table_id);
    }
}

/// Write a DHT segment for one Huffman table. `class` is 0 for DC, 1 for AC.
pub fn write_dht(w: &mut ByteWriter, class: u8, table_id: u8, spec: &HuffmanSpec) {
    write_marker(w, Marker::Dht);
    w.write_u16_be(2 + 1 + 16 + spec.values.len() as u16);
    w.write_u8((class << 4) | (table_id & 0x0F));
    for &count in &spec.counts {
        w.write_u8(count);
    }
    for &value in spec.values {
        w.write_u8(value);
    }
}

/// Write the SOS header (not the entropy-coded data that follows it).
/// Spectral selection is always the full `0..=63` range and successive
/// approximation is always `0`, since this codec only produces single-scan
/// baseline sequential output.
pub fn write_sos(w: &mut ByteWriter, components: &[ScanComponent]) {
    write_marker(w, Marker::Sos);
    w.write_u16_be(2 + 1 + (components.len() as u16) * 2 + 3);
    w.write_u8(components.len() as u8);
    for component in components {
        w.write_u8(component.id);
        w.write_u8((component.dc_table_id << 4) | component.ac_table_id);
    }
    w.write_u8(0);
    w.write_u8(63);
    w.write_u8(0);
}

/// Parse every marker segment from the start of `data` up to and including
/// SOS, returning the recovered tables/frame geometry and the byte offset
/// where entropy-coded scan data begins.
pub fn parse_headers(data: &[u8], options: &DecoderOptions) -> JpegResult<ParsedHeaders> {
    let mut reader = ByteReader::new(data);

    let soi = reader.get_u16_be_err()?;
    if soi != 0xFFD8 {
        return Err(JpegError::MalformedInput("bitstream does not start with SOI".to_string()));
    }

    let mut quant_tables: [Option<[u16; 64]>; 4] = [None, None, None, None];
    let mut dc_tables: [Option<HuffmanTable>; 4] = [None, None, None, None];
    let mut ac_tables: [Option<HuffmanTable>; 4] = [None, None, None, None];
    let mut width = 0u16;
    let mut height = 0u16;
    let mut frame_components = Vec::new();
    let mut scan_components = Vec::new();

    loop {
        let prefix = reader.read_u8_err()?;
        if prefix != 0xFF {
            return Err(JpegError::MalformedInput("expected a marker prefix byte".to_string()));
        }
        let code = reader.read_u8_err()?;
        let marker = Marker::from_u8(code).ok_or_else(|| {
            JpegError::MalformedInput(format!("invalid marker code 0x{code:02X}"))
        })?;

        match marker {
            Marker::Soi => {
                return Err(JpegError::MalformedInput("duplicate SOI marker".to_string()));
            }
            Marker::Eoi => {
                return Err(JpegError::MalformedInput(
                    "encountered EOI before a scan was parsed".to_string()
                ));
            }
            Marker::Dqt => {
                let length = reader.get_u16_be_err()?;
                let segment_end = reader.position() + usize::from(length) - 2;
                while reader.position() < segment_end {
                    let pq_tq = reader.read_u8_err()?;
                    let precision = pq_tq >> 4;
                    let table_id = usize::from(pq_tq & 0x0F);
                    if precision != 0 {
                        return Err(JpegError::UnsupportedFeature(
                            "16-bit quantization table precision is not supported".to_string()
                        ));
                    }
                    let mut natural = [0u16; 64];
                    for &natural_index in &ZIGZAG_TO_NATURAL {
                        natural[natural_index] = u16::from(reader.read_u8_err()?);
                    }
                    // This codec only ever defines two quantization tables
                    // (0 = luminance, 1 = chrominance); any other id is
                    // malformed regardless of `options.strict()`, since a
                    // baseline 4:4:4 frame never references a third table.
                    if table_id > 1 {
                        return Err(JpegError::MalformedInput(format!(
                            "quantization table id {table_id} is outside the supported set {{0, 1}}"
                        )));
                    }
                    quant_tables[table_id] = Some(natural);
                }
            }
            Marker::Dht => {
                let length = reader.get_u16_be_err()?;
                let segment_end = reader.position() + usize::from(length) - 2;
                while reader.position() < segment_end {
                    let tc_th = reader.read_u8_err()?;
                    let class = tc_th >> 4;
                    let table_id = usize::from(tc_th & 0x0F);
                    let mut counts = [0u8; 16];
                    for count in &mut counts {
                        *count = reader.read_u8_err()?;
                    }
                    let total: usize = counts.iter().map(|&c| usize::from(c)).sum();
                    let mut values = Vec::with_capacity(total);
                    for _ in 0..total {
                        values.push(reader.read_u8_err()?);
                    }
                    let slot = if class == 0 { &mut dc_tables } else { &mut ac_tables };
                    if table_id >= slot.len() {
                        if options.strict() {
                            return Err(JpegError::UnsupportedFeature(format!(
                                "huffman table id {table_id} is out of range"
                            )));
                        }
                        log::warn!("ignoring huffman table with out-of-range id {table_id}");
                        continue;
                    }
                    let table = HuffmanTable::build_from_parts(&counts, &values);
                    slot[table_id] = Some(table);
                }
            }
            Marker::Sof0 => {
                let _length = reader.get_u16_be_err()?;
                let precision = reader.read_u8_err()?;
                if precision != 8 {
                    return Err(JpegError::UnsupportedFeature(format!(
                        "sample precision {precision} bits is not supported, only 8"
                    )));
                }
                height = reader.get_u16_be_err()?;
                width = reader.get_u16_be_err()?;
                let component_count = reader.read_u8_err()?;
                if component_count != 3 {
                    return Err(JpegError::UnsupportedFeature(format!(
                        "{component_count} components found, only 3-component (YCbCr) frames are supported"
                    )));
                }
                for _ in 0..component_count {
                    let id = reader.read_u8_err()?;
                    let sampling = reader.read_u8_err()?;
                    let (h, v) = (sampling >> 4, sampling & 0x0F);
                    if h != 1 || v != 1 {
                        return Err(JpegError::UnsupportedFeature(
                            "chroma subsampling is not supported, only 4:4:4".to_string()
                        ));
                    }
                    let quant_table_id = reader.read_u8_err()?;
                    frame_components.push(FrameComponent { id, quant_table_id });
                }
            }
            Marker::Sos => {
                let _length = reader.get_u16_be_err()?;
                let component_count = reader.read_u8_err()?;
                if component_count != 3 {
                    return Err(JpegError::UnsupportedFeature(format!(
                        "{component_count} scan components found, only 3-component scans are supported"
                    )));
                }
                for _ in 0..component_count {
                    let id = reader.read_u8_err()?;
                    let tables = reader.read_u8_err()?;
                    scan_components.push(ScanComponent {
                        id,
                        dc_table_id: tables >> 4,
                        ac_table_id: tables & 0x0F
                    });
                }
                let spectral_start = reader.read_u8_err()?;
                let spectral_end = reader.read_u8_err()?;
                let _approximation = reader.read_u8_err()?;
                if spectral_start != 0 || spectral_end != 63 {
                    return Err(JpegError::UnsupportedFeature(
                        "progressive/spectral-selection scans are not supported".to_string()
                    ));
                }
                return Ok(ParsedHeaders {
                    width,
                    height,
                    frame_components,
                    quant_tables,
                    dc_tables,
                    ac_tables,
                    scan_components,
                    scan_data_start: reader.position()
                });
            }
            Marker::Other(0x01) => {
                // TEM, a standalone marker with no length field: reserved,
                // carries no data, simply skipped.
            }
            Marker::Other(code @ 0xD0..=0xD7) => {
                return Err(JpegError::UnsupportedFeature(format!(
                    "restart marker 0x{code:02X} found, restart intervals are not supported"
                )));
            }
            Marker::App(_) | Marker::Other(_) => {
                let length = reader.get_u16_be_err()?;
                if length < 2 {
                    if options.strict() {
                        return Err(JpegError::MalformedInput(
                            "marker segment length must be at least 2".to_string()
                        ));
                    }
                    log::warn!("skipping marker segment with impossible length {length}");
                    continue;
                }
                reader.skip(usize::from(length) - 2)?;
            }
        }
    }
}

/// Scan forward from `start` for the EOI marker, treating `0xFF 0x00` as
/// stuffing rather than a marker. Returns the byte offset of the `0xFF`
/// that begins EOI; entropy-coded scan data is `data[start..that offset]`.
pub fn find_scan_end(data: &[u8], start: usize) -> JpegResult<usize> {
    let mut i = start;
    while i < data.len() {
        if data[i] == 0xFF {
            match data.get(i + 1) {
                Some(0x00) => i += 2,
                Some(0xD9) => return Ok(i),
                _ => {
                    return Err(JpegError::MalformedInput(
                        "unexpected marker inside entropy-coded scan data".to_string()
                    ));
                }
            }
        } else {
            i += 1;
        }
    }
    Err(JpegError::MalformedInput("scan data is not terminated by an EOI marker".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::STD_LUMINANCE_QUANT_TABLE;

    #[test]
    fn dqt_round_trips_through_zigzag_order() {
        let mut w = ByteWriter::new();
        write_dqt(&mut w, 0, &STD_LUMINANCE_QUANT_TABLE);
        let bytes = w.into_inner();
        // first byte after marker+length+id is the natural-order DC term,
        // which is also zig-zag position 0.
        assert_eq!(bytes[5], STD_LUMINANCE_QUANT_TABLE[0] as u8);
    }

    #[test]
    fn find_scan_end_skips_stuffed_bytes() {
        let data = [0x00, 0xFF, 0x00, 0x05, 0xFF, 0xD9];
        assert_eq!(find_scan_end(&data, 0).unwrap(), 4);
    }

    #[test]
    fn find_scan_end_rejects_unexpected_marker() {
        let data = [0xFF, 0xC0];
        assert!(find_scan_end(&data, 0).is_err());
    }
}
