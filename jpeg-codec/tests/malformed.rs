//! Malformed-input scenarios the decoder must reject cleanly rather than
//! panic on or silently misinterpret.

use jpeg_codec::encode_rgb;

fn valid_bitstream() -> Vec<u8> {
    encode_rgb(&vec![128u8; 8 * 8 * 3], 8, 8).unwrap()
}

#[test]
fn rejects_a_bitstream_with_its_eoi_marker_stripped() {
    let bytes = valid_bitstream();
    let truncated = &bytes[..bytes.len() - 2];
    assert!(jpeg_codec::decode_to_rgb(truncated).is_err());
}

#[test]
fn rejects_a_bitstream_whose_soi_has_been_replaced_with_a_restart_marker() {
    let mut bytes = valid_bitstream();
    // 0xFFD0 is RST0, a valid marker code but never a legal bitstream start.
    bytes[1] = 0xD0;
    assert!(jpeg_codec::decode_to_rgb(&bytes).is_err());
}

#[test]
fn rejects_a_dqt_segment_whose_table_id_is_out_of_range() {
    let mut bytes = valid_bitstream();
    let dqt_offset =
        bytes.windows(2).position(|w| w == [0xFF, 0xDB]).expect("encoder always writes a DQT segment");
    // byte 4 of the segment (after the FFDB marker and 2-byte length) packs
    // precision (high nibble) and table id (low nibble); this codec only
    // ever defines ids 0 (luminance) and 1 (chrominance), so 2 is already
    // out of range even though it would fit in a 4-bit nibble.
    bytes[dqt_offset + 4] = 0x02;
    assert!(jpeg_codec::decode_to_rgb(&bytes).is_err());
}

#[test]
fn rejects_a_marker_segment_with_a_length_shorter_than_two() {
    let mut bytes = valid_bitstream();
    // overwrite the APP0 segment's length field with an impossible value.
    let app0_offset =
        bytes.windows(2).position(|w| w == [0xFF, 0xE0]).expect("encoder always writes APP0");
    bytes[app0_offset + 2] = 0x00;
    bytes[app0_offset + 3] = 0x01;
    assert!(jpeg_codec::decode_to_rgb(&bytes).is_err());
}

#[test]
fn rejects_scan_data_containing_an_unescaped_marker() {
    let mut bytes = valid_bitstream();
    let eoi_offset = bytes.len() - 2;
    // splice a bare 0xFF, 0xC0 (SOF0) into the middle of the entropy-coded
    // scan data, which should never appear unescaped there.
    bytes.splice(eoi_offset - 1..eoi_offset - 1, [0xFFu8, 0xC0]);
    assert!(jpeg_codec::decode_to_rgb(&bytes).is_err());
}
