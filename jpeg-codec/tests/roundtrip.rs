//! End-to-end encode/decode round trips over synthetic rasters.

use jpeg_codec::{decode_to_rgb, encode_rgb};

fn assert_close(original: &[u8], recovered: &[u8], tolerance: i16) {
    assert_eq!(original.len(), recovered.len());
    for (i, (&a, &b)) in original.iter().zip(recovered).enumerate() {
        let diff = (i16::from(a) - i16::from(b)).abs();
        assert!(diff <= tolerance, "sample {i}: original={a} recovered={b} diff={diff}");
    }
}

#[test]
fn round_trips_a_flat_gray_image() {
    let rgb = vec![128u8; 16 * 16 * 3];
    let encoded = encode_rgb(&rgb, 16, 16).unwrap();
    let (decoded, width, height) = decode_to_rgb(&encoded).unwrap();
    assert_eq!((width, height), (16, 16));
    assert_close(&rgb, &decoded, 4);
}

#[test]
fn round_trips_an_image_whose_dimensions_are_not_a_multiple_of_eight() {
    let width = 23u16;
    let height = 17u16;
    let mut rgb = Vec::with_capacity(usize::from(width) * usize::from(height) * 3);
    for y in 0..height {
        for x in 0..width {
            let v = ((u32::from(x) * 7 + u32::from(y) * 13) % 256) as u8;
            rgb.push(v);
            rgb.push(v.wrapping_add(40));
            rgb.push(v.wrapping_add(80));
        }
    }
    let encoded = encode_rgb(&rgb, width, height).unwrap();
    let (decoded, w, h) = decode_to_rgb(&encoded).unwrap();
    assert_eq!((w, h), (width, height));
    assert_close(&rgb, &decoded, 20);
}

#[test]
fn round_trips_a_high_contrast_half_and_half_image() {
    let width = 16u16;
    let height = 8u16;
    let mut rgb = Vec::with_capacity(usize::from(width) * usize::from(height) * 3);
    for y in 0..height {
        for x in 0..width {
            let v = if x < width / 2 { 0u8 } else { 255u8 };
            rgb.extend_from_slice(&[v, v, v]);
        }
    }
    let encoded = encode_rgb(&rgb, width, height).unwrap();
    let (decoded, _, _) = decode_to_rgb(&encoded).unwrap();
    assert_close(&rgb, &decoded, 25);
}

#[test]
fn distinct_colors_survive_a_round_trip() {
    let width = 8u16;
    let height = 8u16;
    let mut rgb = Vec::with_capacity(64 * 3);
    for i in 0..64u32 {
        rgb.push((i * 4) as u8);
        rgb.push((255 - i * 4) as u8);
        rgb.push(((i * 37) % 256) as u8);
    }
    let encoded = encode_rgb(&rgb, width, height).unwrap();
    let (decoded, _, _) = decode_to_rgb(&encoded).unwrap();
    assert_close(&rgb, &decoded, 20);
}
