//! JPEG marker codes.
//!
//! Modelled on `zune_jpeg::misc::SOFMarkers` and the marker-matching style of
//! the older `zune-jpeg` `markers.rs`, trimmed to exactly the markers this
//! baseline-sequential codec emits or must recognize while skipping unknown
//! segments.

/// A two-byte JPEG marker code, always preceded by a `0xFF` prefix byte in
/// the bitstream.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Marker {
    /// Start of image, `0xFFD8`.
    Soi,
    /// End of image, `0xFFD9`.
    Eoi,
    /// Start of scan, `0xFFDA`.
    Sos,
    /// Define quantization table, `0xFFDB`.
    Dqt,
    /// Define Huffman table, `0xFFC4`.
    Dht,
    /// Baseline DCT start of frame, `0xFFC0`.
    Sof0,
    /// Application-specific segment `APPn`, `0xFFE0..=0xFFEF`.
    App(u8),
    /// Any other marker not otherwise named here (comments, restart
    /// markers, other SOF variants, etc). Callers that only support
    /// baseline sequential JPEG should treat most of these as either
    /// skippable metadata or an unsupported feature, depending on context.
    Other(u8)
}

impl Marker {
    /// Decode the second byte of a marker pair (the first is always
    /// `0xFF`). Returns `None` for `0x00` and `0xFF`, which are not marker
    /// codes (the former is a stuffed byte, the latter is a fill byte).
    #[must_use]
    pub fn from_u8(byte: u8) -> Option<Marker> {
        match byte {
            0x00 | 0xFF => None,
            0xD8 => Some(Marker::Soi),
            0xD9 => Some(Marker::Eoi),
            0xDA => Some(Marker::Sos),
            0xDB => Some(Marker::Dqt),
            0xC4 => Some(Marker::Dht),
            0xC0 => Some(Marker::Sof0),
            0xE0..=0xEF => Some(Marker::App(byte)),
            other => Some(Marker::Other(other))
        }
    }

    /// The two bytes this marker is written as in a bitstream, prefix
    /// included.
    #[must_use]
    pub fn as_bytes(self) -> [u8; 2] {
        let second = match self {
            Marker::Soi => 0xD8,
            Marker::Eoi => 0xD9,
            Marker::Sos => 0xDA,
            Marker::Dqt => 0xDB,
            Marker::Dht => 0xC4,
            Marker::Sof0 => 0xC0,
            Marker::App(b) | Marker::Other(b) => b
        };
        [0xFF, second]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_markers() {
        for marker in [Marker::Soi, Marker::Eoi, Marker::Sos, Marker::Dqt, Marker::Dht, Marker::Sof0] {
            let bytes = marker.as_bytes();
            assert_eq!(Marker::from_u8(bytes[1]), Some(marker));
        }
    }

    #[test]
    fn stuffed_and_fill_bytes_are_not_markers() {
        assert_eq!(Marker::from_u8(0x00), None);
        assert_eq!(Marker::from_u8(0xFF), None);
    }
}
