use crate::bytestream::ByteIoError;

/// A cursor over an in-memory byte slice with big-endian aware reads.
///
/// JPEG segment headers are exclusively big-endian, so unlike
/// `zune_core::bytestream::ZByteReader` this reader does not carry a
/// little-endian code path.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> ByteReader<'a> {
        ByteReader { buf, pos: 0 }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Skip `num` bytes, erroring if that would run past the end of the buffer.
    pub fn skip(&mut self, num: usize) -> Result<(), ByteIoError> {
        if self.remaining() < num {
            return Err(ByteIoError("attempted to skip past the end of the buffer"));
        }
        self.pos += num;
        Ok(())
    }

    /// Read `num_bytes` starting at `position` bytes from the current cursor
    /// without advancing it.
    pub fn peek_at(&self, position: usize, num_bytes: usize) -> Result<&'a [u8], ByteIoError> {
        let start = self
            .pos
            .checked_add(position)
            .ok_or(ByteIoError("position overflow"))?;
        let end = start
            .checked_add(num_bytes)
            .ok_or(ByteIoError("length overflow"))?;
        self.buf
            .get(start..end)
            .ok_or(ByteIoError("peek ran past the end of the buffer"))
    }

    pub fn read_u8_err(&mut self) -> Result<u8, ByteIoError> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or(ByteIoError("unexpected end of buffer reading a byte"))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn get_u16_be_err(&mut self) -> Result<u16, ByteIoError> {
        let bytes = self.peek_at(0, 2)?;
        let value = u16::from_be_bytes([bytes[0], bytes[1]]);
        self.pos += 2;
        Ok(value)
    }

    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        let src = self.peek_at(0, buf.len())?;
        buf.copy_from_slice(src);
        self.pos += buf.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_u16() {
        let mut r = ByteReader::new(&[0xFF, 0xD8, 0x00, 0x10]);
        assert_eq!(r.get_u16_be_err().unwrap(), 0xFFD8);
        assert_eq!(r.get_u16_be_err().unwrap(), 0x0010);
    }

    #[test]
    fn peek_does_not_advance() {
        let mut r = ByteReader::new(&[1, 2, 3, 4]);
        assert_eq!(r.peek_at(0, 2).unwrap(), &[1, 2]);
        assert_eq!(r.read_u8_err().unwrap(), 1);
    }

    #[test]
    fn errors_past_end() {
        let mut r = ByteReader::new(&[1]);
        assert!(r.read_u8_err().is_ok());
        assert!(r.read_u8_err().is_err());
    }
}
