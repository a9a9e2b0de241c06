#![doc = r#"
A cursor over an in-memory Standard MIDI File.

The [`Reader`] never copies the input: every read either produces a small
fixed-size value or a borrowed slice of the original bytes. Higher level
decoders ([`Header`](crate::file::Header), [`Track`](crate::file::Track))
drive it and own whatever they copy out of it.
"#]

mod error;
pub use error::*;

pub mod vlq;

/// A forward-only cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader starting at the first byte of `data`
    pub const fn from_byte_slice(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The offset of the next byte to be read
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True if every byte has been read
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Builds an error at the current position
    pub(crate) fn error(&self, kind: impl Into<ReaderErrorKind>) -> ReaderError {
        ReaderError::new(self.position, kind)
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = *self
            .data
            .get(self.position)
            .ok_or(ReaderError::eof(self.position))?;
        self.position += 1;
        Ok(byte)
    }

    /// Read exactly `N` bytes into an array
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_slice(N)?;
        let mut out = [0; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Read a big-endian `u16`
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Read a big-endian `u32`
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Borrow the next `len` bytes
    pub fn read_slice(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ReaderError::eof(self.data.len()))?;
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Advance by up to `len` bytes, stopping at the end of the input.
    ///
    /// Returns how many bytes were actually skipped.
    pub fn skip_saturating(&mut self, len: usize) -> usize {
        let skipped = len.min(self.remaining());
        self.position += skipped;
        skipped
    }

    /// Move back one byte so it is read again.
    ///
    /// Used when a data byte turns out to belong to a running-status message.
    pub(crate) fn step_back(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Read a variable length quantity.
    ///
    /// Returns the value and the number of bytes it occupied.
    pub fn read_vlq(&mut self) -> ReadResult<(u32, u32)> {
        let start = self.position;
        let (value, len) = vlq::decode(&self.data[start..]).map_err(|kind| self.error(kind))?;
        self.position += len as usize;
        Ok((value, len))
    }
}

#[test]
fn reads_big_endian_fields() {
    use pretty_assertions::assert_eq;
    let bytes = [0x00, 0x00, 0x00, 0x06, 0x01, 0xE0, 0x7F];
    let mut reader = Reader::from_byte_slice(&bytes);

    assert_eq!(reader.read_u32_be().unwrap(), 6);
    assert_eq!(reader.read_u16_be().unwrap(), 480);
    assert_eq!(reader.buffer_position(), 6);
    assert_eq!(reader.read_u8().unwrap(), 0x7F);
    assert!(reader.is_empty());

    let err = reader.read_u8().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 7);
}

#[test]
fn skip_stops_at_end_of_input() {
    use pretty_assertions::assert_eq;
    let bytes = [1, 2, 3];
    let mut reader = Reader::from_byte_slice(&bytes);
    reader.read_u8().unwrap();

    assert_eq!(reader.skip_saturating(10), 2);
    assert!(reader.is_empty());
}

#[test]
fn short_slice_is_truncated() {
    let bytes = [1, 2, 3];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert!(reader.read_slice(4).unwrap_err().is_truncated());
    assert_eq!(reader.buffer_position(), 0);
}
