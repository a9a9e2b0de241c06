use crate::{
    buffer,
    reader::{ReadResult, Reader},
};
use alloc::vec::Vec;

/// A system exclusive event stored in a track.
///
/// `status` is `0xF0` for a complete (or first) packet and `0xF7` for an
/// escape or continuation packet. The payload is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SystemExclusiveMessage {
    status: u8,
    data: Vec<u8>,
}

impl SystemExclusiveMessage {
    /// Create a message from a status byte and raw payload
    pub fn new(status: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            data: data.into(),
        }
    }

    /// Decode the length-prefixed payload following a sysex status byte.
    ///
    /// Returns the message and the bytes consumed, length prefix included.
    pub(crate) fn read(status: u8, reader: &mut Reader<'_>) -> ReadResult<(Self, u32)> {
        let (len, len_bytes) = reader.read_vlq()?;
        let payload = reader.read_slice(len as usize)?;
        let mut data = buffer::try_with_capacity(payload.len()).map_err(|e| reader.error(e))?;
        data.extend_from_slice(payload);
        Ok((Self { status, data }, len_bytes + len))
    }

    /// `0xF0` or `0xF7`
    pub fn status(&self) -> u8 {
        self.status
    }

    /// The raw payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[test]
fn read_sysex_payload() {
    use pretty_assertions::assert_eq;
    let bytes = [0x04, 0x43, 0x12, 0x00, 0xF7, 0x99];
    let mut reader = Reader::from_byte_slice(&bytes);
    let (msg, consumed) = SystemExclusiveMessage::read(0xF0, &mut reader).unwrap();

    assert_eq!(consumed, 5);
    assert_eq!(msg.data(), &[0x43, 0x12, 0x00, 0xF7]);
    assert_eq!(msg.status(), 0xF0);
    assert_eq!(reader.remaining(), 1);
}

#[test]
fn short_sysex_payload_is_truncated() {
    let bytes = [0x04, 0x43];
    let err = SystemExclusiveMessage::read(0xF0, &mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert!(err.is_truncated());
}
