#![doc = r#"
Meta events

```text
FF <type> <length: vlq> <payload>
```

Only the types below are understood; any other type makes the file unreadable.

| type | length | payload |
|------|--------|---------|
| 0x00 | 2 | sequence number |
| 0x01-0x07, 0x09 | any | text |
| 0x20 | 1 | channel prefix, 0-15 |
| 0x21 | 1 | port |
| 0x2F | 0 | end of track |
| 0x51 | 3 | tempo |
| 0x54 | 5 | SMPTE offset |
| 0x58 | 4 | time signature |
| 0x59 | 2 | key signature |
| 0x7F | any | sequencer specific |
"#]

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

mod signature;
pub use signature::*;

mod text;
pub use text::*;

use crate::{
    FormatError, RangeError, buffer,
    reader::{ReadResult, Reader, ReaderErrorKind},
};
use alloc::vec::Vec;

/// Meta type of the End of Track event.
pub const END_OF_TRACK: u8 = 0x2F;
/// Meta type of the Set Tempo event.
pub const SET_TEMPO: u8 = 0x51;

/// A decoded meta event
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MetaMessage {
    /// 0x00
    SequenceNumber(u16),
    /// 0x01-0x07, 0x09
    Text(TextMessage),
    /// 0x20
    ChannelPrefix(u8),
    /// 0x21
    Port(u8),
    /// 0x2F
    EndOfTrack,
    /// 0x51
    Tempo(Tempo),
    /// 0x54
    SmpteOffset(SmpteOffset),
    /// 0x58
    TimeSignature(TimeSignature),
    /// 0x59
    KeySignature(KeySignature),
    /// 0x7F
    SequencerSpecific(Vec<u8>),
}

impl MetaMessage {
    /// Decode a meta event whose `0xFF` status byte was already consumed.
    ///
    /// Returns the message and the bytes consumed: the type byte, the
    /// length prefix and the payload.
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<(Self, u32)> {
        let meta_type = reader.read_u8()?;
        let (len, len_bytes) = reader.read_vlq()?;

        let fixed = |expected: u32| -> Result<(), ReaderErrorKind> {
            if len != expected {
                return Err(FormatError::MetaLength {
                    meta_type,
                    expected,
                    found: len,
                }
                .into());
            }
            Ok(())
        };
        let checked = |result: Result<Self, RangeError>| result.map_err(ReaderErrorKind::from);

        let parsed = match meta_type {
            0x00 => fixed(2).and_then(|_| {
                reader
                    .read_exact_size()
                    .map(|b| Self::SequenceNumber(u16::from_be_bytes(b)))
                    .map_err(|e| e.kind)
            }),
            0x01..=0x07 | 0x09 => {
                let kind = TextKind::from_meta_type(meta_type);
                read_owned(reader, len).map(|bytes| Self::Text(TextMessage::new(kind, bytes)))
            }
            0x20 => fixed(1).and_then(|_| {
                let channel = reader.read_u8().map_err(|e| e.kind)?;
                if channel > 15 {
                    return Err(RangeError::ChannelPrefix(channel).into());
                }
                Ok(Self::ChannelPrefix(channel))
            }),
            0x21 => fixed(1).and_then(|_| reader.read_u8().map(Self::Port).map_err(|e| e.kind)),
            END_OF_TRACK => fixed(0).map(|_| Self::EndOfTrack),
            SET_TEMPO => fixed(3).and_then(|_| {
                let bytes = reader.read_exact_size().map_err(|e| e.kind)?;
                checked(Tempo::new_from_bytes(bytes).map(Self::Tempo))
            }),
            0x54 => fixed(5).and_then(|_| {
                let bytes = reader.read_exact_size().map_err(|e| e.kind)?;
                checked(SmpteOffset::parse(bytes).map(Self::SmpteOffset))
            }),
            0x58 => fixed(4).and_then(|_| {
                let bytes = reader.read_exact_size().map_err(|e| e.kind)?;
                checked(TimeSignature::parse(bytes).map(Self::TimeSignature))
            }),
            0x59 => fixed(2).and_then(|_| {
                let bytes = reader.read_exact_size().map_err(|e| e.kind)?;
                checked(KeySignature::parse(bytes).map(Self::KeySignature))
            }),
            0x7F => read_owned(reader, len).map(Self::SequencerSpecific),
            other => Err(ReaderErrorKind::UnknownMetaType(other)),
        };

        let message = parsed.map_err(|kind| reader.error(kind))?;
        Ok((message, 1 + len_bytes + len))
    }

    /// The meta type byte this message is stored under
    pub fn meta_type(&self) -> u8 {
        match self {
            Self::SequenceNumber(_) => 0x00,
            Self::Text(t) => t.kind().meta_type(),
            Self::ChannelPrefix(_) => 0x20,
            Self::Port(_) => 0x21,
            Self::EndOfTrack => END_OF_TRACK,
            Self::Tempo(_) => SET_TEMPO,
            Self::SmpteOffset(_) => 0x54,
            Self::TimeSignature(_) => 0x58,
            Self::KeySignature(_) => 0x59,
            Self::SequencerSpecific(_) => 0x7F,
        }
    }

    /// Length of the payload as stored in the file
    pub fn len(&self) -> u32 {
        match self {
            Self::SequenceNumber(_) | Self::KeySignature(_) => 2,
            Self::Text(t) => t.bytes().len() as u32,
            Self::ChannelPrefix(_) | Self::Port(_) => 1,
            Self::EndOfTrack => 0,
            Self::Tempo(_) => 3,
            Self::SmpteOffset(_) => 5,
            Self::TimeSignature(_) => 4,
            Self::SequencerSpecific(data) => data.len() as u32,
        }
    }

    /// True if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display name of the meta type
    pub fn name(&self) -> &'static str {
        match self {
            Self::SequenceNumber(_) => "Sequence Number",
            Self::Text(t) => t.kind().name(),
            Self::ChannelPrefix(_) => "MIDI Channel Prefix",
            Self::Port(_) => "MIDI port",
            Self::EndOfTrack => "End of Track",
            Self::Tempo(_) => "Set Tempo",
            Self::SmpteOffset(_) => "SMPTE Offset",
            Self::TimeSignature(_) => "Time Signature",
            Self::KeySignature(_) => "Key Signature",
            Self::SequencerSpecific(_) => "Sequencer Specific",
        }
    }
}

fn read_owned(reader: &mut Reader<'_>, len: u32) -> Result<Vec<u8>, ReaderErrorKind> {
    let payload = reader.read_slice(len as usize).map_err(|e| e.kind)?;
    let mut bytes = buffer::try_with_capacity(payload.len())?;
    bytes.extend_from_slice(payload);
    Ok(bytes)
}

#[cfg(test)]
fn read_meta(bytes: &[u8]) -> ReadResult<(MetaMessage, u32)> {
    MetaMessage::read(&mut Reader::from_byte_slice(bytes))
}

#[test]
fn read_tempo_event() {
    use pretty_assertions::assert_eq;
    let (msg, consumed) = read_meta(&[0x51, 0x03, 0x07, 0xA1, 0x20]).unwrap();
    assert_eq!(consumed, 5);
    assert_eq!(msg, MetaMessage::Tempo(Tempo::default()));
    assert_eq!(msg.meta_type(), SET_TEMPO);
    assert_eq!(msg.len(), 3);
}

#[test]
fn read_end_of_track() {
    use pretty_assertions::assert_eq;
    let (msg, consumed) = read_meta(&[0x2F, 0x00]).unwrap();
    assert_eq!(msg, MetaMessage::EndOfTrack);
    assert_eq!(consumed, 2);
    assert!(msg.is_empty());
}

#[test]
fn read_text_event() {
    use pretty_assertions::assert_eq;
    let (msg, consumed) = read_meta(&[0x03, 0x05, b'P', b'i', b'a', b'n', b'o']).unwrap();
    assert_eq!(consumed, 7);
    let MetaMessage::Text(text) = &msg else {
        panic!("expected text, got {msg:?}");
    };
    assert_eq!(text.kind(), TextKind::TrackName);
    assert_eq!(text.text(), "Piano");
    assert_eq!(msg.name(), "Track Name");
}

#[test]
fn port_event_names() {
    use pretty_assertions::assert_eq;
    let (msg, consumed) = read_meta(&[0x21, 0x01, 0x02]).unwrap();
    assert_eq!(consumed, 3);
    assert_eq!(msg, MetaMessage::Port(2));
    assert_eq!(msg.name(), "MIDI port");
    assert_eq!(MetaMessage::ChannelPrefix(0).name(), "MIDI Channel Prefix");
}

#[test]
fn channel_prefix_above_fifteen_is_rejected() {
    use pretty_assertions::assert_eq;
    let err = read_meta(&[0x20, 0x01, 20]).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Range(RangeError::ChannelPrefix(20))
    );
}

#[test]
fn wrong_fixed_length_is_a_format_error() {
    use pretty_assertions::assert_eq;
    let err = read_meta(&[0x51, 0x02, 0x07, 0xA1]).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::MetaLength {
            meta_type: 0x51,
            expected: 3,
            found: 2
        })
    );
    assert!(read_meta(&[0x2F, 0x01, 0x00]).unwrap_err().is_format_error());
}

#[test]
fn unknown_meta_type_is_rejected() {
    use pretty_assertions::assert_eq;
    let err = read_meta(&[0x08, 0x01, 0x00]).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::UnknownMetaType(0x08));
    let err = read_meta(&[0x60, 0x00]).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::UnknownMetaType(0x60));
}

#[test]
fn truncated_payload() {
    assert!(read_meta(&[0x7F, 0x04, 0x00, 0x01]).unwrap_err().is_truncated());
    assert!(read_meta(&[0x58, 0x04, 4, 2]).unwrap_err().is_truncated());
}
