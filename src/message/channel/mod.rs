#![doc = r#"
Channel voice messages

A status byte `0xTC` addresses channel `C` (0-15) with message type `T`
(0x8-0xE). Each type is followed by one or two data bytes, all below 0x80.

```text
| type | data bytes | meaning                      |
|------|------------|------------------------------|
| 0x8  | 2          | note off (key, velocity)     |
| 0x9  | 2          | note on (key, velocity)      |
| 0xA  | 2          | key pressure (key, pressure) |
| 0xB  | 2          | control change (cc, value)   |
| 0xC  | 1          | program change (program)     |
| 0xD  | 1          | channel pressure (pressure)  |
| 0xE  | 2          | pitch bend (lsb, msb)        |
```
"#]

use crate::{
    FormatError, RangeError,
    reader::{ReadResult, Reader},
};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The type nibble of a channel voice status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum VoiceKind {
    /// Release a key
    NoteOff = 0x8,
    /// Press a key
    NoteOn = 0x9,
    /// Aftertouch for a single key
    PolyphonicKeyPressure = 0xA,
    /// Controller value change
    ControlChange = 0xB,
    /// Instrument change
    ProgramChange = 0xC,
    /// Aftertouch for the whole channel
    ChannelPressure = 0xD,
    /// Pitch wheel, 14 bits split over two data bytes
    PitchBend = 0xE,
}

impl VoiceKind {
    /// How many data bytes follow the status byte
    pub const fn data_len(&self) -> u32 {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }

    /// Display name of the message type
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NoteOff => "Note Off",
            Self::NoteOn => "Note On",
            Self::PolyphonicKeyPressure => "Polyphonic Key Pressure",
            Self::ControlChange => "Control Change",
            Self::ProgramChange => "Program Change",
            Self::ChannelPressure => "Channel Pressure",
            Self::PitchBend => "Pitch Bend",
        }
    }
}

#[doc = r#"
A decoded channel voice message.

`param2` is `None` exactly when [`VoiceKind::data_len`] is 1.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelVoiceMessage {
    kind: VoiceKind,
    channel: u8,
    param1: u8,
    param2: Option<u8>,
}

impl ChannelVoiceMessage {
    /// Decode the data bytes that follow `status`.
    ///
    /// The status byte itself has already been consumed (or is being reused
    /// as running status). Returns the message and the number of data bytes read.
    pub(crate) fn read(status: u8, reader: &mut Reader<'_>) -> ReadResult<(Self, u32)> {
        let nibble = status >> 4;
        let kind =
            VoiceKind::try_from(nibble).map_err(|_| reader.error(FormatError::ChannelNibble(nibble)))?;

        let param1 = read_data_byte(reader)?;
        let param2 = if kind.data_len() == 2 {
            Some(read_data_byte(reader)?)
        } else {
            None
        };

        Ok((
            Self {
                kind,
                channel: status & 0x0F,
                param1,
                param2,
            },
            kind.data_len(),
        ))
    }

    /// Create a message. Returns `None` for out of range values, or when
    /// `param2` is present for a one data byte kind or missing for a two data byte kind.
    pub fn new(kind: VoiceKind, channel: u8, param1: u8, param2: Option<u8>) -> Option<Self> {
        if channel > 15 || param1 > 127 || param2.is_some_and(|p| p > 127) {
            return None;
        }
        if (kind.data_len() == 2) != param2.is_some() {
            return None;
        }
        Some(Self {
            kind,
            channel,
            param1,
            param2,
        })
    }

    /// The message type
    pub const fn kind(&self) -> VoiceKind {
        self.kind
    }
    /// The channel, 0-15
    pub const fn channel(&self) -> u8 {
        self.channel
    }
    /// First data byte
    pub const fn param1(&self) -> u8 {
        self.param1
    }
    /// Second data byte, absent for program change and channel pressure
    pub const fn param2(&self) -> Option<u8> {
        self.param2
    }
    /// The status byte this message was encoded with
    pub fn status(&self) -> u8 {
        (u8::from(self.kind) << 4) | self.channel
    }

    /// True for a note on with a non-zero velocity
    pub fn is_note_start(&self) -> bool {
        self.kind == VoiceKind::NoteOn && self.param2.is_some_and(|v| v > 0)
    }

    /// True for a note off, or a note on with zero velocity
    pub fn is_note_release(&self) -> bool {
        match self.kind {
            VoiceKind::NoteOff => true,
            VoiceKind::NoteOn => self.param2 == Some(0),
            _ => false,
        }
    }
}

fn read_data_byte(reader: &mut Reader<'_>) -> ReadResult<u8> {
    let byte = reader.read_u8()?;
    if byte > 127 {
        return Err(reader.error(RangeError::DataByte(byte)));
    }
    Ok(byte)
}

#[test]
fn read_note_on() {
    use pretty_assertions::assert_eq;
    let bytes = [0x3C, 0x40];
    let mut reader = Reader::from_byte_slice(&bytes);
    let (msg, len) = ChannelVoiceMessage::read(0x93, &mut reader).unwrap();

    assert_eq!(len, 2);
    assert_eq!(msg.kind(), VoiceKind::NoteOn);
    assert_eq!(msg.channel(), 3);
    assert_eq!(msg.param1(), 60);
    assert_eq!(msg.param2(), Some(64));
    assert_eq!(msg.status(), 0x93);
    assert!(msg.is_note_start());
}

#[test]
fn program_change_has_one_data_byte() {
    use pretty_assertions::assert_eq;
    let bytes = [0x05, 0x90];
    let mut reader = Reader::from_byte_slice(&bytes);
    let (msg, len) = ChannelVoiceMessage::read(0xC0, &mut reader).unwrap();

    assert_eq!(len, 1);
    assert_eq!(msg.param2(), None);
    assert_eq!(reader.buffer_position(), 1);
}

#[test]
fn data_byte_above_127_is_rejected() {
    let bytes = [0x3C, 0x80];
    let err = ChannelVoiceMessage::read(0x80, &mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert!(err.is_range_error());
}

#[test]
fn zero_velocity_note_on_releases() {
    let msg = ChannelVoiceMessage::new(VoiceKind::NoteOn, 0, 60, Some(0)).unwrap();
    assert!(msg.is_note_release());
    assert!(!msg.is_note_start());
    assert!(ChannelVoiceMessage::new(VoiceKind::ProgramChange, 0, 1, Some(2)).is_none());
}

#[test]
fn new_checks_data_length_of_kind() {
    use pretty_assertions::assert_eq;
    let program = ChannelVoiceMessage::new(VoiceKind::ProgramChange, 9, 5, None).unwrap();
    assert_eq!(program.param2(), None);
    assert_eq!(program.status(), 0xC9);
    assert!(ChannelVoiceMessage::new(VoiceKind::ControlChange, 0, 7, None).is_none());
    assert!(ChannelVoiceMessage::new(VoiceKind::ControlChange, 16, 7, Some(1)).is_none());
    assert!(ChannelVoiceMessage::new(VoiceKind::ControlChange, 0, 7, Some(128)).is_none());
}
