use crate::{
    FormatError,
    file::meta::MetaMessage,
    message::{ChannelVoiceMessage, SystemExclusiveMessage},
    reader::{ReadResult, Reader},
};

/// The payload of a [`TrackEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TrackMessage {
    /// A channel voice message
    ChannelVoice(ChannelVoiceMessage),
    /// A meta event
    Meta(MetaMessage),
    /// A system exclusive message
    SystemExclusive(SystemExclusiveMessage),
}

#[doc = r#"
One event of a track: the ticks elapsed since the previous event in the same
track, and what happens.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TrackEvent {
    delta_ticks: u32,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create a new track event
    pub const fn new(delta_ticks: u32, message: TrackMessage) -> Self {
        Self {
            delta_ticks,
            message,
        }
    }
    /// Ticks since the previous event of the track
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }
    /// The event payload
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }
    /// True for an End of Track meta event
    pub fn is_end_of_track(&self) -> bool {
        matches!(self.message, TrackMessage::Meta(MetaMessage::EndOfTrack))
    }
    /// The channel voice message, if this event carries one
    pub fn channel_voice(&self) -> Option<&ChannelVoiceMessage> {
        match &self.message {
            TrackMessage::ChannelVoice(cv) => Some(cv),
            _ => None,
        }
    }
}

/// The last channel status byte seen in a track.
///
/// Each track starts without one. Meta and system exclusive events leave it untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningStatus(Option<u8>);

impl RunningStatus {
    /// The stored status byte
    pub const fn status(&self) -> Option<u8> {
        self.0
    }
}

/// The outcome of decoding one message.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub message: TrackMessage,
    /// Bytes consumed after the status byte (or from the first data byte under running status)
    pub consumed: u32,
    /// True if an explicit status byte was read
    pub had_status: bool,
    pub running: RunningStatus,
}

impl TrackMessage {
    /// Decode the message that starts at the reader's position, right after a delta-time.
    pub(crate) fn read(reader: &mut Reader<'_>, running: RunningStatus) -> ReadResult<Decoded> {
        let status = reader.read_u8()?;

        if status < 0x80 {
            let Some(running_status) = running.status() else {
                return Err(reader.error(FormatError::MissingRunningStatus(status)));
            };
            reader.step_back();
            let (cv, consumed) = ChannelVoiceMessage::read(running_status, reader)?;
            return Ok(Decoded {
                message: TrackMessage::ChannelVoice(cv),
                consumed,
                had_status: false,
                running,
            });
        }

        let (message, consumed, running) = match status {
            0xFF => {
                let (meta, consumed) = MetaMessage::read(reader)?;
                (TrackMessage::Meta(meta), consumed, running)
            }
            0xF0 | 0xF7 => {
                let (sysex, consumed) = SystemExclusiveMessage::read(status, reader)?;
                (TrackMessage::SystemExclusive(sysex), consumed, running)
            }
            _ => {
                let running = RunningStatus(Some(status));
                let (cv, consumed) = ChannelVoiceMessage::read(status, reader)?;
                (TrackMessage::ChannelVoice(cv), consumed, running)
            }
        };
        Ok(Decoded {
            message,
            consumed,
            had_status: true,
            running,
        })
    }
}

#[test]
fn running_status_reuses_previous_channel_status() {
    use crate::message::VoiceKind;
    use pretty_assertions::assert_eq;
    let bytes = [0x90, 0x3C, 0x40, 0x3E, 0x40];
    let mut reader = Reader::from_byte_slice(&bytes);

    let first = TrackMessage::read(&mut reader, RunningStatus::default()).unwrap();
    assert!(first.had_status);
    assert_eq!(first.running.status(), Some(0x90));

    let second = TrackMessage::read(&mut reader, first.running).unwrap();
    assert!(!second.had_status);
    assert_eq!(second.consumed, 2);
    let TrackMessage::ChannelVoice(cv) = second.message else {
        panic!("expected a channel message");
    };
    assert_eq!(cv.kind(), VoiceKind::NoteOn);
    assert_eq!(cv.param1(), 0x3E);
    assert!(reader.is_empty());
}

#[test]
fn data_byte_without_running_status() {
    use crate::reader::ReaderErrorKind;
    use pretty_assertions::assert_eq;
    let bytes = [0x3C, 0x40];
    let err = TrackMessage::read(&mut Reader::from_byte_slice(&bytes), RunningStatus::default())
        .unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::MissingRunningStatus(0x3C))
    );
}

#[test]
fn meta_does_not_replace_running_status() {
    use pretty_assertions::assert_eq;
    let bytes = [0xFF, 0x21, 0x01, 0x00];
    let running = RunningStatus(Some(0xB2));
    let decoded = TrackMessage::read(&mut Reader::from_byte_slice(&bytes), running).unwrap();
    assert_eq!(decoded.running, running);
    assert_eq!(decoded.consumed, 3);
}

#[test]
fn system_status_is_not_a_channel_message() {
    let bytes = [0xF2, 0x00, 0x00];
    let err = TrackMessage::read(&mut Reader::from_byte_slice(&bytes), RunningStatus::default())
        .unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn decoded_message_is_printable() {
    let bytes = [0xC3, 0x10];
    let decoded = TrackMessage::read(&mut Reader::from_byte_slice(&bytes), RunningStatus::default())
        .unwrap();
    let printed = alloc::format!("{decoded:?}");
    assert!(printed.contains("ProgramChange"), "{printed}");
    assert!(printed.contains("had_status: true"), "{printed}");
}
