use crate::{
    FormatError, Truncation, buffer,
    prelude::*,
    reader::{ReadResult, Reader},
};
use alloc::vec::Vec;

/// Tag of a track chunk.
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

#[doc = r#"
A decoded `MTrk` chunk.

Events are kept in file order. The declared length is the byte count the
chunk header announced; decoding stops early at an End of Track event.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Track {
    declared_len: u32,
    events: Vec<TrackEvent>,
}

impl Track {
    /// Create a track from events, declaring no chunk length
    pub fn new(events: Vec<TrackEvent>) -> Self {
        Self {
            declared_len: 0,
            events,
        }
    }

    /// Decode the track chunk at the reader's position.
    pub fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let tag_position = reader.buffer_position();
        let tag: [u8; 4] = reader.read_exact_size()?;
        if tag != TRACK_TAG {
            return Err(ReaderError::new(
                tag_position,
                FormatError::ChunkTag {
                    expected: TRACK_TAG,
                    found: tag,
                },
            ));
        }
        let declared_len = reader.read_u32_be()?;

        let mut events = Vec::new();
        let mut remaining = declared_len;
        let mut running = RunningStatus::default();

        while remaining > 0 {
            let (delta_ticks, delta_len) = reader.read_vlq()?;
            remaining = remaining.checked_sub(delta_len).ok_or_else(|| {
                reader.error(Truncation::TrackBudget {
                    needed: delta_len,
                    remaining,
                })
            })?;
            if remaining == 0 {
                return Err(reader.error(Truncation::DanglingDelta));
            }

            let decoded = TrackMessage::read(reader, running)?;
            running = decoded.running;
            if decoded.had_status {
                remaining -= 1;
            }
            if decoded.consumed > remaining {
                return Err(reader.error(Truncation::TrackBudget {
                    needed: decoded.consumed,
                    remaining,
                }));
            }
            remaining -= decoded.consumed;

            let event = TrackEvent::new(delta_ticks, decoded.message);
            let end_of_track = event.is_end_of_track();
            buffer::try_push(&mut events, event).map_err(|e| reader.error(e))?;

            if end_of_track {
                if remaining > 0 {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Discarding {remaining} undecoded bytes after End of Track");
                    reader.skip_saturating(remaining as usize);
                }
                break;
            }
        }

        Ok(Self {
            declared_len,
            events,
        })
    }

    /// The chunk length announced by the track header
    pub fn declared_len(&self) -> u32 {
        self.declared_len
    }

    /// The events of the track, in file order
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events paired with the absolute tick they occur at
    pub fn ticked_events(&self) -> impl Iterator<Item = (u64, &TrackEvent)> {
        self.events.iter().scan(0u64, |tick, event| {
            *tick += event.delta_ticks() as u64;
            Some((*tick, event))
        })
    }
}

#[cfg(test)]
fn track_bytes(body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&TRACK_TAG);
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

#[test]
fn decode_note_pair() {
    use pretty_assertions::assert_eq;
    let bytes = track_bytes(&[
        0x00, 0x90, 0x3C, 0x40, //
        0x0A, 0x80, 0x3C, 0x00, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    let track = Track::read(&mut Reader::from_byte_slice(&bytes)).unwrap();

    assert_eq!(track.len(), 3);
    assert_eq!(track.declared_len(), 12);
    assert_eq!(track.events()[1].delta_ticks(), 10);
    assert!(track.events()[2].is_end_of_track());
    let ticks: Vec<u64> = track.ticked_events().map(|(t, _)| t).collect();
    assert_eq!(ticks, [0, 10, 10]);
}

#[test]
fn end_of_track_discards_trailing_bytes() {
    use pretty_assertions::assert_eq;
    let mut bytes = track_bytes(&[0x00, 0xFF, 0x2F, 0x00, 0xDE, 0xAD, 0xBE, 0xEF]);
    bytes.push(0x42);
    let mut reader = Reader::from_byte_slice(&bytes);
    let track = Track::read(&mut reader).unwrap();

    assert_eq!(track.len(), 1);
    assert_eq!(reader.read_u8().unwrap(), 0x42);
}

#[test]
fn track_without_end_of_track_stops_at_budget() {
    use pretty_assertions::assert_eq;
    let bytes = track_bytes(&[0x00, 0xC0, 0x05, 0x10, 0xD0, 0x40]);
    let track = Track::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert_eq!(track.len(), 2);
}

#[test]
fn event_overrunning_budget_is_truncated() {
    use crate::reader::ReaderErrorKind;
    use pretty_assertions::assert_eq;
    // declares 3 bytes but the note on needs 4
    let mut bytes = track_bytes(&[0x00, 0x90, 0x3C]);
    bytes.push(0x40);
    let err = Track::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Truncated(Truncation::TrackBudget {
            needed: 2,
            remaining: 1
        })
    );
}

#[test]
fn delta_time_filling_the_budget_is_truncated() {
    use crate::reader::ReaderErrorKind;
    use pretty_assertions::assert_eq;
    let mut bytes = track_bytes(&[0x81, 0x00]);
    bytes.extend_from_slice(&[0x90, 0x3C, 0x40]);
    let err = Track::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Truncated(Truncation::DanglingDelta)
    );
}

#[test]
fn wrong_tag_is_a_format_error() {
    let mut bytes = track_bytes(&[0x00, 0xFF, 0x2F, 0x00]);
    bytes[..4].copy_from_slice(b"XTrk");
    assert!(Track::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err().is_format_error());
}
