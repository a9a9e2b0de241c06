#![doc = r#"
Absolute time for a parsed [`MidiFile`]

Delta-times only say how many ticks separate two events of the same track.
Turning them into wall-clock time needs the file's [`Timing`] and, for
metrical files, every tempo change of the file:

1. [`TempoMap::build`] collects the Set Tempo events of all tracks.
2. [`TempoMap::tick_to_ms`] integrates over those changes.
3. [`Timeline::merge`] stamps every event of every track and orders them.

Both derived views only read the file.
"#]

mod tempo_map;
pub use tempo_map::*;

use crate::{
    AllocationError, buffer,
    file::{MidiFile, Timing, TrackEvent},
    message::ChannelVoiceMessage,
};
use alloc::vec::Vec;

/// An event of the file stamped with its absolute time.
///
/// Borrows the event from the [`MidiFile`] it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent<'a> {
    /// Milliseconds from the start of the file
    pub timestamp_ms: f64,
    /// Index of the track the event belongs to
    pub track_index: u16,
    /// The event itself
    pub event: &'a TrackEvent,
}

/// What a timed event asks a voice allocator to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    /// Start a voice for `key`
    Start {
        /// Channel of the note
        channel: u8,
        /// The key, 0-127
        key: u8,
        /// Non-zero velocity
        velocity: u8,
    },
    /// Release voices sounding `key`
    Release {
        /// Channel of the note
        channel: u8,
        /// The key, 0-127
        key: u8,
    },
}

impl NoteAction {
    /// Classify a channel message. Only note messages produce an action.
    pub fn from_message(message: &ChannelVoiceMessage) -> Option<Self> {
        if message.is_note_start() {
            Some(Self::Start {
                channel: message.channel(),
                key: message.param1(),
                velocity: message.param2().unwrap_or_default(),
            })
        } else if message.is_note_release() {
            Some(Self::Release {
                channel: message.channel(),
                key: message.param1(),
            })
        } else {
            None
        }
    }
}

impl TimedEvent<'_> {
    /// The note action of this event, if it is a note message
    pub fn note_action(&self) -> Option<NoteAction> {
        self.event.channel_voice().and_then(NoteAction::from_message)
    }
}

#[doc = r#"
Every event of a file in ascending timestamp order.

Events with equal timestamps keep track order, then their order within
the track.
"#]
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<'a> {
    events: Vec<TimedEvent<'a>>,
}

impl<'a> Timeline<'a> {
    /// Stamp and merge every track of `file`
    pub fn merge(file: &'a MidiFile, tempo_map: &TempoMap) -> Result<Self, AllocationError> {
        let timing: &Timing = file.timing();
        let mut events = buffer::try_with_capacity(file.event_count())?;

        for (track_index, track) in file.tracks().iter().enumerate() {
            for (tick, event) in track.ticked_events() {
                buffer::try_push(
                    &mut events,
                    TimedEvent {
                        timestamp_ms: tempo_map.tick_to_ms(tick, timing),
                        track_index: track_index as u16,
                        event,
                    },
                )?;
            }
        }

        // stable: ties keep track order, then in-track order
        events.sort_by(|a: &TimedEvent<'_>, b: &TimedEvent<'_>| {
            a.timestamp_ms.total_cmp(&b.timestamp_ms)
        });
        Ok(Self { events })
    }

    /// The stamped events
    pub fn events(&self) -> &[TimedEvent<'a>] {
        &self.events
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the file held no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate the events in time order
    pub fn iter(&self) -> core::slice::Iter<'_, TimedEvent<'a>> {
        self.events.iter()
    }

    /// Note starts and releases in time order
    pub fn note_actions(&self) -> impl Iterator<Item = (f64, NoteAction)> + '_ {
        self.events
            .iter()
            .filter_map(|e| e.note_action().map(|action| (e.timestamp_ms, action)))
    }

    /// Timestamp of the last event, zero for an empty timeline
    pub fn duration_ms(&self) -> f64 {
        self.events.last().map_or(0., |e| e.timestamp_ms)
    }
}

impl<'a, 'b> IntoIterator for &'b Timeline<'a> {
    type Item = &'b TimedEvent<'a>;
    type IntoIter = core::slice::Iter<'b, TimedEvent<'a>>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
use crate::{
    file::{Format, Header, Track, TrackMessage},
    message::VoiceKind,
};

#[cfg(test)]
fn note_event(delta_ticks: u32, kind: VoiceKind, key: u8, velocity: u8, channel: u8) -> TrackEvent {
    TrackEvent::new(
        delta_ticks,
        TrackMessage::ChannelVoice(ChannelVoiceMessage::new(kind, channel, key, Some(velocity)).unwrap()),
    )
}

#[cfg(test)]
fn tempo_event(delta_ticks: u32, micros_per_quarter_note: u32) -> TrackEvent {
    use crate::file::meta::{MetaMessage, Tempo};
    TrackEvent::new(
        delta_ticks,
        TrackMessage::Meta(MetaMessage::Tempo(Tempo::new(micros_per_quarter_note).unwrap())),
    )
}

#[cfg(test)]
fn file_of(timing: Timing, tracks: Vec<Vec<TrackEvent>>) -> MidiFile {
    let format = if tracks.len() == 1 {
        Format::SingleMultiChannel
    } else {
        Format::Simultaneous
    };
    let header = Header::new(format, tracks.len() as u16, timing).unwrap();
    MidiFile::from_parts(header, tracks.into_iter().map(Track::new).collect()).unwrap()
}

#[test]
fn single_track_timestamps() {
    use pretty_assertions::assert_eq;
    let file = file_of(
        Timing::new_ticks_per_quarter_note(480),
        alloc::vec![alloc::vec![
            tempo_event(0, 500_000),
            note_event(0, VoiceKind::NoteOn, 60, 100, 0),
            note_event(480, VoiceKind::NoteOff, 60, 0, 0),
            note_event(240, VoiceKind::NoteOn, 62, 80, 0),
        ]],
    );
    let tempo_map = file.tempo_map().unwrap();
    let timeline = file.timeline(&tempo_map).unwrap();

    let stamps: Vec<f64> = timeline.iter().map(|e| e.timestamp_ms).collect();
    assert_eq!(stamps, [0., 0., 500., 750.]);
    assert_eq!(timeline.duration_ms(), 750.);
}

#[test]
fn tracks_interleave_by_time() {
    use pretty_assertions::assert_eq;
    let file = file_of(
        Timing::new_ticks_per_quarter_note(480),
        alloc::vec![
            alloc::vec![
                tempo_event(0, 500_000),
                note_event(0, VoiceKind::NoteOn, 60, 100, 0),
                note_event(480, VoiceKind::NoteOff, 60, 0, 0),
            ],
            alloc::vec![
                note_event(240, VoiceKind::NoteOn, 36, 80, 1),
                note_event(480, VoiceKind::NoteOff, 36, 0, 1),
            ],
        ],
    );
    let tempo_map = file.tempo_map().unwrap();
    let timeline = file.timeline(&tempo_map).unwrap();

    assert_eq!(timeline.len(), file.event_count());
    let order: Vec<(u16, f64)> = timeline
        .iter()
        .map(|e| (e.track_index, e.timestamp_ms))
        .collect();
    assert_eq!(
        order,
        [(0, 0.), (0, 0.), (1, 250.), (0, 500.), (1, 750.)]
    );
}

#[test]
fn tempo_from_another_track_applies_to_all() {
    use pretty_assertions::assert_eq;
    let file = file_of(
        Timing::new_ticks_per_quarter_note(96),
        alloc::vec![
            alloc::vec![tempo_event(0, 1_000_000), tempo_event(96, 250_000)],
            alloc::vec![
                note_event(96, VoiceKind::NoteOn, 60, 1, 0),
                note_event(96, VoiceKind::NoteOn, 62, 1, 0),
            ],
        ],
    );
    let tempo_map = file.tempo_map().unwrap();
    let timeline = file.timeline(&tempo_map).unwrap();

    let notes: Vec<f64> = timeline
        .iter()
        .filter(|e| e.track_index == 1)
        .map(|e| e.timestamp_ms)
        .collect();
    assert_eq!(notes, [1000., 1250.]);
}

#[test]
fn equal_timestamps_keep_track_order() {
    use pretty_assertions::assert_eq;
    let file = file_of(
        Timing::new_smpte(-24, 10),
        alloc::vec![
            alloc::vec![
                note_event(24, VoiceKind::NoteOn, 1, 1, 0),
                note_event(0, VoiceKind::NoteOn, 2, 1, 0),
            ],
            alloc::vec![note_event(24, VoiceKind::NoteOn, 3, 1, 0)],
            alloc::vec![note_event(0, VoiceKind::NoteOn, 4, 1, 0)],
        ],
    );
    let tempo_map = file.tempo_map().unwrap();
    let timeline = file.timeline(&tempo_map).unwrap();

    let keys: Vec<u8> = timeline
        .iter()
        .map(|e| e.event.channel_voice().unwrap().param1())
        .collect();
    assert_eq!(keys, [4, 1, 2, 3]);
    assert_eq!(timeline.events()[1].timestamp_ms, 100.);
}

#[test]
fn note_actions_follow_voice_rules() {
    use pretty_assertions::assert_eq;
    let file = file_of(
        Timing::new_ticks_per_quarter_note(1),
        alloc::vec![alloc::vec![
            note_event(0, VoiceKind::NoteOn, 60, 90, 2),
            note_event(1, VoiceKind::NoteOn, 60, 0, 2),
            note_event(0, VoiceKind::ControlChange, 7, 100, 2),
            note_event(1, VoiceKind::NoteOff, 64, 64, 2),
        ]],
    );
    let tempo_map = file.tempo_map().unwrap();
    let timeline = file.timeline(&tempo_map).unwrap();

    let actions: Vec<NoteAction> = timeline.note_actions().map(|(_, a)| a).collect();
    assert_eq!(
        actions,
        [
            NoteAction::Start {
                channel: 2,
                key: 60,
                velocity: 90
            },
            NoteAction::Release { channel: 2, key: 60 },
            NoteAction::Release { channel: 2, key: 64 },
        ]
    );
}
