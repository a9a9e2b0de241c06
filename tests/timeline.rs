mod common;

use common::{SmfBytes, TrackBody};
use midi_timeline::prelude::*;
use pretty_assertions::assert_eq;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn conductor_track_drives_every_track() {
    // 96 tpqn; tempo doubles at tick 96 on the conductor track
    let conductor = TrackBody::new()
        .tempo(0, 500_000)
        .tempo(96, 250_000)
        .end_of_track(0)
        .build();
    let melody = TrackBody::new()
        .note_on(0, 0, 60, 100)
        .note_off(96, 0, 60)
        .note_on(0, 0, 62, 100)
        .note_off(96, 0, 62)
        .end_of_track(0)
        .build();
    let bytes = SmfBytes::header(1, 2, 96)
        .track(&conductor)
        .track(&melody)
        .build();

    let file = MidiFile::parse(&bytes).unwrap();
    let tempo_map = file.tempo_map().unwrap();
    assert_eq!(tempo_map.len(), 2);

    let timeline = file.timeline(&tempo_map).unwrap();
    assert_eq!(timeline.len(), file.event_count());

    let actions: Vec<(f64, NoteAction)> = timeline.note_actions().collect();
    assert_eq!(actions.len(), 4);
    assert_close(actions[0].0, 0.);
    assert_close(actions[1].0, 500.);
    assert_close(actions[2].0, 500.);
    assert_close(actions[3].0, 750.);
    assert_eq!(
        actions[1].1,
        NoteAction::Release { channel: 0, key: 60 }
    );
    assert_eq!(
        actions[2].1,
        NoteAction::Start {
            channel: 0,
            key: 62,
            velocity: 100
        }
    );
    assert_close(timeline.duration_ms(), 750.);
}

#[test]
fn timestamps_never_decrease() {
    let first = TrackBody::new()
        .note_on(30, 1, 40, 1)
        .note_off(200, 1, 40)
        .end_of_track(0)
        .build();
    let second = TrackBody::new()
        .tempo(100, 1_000_000)
        .note_on(5, 2, 50, 1)
        .note_off(7, 2, 50)
        .end_of_track(500)
        .build();
    let bytes = SmfBytes::header(1, 2, 120).track(&first).track(&second).build();

    let file = MidiFile::parse(&bytes).unwrap();
    let tempo_map = file.tempo_map().unwrap();
    let timeline = file.timeline(&tempo_map).unwrap();

    assert_eq!(timeline.len(), 7);
    for pair in timeline.events().windows(2) {
        assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
    }
}

#[test]
fn equal_timestamps_keep_track_then_file_order() {
    let first = TrackBody::new()
        .note_on(10, 0, 60, 1)
        .note_on(0, 0, 61, 1)
        .end_of_track(0)
        .build();
    let second = TrackBody::new().note_on(10, 0, 62, 1).end_of_track(0).build();
    let bytes = SmfBytes::header(1, 2, 96).track(&first).track(&second).build();

    let file = MidiFile::parse(&bytes).unwrap();
    let tempo_map = file.tempo_map().unwrap();
    let timeline = file.timeline(&tempo_map).unwrap();

    let order: Vec<(u16, Option<u8>)> = timeline
        .iter()
        .map(|e| (e.track_index, e.event.channel_voice().map(|cv| cv.param1())))
        .collect();
    assert_eq!(
        order,
        [
            (0, Some(60)),
            (0, Some(61)),
            (0, None),
            (1, Some(62)),
            (1, None)
        ]
    );
}

#[test]
fn file_without_tempo_events_plays_at_120_bpm() {
    let body = TrackBody::new()
        .note_on(0, 0, 60, 1)
        .note_off(480, 0, 60)
        .end_of_track(0)
        .build();
    let bytes = SmfBytes::header(0, 1, 480).track(&body).build();

    let file = MidiFile::parse(&bytes).unwrap();
    let tempo_map = file.tempo_map().unwrap();
    assert_eq!(tempo_map.changes()[0].tick, 0);
    assert_eq!(tempo_map.changes()[0].micros_per_quarter_note, 500_000);

    let timeline = file.timeline(&tempo_map).unwrap();
    assert_close(timeline.events()[1].timestamp_ms, 500.);
}

#[test]
fn smpte_timing_ignores_tempo_events() {
    // -25 fps, 40 ticks per frame: 1000 ticks per second
    let body = TrackBody::new()
        .tempo(0, 250_000)
        .note_on(0, 0, 60, 1)
        .note_off(1500, 0, 60)
        .end_of_track(0)
        .build();
    let bytes = SmfBytes::header(0, 1, 0xE728).track(&body).build();

    let file = MidiFile::parse(&bytes).unwrap();
    let tempo_map = file.tempo_map().unwrap();
    let timeline = file.timeline(&tempo_map).unwrap();

    assert_close(timeline.events()[2].timestamp_ms, 1500.);
    assert_close(timeline.duration_ms(), 1500.);
}

#[test]
fn empty_tracks_give_an_empty_timeline() {
    let bytes = SmfBytes::header(1, 2, 96).track(&[]).track(&[]).build();
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.event_count(), 0);

    let tempo_map = file.tempo_map().unwrap();
    let timeline = file.timeline(&tempo_map).unwrap();
    assert!(timeline.is_empty());
    assert_eq!(timeline.duration_ms(), 0.);
}
