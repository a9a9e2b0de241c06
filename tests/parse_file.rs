mod common;

use common::{SmfBytes, TrackBody};
use midi_timeline::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn header_with_ticks_per_beat() {
    let bytes = SmfBytes::header(1, 1, 0x01E0)
        .track(&TrackBody::new().end_of_track(0).build())
        .build();
    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.format(), Format::Simultaneous);
    assert_eq!(file.header().track_count(), 1);
    assert_eq!(file.timing().ticks_per_quarter_note(), Some(480));
}

#[test]
fn note_pair_then_end_of_track() {
    let body = TrackBody::new()
        .note_on(0, 0, 60, 64)
        .note_off(10, 0, 60)
        .end_of_track(0)
        .build();
    let bytes = SmfBytes::header(0, 1, 480).track(&body).build();
    let file = MidiFile::parse(&bytes).unwrap();

    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 3);

    let on = events[0].channel_voice().unwrap();
    assert_eq!(on.kind(), VoiceKind::NoteOn);
    assert_eq!((on.channel(), on.param1(), on.param2()), (0, 60, Some(64)));

    let off = events[1].channel_voice().unwrap();
    assert_eq!(events[1].delta_ticks(), 10);
    assert_eq!(off.kind(), VoiceKind::NoteOff);
    assert!(events[2].is_end_of_track());

    let tempo_map = file.tempo_map().unwrap();
    let ms = tempo_map.tick_to_ms(10, file.timing());
    assert!((ms - 10.4167).abs() < 1e-4, "{ms}");
}

#[test]
fn garbage_magic_is_a_format_error() {
    let mut bytes = SmfBytes::header(0, 1, 96)
        .track(&TrackBody::new().end_of_track(0).build())
        .build();
    bytes[..4].copy_from_slice(b"RIFF");

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_format_error());
    assert_eq!(err.position(), 0);
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::ChunkTag {
            expected: *b"MThd",
            found: *b"RIFF"
        })
    );
}

#[test]
fn channel_prefix_above_fifteen_is_a_range_error() {
    let body = TrackBody::new().meta(0, 0x20, &[20]).end_of_track(0).build();
    let bytes = SmfBytes::header(0, 1, 96).track(&body).build();

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Range(RangeError::ChannelPrefix(20))
    );
}

#[test]
fn tempo_above_limit_is_a_range_error() {
    let body = TrackBody::new()
        .meta(0, 0x51, &[0x7F, 0x80, 0x00])
        .end_of_track(0)
        .build();
    let bytes = SmfBytes::header(0, 1, 96).track(&body).build();

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Range(RangeError::Tempo(0x7F8000))
    );
}

#[test]
fn running_status_across_events() {
    // 90 3C 40, then two note ons without a status byte
    let body = TrackBody::new()
        .note_on(0, 5, 60, 64)
        .raw(0, &[62, 64])
        .raw(12, &[64, 0])
        .end_of_track(0)
        .build();
    let bytes = SmfBytes::header(0, 1, 96).track(&body).build();
    let file = MidiFile::parse(&bytes).unwrap();

    let keys: Vec<(u8, u8, Option<u8>)> = file.tracks()[0]
        .events()
        .iter()
        .filter_map(TrackEvent::channel_voice)
        .map(|cv| (cv.channel(), cv.param1(), cv.param2()))
        .collect();
    assert_eq!(keys, [(5, 60, Some(64)), (5, 62, Some(64)), (5, 64, Some(0))]);
}

#[test]
fn running_status_does_not_cross_tracks() {
    let first = TrackBody::new().note_on(0, 0, 60, 64).end_of_track(0).build();
    let second = TrackBody::new().raw(0, &[62, 64]).end_of_track(0).build();
    let bytes = SmfBytes::header(1, 2, 96).track(&first).track(&second).build();

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::MissingRunningStatus(62))
    );
}

#[test]
fn every_meta_type_decodes() {
    let body = TrackBody::new()
        .meta(0, 0x00, &[0x00, 0x07])
        .meta(0, 0x01, b"text")
        .meta(0, 0x02, b"(c)")
        .meta(0, 0x03, b"Lead")
        .meta(0, 0x04, b"Flute")
        .meta(0, 0x05, b"la")
        .meta(0, 0x06, b"A")
        .meta(0, 0x07, b"cue")
        .meta(0, 0x09, b"port A")
        .meta(0, 0x20, &[9])
        .meta(0, 0x21, &[1])
        .tempo(0, 400_000)
        .meta(0, 0x54, &[0x60, 0, 0, 29, 0])
        .meta(0, 0x58, &[3, 2, 24, 8])
        .meta(0, 0x59, &[0xFE, 0])
        .meta(0, 0x7F, &[0x43, 0x00])
        .end_of_track(0)
        .build();
    let bytes = SmfBytes::header(0, 1, 96).track(&body).build();
    let file = MidiFile::parse(&bytes).unwrap();

    let types: Vec<u8> = file.tracks()[0]
        .events()
        .iter()
        .map(|e| match e.message() {
            TrackMessage::Meta(meta) => meta.meta_type(),
            other => panic!("expected meta, got {other:?}"),
        })
        .collect();
    assert_eq!(
        types,
        [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x09, 0x20, 0x21, 0x51, 0x54, 0x58,
            0x59, 0x7F, 0x2F
        ]
    );

    let TrackMessage::Meta(MetaMessage::KeySignature(key)) = file.tracks()[0].events()[14].message()
    else {
        panic!("expected key signature");
    };
    assert_eq!(key.accidentals(), -2);
    assert!(!key.is_minor());
}

#[test]
fn unknown_meta_type_fails_the_file() {
    let body = TrackBody::new().meta(0, 0x08, b"x").end_of_track(0).build();
    let bytes = SmfBytes::header(0, 1, 96).track(&body).build();

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::UnknownMetaType(0x08));
}

#[test]
fn sysex_payload_is_kept_raw() {
    let body = TrackBody::new()
        .raw(0, &[0xF0, 0x05, 0x7E, 0x7F, 0x09, 0x01, 0xF7])
        .raw(0, &[0xF7, 0x01, 0xFF])
        .end_of_track(0)
        .build();
    let bytes = SmfBytes::header(0, 1, 96).track(&body).build();
    let file = MidiFile::parse(&bytes).unwrap();

    let events = file.tracks()[0].events();
    let TrackMessage::SystemExclusive(first) = events[0].message() else {
        panic!("expected sysex");
    };
    assert_eq!(first.status(), 0xF0);
    assert_eq!(first.data(), &[0x7E, 0x7F, 0x09, 0x01, 0xF7]);
    let TrackMessage::SystemExclusive(escape) = events[1].message() else {
        panic!("expected sysex");
    };
    assert_eq!(escape.data(), &[0xFF]);
    assert!(events[2].is_end_of_track());
}

#[test]
fn end_of_track_skips_declared_remainder() {
    let mut body = TrackBody::new().note_on(0, 0, 60, 1).end_of_track(0).build();
    body.extend_from_slice(&[0x00, 0x90, 0xFF, 0xFF]);
    let second = TrackBody::new().end_of_track(0).build();
    let bytes = SmfBytes::header(1, 2, 96).track(&body).track(&second).build();

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks()[0].len(), 2);
    assert_eq!(file.tracks()[0].declared_len() as usize, body.len());
    assert_eq!(file.tracks()[1].len(), 1);
}

#[test]
fn declared_length_past_end_of_input_after_end_of_track() {
    let body = TrackBody::new().end_of_track(0).build();
    let bytes = SmfBytes::header(0, 1, 96).track_declaring(100, &body).build();
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.event_count(), 1);
}

#[test]
fn missing_track_chunk_is_truncated() {
    let body = TrackBody::new().end_of_track(0).build();
    let bytes = SmfBytes::header(1, 2, 96).track(&body).build();
    assert!(MidiFile::parse(&bytes).unwrap_err().is_truncated());
}

#[test]
fn event_overrunning_declared_length_is_truncated() {
    let body = TrackBody::new().note_on(0, 0, 60, 1).end_of_track(0).build();
    let bytes = SmfBytes::header(0, 1, 96).track_declaring(3, &body).build();
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Truncated(Truncation::TrackBudget {
            needed: 2,
            remaining: 1
        })
    );
}

#[test]
fn failure_in_a_later_track_fails_the_file() {
    let good = TrackBody::new().tempo(0, 500_000).end_of_track(0).build();
    let bad = TrackBody::new().raw(0, &[0x90, 0x3C, 0x80]).end_of_track(0).build();
    let bytes = SmfBytes::header(1, 3, 96)
        .track(&good)
        .track(&good)
        .track(&bad)
        .build();

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.error_kind(), &ReaderErrorKind::Range(RangeError::DataByte(0x80)));
}

#[test]
fn format_zero_requires_a_single_track() {
    let body = TrackBody::new().end_of_track(0).build();
    let bytes = SmfBytes::header(0, 2, 96).track(&body).track(&body).build();
    assert_eq!(
        MidiFile::parse(&bytes).unwrap_err().error_kind(),
        &ReaderErrorKind::Range(RangeError::SingleTrackCount(2))
    );
}

#[test]
fn smpte_division_is_decoded() {
    // -25 fps, 40 ticks per frame
    let body = TrackBody::new().end_of_track(0).build();
    let bytes = SmfBytes::header(0, 1, 0xE728).track(&body).build();
    let file = MidiFile::parse(&bytes).unwrap();

    let smpte = file.timing().smpte().unwrap();
    assert_eq!(smpte.frame_code(), -25);
    assert_eq!(smpte.ticks_per_frame(), 40);
    assert_eq!(smpte.fps(), Some(SmpteFps::TwentyFive));
}

#[test]
fn format_of_every_header_is_consistent() {
    for (format, tracks) in [(0u16, 1u16), (1, 1), (1, 3), (2, 2)] {
        let body = TrackBody::new().end_of_track(0).build();
        let mut builder = SmfBytes::header(format, tracks, 96);
        for _ in 0..tracks {
            builder = builder.track(&body);
        }
        let file = MidiFile::parse(&builder.build()).unwrap();
        if file.format() == Format::SingleMultiChannel {
            assert_eq!(file.header().track_count(), 1);
        }
        assert_eq!(file.tracks().len(), tracks as usize);
    }
}
