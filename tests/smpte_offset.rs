mod common;

use common::{SmfBytes, TrackBody};
use midi_timeline::prelude::*;
use pretty_assertions::assert_eq;

/// A 40 ticks per frame file whose only track starts with an SMPTE offset
fn midi_with_smpte_offset(
    fps: SmpteFps,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
) -> Vec<u8> {
    let (frame_code, rate_bits): (i8, u8) = match fps {
        SmpteFps::TwentyFour => (-24, 0b00),
        SmpteFps::TwentyFive => (-25, 0b01),
        SmpteFps::TwentyNine => (-29, 0b10),
        SmpteFps::Thirty => (-30, 0b11),
    };
    let division = u16::from_be_bytes([frame_code as u8, 40]);

    let body = TrackBody::new()
        .meta(
            0,
            0x54,
            &[(rate_bits << 5) | (hour & 0x1F), minute, second, frame, subframe],
        )
        .note_on(0, 0, 0x3C, 0x64)
        .raw(0x60, &[0x80, 0x3C, 0x40])
        .end_of_track(0)
        .build();
    SmfBytes::header(0, 1, division).track(&body).build()
}

fn first_offset(file: &MidiFile) -> SmpteOffset {
    match file.tracks()[0].events()[0].message() {
        TrackMessage::Meta(MetaMessage::SmpteOffset(offset)) => *offset,
        other => panic!("expected an SMPTE offset, got {other:?}"),
    }
}

#[test]
fn smpte_offset_every_frame_rate() {
    for fps in [
        SmpteFps::TwentyFour,
        SmpteFps::TwentyFive,
        SmpteFps::TwentyNine,
        SmpteFps::Thirty,
    ] {
        let bytes = midi_with_smpte_offset(fps, 1, 2, 3, 4, 50);
        let file = MidiFile::parse(&bytes).unwrap();

        assert_eq!(file.timing().smpte().unwrap().fps(), Some(fps));
        let offset = first_offset(&file);
        assert_eq!(offset.fps, fps);
        assert_eq!(
            (offset.hour, offset.minute, offset.second, offset.frame, offset.subframe),
            (1, 2, 3, 4, 50)
        );
    }
}

#[test]
fn smpte_offset_as_micros() {
    let bytes = midi_with_smpte_offset(SmpteFps::TwentyFive, 0, 1, 0, 5, 0);
    let offset = first_offset(&MidiFile::parse(&bytes).unwrap());
    // one minute plus five frames at 25 fps
    assert!((offset.as_micros() - 60_200_000.).abs() < 1e-3);
}

#[test]
fn smpte_offset_last_frame_of_each_rate() {
    for (fps, last) in [
        (SmpteFps::TwentyFour, 23),
        (SmpteFps::TwentyFive, 24),
        (SmpteFps::TwentyNine, 29),
        (SmpteFps::Thirty, 29),
    ] {
        let bytes = midi_with_smpte_offset(fps, 0, 0, 0, last, 0);
        assert!(MidiFile::parse(&bytes).is_ok(), "{fps:?} frame {last}");

        let bytes = midi_with_smpte_offset(fps, 0, 0, 0, last + 1, 0);
        let err = MidiFile::parse(&bytes).unwrap_err();
        assert_eq!(
            err.error_kind(),
            &ReaderErrorKind::Range(RangeError::SmpteFrame {
                frame: last + 1,
                max: last
            })
        );
    }
}

#[test]
fn smpte_offset_hour_out_of_range() {
    let bytes = midi_with_smpte_offset(SmpteFps::Thirty, 24, 0, 0, 0, 0);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_range_error());
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Range(RangeError::SmpteHour(24))
    );
}

#[test]
fn smpte_offset_wrong_length() {
    let body = TrackBody::new()
        .meta(0, 0x54, &[0x00, 0x00, 0x00])
        .end_of_track(0)
        .build();
    let bytes = SmfBytes::header(0, 1, 96).track(&body).build();
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::MetaLength {
            meta_type: 0x54,
            expected: 5,
            found: 3
        })
    );
}
