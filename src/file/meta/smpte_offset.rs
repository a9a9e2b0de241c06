#![doc = r#"
SMPTE Offset - the time a track is meant to start at

The meta event holds five bytes:
- Byte 0: `0rrhhhhh` where `rr` is the frame rate code and `hhhhh` the hour
- Byte 1: Minutes
- Byte 2: Seconds
- Byte 3: Frames, bounded by the frame rate
- Byte 4: Fractional frames in 100ths

Only the reserved bit, the hour and the frame are checked. Minutes, seconds
and fractional frames are kept as stored, even past their conventional
0-59 / 0-99 ranges.
"#]

use crate::{RangeError, prelude::SmpteFps};

/// A track's starting position in SMPTE time code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SmpteOffset {
    /// The frame rate for this offset.
    pub fps: SmpteFps,
    /// Hour component of the time code (0-23).
    pub hour: u8,
    /// Minute component of the time code. Not range checked.
    pub minute: u8,
    /// Second component of the time code. Not range checked.
    pub second: u8,
    /// Frame number within the current second.
    ///
    /// - 24 fps: 0-23
    /// - 25 fps: 0-24
    /// - 29.97 fps: 0-29
    /// - 30 fps: 0-29
    pub frame: u8,
    /// Subframe component, 1/100th of a frame. Not range checked.
    pub subframe: u8,
}

impl SmpteOffset {
    /// Parse a SMPTE offset from its 5-byte payload.
    pub const fn parse(data: [u8; 5]) -> Result<Self, RangeError> {
        if data[0] & 0x80 != 0 {
            return Err(RangeError::SmpteReservedBit(data[0]));
        }
        let fps = SmpteFps::from_rate_bits(data[0] >> 5);
        let hour = data[0] & 0b0001_1111;
        if hour > 23 {
            return Err(RangeError::SmpteHour(hour));
        }
        let frame = data[3];
        if frame > fps.max_frame() {
            return Err(RangeError::SmpteFrame {
                frame,
                max: fps.max_frame(),
            });
        }
        Ok(Self {
            fps,
            hour,
            minute: data[1],
            second: data[2],
            frame,
            subframe: data[4],
        })
    }

    /// Convert this SMPTE offset to microseconds at its own frame rate.
    pub fn as_micros(&self) -> f64 {
        let whole_seconds =
            self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64;
        (whole_seconds * 1_000_000) as f64
            + (self.frame as f64 * 1_000_000.) / self.fps.as_f64()
            + (self.subframe as f64 * 10_000.) / self.fps.as_f64()
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // the bytes after 00 FF 54 05
    let bytes = [0x41, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::parse(bytes).unwrap();

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.hour, 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);
}

#[test]
fn parse_invalid_smpte_offset() {
    use pretty_assertions::assert_eq;
    let bytes = [0x1F, 0x17, 0x2D, 0x0C, 0x22];
    assert_eq!(SmpteOffset::parse(bytes).unwrap_err(), RangeError::SmpteHour(31));

    let bytes = [0x81, 0x17, 0x2D, 0x0C, 0x22];
    assert_eq!(
        SmpteOffset::parse(bytes).unwrap_err(),
        RangeError::SmpteReservedBit(0x81)
    );

    // 24 fps only has frames 0-23
    let bytes = [0x01, 0x00, 0x00, 24, 0x00];
    assert_eq!(
        SmpteOffset::parse(bytes).unwrap_err(),
        RangeError::SmpteFrame { frame: 24, max: 23 }
    );
}

#[test]
fn minutes_and_subframes_are_not_checked() {
    use pretty_assertions::assert_eq;
    let bytes = [0x61, 80, 75, 29, 150];
    let offset = SmpteOffset::parse(bytes).unwrap();
    assert_eq!(offset.fps, SmpteFps::Thirty);
    assert_eq!(offset.minute, 80);
    assert_eq!(offset.second, 75);
    assert_eq!(offset.subframe, 150);
}
