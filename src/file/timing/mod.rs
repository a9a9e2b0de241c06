mod smpte;
pub use smpte::*;

use crate::reader::{ReadResult, Reader};

/// The header timing type.
///
/// This is either the number of ticks per quarter note or
/// the alternative SMPTE format, selected by the top bit of the
/// header's division word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(TicksPerQuarterNote),

    /// The midi file's delta times are defined using an SMPTE frame rate
    Smpte(SmpteHeader),
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the u16 is disregarded, so 0-32767
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self::TicksPerQuarterNote(TicksPerQuarterNote {
            inner: (tpqn & 0x7FFF).to_be_bytes(),
        })
    }

    /// Define the timing in terms of a negative frame code and ticks per frame
    pub const fn new_smpte(frame_code: i8, ticks_per_frame: u8) -> Self {
        Self::Smpte(SmpteHeader {
            frame_code,
            ticks_per_frame,
        })
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let bytes: [u8; 2] = reader.read_exact_size()?;
        if bytes[0] & 0x80 == 0 {
            let tpqn = TicksPerQuarterNote { inner: bytes };
            if tpqn.ticks_per_quarter_note() == 0 {
                #[cfg(feature = "tracing")]
                tracing::warn!("Header declares zero ticks per quarter note");
            }
            Ok(Timing::TicksPerQuarterNote(tpqn))
        } else {
            // frame code is not checked against the four standard rates
            Ok(Timing::Smpte(SmpteHeader {
                frame_code: bytes[0] as i8,
                ticks_per_frame: bytes[1],
            }))
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(t.ticks_per_quarter_note()),
            _ => None,
        }
    }

    /// Returns Some if the midi timing is SMPTE based
    pub const fn smpte(&self) -> Option<&SmpteHeader> {
        match self {
            Self::Smpte(s) => Some(s),
            _ => None,
        }
    }
}

/// A representation of the `tpqn` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TicksPerQuarterNote {
    pub(crate) inner: [u8; 2],
}
impl TicksPerQuarterNote {
    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        let v = u16::from_be_bytes(self.inner);
        v & 0x7FFF
    }
}

/// A representation of the `smpte` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SmpteHeader {
    pub(crate) frame_code: i8,
    pub(crate) ticks_per_frame: u8,
}

impl SmpteHeader {
    /// The signed frame code as stored in the file (conventionally -24, -25, -29 or -30)
    pub const fn frame_code(&self) -> i8 {
        self.frame_code
    }

    /// Frames per second, the negation of the frame code
    pub const fn frames_per_second(&self) -> i16 {
        -(self.frame_code as i16)
    }

    /// One of the four standard rates, if the frame code names one
    pub const fn fps(&self) -> Option<SmpteFps> {
        SmpteFps::from_frame_code(self.frame_code)
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }

    /// Ticks elapsed per second of real time
    pub const fn ticks_per_second(&self) -> i32 {
        self.frames_per_second() as i32 * self.ticks_per_frame as i32
    }
}

#[test]
fn read_ticks_per_quarter_note() {
    use pretty_assertions::assert_eq;
    let bytes = [0x01, 0xE0];
    let timing = Timing::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert_eq!(timing.ticks_per_quarter_note(), Some(480));
    assert_eq!(timing, Timing::new_ticks_per_quarter_note(480));
}

#[test]
fn read_smpte() {
    use pretty_assertions::assert_eq;
    // -25 fps, 40 ticks per frame
    let bytes = [0xE7, 0x28];
    let timing = Timing::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    let smpte = timing.smpte().unwrap();
    assert_eq!(smpte.frame_code(), -25);
    assert_eq!(smpte.frames_per_second(), 25);
    assert_eq!(smpte.fps(), Some(SmpteFps::TwentyFive));
    assert_eq!(smpte.ticks_per_second(), 1000);
    assert_eq!(timing.ticks_per_quarter_note(), None);
}

#[test]
fn nonstandard_frame_code_is_kept() {
    use pretty_assertions::assert_eq;
    let bytes = [0x80, 0x01];
    let timing = Timing::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    let smpte = timing.smpte().unwrap();
    assert_eq!(smpte.frames_per_second(), 128);
    assert_eq!(smpte.fps(), None);
}
