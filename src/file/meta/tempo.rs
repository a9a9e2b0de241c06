use crate::RangeError;

/// The largest tempo a Set Tempo event may carry, in microseconds per quarter note.
pub const MAX_MICROS_PER_QUARTER_NOTE: u32 = 8_355_711;

/// The tempo assumed when a file never sets one: 120 beats per minute.
pub const DEFAULT_MICROS_PER_QUARTER_NOTE: u32 = 500_000;

const MICROS_PER_MINUTE: f64 = 60_000_000.;

#[doc = r#"
A Set Tempo payload, in microseconds per quarter note.

Stored on disk as a 24-bit big-endian integer.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tempo(u32);

impl Default for Tempo {
    fn default() -> Self {
        Self(DEFAULT_MICROS_PER_QUARTER_NOTE)
    }
}

impl Tempo {
    /// Create a tempo, rejecting zero and anything above [`MAX_MICROS_PER_QUARTER_NOTE`]
    pub const fn new(micros_per_quarter_note: u32) -> Result<Self, RangeError> {
        if micros_per_quarter_note == 0 || micros_per_quarter_note > MAX_MICROS_PER_QUARTER_NOTE {
            return Err(RangeError::Tempo(micros_per_quarter_note));
        }
        Ok(Self(micros_per_quarter_note))
    }

    /// Decode the three payload bytes of a Set Tempo event
    pub const fn new_from_bytes(bytes: [u8; 3]) -> Result<Self, RangeError> {
        Self::new(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        MICROS_PER_MINUTE / self.0 as f64
    }
}

#[test]
fn tempo_from_bytes() {
    use pretty_assertions::assert_eq;
    let tempo = Tempo::new_from_bytes([0x07, 0xA1, 0x20]).unwrap();
    assert_eq!(tempo.micros_per_quarter_note(), 500_000);
    assert_eq!(tempo.bpm(), 120.);
    assert_eq!(tempo, Tempo::default());
}

#[test]
fn tempo_limits() {
    use pretty_assertions::assert_eq;
    assert!(Tempo::new_from_bytes([0x7F, 0x7F, 0x7F]).is_ok());
    assert_eq!(
        Tempo::new_from_bytes([0x7F, 0x7F, 0x80]),
        Err(RangeError::Tempo(8_355_712))
    );
    assert_eq!(Tempo::new(0), Err(RangeError::Tempo(0)));
}
