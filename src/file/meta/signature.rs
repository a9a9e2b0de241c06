use crate::RangeError;

#[doc = r#"
A Time Signature meta event.

```text
FF 58 04 nn dd cc bb
```
`nn/2^dd` is the notated signature, `cc` the MIDI clocks per metronome
click and `bb` the number of notated 32nd notes per 24 MIDI clocks.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimeSignature([u8; 4]);

impl TimeSignature {
    /// Validate the four payload bytes
    pub const fn parse(bytes: [u8; 4]) -> Result<Self, RangeError> {
        if bytes[3] == 0 {
            return Err(RangeError::TimeSignatureThirtySeconds);
        }
        Ok(Self(bytes))
    }
    /// Beats per bar
    pub const fn numerator(&self) -> u8 {
        self.0[0]
    }
    /// The stored power of two
    pub const fn denominator_exponent(&self) -> u8 {
        self.0[1]
    }
    /// The note value of one beat, `2^exponent`.
    ///
    /// Saturates for exponents that do not fit a `u32`.
    pub const fn denominator(&self) -> u32 {
        match 1u32.checked_shl(self.0[1] as u32) {
            Some(d) => d,
            None => u32::MAX,
        }
    }
    /// MIDI clocks per metronome click
    pub const fn clocks_per_click(&self) -> u8 {
        self.0[2]
    }
    /// Notated 32nd notes per 24 MIDI clocks
    pub const fn thirty_seconds_per_quarter(&self) -> u8 {
        self.0[3]
    }
}

/// A Key Signature meta event: sharps (positive) or flats (negative), and the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KeySignature {
    accidentals: i8,
    minor: bool,
}

impl KeySignature {
    /// Validate the two payload bytes
    pub const fn parse(bytes: [u8; 2]) -> Result<Self, RangeError> {
        let accidentals = bytes[0] as i8;
        if accidentals < -7 || accidentals > 7 {
            return Err(RangeError::KeySignatureAccidentals(accidentals));
        }
        let minor = match bytes[1] {
            0 => false,
            1 => true,
            v => return Err(RangeError::KeySignatureMode(v)),
        };
        Ok(Self { accidentals, minor })
    }
    /// Number of sharps, or flats when negative
    pub const fn accidentals(&self) -> i8 {
        self.accidentals
    }
    /// True for a minor key
    pub const fn is_minor(&self) -> bool {
        self.minor
    }
}

#[test]
fn time_signature_six_eight() {
    use pretty_assertions::assert_eq;
    let ts = TimeSignature::parse([6, 3, 36, 8]).unwrap();
    assert_eq!(ts.numerator(), 6);
    assert_eq!(ts.denominator(), 8);
    assert_eq!(ts.clocks_per_click(), 36);
    assert_eq!(ts.thirty_seconds_per_quarter(), 8);
    assert_eq!(
        TimeSignature::parse([4, 2, 24, 0]),
        Err(RangeError::TimeSignatureThirtySeconds)
    );
}

#[test]
fn key_signature_bounds() {
    use pretty_assertions::assert_eq;
    let key = KeySignature::parse([0xFD, 1]).unwrap();
    assert_eq!(key.accidentals(), -3);
    assert!(key.is_minor());
    assert_eq!(
        KeySignature::parse([8, 0]),
        Err(RangeError::KeySignatureAccidentals(8))
    );
    assert_eq!(
        KeySignature::parse([0xF8, 0]),
        Err(RangeError::KeySignatureAccidentals(-8))
    );
    assert_eq!(KeySignature::parse([0, 2]), Err(RangeError::KeySignatureMode(2)));
}
