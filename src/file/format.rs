use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The layout of the tracks in a file, from the header's format word.

- Format 0 holds a single multi-channel track.
- Format 1 holds tracks meant to be played simultaneously.
- Format 2 holds sequentially independent single-track patterns.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u16)]
pub enum Format {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl Format {
    /// The numeric value stored in the header
    pub fn as_u16(self) -> u16 {
        self.into()
    }
}

#[test]
fn format_from_header_word() {
    use pretty_assertions::assert_eq;
    assert_eq!(Format::try_from(0u16).unwrap(), Format::SingleMultiChannel);
    assert_eq!(Format::try_from(2u16).unwrap(), Format::SequentiallyIndependent);
    assert!(Format::try_from(3u16).is_err());
    assert_eq!(Format::Simultaneous.as_u16(), 1);
}
