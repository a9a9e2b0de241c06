use alloc::{borrow::Cow, string::String, vec::Vec};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The flavour of a text meta event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum TextKind {
    /// 0x01
    Text = 0x01,
    /// 0x02
    Copyright = 0x02,
    /// 0x03, sequence or track name
    TrackName = 0x03,
    /// 0x04
    InstrumentName = 0x04,
    /// 0x05
    Lyric = 0x05,
    /// 0x06
    Marker = 0x06,
    /// 0x07
    CuePoint = 0x07,
    /// 0x09
    DeviceName = 0x09,
}

impl TextKind {
    /// Callers only pass the text meta types
    pub(crate) fn from_meta_type(meta_type: u8) -> Self {
        Self::try_from(meta_type).unwrap_or(Self::Text)
    }

    /// The meta type byte
    pub fn meta_type(&self) -> u8 {
        (*self).into()
    }

    /// Display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text => "Text Event",
            Self::Copyright => "Copyright Notice",
            Self::TrackName => "Track Name",
            Self::InstrumentName => "Instrument Name",
            Self::Lyric => "Lyric",
            Self::Marker => "Marker",
            Self::CuePoint => "Cue Point",
            Self::DeviceName => "Device Name",
        }
    }
}

/// A text meta event. The bytes are kept as stored; no encoding is assumed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextMessage {
    kind: TextKind,
    bytes: Vec<u8>,
}

impl TextMessage {
    /// Create a new text message
    pub fn new(kind: TextKind, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            bytes: bytes.into(),
        }
    }
    /// Which text event this is
    pub fn kind(&self) -> TextKind {
        self.kind
    }
    /// The raw bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
    /// The bytes as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}
