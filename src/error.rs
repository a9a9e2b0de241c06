#![doc = r#"
Errors describing why a byte stream is not a usable Standard MIDI File.

Every variant here is wrapped by [`ReaderErrorKind`](crate::reader::ReaderErrorKind),
which pairs it with the byte position the reader was at when decoding failed.
"#]

use thiserror::Error;

/// The structure of the file does not follow the SMF layout.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// A chunk identifier did not match the expected tag
    #[error("Expected chunk {expected:?}, found {found:?}")]
    ChunkTag {
        /// The tag this position requires
        expected: [u8; 4],
        /// The tag that was read
        found: [u8; 4],
    },
    /// The header chunk declared a length other than 6
    #[error("Header chunk length must be 6, was {0}")]
    HeaderLength(u32),
    /// The header format field is not 0, 1 or 2
    #[error("Unsupported file format {0}")]
    InvalidFormat(u16),
    /// A status byte whose high nibble is not a channel voice message
    #[error("Invalid channel message type 0x{0:X}")]
    ChannelNibble(u8),
    /// A data byte appeared before any channel status byte in the track
    #[error("Data byte 0x{0:02X} without a running status")]
    MissingRunningStatus(u8),
    /// A fixed-size meta event declared the wrong payload length
    #[error("Meta event 0x{meta_type:02X} must be {expected} bytes, was {found}")]
    MetaLength {
        /// The meta type byte
        meta_type: u8,
        /// The length the type requires
        expected: u32,
        /// The declared length
        found: u32,
    },
}

/// A field was decoded but its value lies outside its legal range.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// Header declared zero tracks
    #[error("Track count must be at least one")]
    NoTracks,
    /// Format 0 files must contain exactly one track
    #[error("Single track format declares {0} tracks")]
    SingleTrackCount(u16),
    /// Variable length quantity did not terminate within four bytes
    #[error("Variable length quantity exceeds 28 bits")]
    VlqTooLong,
    /// Channel data byte with its top bit set
    #[error("Data byte 0x{0:02X} exceeds 127")]
    DataByte(u8),
    /// Channel prefix meta events address channels 0-15
    #[error("Channel prefix {0} exceeds 15")]
    ChannelPrefix(u8),
    /// Tempo outside 1..=8_355_711 microseconds per quarter note
    #[error("Tempo of {0}us per quarter note is out of range")]
    Tempo(u32),
    /// SMPTE offset byte 0 has its reserved top bit set
    #[error("SMPTE offset rate byte 0x{0:02X} has its top bit set")]
    SmpteReservedBit(u8),
    /// SMPTE offset hour above 23
    #[error("SMPTE offset hour {0} exceeds 23")]
    SmpteHour(u8),
    /// SMPTE offset frame beyond the last frame of its rate
    #[error("SMPTE offset frame {frame} exceeds {max}")]
    SmpteFrame {
        /// The decoded frame
        frame: u8,
        /// The last legal frame at the offset's rate
        max: u8,
    },
    /// Time signatures cannot have zero 32nd notes per MIDI quarter note
    #[error("Time signature declares zero 32nd notes per 24 clocks")]
    TimeSignatureThirtySeconds,
    /// Key signatures range from 7 flats to 7 sharps
    #[error("Key signature {0} is outside -7..=7")]
    KeySignatureAccidentals(i8),
    /// Key signature mode must be major (0) or minor (1)
    #[error("Key signature mode {0} is neither major nor minor")]
    KeySignatureMode(u8),
}

/// The input ended, or an event overran its track, before a structure was complete.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// End of the byte stream
    #[error("Unexpected end of input")]
    EndOfInput,
    /// A delta-time consumed the last bytes of the track, leaving no room for an event
    #[error("Track ended after a delta-time")]
    DanglingDelta,
    /// An event consumed more bytes than its track declared
    #[error("Event needs {needed} bytes, track has {remaining} left")]
    TrackBudget {
        /// Bytes the event consumed
        needed: u32,
        /// Bytes the track had left
        remaining: u32,
    },
}

/// A buffer could not grow to hold another element.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocationError {
    /// The requested capacity is not representable
    #[error("Capacity of {0} elements overflows")]
    CapacityOverflow(usize),
    /// The allocator refused the request
    #[error("Could not allocate {0} elements")]
    OutOfMemory(usize),
}
