use crate::{
    FormatError, RangeError,
    prelude::*,
    reader::{ReadResult, Reader},
};

/// Tag of the header chunk.
pub const HEADER_TAG: [u8; 4] = *b"MThd";

const HEADER_LENGTH: u32 = 6;

#[doc = r#"
The decoded `MThd` chunk: the file's format, how many track chunks follow,
and how delta-times map to real time.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Header {
    format: Format,
    track_count: u16,
    timing: Timing,
}

impl Header {
    /// Create a new header.
    ///
    /// Returns `None` if `track_count` is zero, or if a
    /// [`Format::SingleMultiChannel`] header declares more than one track.
    pub fn new(format: Format, track_count: u16, timing: Timing) -> Option<Self> {
        Self::validate(format, track_count).ok()?;
        Some(Self {
            format,
            track_count,
            timing,
        })
    }

    fn validate(format: Format, track_count: u16) -> Result<(), RangeError> {
        if track_count == 0 {
            return Err(RangeError::NoTracks);
        }
        if format == Format::SingleMultiChannel && track_count != 1 {
            return Err(RangeError::SingleTrackCount(track_count));
        }
        Ok(())
    }

    /// Decode the header chunk at the reader's position
    pub fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let tag_position = reader.buffer_position();
        let tag: [u8; 4] = reader.read_exact_size()?;
        if tag != HEADER_TAG {
            return Err(ReaderError::new(
                tag_position,
                FormatError::ChunkTag {
                    expected: HEADER_TAG,
                    found: tag,
                },
            ));
        }

        let length = reader.read_u32_be()?;
        if length != HEADER_LENGTH {
            return Err(reader.error(FormatError::HeaderLength(length)));
        }

        let raw_format = reader.read_u16_be()?;
        let track_count = reader.read_u16_be()?;
        let format = Format::try_from(raw_format)
            .map_err(|_| reader.error(FormatError::InvalidFormat(raw_format)))?;
        Self::validate(format, track_count).map_err(|e| reader.error(e))?;

        let timing = Timing::read(reader)?;

        Ok(Self {
            format,
            track_count,
            timing,
        })
    }

    /// The file format
    pub fn format(&self) -> Format {
        self.format
    }

    /// The number of track chunks that follow the header
    pub fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Get the timing props
    pub fn timing(&self) -> &Timing {
        &self.timing
    }
}

#[test]
fn read_metrical_header() {
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0x01, 0xE0,
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let header = Header::read(&mut reader).unwrap();

    assert_eq!(header.format(), Format::Simultaneous);
    assert_eq!(header.track_count(), 1);
    assert_eq!(header.timing().ticks_per_quarter_note(), Some(480));
    assert!(reader.is_empty());
}

#[test]
fn single_track_format_rejects_many_tracks() {
    use crate::reader::ReaderErrorKind;
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 2, 0x00, 0x60,
    ];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Range(RangeError::SingleTrackCount(2))
    );
    assert!(Header::new(Format::SingleMultiChannel, 2, Timing::new_ticks_per_quarter_note(96)).is_none());
}

#[test]
fn zero_tracks_is_a_range_error() {
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 0, 0x00, 0x60,
    ];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert!(err.is_range_error());
}

#[test]
fn unknown_format_is_a_format_error() {
    use crate::reader::ReaderErrorKind;
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 3, 0, 1, 0x00, 0x60,
    ];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Format(FormatError::InvalidFormat(3))
    );
}

#[test]
fn header_length_must_be_six() {
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 7, 0, 1, 0, 1, 0x00, 0x60, 0,
    ];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn header_ending_inside_division_is_truncated() {
    use crate::{Truncation, reader::ReaderErrorKind};
    use pretty_assertions::assert_eq;
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0x01];
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Truncated(Truncation::EndOfInput)
    );

    let bytes = [b'M', b'T', b'h'];
    assert!(Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err().is_truncated());
}
