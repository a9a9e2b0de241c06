#![doc = r#"
Rusty representation of a [`MidiFile`]

A file is one `MThd` header chunk followed by exactly as many `MTrk`
chunks as the header declares. Parsing either yields the whole file or an
error; no partially decoded file is ever returned.
"#]

mod format;
pub use format::*;

mod header;
pub use header::*;

mod event;
pub use event::*;

mod track;
pub use track::*;

mod timing;
pub use timing::*;

pub mod meta;

use crate::{
    AllocationError, buffer,
    reader::{ReadResult, Reader},
    timeline::{TempoMap, Timeline},
};
use alloc::vec::Vec;

#[doc = r#"
A fully decoded Standard MIDI File.

Immutable once parsed. The [`TempoMap`] and [`Timeline`] derived from it
borrow nothing mutably and can be rebuilt at any time.
"#]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Parse a set of bytes into a file struct
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let header = Header::read(&mut reader)?;

        let mut tracks = buffer::try_with_capacity(header.track_count() as usize)
            .map_err(|e| reader.error(e))?;
        for _index in 0..header.track_count() {
            // dropping `tracks` on the error path releases every decoded track
            let track = Track::read(&mut reader).inspect_err(|_e| {
                #[cfg(feature = "tracing")]
                tracing::warn!("Track {_index} failed to decode: {_e}");
            })?;
            tracks.push(track);
        }

        Ok(Self { header, tracks })
    }

    /// Read a whole file from disk, then parse it
    #[cfg(feature = "std")]
    pub fn read_path(path: impl AsRef<std::path::Path>) -> Result<Self, MidiFileError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::parse(&bytes)?)
    }

    /// Assemble a file from an already validated header and its tracks.
    ///
    /// Returns `None` if the number of tracks differs from the header's count.
    pub fn from_parts(header: Header, tracks: Vec<Track>) -> Option<Self> {
        if tracks.len() != header.track_count() as usize {
            return None;
        }
        Some(Self { header, tracks })
    }

    /// Returns header info
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the timing of the file
    pub fn timing(&self) -> &Timing {
        self.header.timing()
    }

    /// Returns the format type for the file.
    pub fn format(&self) -> Format {
        self.header.format()
    }

    /// Returns the tracks in declaration order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Total number of events across all tracks
    pub fn event_count(&self) -> usize {
        self.tracks.iter().map(Track::len).sum()
    }

    /// Collect every Set Tempo event of the file
    pub fn tempo_map(&self) -> Result<TempoMap, AllocationError> {
        TempoMap::build(self)
    }

    /// Merge all tracks into one timestamp ordered sequence
    pub fn timeline<'a>(&'a self, tempo_map: &TempoMap) -> Result<Timeline<'a>, AllocationError> {
        Timeline::merge(self, tempo_map)
    }
}

/// Errors from [`MidiFile::read_path`]
#[cfg(feature = "std")]
#[derive(Debug, thiserror::Error)]
pub enum MidiFileError {
    /// The file could not be read
    #[error("Could not read file: {0}")]
    Io(#[from] std::io::Error),
    /// The bytes are not a valid file
    #[error(transparent)]
    Read(#[from] crate::reader::ReaderError),
}
