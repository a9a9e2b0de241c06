#![doc = r#"
Standard MIDI File decoding with tempo-aware absolute timelines.

```rust
# use midi_timeline::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 0x3C, 0x40,
    0x0A, 0x80, 0x3C, 0x00,
    0x00, 0xFF, 0x2F, 0x00,
];
let file = MidiFile::parse(&bytes).unwrap();
let tempo_map = file.tempo_map().unwrap();
let timeline = file.timeline(&tempo_map).unwrap();

assert_eq!(timeline.len(), 3);
assert!((timeline.events()[1].timestamp_ms - 10.4167).abs() < 1e-3);
```

Decoding is all or nothing: [`MidiFile::parse`](file::MidiFile::parse)
returns either the complete file or a [`ReaderError`](reader::ReaderError)
naming the byte position and the kind of failure.
"#]
#![no_std]
#![warn(missing_docs)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod buffer;
pub use buffer::grown_capacity;

mod error;
pub use error::*;

pub mod file;
pub mod message;
pub mod reader;
pub mod timeline;

#[cfg(feature = "json")]
pub mod json;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        error::*,
        file::{meta::*, *},
        message::*,
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        timeline::*,
    };
}
