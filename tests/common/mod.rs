#![allow(dead_code)]

use midi_timeline::reader::vlq;

/// Helper to build a MIDI file in memory, chunk by chunk
#[derive(Default)]
pub struct SmfBytes {
    bytes: Vec<u8>,
}

impl SmfBytes {
    pub fn header(format: u16, tracks: u16, division: u16) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&6u32.to_be_bytes());
        bytes.extend_from_slice(&format.to_be_bytes());
        bytes.extend_from_slice(&tracks.to_be_bytes());
        bytes.extend_from_slice(&division.to_be_bytes());
        Self { bytes }
    }

    /// Append a track chunk whose declared length matches `body`
    pub fn track(self, body: &[u8]) -> Self {
        self.track_declaring(body.len() as u32, body)
    }

    /// Append a track chunk with an arbitrary declared length
    pub fn track_declaring(mut self, declared: u32, body: &[u8]) -> Self {
        self.bytes.extend_from_slice(b"MTrk");
        self.bytes.extend_from_slice(&declared.to_be_bytes());
        self.bytes.extend_from_slice(body);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Helper to build the body of a track chunk
#[derive(Default)]
pub struct TrackBody {
    bytes: Vec<u8>,
}

impl TrackBody {
    pub fn new() -> Self {
        Self::default()
    }

    fn delta(&mut self, delta: u32) {
        self.bytes.extend(vlq::encode(delta).unwrap());
    }

    pub fn raw(mut self, delta: u32, event: &[u8]) -> Self {
        self.delta(delta);
        self.bytes.extend_from_slice(event);
        self
    }

    pub fn note_on(self, delta: u32, channel: u8, key: u8, velocity: u8) -> Self {
        self.raw(delta, &[0x90 | channel, key, velocity])
    }

    pub fn note_off(self, delta: u32, channel: u8, key: u8) -> Self {
        self.raw(delta, &[0x80 | channel, key, 0])
    }

    pub fn meta(mut self, delta: u32, meta_type: u8, payload: &[u8]) -> Self {
        self.delta(delta);
        self.bytes.extend_from_slice(&[0xFF, meta_type]);
        self.bytes.extend(vlq::encode(payload.len() as u32).unwrap());
        self.bytes.extend_from_slice(payload);
        self
    }

    pub fn tempo(self, delta: u32, micros_per_quarter_note: u32) -> Self {
        let b = micros_per_quarter_note.to_be_bytes();
        self.meta(delta, 0x51, &[b[1], b[2], b[3]])
    }

    pub fn end_of_track(self, delta: u32) -> Self {
        self.meta(delta, 0x2F, &[])
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
