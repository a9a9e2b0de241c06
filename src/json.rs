#![doc = r#"
JSON rendering of a parsed file

The document lists the header, then every track with its declared size,
event count and events. Each event carries its delta-time and the fields of
its variant, including derived values: beats per minute for tempo events,
the frame rate label of SMPTE offsets, the power-of-two denominator of time
signatures. Binary payloads are written as space separated hex bytes. Text
payloads map each byte to the code point of the same value.
"#]

use crate::{
    file::{MidiFile, Timing, Track, TrackEvent, TrackMessage, meta::MetaMessage},
    message::{ChannelVoiceMessage, SystemExclusiveMessage, VoiceKind},
};
use serde_json::{Map, Value, json};
use std::{io::Write, string::String, vec::Vec};

/// Build the JSON document of a file
pub fn to_value(file: &MidiFile) -> Value {
    let header = file.header();
    let time_division = match header.timing() {
        Timing::TicksPerQuarterNote(tpqn) => json!({
            "type": "ticks_per_beat",
            "ticks_per_beat": tpqn.ticks_per_quarter_note(),
        }),
        Timing::Smpte(smpte) => json!({
            "type": "frames_per_second",
            "smpte_format": smpte.frame_code(),
            "ticks_per_frame": smpte.ticks_per_frame(),
        }),
    };

    let tracks: Vec<Value> = file
        .tracks()
        .iter()
        .enumerate()
        .map(|(number, track)| track_value(number, track))
        .collect();

    json!({
        "header": {
            "format": header.format().as_u16(),
            "tracks": header.track_count(),
            "time_division": time_division,
        },
        "tracks": tracks,
    })
}

/// Render the document as pretty printed JSON
pub fn to_string_pretty(file: &MidiFile) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_value(file))
}

/// Write the pretty printed document to `writer`
pub fn write_pretty<W: Write>(file: &MidiFile, mut writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut writer, &to_value(file))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(serde_json::Error::io)
}

fn track_value(number: usize, track: &Track) -> Value {
    let events: Vec<Value> = track.events().iter().map(event_value).collect();
    json!({
        "track_number": number,
        "size": track.declared_len(),
        "event_count": track.len(),
        "events": events,
    })
}

fn event_value(event: &TrackEvent) -> Value {
    let body = match event.message() {
        TrackMessage::ChannelVoice(cv) => channel_value(cv),
        TrackMessage::Meta(meta) => meta_value(meta),
        TrackMessage::SystemExclusive(sysex) => sysex_value(sysex),
    };
    json!({
        "delta_time": event.delta_ticks(),
        "event": body,
    })
}

fn channel_value(cv: &ChannelVoiceMessage) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), "channel".into());
    obj.insert("name".into(), cv.kind().name().into());
    obj.insert("channel".into(), cv.channel().into());
    obj.insert(
        "message_type".into(),
        std::format!("0x{:X}", u8::from(cv.kind())).into(),
    );

    let (first, second) = match cv.kind() {
        VoiceKind::NoteOff | VoiceKind::NoteOn => ("note", Some("velocity")),
        VoiceKind::PolyphonicKeyPressure => ("note", Some("pressure")),
        VoiceKind::ControlChange => ("controller", Some("value")),
        VoiceKind::ProgramChange => ("program", None),
        VoiceKind::ChannelPressure => ("pressure", None),
        VoiceKind::PitchBend => ("lsb", Some("msb")),
    };
    obj.insert(first.into(), cv.param1().into());
    if let (Some(name), Some(value)) = (second, cv.param2()) {
        obj.insert(name.into(), value.into());
    }
    Value::Object(obj)
}

fn meta_value(meta: &MetaMessage) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), "meta".into());
    obj.insert("name".into(), meta.name().into());
    obj.insert(
        "meta_type".into(),
        std::format!("0x{:02X}", meta.meta_type()).into(),
    );
    obj.insert("length".into(), meta.len().into());

    match meta {
        MetaMessage::SequenceNumber(n) => {
            obj.insert("sequence_number".into(), (*n).into());
        }
        MetaMessage::Text(text) => {
            obj.insert("text".into(), latin1(text.bytes()).into());
        }
        MetaMessage::ChannelPrefix(channel) => {
            obj.insert("channel".into(), (*channel).into());
        }
        MetaMessage::Port(port) => {
            obj.insert("port".into(), (*port).into());
        }
        MetaMessage::EndOfTrack => {}
        MetaMessage::Tempo(tempo) => {
            obj.insert(
                "microseconds_per_quarter_note".into(),
                tempo.micros_per_quarter_note().into(),
            );
            obj.insert("bpm".into(), round_hundredths(tempo.bpm()).into());
        }
        MetaMessage::SmpteOffset(offset) => {
            obj.insert("hours".into(), offset.hour.into());
            obj.insert("minutes".into(), offset.minute.into());
            obj.insert("seconds".into(), offset.second.into());
            obj.insert("frames".into(), offset.frame.into());
            obj.insert("fractional_frames".into(), offset.subframe.into());
            obj.insert("frame_rate".into(), offset.fps.label().into());
        }
        MetaMessage::TimeSignature(ts) => {
            obj.insert("numerator".into(), ts.numerator().into());
            obj.insert("denominator".into(), ts.denominator().into());
            obj.insert(
                "clocks_per_metronome_click".into(),
                ts.clocks_per_click().into(),
            );
            obj.insert(
                "32nd_notes_per_24_clocks".into(),
                ts.thirty_seconds_per_quarter().into(),
            );
        }
        MetaMessage::KeySignature(key) => {
            obj.insert("key".into(), key.accidentals().into());
            let scale = if key.is_minor() { "minor" } else { "major" };
            obj.insert("scale".into(), scale.into());
        }
        MetaMessage::SequencerSpecific(data) => {
            obj.insert("data".into(), hex_bytes(data).into());
        }
    }
    Value::Object(obj)
}

fn sysex_value(sysex: &SystemExclusiveMessage) -> Value {
    json!({
        "type": "sysex",
        "length": sysex.data().len(),
        "data": hex_bytes(sysex.data()),
    })
}

fn hex_bytes(data: &[u8]) -> String {
    data.iter()
        .map(|b| std::format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Each byte becomes the code point of the same value, so no byte is lost.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.).round() / 100.
}

#[cfg(test)]
use crate::file::{
    Format, Header,
    meta::{SmpteOffset, Tempo, TextKind, TextMessage},
};

#[cfg(test)]
fn file_with(events: Vec<TrackEvent>, timing: Timing) -> MidiFile {
    let header = Header::new(Format::SingleMultiChannel, 1, timing).unwrap();
    MidiFile::from_parts(header, std::vec![Track::new(events)]).unwrap()
}

#[test]
fn header_and_channel_fields() {
    use pretty_assertions::assert_eq;
    let cv = ChannelVoiceMessage::new(VoiceKind::PitchBend, 3, 0x00, Some(0x40)).unwrap();
    let file = file_with(
        std::vec![TrackEvent::new(7, TrackMessage::ChannelVoice(cv))],
        Timing::new_ticks_per_quarter_note(480),
    );
    let value = to_value(&file);

    assert_eq!(
        value["header"],
        json!({
            "format": 0,
            "tracks": 1,
            "time_division": { "type": "ticks_per_beat", "ticks_per_beat": 480 },
        })
    );
    let track = &value["tracks"][0];
    assert_eq!(track["event_count"], 1);
    assert_eq!(track["events"][0]["delta_time"], 7);
    assert_eq!(
        track["events"][0]["event"],
        json!({
            "type": "channel",
            "name": "Pitch Bend",
            "channel": 3,
            "message_type": "0xE",
            "lsb": 0,
            "msb": 64,
        })
    );
}

#[test]
fn derived_meta_fields() {
    use pretty_assertions::assert_eq;
    let offset = SmpteOffset::parse([0x41, 0x17, 0x2D, 0x0C, 0x22]).unwrap();
    let file = file_with(
        std::vec![
            TrackEvent::new(0, TrackMessage::Meta(MetaMessage::Tempo(Tempo::new(600_000).unwrap()))),
            TrackEvent::new(0, TrackMessage::Meta(MetaMessage::SmpteOffset(offset))),
            TrackEvent::new(
                0,
                TrackMessage::Meta(MetaMessage::Text(TextMessage::new(TextKind::Lyric, "la \"la\""))),
            ),
            TrackEvent::new(0, TrackMessage::Meta(MetaMessage::SequencerSpecific(std::vec![0x00, 0xAB]))),
        ],
        Timing::new_smpte(-30, 4),
    );
    let value = to_value(&file);
    let events = &value["tracks"][0]["events"];

    assert_eq!(value["header"]["time_division"]["smpte_format"], -30);
    assert_eq!(events[0]["event"]["bpm"], 100.0);
    assert_eq!(events[0]["event"]["meta_type"], "0x51");
    assert_eq!(events[1]["event"]["frame_rate"], "30 fps (drop frame)");
    assert_eq!(events[1]["event"]["hours"], 1);
    assert_eq!(events[2]["event"]["text"], "la \"la\"");
    assert_eq!(events[2]["event"]["length"], 7);
    assert_eq!(events[3]["event"]["data"], "00 AB");
}

#[test]
fn sysex_and_pretty_output() {
    use pretty_assertions::assert_eq;
    let file = file_with(
        std::vec![TrackEvent::new(
            0,
            TrackMessage::SystemExclusive(SystemExclusiveMessage::new(0xF0, std::vec![0x7E, 0xF7])),
        )],
        Timing::new_ticks_per_quarter_note(96),
    );
    let value = to_value(&file);
    assert_eq!(
        value["tracks"][0]["events"][0]["event"],
        json!({ "type": "sysex", "length": 2, "data": "7E F7" })
    );

    let text = to_string_pretty(&file).unwrap();
    let reparsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed, value);
}

#[test]
fn text_bytes_outside_utf8_are_kept() {
    use pretty_assertions::assert_eq;
    let name = TextMessage::new(TextKind::TrackName, &b"Caf\xE9"[..]);
    let file = file_with(
        std::vec![TrackEvent::new(0, TrackMessage::Meta(MetaMessage::Text(name)))],
        Timing::new_ticks_per_quarter_note(96),
    );
    let value = to_value(&file);
    let event = &value["tracks"][0]["events"][0]["event"];

    assert_eq!(event["text"], "Caf\u{e9}");
    assert_eq!(event["length"], 4);
    let text = event["text"].as_str().unwrap();
    let bytes: Vec<u8> = text.chars().map(|c| c as u8).collect();
    assert_eq!(bytes, b"Caf\xE9");
}
