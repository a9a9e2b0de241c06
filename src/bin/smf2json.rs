//! Parse a Standard MIDI File and write its JSON rendering.
//!
//! ```text
//! smf2json <input.mid> <output.json>
//! ```

use midi_timeline::{json, prelude::*};
use std::{fs::File, io::BufWriter, process::ExitCode};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let [_, input, output] = args.as_slice() else {
        let program = args.first().map_or("smf2json", String::as_str);
        eprintln!("Usage: {program} <input_midi_file> <output_json_file>");
        return ExitCode::FAILURE;
    };

    let file = match MidiFile::read_path(input) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: failed to parse MIDI file '{input}': {e}");
            return ExitCode::FAILURE;
        }
    };

    let header = file.header();
    println!("Successfully parsed MIDI file:");
    println!("  Format: {}", header.format().as_u16());
    println!("  Tracks: {}", header.track_count());
    match header.timing() {
        Timing::TicksPerQuarterNote(tpqn) => {
            println!("  Ticks per beat: {}", tpqn.ticks_per_quarter_note())
        }
        Timing::Smpte(smpte) => println!(
            "  SMPTE: {}, Ticks per frame: {}",
            smpte.frame_code(),
            smpte.ticks_per_frame()
        ),
    }

    let written = File::create(output)
        .map_err(serde_json::Error::io)
        .and_then(|f| json::write_pretty(&file, BufWriter::new(f)));
    if let Err(e) = written {
        eprintln!("Error: failed to write JSON file '{output}': {e}");
        return ExitCode::FAILURE;
    }

    println!("Successfully generated JSON file: {output}");
    ExitCode::SUCCESS
}
