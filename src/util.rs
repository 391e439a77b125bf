use crate::error::{GenerationError, GenerationResult};
use crate::model::scale::Scale;
use crate::model::song::NoteEvent;
use std::path::{Path, PathBuf};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Parse a key given either as a semitone offset ("0".."11") or a note name ("C", "F#", "Bb").
pub fn parse_key(input: &str) -> GenerationResult<u8> {
    let trimmed = input.trim();

    if let Ok(offset) = trimmed.parse::<i32>() {
        return if (0..12).contains(&offset) {
            Ok(offset as u8)
        } else {
            Err(GenerationError::invalid(
                "key",
                format!("{} is not a semitone offset in 0..=11", offset),
            ))
        };
    }

    let mut chars = trimmed.chars();
    let natural: i32 = match chars.next().map(|c| c.to_ascii_uppercase()) {
        Some('C') => 0,
        Some('D') => 2,
        Some('E') => 4,
        Some('F') => 5,
        Some('G') => 7,
        Some('A') => 9,
        Some('B') => 11,
        _ => {
            return Err(GenerationError::invalid(
                "key",
                format!("'{}' is not a note name", input),
            ));
        }
    };

    let accidental: i32 = match chars.as_str() {
        "" => 0,
        "#" | "s" | "sharp" => 1,
        "b" | "flat" => -1,
        other => {
            return Err(GenerationError::invalid(
                "key",
                format!("unknown accidental '{}' in '{}'", other, input),
            ));
        }
    };

    Ok((natural + accidental).rem_euclid(12) as u8)
}

/// "C4 (60)" style label for a MIDI pitch.
pub fn note_label(midi: u8) -> String {
    let octave = midi as i32 / 12 - 1;
    format!("{}{} ({})", NOTE_NAMES[midi as usize % 12], octave, midi)
}

pub fn describe_event(ev: &NoteEvent) -> String {
    match ev.note {
        Some(note) => format!(
            "{} vel={} start={} dur={}",
            note_label(note.midi),
            note.velocity,
            ev.start_tick,
            ev.duration_ticks
        ),
        None => format!("rest start={} dur={}", ev.start_tick, ev.duration_ticks),
    }
}

pub fn scale_listing() -> Vec<String> {
    Scale::ALL
        .iter()
        .map(|scale| format!("{:<18} {:?}", scale.name(), scale.offsets()))
        .collect()
}

pub fn output_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{}{}.mid", prefix, index))
}
