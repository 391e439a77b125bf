use serde::{Deserialize, Serialize};

/// One slot of a pitch walk: either a concrete MIDI pitch or silence.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pitch {
    Midi(u8),
    Rest,
}

impl Pitch {
    pub fn midi(&self) -> Option<u8> {
        match self {
            Pitch::Midi(midi) => Some(*midi),
            Pitch::Rest => None,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Pitch::Rest)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub midi: u8,
    pub velocity: u8,
}

/// A timed slot in a voice. `note` is `None` for a rest, which still takes up `duration_ticks`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NoteEvent {
    pub note: Option<Note>,
    pub start_tick: u32,
    pub duration_ticks: u32,
}

impl NoteEvent {
    pub fn is_rest(&self) -> bool {
        self.note.is_none()
    }

    pub fn end_tick(&self) -> u32 {
        self.start_tick + self.duration_ticks
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Voice {
    pub events: Vec<NoteEvent>,
}

impl Voice {
    /// Total ticks covered by the voice, rests included.
    pub fn length_ticks(&self) -> u32 {
        self.events.last().map(NoteEvent::end_tick).unwrap_or(0)
    }

    pub fn sounding_notes(&self) -> impl Iterator<Item = &Note> {
        self.events.iter().filter_map(|ev| ev.note.as_ref())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Melody {
    pub voices: Vec<Voice>,
}

impl Melody {
    pub fn event_count(&self) -> usize {
        self.voices.iter().map(|v| v.events.len()).sum()
    }
}
