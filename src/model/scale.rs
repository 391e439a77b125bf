use crate::error::{GenerationError, GenerationResult};
use std::fmt;
use std::str::FromStr;

/// Root pitch of octave offset 0 (middle C).
pub const REFERENCE_ROOT: i32 = 60;
pub const SEMITONES_PER_OCTAVE: i32 = 12;
pub const MIN_PITCH: i32 = 0;
pub const MAX_PITCH: i32 = 127;

/// A named scale, i.e. a fixed set of semitone offsets from the root within one octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Major,
    Minor,
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
    Chromatic,
    MajorPentatonic,
    MinorPentatonic,
}

impl Scale {
    pub const ALL: [Scale; 12] = [
        Scale::Major,
        Scale::Minor,
        Scale::Ionian,
        Scale::Dorian,
        Scale::Phrygian,
        Scale::Lydian,
        Scale::Mixolydian,
        Scale::Aeolian,
        Scale::Locrian,
        Scale::Chromatic,
        Scale::MajorPentatonic,
        Scale::MinorPentatonic,
    ];

    /// Semitone offsets from the root, strictly increasing, root first.
    pub fn offsets(&self) -> &'static [u8] {
        match self {
            Scale::Major | Scale::Ionian => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor | Scale::Aeolian => &[0, 2, 3, 5, 7, 8, 10],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Scale::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            Scale::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Scale::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::MajorPentatonic => &[0, 2, 4, 7, 9],
            Scale::MinorPentatonic => &[0, 3, 5, 7, 10],
        }
    }

    pub fn degree_count(&self) -> usize {
        self.offsets().len()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::Ionian => "ionian",
            Scale::Dorian => "dorian",
            Scale::Phrygian => "phrygian",
            Scale::Lydian => "lydian",
            Scale::Mixolydian => "mixolydian",
            Scale::Aeolian => "aeolian",
            Scale::Locrian => "locrian",
            Scale::Chromatic => "chromatic",
            Scale::MajorPentatonic => "major-pentatonic",
            Scale::MinorPentatonic => "minor-pentatonic",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "major" => Ok(Scale::Major),
            "minor" => Ok(Scale::Minor),
            // "ionanian" is the spelling older melody scripts used.
            "ionian" | "ionanian" => Ok(Scale::Ionian),
            "dorian" => Ok(Scale::Dorian),
            "phrygian" => Ok(Scale::Phrygian),
            "lydian" => Ok(Scale::Lydian),
            "mixolydian" => Ok(Scale::Mixolydian),
            "aeolian" => Ok(Scale::Aeolian),
            "locrian" => Ok(Scale::Locrian),
            "chromatic" | "chrom" => Ok(Scale::Chromatic),
            "major-pentatonic" | "pentatonic" => Ok(Scale::MajorPentatonic),
            "minor-pentatonic" => Ok(Scale::MinorPentatonic),
            _ => Err(GenerationError::UnknownScale(s.to_string())),
        }
    }
}

/// The concrete pitches a generation run may draw from, lowest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchSet {
    pitches: Vec<u8>,
}

impl PitchSet {
    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn contains(&self, pitch: u8) -> bool {
        self.pitches.contains(&pitch)
    }
}

/// Clamp an arbitrary semitone value into the 7-bit MIDI pitch space.
pub fn clamp_pitch(pitch: i32) -> u8 {
    pitch.clamp(MIN_PITCH, MAX_PITCH) as u8
}

/// Expand a scale into concrete MIDI pitches across `octave_range` octaves.
///
/// The root sits at `60 + 12 * base_octave`, transposed up by `key` semitones.
/// Pitches that fall outside `0..=127` are clamped rather than dropped, so the
/// set always holds `degree_count * octave_range` entries.
pub fn build_pitch_set(
    scale_name: &str,
    key: u8,
    base_octave: i32,
    octave_range: u32,
) -> GenerationResult<PitchSet> {
    let scale = Scale::from_str(scale_name)?;

    if octave_range < 1 {
        return Err(GenerationError::invalid(
            "octave_range",
            "must span at least one octave",
        ));
    }

    if key >= SEMITONES_PER_OCTAVE as u8 {
        return Err(GenerationError::invalid(
            "key",
            format!("{} is not a semitone offset in 0..=11", key),
        ));
    }

    let root = REFERENCE_ROOT
        .saturating_add(base_octave.saturating_mul(SEMITONES_PER_OCTAVE))
        .saturating_add(key as i32);

    let mut pitches = Vec::with_capacity(scale.degree_count() * octave_range as usize);
    for octave in 0..octave_range {
        let octave_root =
            root.saturating_add((octave as i32).saturating_mul(SEMITONES_PER_OCTAVE));
        for &offset in scale.offsets() {
            pitches.push(clamp_pitch(octave_root.saturating_add(offset as i32)));
        }
    }

    Ok(PitchSet { pitches })
}
