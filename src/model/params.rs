use crate::error::{GenerationError, GenerationResult};
use crate::model::scale::Scale;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest ticks-per-quarter value an SMF header can carry (15 bits).
pub const MAX_BEAT_UNIT: u32 = 0x7FFF;

/// Largest delta time an SMF event can carry (28 bits).
pub const MAX_PHRASE_TICKS: u64 = 0x0FFF_FFFF;

/// Everything one generation run needs, fixed for the whole run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationParameters {
    /// Scale name, see [`Scale`].
    pub scale: String,

    /// Octave offset from middle C (60). Negative values go down.
    pub octave: i32,

    /// Number of octaves the pitch set spans.
    pub octave_range: u32,

    /// Voices per melody.
    pub tracks: u32,

    /// Probability that a note is bent one semitone up or down.
    pub note_dev: f64,

    /// Ticks per quarter note.
    pub beat: u32,

    /// Phrase length in beats.
    pub max_length: u32,

    /// Draw note lengths at random instead of using straight beats.
    pub rand_beat: bool,

    pub velocity: u8,

    /// Semitone transposition of the scale root, 0..=11.
    pub key: u8,

    pub rests: bool,

    /// Per-slot rest chance when `rests` is enabled.
    pub rest_probability: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            scale: Scale::Major.name().to_string(),
            octave: 0,
            octave_range: 1,
            tracks: 1,
            note_dev: 0.0,
            beat: 480,
            max_length: 16,
            rand_beat: true,
            velocity: 64,
            key: 0,
            rests: false,
            rest_probability: 0.1,
        }
    }
}

impl GenerationParameters {
    /// Load parameters from a JSON file. Missing fields fall back to their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read parameter file {}..!",
                path.as_ref().display()
            )
        })?;

        serde_json::from_str(&text).with_context(|| {
            format!(
                "Failed to parse parameter file {}..!",
                path.as_ref().display()
            )
        })
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn phrase_ticks(&self) -> u64 {
        self.max_length as u64 * self.beat as u64
    }

    /// Check every field against its domain. Nothing is generated unless this passes.
    pub fn validate(&self) -> GenerationResult<Scale> {
        let scale: Scale = self.scale.parse()?;

        if self.key > 11 {
            return Err(GenerationError::invalid(
                "key",
                format!("{} is not a semitone offset in 0..=11", self.key),
            ));
        }
        if self.octave_range < 1 {
            return Err(GenerationError::invalid(
                "octave_range",
                "must span at least one octave",
            ));
        }
        if self.tracks < 1 {
            return Err(GenerationError::invalid("tracks", "need at least one voice"));
        }
        check_probability("note_dev", self.note_dev)?;
        check_probability("rest_probability", self.rest_probability)?;
        if self.beat < 1 || self.beat > MAX_BEAT_UNIT {
            return Err(GenerationError::invalid(
                "beat",
                format!("{} is outside 1..={}", self.beat, MAX_BEAT_UNIT),
            ));
        }
        if self.max_length < 1 {
            return Err(GenerationError::invalid(
                "max_length",
                "a phrase needs at least one beat",
            ));
        }
        if self.phrase_ticks() > MAX_PHRASE_TICKS {
            return Err(GenerationError::invalid(
                "max_length",
                format!(
                    "{} beats of {} ticks exceeds the {} tick limit",
                    self.max_length, self.beat, MAX_PHRASE_TICKS
                ),
            ));
        }
        if !(1..=127).contains(&self.velocity) {
            return Err(GenerationError::invalid(
                "velocity",
                format!("{} is outside 1..=127", self.velocity),
            ));
        }

        Ok(scale)
    }
}

pub fn check_probability(name: &'static str, p: f64) -> GenerationResult<()> {
    // NaN fails the range check too.
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(GenerationError::invalid(
            name,
            format!("probability {} is outside [0, 1]", p),
        ))
    }
}
