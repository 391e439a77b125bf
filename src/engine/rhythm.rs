use crate::error::{GenerationError, GenerationResult};
use log::debug;
use rand::Rng;

/// Note values available to randomized rhythms, as (numerator, denominator) of a beat.
pub const BEAT_MULTIPLIERS: [(u32, u32); 5] = [
    (4, 1), // whole
    (2, 1), // half
    (1, 1), // quarter
    (1, 2), // eighth
    (1, 4), // sixteenth
];

fn random_duration<R: Rng + ?Sized>(beat_unit: u32, rng: &mut R) -> u32 {
    let (num, den) = BEAT_MULTIPLIERS[rng.gen_range(0..BEAT_MULTIPLIERS.len())];
    (beat_unit.saturating_mul(num) / den).max(1)
}

/// Fill a phrase of `max_length_beats * beat_unit` ticks with note durations.
///
/// Straight rhythms repeat `beat_unit`; random ones draw from [`BEAT_MULTIPLIERS`].
/// Whatever the draw, the last entry is cut short so the durations sum to the
/// phrase length exactly.
pub fn generate_durations<R: Rng + ?Sized>(
    beat_unit: u32,
    max_length_beats: u32,
    rand_beat: bool,
    rng: &mut R,
) -> GenerationResult<Vec<u32>> {
    if beat_unit == 0 {
        return Err(GenerationError::invalid("beat", "must be at least one tick"));
    }
    if max_length_beats == 0 {
        return Err(GenerationError::invalid(
            "max_length",
            "a phrase needs at least one beat",
        ));
    }

    let budget = beat_unit
        .checked_mul(max_length_beats)
        .ok_or_else(|| GenerationError::invalid("max_length", "phrase length overflows"))?;

    let mut durations = Vec::new();
    let mut remaining = budget;
    while remaining > 0 {
        let wanted = if rand_beat {
            random_duration(beat_unit, rng)
        } else {
            beat_unit
        };
        let duration = wanted.min(remaining);
        if duration < wanted {
            debug!(
                "Truncating final duration {} -> {} ticks to fit the phrase..!",
                wanted, duration
            );
        }
        durations.push(duration);
        remaining -= duration;
    }

    Ok(durations)
}
