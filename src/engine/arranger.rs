use crate::engine::pitch_walk::generate_pitches;
use crate::engine::rhythm::generate_durations;
use crate::error::GenerationResult;
use crate::model::params::GenerationParameters;
use crate::model::scale::PitchSet;
use crate::model::song::{Melody, Note, NoteEvent, Pitch, Voice};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build one voice: a rhythm, a pitch for each of its slots, laid end to end from tick 0.
pub fn build_voice<R: Rng + ?Sized>(
    pitch_set: &PitchSet,
    velocity: u8,
    params: &GenerationParameters,
    rng: &mut R,
) -> GenerationResult<Voice> {
    let durations = generate_durations(params.beat, params.max_length, params.rand_beat, rng)?;
    let pitches = generate_pitches(
        pitch_set,
        durations.len(),
        params.note_dev,
        params.rests,
        params.rest_probability,
        rng,
    )?;

    let mut start_tick = 0u32;
    let events = durations
        .into_iter()
        .zip(pitches)
        .map(|(duration_ticks, pitch)| {
            let note = match pitch {
                Pitch::Midi(midi) => Some(Note { midi, velocity }),
                Pitch::Rest => None,
            };
            let event = NoteEvent {
                note,
                start_tick,
                duration_ticks,
            };
            start_tick += duration_ticks;
            event
        })
        .collect();

    Ok(Voice { events })
}

/// Build a melody with one independently seeded voice per entry in `voice_seeds`.
pub fn build_melody(
    pitch_set: &PitchSet,
    params: &GenerationParameters,
    voice_seeds: &[u64],
) -> GenerationResult<Melody> {
    let voices = voice_seeds
        .iter()
        .map(|&seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            build_voice(pitch_set, params.velocity, params, &mut rng)
        })
        .collect::<GenerationResult<Vec<Voice>>>()?;

    debug!(
        "Built melody with {} voice(s), {} event(s)..!",
        voices.len(),
        voices.iter().map(|v| v.events.len()).sum::<usize>()
    );

    Ok(Melody { voices })
}
