use crate::engine::arranger::build_melody;
use crate::error::{GenerationError, GenerationResult};
use crate::model::params::GenerationParameters;
use crate::model::scale::{PitchSet, build_pitch_set};
use crate::model::song::Melody;
use log::{debug, info};
use rand::Rng;
use rayon::prelude::*;

/// Validate everything and build the shared pitch set. Runs before any melody is touched.
fn prepare(params: &GenerationParameters, n: usize) -> GenerationResult<PitchSet> {
    if n < 1 {
        return Err(GenerationError::invalid("count", "need at least one melody"));
    }

    let scale = params.validate()?;
    let pitch_set = build_pitch_set(scale.name(), params.key, params.octave, params.octave_range)?;

    debug!(
        "Pitch set for {} (key +{}, octave {:+}, range {}): {:?}",
        scale,
        params.key,
        params.octave,
        params.octave_range,
        pitch_set.pitches()
    );

    Ok(pitch_set)
}

/// One seed per voice, drawn melody by melody from the top-level source.
fn partition_seeds<R: Rng + ?Sized>(
    params: &GenerationParameters,
    n: usize,
    rng: &mut R,
) -> Vec<Vec<u64>> {
    (0..n)
        .map(|_| (0..params.tracks).map(|_| rng.r#gen::<u64>()).collect())
        .collect()
}

/// Generate `n` independent melodies of `params.tracks` voices each.
///
/// Fails before producing anything if a parameter is out of range. Each voice
/// runs on its own seeded stream taken from `rng`, so a fixed seed reproduces
/// the whole set.
pub fn generate<R: Rng + ?Sized>(
    params: &GenerationParameters,
    n: usize,
    rng: &mut R,
) -> GenerationResult<Vec<Melody>> {
    let pitch_set = prepare(params, n)?;
    let seeds = partition_seeds(params, n, rng);

    let melodies = seeds
        .iter()
        .map(|voice_seeds| build_melody(&pitch_set, params, voice_seeds))
        .collect::<GenerationResult<Vec<Melody>>>()?;

    info!("Generated {} melodies..!", melodies.len());
    Ok(melodies)
}

/// Same contract and same output as [`generate`], with melodies spread over the rayon pool.
///
/// Seeds are drawn up front in the same order as the sequential path, so the
/// thread schedule has no effect on the result.
pub fn generate_parallel<R: Rng + ?Sized>(
    params: &GenerationParameters,
    n: usize,
    rng: &mut R,
) -> GenerationResult<Vec<Melody>> {
    let pitch_set = prepare(params, n)?;
    let seeds = partition_seeds(params, n, rng);

    let melodies = seeds
        .par_iter()
        .map(|voice_seeds| build_melody(&pitch_set, params, voice_seeds))
        .collect::<GenerationResult<Vec<Melody>>>()?;

    info!(
        "Generated {} melodies across worker threads..!",
        melodies.len()
    );
    Ok(melodies)
}
