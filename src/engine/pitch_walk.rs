use crate::error::{GenerationError, GenerationResult};
use crate::model::params::check_probability;
use crate::model::scale::{PitchSet, clamp_pitch};
use crate::model::song::Pitch;
use rand::Rng;

/// Draws made for a single slot, before probabilities are applied.
///
/// Every slot takes all four draws regardless of settings, so two walks from the
/// same seed pick the same base pitches even when their deviation or rest odds differ.
struct SlotDraw {
    index: usize,
    deviation_roll: f64,
    deviate_up: bool,
    rest_roll: f64,
}

impl SlotDraw {
    fn take<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self {
            index: rng.gen_range(0..len),
            deviation_roll: rng.r#gen::<f64>(),
            deviate_up: rng.r#gen::<bool>(),
            rest_roll: rng.r#gen::<f64>(),
        }
    }
}

/// Pick one pitch (or rest) per rhythmic slot from `pitch_set`.
///
/// Deviation and rests are separate Bernoulli trials per slot: a note may be
/// nudged a semitone off the scale with probability `note_dev_probability`, and
/// independently silenced with probability `rest_probability` when `rests_enabled`.
pub fn generate_pitches<R: Rng + ?Sized>(
    pitch_set: &PitchSet,
    slot_count: usize,
    note_dev_probability: f64,
    rests_enabled: bool,
    rest_probability: f64,
    rng: &mut R,
) -> GenerationResult<Vec<Pitch>> {
    check_probability("note_dev", note_dev_probability)?;
    check_probability("rest_probability", rest_probability)?;

    if slot_count == 0 {
        return Ok(Vec::new());
    }
    if pitch_set.is_empty() {
        return Err(GenerationError::invalid(
            "scale",
            "cannot walk an empty pitch set",
        ));
    }

    let mut pitches = Vec::with_capacity(slot_count);
    for _ in 0..slot_count {
        let draw = SlotDraw::take(pitch_set.len(), rng);

        let mut midi = pitch_set.pitches()[draw.index];

        if draw.deviation_roll < note_dev_probability {
            let step = if draw.deviate_up { 1 } else { -1 };
            midi = clamp_pitch(midi as i32 + step);
        }

        if rests_enabled && draw.rest_roll < rest_probability {
            pitches.push(Pitch::Rest);
        } else {
            pitches.push(Pitch::Midi(midi));
        }
    }

    Ok(pitches)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::scale::build_pitch_set;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn c_major() -> PitchSet {
        build_pitch_set("major", 0, 0, 2).unwrap()
    }

    #[test]
    fn output_length_matches_slots() {
        let set = c_major();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for slots in [0, 1, 5, 64] {
            let pitches = generate_pitches(&set, slots, 0.3, true, 0.2, &mut rng).unwrap();
            assert_eq!(pitches.len(), slots);
        }
    }

    #[test]
    fn no_deviation_stays_in_scale() {
        let set = c_major();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let pitches = generate_pitches(&set, 500, 0.0, false, 0.5, &mut rng).unwrap();

        assert!(pitches.iter().all(|p| !p.is_rest()));
        assert!(
            pitches
                .iter()
                .filter_map(Pitch::midi)
                .all(|midi| set.contains(midi))
        );
    }

    #[test]
    fn full_deviation_moves_every_note_one_semitone() {
        let set = c_major();
        let plain =
            generate_pitches(&set, 300, 0.0, false, 0.0, &mut ChaCha8Rng::seed_from_u64(5))
                .unwrap();
        let bent =
            generate_pitches(&set, 300, 1.0, false, 0.0, &mut ChaCha8Rng::seed_from_u64(5))
                .unwrap();

        let mut ups = 0;
        let mut downs = 0;
        for (a, b) in plain.iter().zip(bent.iter()) {
            let (a, b) = (a.midi().unwrap() as i32, b.midi().unwrap() as i32);
            assert_eq!((a - b).abs(), 1);
            if b > a {
                ups += 1;
            } else {
                downs += 1;
            }
        }
        assert!(ups > 0 && downs > 0);
    }

    #[test]
    fn deviation_clamps_at_the_edges() {
        let top = build_pitch_set("chromatic", 0, 6, 1).unwrap();
        assert!(top.pitches().iter().all(|&p| p == 127));

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let pitches = generate_pitches(&top, 100, 1.0, false, 0.0, &mut rng).unwrap();
        assert!(
            pitches
                .iter()
                .filter_map(Pitch::midi)
                .all(|midi| midi == 126 || midi == 127)
        );
    }

    #[test]
    fn rests_only_when_enabled() {
        let set = c_major();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let all_rests = generate_pitches(&set, 50, 0.0, true, 1.0, &mut rng).unwrap();
        assert!(all_rests.iter().all(Pitch::is_rest));

        let disabled = generate_pitches(&set, 50, 0.0, false, 1.0, &mut rng).unwrap();
        assert!(disabled.iter().all(|p| !p.is_rest()));

        let some = generate_pitches(&set, 1000, 0.0, true, 0.5, &mut rng).unwrap();
        let rests = some.iter().filter(|p| p.is_rest()).count();
        assert!((300..700).contains(&rests), "got {} rests", rests);
    }

    #[test]
    fn rejects_bad_probabilities() {
        let set = c_major();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            generate_pitches(&set, 4, 1.5, false, 0.1, &mut rng),
            Err(GenerationError::InvalidParameter { name: "note_dev", .. })
        ));
        assert!(matches!(
            generate_pitches(&set, 4, 0.0, true, -1.0, &mut rng),
            Err(GenerationError::InvalidParameter { name: "rest_probability", .. })
        ));
    }
}
