//! The melody generator, leaves first: rhythm and pitch walks feed the voice
//! arranger, which the melody set builder drives once per melody.

pub mod arranger;
pub mod melody_set;
pub mod pitch_walk;
pub mod rhythm;

pub use arranger::{build_melody, build_voice};
pub use melody_set::{generate, generate_parallel};
pub use pitch_walk::generate_pitches;
pub use rhythm::{BEAT_MULTIPLIERS, generate_durations};
