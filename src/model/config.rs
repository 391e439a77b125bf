use crate::model::params::GenerationParameters;
use crate::util::parse_key;
use clap::Parser;
use log::debug;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "starling",
    about = "Generate random MIDI melodies in a given scale and key!"
)]
pub struct Args {
    /// Number of melodies (one .mid file each) to generate.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: usize,

    /// JSON file with generation parameters. Flags given on the command line override it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scale to draw notes from, see `--list-scales`. [default: major]
    #[arg(short, long)]
    pub scale: Option<String>,

    /// Key as a semitone offset (0..=11) or a note name like C, F# or Bb. [default: C]
    #[arg(short, long)]
    pub key: Option<String>,

    /// Octave offset from middle C, positive or negative. [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    pub octave: Option<i32>,

    /// Number of octaves the melody may span. [default: 1]
    #[arg(short = 'r', long)]
    pub octave_range: Option<u32>,

    /// Voices (MIDI tracks) per melody. [default: 1]
    #[arg(short, long)]
    pub tracks: Option<u32>,

    /// Probability (0.0..=1.0) that a note is bent a semitone off the scale. [default: 0.0]
    #[arg(long)]
    pub note_dev: Option<f64>,

    /// Ticks per quarter note. [default: 480]
    #[arg(short, long)]
    pub beat: Option<u32>,

    /// Phrase length in beats. [default: 16]
    #[arg(short = 'l', long)]
    pub max_length: Option<u32>,

    /// Randomize note lengths (`--rand-beat false` for straight beats). [default: true]
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub rand_beat: Option<bool>,

    /// Note velocity, 1..=127. [default: 64]
    #[arg(long)]
    pub velocity: Option<u8>,

    /// Sprinkle rests into the melody. [default: false]
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub rests: Option<bool>,

    /// Per-note rest chance when rests are enabled. [default: 0.1]
    #[arg(long)]
    pub rest_probability: Option<f64>,

    /// Seed for reproducible output. Without one every run differs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory the .mid files are written to (created if missing).
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File name prefix, files are named `<prefix><index>.mid`.
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Build melodies on worker threads. Output is identical for the same seed.
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Dry run (print the first dry_run_max events of each voice and exit).
    #[arg(short, long, default_value_t = false)]
    pub dry_run: bool,

    /// Maximum events to print per voice in dry run.
    #[arg(long, default_value_t = 80)]
    pub dry_run_max: usize,

    /// Print the recognized scales and exit.
    #[arg(long, default_value_t = false)]
    pub list_scales: bool,

    /// Print the effective generation parameters as JSON and exit.
    #[arg(long, default_value_t = false)]
    pub print_config: bool,

    /// Prints extra information to the terminal.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Defaults, then the `--config` file if any, then whatever flags were passed.
    pub fn resolve_parameters(&self) -> anyhow::Result<GenerationParameters> {
        let mut params = match &self.config {
            Some(path) => {
                debug!("Loading parameters from {}", path.display());
                GenerationParameters::from_json_file(path)?
            }
            None => GenerationParameters::default(),
        };

        if let Some(scale) = &self.scale {
            params.scale = scale.clone();
        }
        if let Some(key) = &self.key {
            params.key = parse_key(key)?;
        }
        if let Some(octave) = self.octave {
            params.octave = octave;
        }
        if let Some(octave_range) = self.octave_range {
            params.octave_range = octave_range;
        }
        if let Some(tracks) = self.tracks {
            params.tracks = tracks;
        }
        if let Some(note_dev) = self.note_dev {
            params.note_dev = note_dev;
        }
        if let Some(beat) = self.beat {
            params.beat = beat;
        }
        if let Some(max_length) = self.max_length {
            params.max_length = max_length;
        }
        if let Some(rand_beat) = self.rand_beat {
            params.rand_beat = rand_beat;
        }
        if let Some(velocity) = self.velocity {
            params.velocity = velocity;
        }
        if let Some(rests) = self.rests {
            params.rests = rests;
        }
        if let Some(rest_probability) = self.rest_probability {
            params.rest_probability = rest_probability;
        }

        Ok(params)
    }
}
