use crate::model::params::{MAX_BEAT_UNIT, MAX_PHRASE_TICKS};
use crate::model::song::{Melody, Voice};
use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use midly::num::{u4, u7, u15, u24, u28};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use std::fs;
use std::path::Path;

/// 120 bpm, in microseconds per quarter note.
pub const DEFAULT_MPQN: u32 = 500_000;

/// General MIDI reserves channel 10 (index 9) for percussion.
const PERCUSSION_CHANNEL: usize = 9;

const PROGRAM_ACOUSTIC_GRAND: u8 = 0;

/// Melodic channels available once percussion is set aside.
const MELODIC_CHANNELS: usize = 15;

/// Channel for the n-th voice. Cycles through the 15 melodic channels, never percussion.
pub fn channel_for_voice(index: usize) -> u4 {
    let slot = index % MELODIC_CHANNELS;
    let ch = if slot < PERCUSSION_CHANNEL {
        slot
    } else {
        slot + 1
    };
    u4::new(ch as u8)
}

pub fn voice_names(melody: &Melody) -> Vec<String> {
    (0..melody.voices.len())
        .map(|i| format!("Voice {}", i + 1))
        .collect()
}

fn delta(ticks: u32) -> Result<u28> {
    if ticks as u64 > MAX_PHRASE_TICKS {
        bail!("Delta of {} ticks does not fit a MIDI event..!", ticks);
    }
    Ok(u28::new(ticks))
}

fn data_byte(value: u8, what: &str) -> Result<u7> {
    if value > 127 {
        bail!("{} {} is outside 0..=127..!", what, value);
    }
    Ok(u7::new(value))
}

/// Convert a voice's absolute offsets into delta-timed note on/off pairs.
///
/// Rests emit nothing; their time is carried into the next event's delta, and any
/// trailing rest ends up on the EndOfTrack marker so the track keeps its full length.
pub fn voice_to_track_events(voice: &Voice, channel: u4) -> Result<Vec<TrackEvent<'static>>> {
    let mut events = Vec::with_capacity(voice.events.len() * 2 + 1);
    let mut last_tick: u32 = 0;

    for ev in voice.events.iter() {
        let Some(note) = ev.note else {
            continue;
        };

        let key = data_byte(note.midi, "Pitch")?;
        let vel = data_byte(note.velocity, "Velocity")?;

        let Some(gap) = ev.start_tick.checked_sub(last_tick) else {
            bail!(
                "Event at tick {} overlaps the previous note ending at {}..!",
                ev.start_tick,
                last_tick
            );
        };

        events.push(TrackEvent {
            delta: delta(gap)?,
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn { key, vel },
            },
        });
        events.push(TrackEvent {
            delta: delta(ev.duration_ticks)?,
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key,
                    vel: u7::new(0),
                },
            },
        });
        last_tick = ev.end_tick();
    }

    events.push(TrackEvent {
        delta: delta(voice.length_ticks().saturating_sub(last_tick))?,
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    Ok(events)
}

/// Build a format 1 SMF: a tempo track, then one track per voice.
pub fn melody_to_smf<'a>(
    melody: &Melody,
    beat_unit: u32,
    title: &'a str,
    voice_names: &'a [String],
) -> Result<Smf<'a>> {
    if beat_unit == 0 || beat_unit > MAX_BEAT_UNIT {
        bail!(
            "Beat unit {} cannot be written as ticks per quarter note..!",
            beat_unit
        );
    }
    if voice_names.len() != melody.voices.len() {
        bail!(
            "Got {} voice names for {} voices..!",
            voice_names.len(),
            melody.voices.len()
        );
    }

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(beat_unit as u16)),
    ));

    let tempo_track: Track<'a> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(title.as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8)),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(DEFAULT_MPQN))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ];
    smf.tracks.push(tempo_track);

    for (vi, (voice, name)) in melody.voices.iter().zip(voice_names.iter()).enumerate() {
        let channel = channel_for_voice(vi);
        let mut track: Track<'a> = vec![
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
            },
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::ProgramChange {
                        program: u7::new(PROGRAM_ACOUSTIC_GRAND),
                    },
                },
            },
        ];
        track.extend(
            voice_to_track_events(voice, channel)
                .with_context(|| format!("Failed to encode {}..!", name))?,
        );

        debug!(
            "Encoded {} on channel {} ({} events, {} ticks)",
            name,
            channel.as_int() + 1,
            track.len(),
            voice.length_ticks()
        );
        smf.tracks.push(track);
    }

    Ok(smf)
}

pub fn melody_to_bytes(melody: &Melody, beat_unit: u32, title: &str) -> Result<Vec<u8>> {
    let names = voice_names(melody);
    let smf = melody_to_smf(melody, beat_unit, title, &names)?;

    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| anyhow!("Failed to encode MIDI: {:?}", e))?;
    Ok(buf)
}

/// Serialize a melody and write it to `path`.
pub fn write_melody<P: AsRef<Path>>(
    melody: &Melody,
    beat_unit: u32,
    title: &str,
    path: P,
) -> Result<()> {
    let bytes = melody_to_bytes(melody, beat_unit, title)?;
    fs::write(path.as_ref(), &bytes).map_err(|e| {
        anyhow!(
            "Failed to write MIDI file {}: {}",
            path.as_ref().display(),
            e
        )
    })?;

    debug!(
        "Wrote {} bytes to {}",
        bytes.len(),
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::song::{Note, NoteEvent};

    fn note(midi: u8, start: u32, dur: u32) -> NoteEvent {
        NoteEvent {
            note: Some(Note { midi, velocity: 64 }),
            start_tick: start,
            duration_ticks: dur,
        }
    }

    fn rest(start: u32, dur: u32) -> NoteEvent {
        NoteEvent {
            note: None,
            start_tick: start,
            duration_ticks: dur,
        }
    }

    fn track_ticks(track: &[TrackEvent]) -> u32 {
        track.iter().map(|ev| ev.delta.as_int()).sum()
    }

    #[test]
    fn rests_advance_time_without_sounding() {
        let voice = Voice {
            events: vec![
                note(60, 0, 480),
                rest(480, 240),
                note(62, 720, 240),
                rest(960, 480),
            ],
        };

        let events = voice_to_track_events(&voice, u4::new(0)).unwrap();
        let deltas: Vec<u32> = events.iter().map(|ev| ev.delta.as_int()).collect();

        // on, off, on (after the rest), off, end of track (after the trailing rest)
        assert_eq!(deltas, vec![0, 480, 240, 240, 480]);
        assert_eq!(track_ticks(&events), voice.length_ticks());
        assert!(matches!(
            events.last().unwrap().kind,
            TrackEventKind::Meta(MetaMessage::EndOfTrack)
        ));
    }

    #[test]
    fn all_rest_voice_is_just_silence() {
        let voice = Voice {
            events: vec![rest(0, 480), rest(480, 480)],
        };

        let events = voice_to_track_events(&voice, u4::new(3)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].delta.as_int(), 960);
    }

    #[test]
    fn smf_round_trips_through_midly() {
        env_logger::try_init().unwrap_or(());

        let melody = Melody {
            voices: vec![
                Voice {
                    events: vec![note(60, 0, 480), note(67, 480, 960), rest(1440, 480)],
                },
                Voice {
                    events: vec![rest(0, 960), note(55, 960, 960)],
                },
            ],
        };

        let bytes = melody_to_bytes(&melody, 480, "Melody 0").unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        assert_eq!(smf.header.format, Format::Parallel);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        assert_eq!(smf.tracks.len(), 3);

        assert!(smf.tracks[0].iter().any(|ev| matches!(
            ev.kind,
            TrackEventKind::Meta(MetaMessage::Tempo(t)) if t.as_int() == DEFAULT_MPQN
        )));

        for (track, voice) in smf.tracks[1..].iter().zip(melody.voices.iter()) {
            assert_eq!(track_ticks(track), voice.length_ticks());

            let note_ons = track
                .iter()
                .filter(|ev| {
                    matches!(
                        ev.kind,
                        TrackEventKind::Midi {
                            message: MidiMessage::NoteOn { .. },
                            ..
                        }
                    )
                })
                .count();
            assert_eq!(note_ons, voice.sounding_notes().count());
        }
    }

    #[test]
    fn channels_skip_percussion() {
        let channels: Vec<u8> = (0..64).map(|i| channel_for_voice(i).as_int()).collect();
        assert!(channels.iter().all(|&ch| ch != 9 && ch < 16));
        assert_eq!(channels[8], 8);
        assert_eq!(channels[9], 10);
        assert_eq!(channels[14], 15);
        assert_eq!(channels[15], 0);
        assert_eq!(channels[24], 10);

        let mut first_cycle = channels[..15].to_vec();
        first_cycle.sort_unstable();
        first_cycle.dedup();
        assert_eq!(first_cycle.len(), 15);
    }

    #[test]
    fn rejects_unencodable_values() {
        let melody = Melody {
            voices: vec![Voice {
                events: vec![note(200, 0, 480)],
            }],
        };
        assert!(melody_to_bytes(&melody, 480, "bad pitch").is_err());

        let fine = Melody {
            voices: vec![Voice {
                events: vec![note(60, 0, 480)],
            }],
        };
        assert!(melody_to_bytes(&fine, 0, "bad beat").is_err());
        assert!(melody_to_bytes(&fine, 40_000, "bad beat").is_err());
    }

    #[test]
    fn writes_a_file() {
        let melody = Melody {
            voices: vec![Voice {
                events: vec![note(60, 0, 480), note(64, 480, 480)],
            }],
        };

        let path = std::env::temp_dir().join(format!("starling-test-{}.mid", std::process::id()));
        write_melody(&melody, 480, "file test", &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        fs::remove_file(&path).unwrap_or(());
        assert_eq!(&bytes[..4], b"MThd");
        assert_eq!(Smf::parse(&bytes).unwrap().tracks.len(), 2);
    }
}
