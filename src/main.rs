use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starling::{
    Args, describe_event, generate, generate_parallel, output_path, scale_listing, write_melody,
};
use std::fs;

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.list_scales {
        for line in scale_listing() {
            println!("{}", line);
        }
        return Ok(());
    }

    let params = args.resolve_parameters()?;

    if args.print_config {
        println!("{}", params.to_json_pretty()?);
        return Ok(());
    }

    // Unseeded runs are meant to differ; the seed is logged so a good one can be replayed.
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "Generating {} melodies in {} (key +{}) with seed {}..!",
        args.count, params.scale, params.key, seed
    );
    debug!("Parameters: {:?}", params);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let melodies = if args.parallel {
        generate_parallel(&params, args.count, &mut rng)?
    } else {
        generate(&params, args.count, &mut rng)?
    };

    if args.dry_run {
        for (i, melody) in melodies.iter().enumerate() {
            info!("Melody {}:", i);
            for (vi, voice) in melody.voices.iter().enumerate() {
                for (ei, ev) in voice.events.iter().take(args.dry_run_max).enumerate() {
                    info!("  voice {} event {}: {}", vi + 1, ei, describe_event(ev));
                }
            }
        }
        return Ok(());
    }

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}..!",
            args.output_dir.display()
        )
    })?;

    for (i, melody) in melodies.iter().enumerate() {
        let path = output_path(&args.output_dir, &args.prefix, i);
        write_melody(melody, params.beat, &format!("Melody {}", i), &path)?;
        info!(
            "Wrote '{}' ({} voice(s), {} events)..!",
            path.display(),
            melody.voices.len(),
            melody.event_count()
        );
    }

    info!("Done, wrote {} file(s)..!", melodies.len());
    Ok(())
}
