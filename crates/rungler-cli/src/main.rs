//! rungler - offline renderer for the chaotic stepped-voltage generator.
//!
//! Loads a JSON patch (or the built-in default), runs the generator for a
//! fixed duration, and writes one output channel as a mono WAV file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rungler_dsp::{Channel, Patch};

mod render;

/// Rungler - chaotic shift-register oscillator
#[derive(Parser)]
#[command(name = "rungler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a patch to a WAV file
    Render {
        /// Path to a patch JSON file (built-in defaults when omitted)
        #[arg(short, long)]
        patch: Option<PathBuf>,

        /// Override the patch seed
        #[arg(long)]
        seed: Option<u32>,

        /// Duration in seconds
        #[arg(short, long, default_value_t = 4.0)]
        duration: f64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 48000)]
        sample_rate: u32,

        /// Output channel
        #[arg(short, long, value_enum, default_value = "mix")]
        channel: ChannelArg,

        /// Output WAV path
        #[arg(short, long, default_value = "rungler.wav")]
        output: PathBuf,
    },

    /// Write a default patch JSON for editing
    InitPatch {
        /// Destination path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ChannelArg {
    Osc1,
    Osc2,
    Rungler,
    Comparator,
    Mix,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Osc1 => Channel::Osc1,
            ChannelArg::Osc2 => Channel::Osc2,
            ChannelArg::Rungler => Channel::Rungler,
            ChannelArg::Comparator => Channel::Comparator,
            ChannelArg::Mix => Channel::Mix,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            patch,
            seed,
            duration,
            sample_rate,
            channel,
            output,
        } => run_render(patch, seed, duration, sample_rate, channel, output),
        Commands::InitPatch { output } => run_init_patch(output),
    }
}

fn run_render(
    patch_path: Option<PathBuf>,
    seed: Option<u32>,
    duration: f64,
    sample_rate: u32,
    channel: ChannelArg,
    output: PathBuf,
) -> Result<()> {
    let mut patch = match patch_path {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("failed to read patch {}", path.display()))?;
            Patch::from_json(&json)
                .with_context(|| format!("failed to parse patch {}", path.display()))?
        }
        None => Patch::default(),
    };
    if let Some(seed) = seed {
        patch.seed = seed;
    }

    println!(
        "{} {:?} for {duration} s at {sample_rate} Hz (seed {})",
        "Rendering".cyan().bold(),
        channel,
        patch.seed
    );

    let samples = render::render(&patch, channel.into(), duration, sample_rate as f64);
    let stats = render::write_wav(&output, &samples, sample_rate)?;

    println!(
        "{} {} ({} samples, peak {:.3})",
        "Wrote".green().bold(),
        output.display(),
        stats.num_samples,
        stats.peak
    );
    Ok(())
}

fn run_init_patch(output: Option<PathBuf>) -> Result<()> {
    let json = Patch::default()
        .to_json_pretty()
        .context("failed to serialize default patch")?;
    match output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
