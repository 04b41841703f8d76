//! keysynth - play a polyphonic synth from the computer keyboard
//!
//! Run with: cargo run -- [--device /dev/input/eventN]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use keysynth::{
    dsp::{EnvelopeParams, Waveform},
    io::{EvdevKeys, KeySource, TerminalKeys},
    runtime::KeySynth,
    synth::{EngineConfig, ReleasePolicy, RepeatPolicy},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keysynth")]
#[command(version, about = "Realtime polyphonic keyboard synthesizer", long_about = None)]
struct Args {
    /// Raw input device to read keys from (e.g. /dev/input/event3).
    /// Keys are read from the terminal when omitted.
    #[arg(long)]
    device: Option<PathBuf>,

    /// Starting waveform (F1-F4 switch while playing)
    #[arg(long, value_enum, default_value_t = WaveformArg::Sine)]
    waveform: WaveformArg,

    /// Output gain of the averaged mix, in (0, 1]
    #[arg(long, default_value_t = 0.25)]
    amplitude: f32,

    #[arg(long, default_value_t = keysynth::DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// Frames per audio callback; 0 lets the audio backend choose
    #[arg(long, default_value_t = 512)]
    buffer_frames: u32,

    /// Voice pool capacity
    #[arg(long, default_value_t = 32)]
    max_voices: usize,

    /// Play notes at constant volume
    #[arg(long)]
    no_envelope: bool,

    /// What happens to a note when its key is released
    #[arg(long, value_enum, default_value_t = ReleaseArg::Tail)]
    release: ReleaseArg,

    /// What a second press of a held key does
    #[arg(long, value_enum, default_value_t = RepeatArg::Ignore)]
    repeat: RepeatArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum WaveformArg {
    Sine,
    Sawtooth,
    Square,
    Triangle,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReleaseArg {
    Cut,
    Tail,
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    Ignore,
    Retrigger,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let waveform = match self.waveform {
            WaveformArg::Sine => Waveform::Sine,
            WaveformArg::Sawtooth => Waveform::Sawtooth,
            WaveformArg::Square => Waveform::Square,
            WaveformArg::Triangle => Waveform::Triangle,
        };
        let release = match self.release {
            ReleaseArg::Cut => ReleasePolicy::Cut,
            ReleaseArg::Tail => ReleasePolicy::Tail,
        };
        let repeat = match self.repeat {
            RepeatArg::Ignore => RepeatPolicy::Ignore,
            RepeatArg::Retrigger => RepeatPolicy::Retrigger,
        };

        EngineConfig::new()
            .with_waveform(waveform)
            .with_amplitude(self.amplitude)
            .with_sample_rate(self.sample_rate)
            .with_buffer_frames(Some(self.buffer_frames).filter(|&f| f > 0))
            .with_max_voices(self.max_voices)
            .with_envelope((!self.no_envelope).then(EnvelopeParams::default))
            .with_release(release)
            .with_repeat(repeat)
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    // Raw terminal mode mangles interleaved log lines, so stay quiet there.
    let default_level = if args.device.is_some() { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.engine_config();

    println!("=== keysynth ===");
    println!("Waveform: {}", config.waveform);
    println!("Sample rate: {} Hz", config.sample_rate);
    println!();
    println!("  Z S X D C V G B H N J M ,   C4 - C5");
    println!("  Q 2 W 3 E R 5 T 6 Y 7 U I   C5 - C6");
    println!("  F1 sine  F2 saw  F3 square  F4 triangle  Esc quit");
    println!();

    let source: Box<dyn KeySource> = match &args.device {
        Some(path) => Box::new(
            EvdevKeys::open(path).wrap_err("failed to open keyboard device")?,
        ),
        None => Box::new(TerminalKeys::open().wrap_err("failed to read keys from terminal")?),
    };

    KeySynth::new()
        .config(config)
        .run(source)
        .wrap_err("synth stopped with an error")
}
