//! Benchmarks for full polyphonic renders.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::{
    dsp::Waveform,
    io::keymap::KEY_FREQUENCIES,
    synth::{message, EngineConfig, PolySynth, SynthMessage},
};

use crate::BLOCK_SIZES;

const CHANNELS: usize = 2;

fn held_chord(notes: usize, waveform: Waveform) -> PolySynth {
    let (_tx, rx) = message::channel(4);
    let config = EngineConfig::default().with_waveform(waveform);
    let mut synth = PolySynth::new(config, rx);
    for &(key, frequency) in KEY_FREQUENCIES.iter().take(notes) {
        synth.apply(SynthMessage::NoteOn { key, frequency });
    }
    synth
}

pub fn bench_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/polyphony");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * CHANNELS];

        // === HELD CHORDS ===
        // Mixing cost scales with the number of sounding voices
        for notes in [1, 4, 16] {
            let mut synth = held_chord(notes, Waveform::Sawtooth);
            group.bench_with_input(
                BenchmarkId::new(format!("chord_{notes}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        synth.render(black_box(&mut buffer), CHANNELS);
                    })
                },
            );
        }

        // Square is the most expensive waveform (four partials)
        let mut synth = held_chord(16, Waveform::Square);
        group.bench_with_input(BenchmarkId::new("square_chord_16", size), &size, |b, _| {
            b.iter(|| {
                synth.render(black_box(&mut buffer), CHANNELS);
            })
        });

        // === KEY CHURN ===
        // A press and release lands in the queue before every block
        let (mut tx, rx) = message::channel(message::QUEUE_CAPACITY);
        let mut synth = PolySynth::new(EngineConfig::default(), rx);
        let mut next = 0usize;
        group.bench_with_input(BenchmarkId::new("churn", size), &size, |b, _| {
            b.iter(|| {
                let (key, frequency) = KEY_FREQUENCIES[next % KEY_FREQUENCIES.len()];
                let (previous, _) =
                    KEY_FREQUENCIES[(next + KEY_FREQUENCIES.len() - 1) % KEY_FREQUENCIES.len()];
                next += 1;
                let _ = tx.push(SynthMessage::NoteOff { key: previous });
                let _ = tx.push(SynthMessage::NoteOn { key, frequency });
                synth.render(black_box(&mut buffer), CHANNELS);
            })
        });
    }

    group.finish();
}
