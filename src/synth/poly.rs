use rtrb::Consumer;

use crate::{
    dsp::Waveform,
    synth::{
        config::EngineConfig,
        message::{MessageReceiver, SynthMessage},
        pool::VoicePool,
        voice::Voice,
    },
};

/// The realtime voice engine.
///
/// Lives on the audio thread. Each [`render`](Self::render) call first drains
/// pending intents from the queue, then mixes every sounding voice into the
/// output. Nothing here blocks, locks or allocates once constructed.
///
/// Mixing averages: the sum of sounding voices is scaled by
/// `amplitude / active_notes`. A single note plays at the full configured
/// amplitude and no chord can clip, at the price of each note getting quieter
/// as polyphony grows.
pub struct PolySynth<R = Consumer<SynthMessage>> {
    pool: VoicePool,
    config: EngineConfig,
    rx: R,
    dx: f32,
    active_notes: usize,
    frame_counter: u64,
}

impl<R: MessageReceiver> PolySynth<R> {
    pub fn new(config: EngineConfig, rx: R) -> Self {
        Self {
            pool: VoicePool::with_capacity(config.max_voices),
            dx: config.dx(),
            config,
            rx,
            active_notes: 0,
            frame_counter: 0,
        }
    }

    /// Fill an interleaved buffer of `channels` channels. The mono mix is
    /// copied to every channel of each frame.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        self.drain_messages();

        if channels == 0 {
            out.fill(0.0);
            return;
        }

        let mut frames = out.chunks_exact_mut(channels);
        for frame in &mut frames {
            let sample = self.next_sample();
            frame.fill(sample);
        }
        frames.into_remainder().fill(0.0);
    }

    /// Mix one sample from the current pool state.
    pub fn next_sample(&mut self) -> f32 {
        let waveform = self.config.waveform;
        let envelope = self.config.envelope.as_ref();
        let dx = self.dx;

        let mut sum = 0.0;
        let mut active = 0usize;
        for voice in self.pool.voices_mut() {
            if let Some(value) = voice.next_sample(waveform, envelope, dx) {
                sum += value;
                active += 1;
            }
            voice.advance_phase();
        }

        self.active_notes = active;
        self.frame_counter += 1;

        if active > 0 {
            sum * self.config.amplitude / active as f32
        } else {
            0.0
        }
    }

    fn drain_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            self.apply(msg);
        }
    }

    /// Apply one intent directly, bypassing the queue.
    pub fn apply(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { key, frequency } => {
                // A full pool drops the note; nothing to report from here.
                let _ = self.pool.note_on(key, frequency, &self.config);
            }
            SynthMessage::NoteOff { key } => {
                self.pool.note_off(key, self.config.keeps_tail());
            }
            SynthMessage::SetWaveform(waveform) => {
                self.config.waveform = waveform;
            }
            SynthMessage::AllNotesOff => {
                self.pool.all_notes_off(self.config.keeps_tail());
            }
        }
    }

    /// Sounding voices in the most recently mixed sample.
    pub fn active_notes(&self) -> usize {
        self.active_notes
    }

    /// Voices still contributing to the mix right now.
    pub fn sounding_voices(&self) -> impl Iterator<Item = &Voice> {
        self.pool.voices().iter().filter(|v| v.is_sounding())
    }

    pub fn is_silent(&self) -> bool {
        self.sounding_voices().next().is_none()
    }

    pub fn waveform(&self) -> Waveform {
        self.config.waveform
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    /// Frames mixed since construction.
    pub fn frames_rendered(&self) -> u64 {
        self.frame_counter
    }
}
