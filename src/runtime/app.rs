//! KeySynth - wires a key source, the router and the audio stream together

use std::{thread, time::Duration};

use tracing::info;

use crate::{
    dsp::Waveform,
    error::Result,
    io::{
        event::KeySource,
        router::{KeyRouter, RouteOutcome},
    },
    runtime::stream::AudioSession,
    synth::{
        config::EngineConfig,
        message::{self, MessageSender, QUEUE_CAPACITY},
        poly::PolySynth,
    },
};

/// Upper bound on how long shutdown waits for release tails.
const MAX_TAIL_WAIT: Duration = Duration::from_secs(2);

/// Main application builder
pub struct KeySynth {
    config: EngineConfig,
}

impl KeySynth {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.config.waveform = waveform;
        self
    }

    pub fn amplitude(mut self, amplitude: f32) -> Self {
        self.config.amplitude = amplitude;
        self
    }

    /// Open the audio stream and play keys from `source` until it ends or the
    /// quit key is pressed.
    ///
    /// The source is acquired by the caller, so a missing input device fails
    /// before any audio is opened.
    pub fn run<K: KeySource>(self, mut source: K) -> Result<()> {
        self.config.validate()?;

        let (tx, rx) = message::channel(QUEUE_CAPACITY);
        let synth = PolySynth::new(self.config.clone(), rx);
        let mut router = KeyRouter::new(tx, self.config.repeat);

        let mut session = AudioSession::start(synth)?;
        info!(waveform = %self.config.waveform, "ready");

        let result = drive(&mut source, &mut router);

        router.release_all();
        thread::sleep(tail_duration(&self.config));

        session.stop();
        session.close();
        result
    }
}

impl Default for KeySynth {
    fn default() -> Self {
        Self::new()
    }
}

/// The blocking read loop: feed every event to the router until the source
/// is exhausted or the router asks to quit.
pub fn drive<K, S>(source: &mut K, router: &mut KeyRouter<S>) -> Result<()>
where
    K: KeySource + ?Sized,
    S: MessageSender,
{
    while let Some(event) = source.next_event()? {
        if router.route(event) == RouteOutcome::Quit {
            info!("quit requested");
            break;
        }
    }
    Ok(())
}

/// Time for a full-scale release to decay, capped at [`MAX_TAIL_WAIT`].
pub fn tail_duration(config: &EngineConfig) -> Duration {
    let Some(envelope) = config.envelope.filter(|_| config.keeps_tail()) else {
        return Duration::ZERO;
    };
    if envelope.release_rate <= 0.0 {
        return MAX_TAIL_WAIT;
    }
    // level(t) = 1 - rate·t²/2 reaches zero at t = sqrt(2 / rate)
    let seconds = (2.0 / envelope.release_rate).sqrt();
    Duration::try_from_secs_f32(seconds).map_or(MAX_TAIL_WAIT, |d| d.min(MAX_TAIL_WAIT))
}
