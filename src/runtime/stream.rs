//! Output stream ownership.
//!
//! Shutdown is two-phase: [`AudioSession::stop`] pauses the callback,
//! [`AudioSession::close`] releases the stream. Both are idempotent, and
//! dropping the session runs whichever steps are still outstanding, so a
//! failure partway through setup never leaves a stream open.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BufferSize, SampleRate, Stream, StreamConfig,
};
use tracing::{debug, error, info, warn};

use crate::{
    error::{Result, SynthError},
    synth::{message::MessageReceiver, poly::PolySynth},
};

pub struct AudioSession {
    stream: Option<Stream>,
    playing: bool,
    sample_rate: u32,
    channels: u16,
    device_name: String,
}

impl AudioSession {
    /// Open the default output device and start `synth` rendering into it.
    pub fn start<R>(mut synth: PolySynth<R>) -> Result<Self>
    where
        R: MessageReceiver + Send + 'static,
    {
        let sample_rate = synth.config().sample_rate;
        let buffer_size = match synth.config().buffer_frames {
            Some(frames) => BufferSize::Fixed(frames),
            None => BufferSize::Default,
        };

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(SynthError::NoOutputDevice)?;
        let channels = device.default_output_config()?.channels();
        let device_name = device.name().unwrap_or_else(|_| "<unnamed>".to_string());

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size,
        };

        let frame_channels = channels as usize;
        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _| synth.render(data, frame_channels),
            |err| error!(error = %err, "audio stream error"),
            None,
        )?;

        let mut session = Self {
            stream: Some(stream),
            playing: false,
            sample_rate,
            channels,
            device_name,
        };
        session.play()?;

        info!(
            device = %session.device_name,
            sample_rate,
            channels,
            ?buffer_size,
            "audio stream started"
        );
        Ok(session)
    }

    fn play(&mut self) -> Result<()> {
        if let Some(stream) = &self.stream {
            stream.play()?;
            self.playing = true;
        }
        Ok(())
    }

    /// Stop invoking the callback. Failures are logged, not returned.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        if let Some(stream) = &self.stream {
            if let Err(e) = stream.pause() {
                warn!(error = %e, "failed to stop audio stream");
            }
        }
    }

    /// Release the stream. Stops it first if still playing.
    pub fn close(&mut self) {
        self.stop();
        if let Some(stream) = self.stream.take() {
            drop(stream);
            debug!("audio stream closed");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl Drop for AudioSession {
    fn drop(&mut self) {
        self.close();
    }
}
