use std::{io, path::PathBuf};

/// Errors raised while acquiring or driving the synth's devices.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("no default output device available")]
    NoOutputDevice,

    #[error("failed to fetch default output config: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("failed to open input device {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to configure terminal: {0}")]
    Terminal(#[source] io::Error),

    #[error("input read failed: {0}")]
    Input(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SynthError>;
