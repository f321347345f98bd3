use thiserror::Error;

/// A setter argument outside its valid range. The previous value is kept.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParamError {
    #[error("tempo must be a finite number of beats per minute above zero, got {0}")]
    InvalidTempo(f64),
    #[error("{name} volume must be within [0, 1], got {value}")]
    InvalidVolume { name: &'static str, value: f32 },
}

/// Failure to bring up or resume the audio output.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("failed to query output config: {0}")]
    DeviceConfig(String),
    #[error("failed to build output stream: {0}")]
    StreamBuild(String),
    #[error("failed to resume output stream: {0}")]
    Resume(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum VoiceError {
    #[error("voice must stop after it starts (start {start}, stop {stop})")]
    EmptyLifetime { start: f64, stop: f64 },
}
