//! Default hardware output through cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Producer;
use tracing::{error, info, warn};

use crate::{
    backend::{
        stream::{self, StreamHandle},
        OutputDevice,
    },
    config::EngineConfig,
    error::BackendError,
};

/// A running cpal output stream with the renderer inside its callback.
///
/// Keep this alive for as long as sound should play. Platforms that refuse
/// to start audio without a user gesture leave it suspended until a later
/// [`OutputDevice::resume`] succeeds.
pub struct CpalOutput {
    stream: cpal::Stream,
    suspended: bool,
}

impl CpalOutput {
    /// Open the default output device.
    ///
    /// Returns the control half of the stream alongside the device. When
    /// `scope` is given the renderer mirrors its mono mix into it.
    pub fn connect_default(
        config: &EngineConfig,
        scope: Option<Producer<f32>>,
    ) -> Result<(StreamHandle, CpalOutput), BackendError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(BackendError::NoDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| BackendError::DeviceConfig(e.to_string()))?;

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate, channels, "opening audio output"
        );

        let (handle, renderer) = stream::channel(sample_rate, config);
        let mut renderer = match scope {
            Some(scope) => renderer.with_scope(scope),
            None => renderer,
        };

        let stream = device
            .build_output_stream(
                &supported.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    renderer.render_interleaved(data, channels);
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .map_err(|e| BackendError::StreamBuild(e.to_string()))?;

        let mut output = CpalOutput {
            stream,
            suspended: true,
        };
        if let Err(err) = output.resume() {
            warn!(%err, "audio output starts suspended");
        }

        Ok((handle, output))
    }
}

impl OutputDevice for CpalOutput {
    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), BackendError> {
        self.stream
            .play()
            .map_err(|e| BackendError::Resume(e.to_string()))?;
        self.suspended = false;
        Ok(())
    }
}
