//! cpal-backed player: one long-lived output stream fed from a shared clip.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

use super::player::AudioPlayer;
use crate::error::AudioError;
use crate::voice::PcmBuffer;

/// Clip state shared between the voice thread and the audio callback
#[derive(Debug, Default)]
struct Playback {
    clip: Option<Vec<i16>>,

    /// Sample rate the clip was synthesized at (Hz)
    clip_rate_hz: u32,

    /// Read position in clip samples (fractional for rate adaptation)
    cursor: f64,

    playing: bool,
}

impl Playback {
    fn load(&mut self, buffer: &PcmBuffer) {
        self.clip = Some(buffer.samples().to_vec());
        self.clip_rate_hz = buffer.sample_rate_hz();
        self.cursor = 0.0;
        self.playing = true;
    }

    /// Next output sample at `device_rate_hz`, nearest clip sample
    fn next_sample(&mut self, device_rate_hz: u32) -> f32 {
        if !self.playing {
            return 0.0;
        }
        let Some(clip) = &self.clip else {
            return 0.0;
        };

        let index = self.cursor as usize;
        match clip.get(index) {
            Some(&sample) => {
                self.cursor += self.clip_rate_hz as f64 / device_rate_hz as f64;
                sample as f32 / 32768.0
            }
            None => {
                self.playing = false;
                0.0
            }
        }
    }

    /// Fill an interleaved device buffer, same sample on every channel
    fn fill(&mut self, data: &mut [f32], channels: usize, device_rate_hz: u32) {
        for frame in data.chunks_mut(channels.max(1)) {
            let sample = self.next_sample(device_rate_hz);
            frame.fill(sample);
        }
    }
}

/// Player on the default output device
pub struct CpalPlayer {
    playback: Arc<Mutex<Playback>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl CpalPlayer {
    /// Open the default output device and start a silent stream
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config = device.default_output_config()?;

        let device_rate_hz = config.sample_rate().0;
        let channels = config.channels() as usize;

        log::info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            device_rate_hz,
            channels
        );

        let playback = Arc::new(Mutex::new(Playback::default()));
        let playback_callback = Arc::clone(&playback);

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| match playback_callback.lock() {
                Ok(mut playback) => playback.fill(data, channels, device_rate_hz),
                Err(_) => data.fill(0.0),
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )?;

        stream.play()?;

        Ok(Self {
            playback,
            _stream: stream,
        })
    }
}

impl AudioPlayer for CpalPlayer {
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), AudioError> {
        let mut playback = self.playback.lock().map_err(|_| AudioError::Poisoned)?;
        playback.load(buffer);
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut playback) = self.playback.lock() {
            playback.playing = false;
        }
    }

    fn has_sound(&self) -> bool {
        self.playback
            .lock()
            .map(|playback| playback.clip.is_some())
            .unwrap_or(false)
    }
}
