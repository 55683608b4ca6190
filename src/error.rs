//! Error types for synthesis, drawing, audio output and the application shell.

use thiserror::Error;

/// Bad physical or synthesis parameters.
///
/// These are detected before any samples are produced so a caller can reject
/// the offending edit instead of hearing NaN.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoiceError {
    #[error("harmonic number must be non-zero")]
    ZeroHarmonicNumber,

    #[error("linear density must be > 0, got {0}")]
    NonPositiveDensity(f64),

    #[error("tension must be >= 0, got {0}")]
    NegativeTension(f64),

    #[error("frequency is not finite ({0})")]
    NonFiniteFrequency(f64),

    #[error("no harmonics to synthesize")]
    NoHarmonics,

    #[error("harmonics are silent (max amplitude {0})")]
    SilentHarmonics(f64),

    #[error("duration gives no frames or too many to synthesize, got {0} s")]
    InvalidDuration(f64),

    #[error("sampling rate must be > 0")]
    InvalidSampleRate,

    #[error("'{0}' is only defined for string voices")]
    NotAStringModel(&'static str),
}

/// Unknown draw mode name. A configuration mistake, reported immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawModeError {
    #[error("'{0}' is not a valid draw mode (expected lines, circles or both)")]
    Unknown(String),
}

/// Audio output failures.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoDevice,

    #[error("failed to get audio config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("audio state lock poisoned")]
    Poisoned,
}

/// Failure to start playback: either the clip could not be built or the
/// player refused it.
#[derive(Debug, Error)]
pub enum PlayError {
    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// GPU setup failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Top-level error for the interactive binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error(transparent)]
    DrawMode(#[from] DrawModeError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Play(#[from] PlayError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
