//! A playable voice: parameters, current clip, playback start and wave views.

use std::fmt;
use std::time::Instant;

use rand::Rng;

use super::edit::{EditOp, VoiceParam};
use super::frequency::FrequencyModel;
use super::harmonics::{clamp_harmonics, default_harmonics};
use super::synthesis::{frame_count, PcmBuffer, Synthesis};
use crate::audio::AudioPlayer;
use crate::error::{PlayError, VoiceError};
use crate::params::VoiceSettings;
use crate::waveform::{Viewport, WaveGeometry, WaveformRenderer};

/// One configured string (or tone) that can synthesize and play a clip.
///
/// At most one clip per voice sounds at a time: `play` stops the previous
/// one before starting again.
pub struct StringVoice<P: AudioPlayer> {
    sample_rate_hz: u32,
    duration_s: f64,
    strength: f64,
    model: FrequencyModel,
    harmonics: Vec<f64>,

    /// Fundamental as of the last successful parameter change (Hz)
    frequency_hz: f64,

    /// Latest synthesized clip, refreshed after edits once one exists
    buffer: Option<PcmBuffer>,

    /// Clip of the current playback session and the duration it was built for
    session: Option<(PcmBuffer, f64)>,

    playback_start: Option<Instant>,
    renderer: WaveformRenderer,
    player: P,
}

impl<P: AudioPlayer> StringVoice<P> {
    /// Create a voice, validating every parameter up front.
    pub fn new<R: Rng + ?Sized>(
        settings: VoiceSettings,
        rng: &mut R,
        player: P,
    ) -> Result<Self, VoiceError> {
        let harmonics = match settings.harmonics {
            Some(harmonics) => harmonics,
            None => default_harmonics(&settings.model, rng),
        };

        validate(
            &settings.model,
            &harmonics,
            settings.strength,
            settings.duration_s,
            settings.sample_rate_hz,
        )?;
        let frequency_hz = settings.model.frequency()?;

        Ok(Self {
            sample_rate_hz: settings.sample_rate_hz,
            duration_s: settings.duration_s,
            strength: settings.strength,
            model: settings.model,
            harmonics,
            frequency_hz,
            buffer: None,
            session: None,
            playback_start: None,
            renderer: WaveformRenderer::new(),
            player,
        })
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    pub fn harmonics(&self) -> &[f64] {
        &self.harmonics
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    /// Most recent clip, if one was synthesized
    pub fn buffer(&self) -> Option<&PcmBuffer> {
        self.buffer.as_ref()
    }

    pub fn playback_start(&self) -> Option<Instant> {
        self.playback_start
    }

    pub fn clear_playback_start(&mut self) {
        self.playback_start = None;
    }

    pub fn renderer(&self) -> &WaveformRenderer {
        &self.renderer
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Derive the fundamental from the current model (Hz)
    pub fn compute_frequency(&self) -> Result<f64, VoiceError> {
        self.model.frequency()
    }

    /// Recompute frequency and clip from the current parameters.
    pub fn make_sound(&mut self) -> Result<&PcmBuffer, VoiceError> {
        let frequency_hz = self.compute_frequency()?;
        let buffer = Synthesis {
            frequency_hz,
            harmonics: &self.harmonics,
            strength: self.strength,
            duration_s: self.duration_s,
            sample_rate_hz: self.sample_rate_hz,
        }
        .render()?;

        self.frequency_hz = frequency_hz;
        Ok(&*self.buffer.insert(buffer))
    }

    /// Restart playback with a freshly synthesized clip.
    pub fn play(&mut self, now: Instant) -> Result<(), PlayError> {
        if self.player.has_sound() {
            self.player.stop();
        }

        let buffer = self.make_sound()?.clone();
        self.player.play(&buffer)?;
        log::debug!(
            "playing {} frames at {:.2} Hz",
            buffer.frame_count(),
            self.frequency_hz
        );
        self.session = Some((buffer, self.duration_s));

        self.playback_start = Some(now);
        self.renderer.reset();
        Ok(())
    }

    /// Halt playback. The last start time stays available.
    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// Static preview of the latest clip, which follows parameter edits
    pub fn draw_full_wave(&self, viewport: Viewport) -> WaveGeometry {
        match &self.buffer {
            Some(buffer) => self.renderer.render_full_wave(buffer.samples(), viewport),
            None => WaveGeometry::empty(),
        }
    }

    /// Part of the playing clip that became audible since the previous call
    pub fn draw_moving_wave(&mut self, viewport: Viewport, now: Instant) -> WaveGeometry {
        match &self.session {
            Some((buffer, duration_s)) => self.renderer.render_moving_wave(
                buffer.samples(),
                self.playback_start,
                *duration_s,
                buffer.sample_rate_hz(),
                now,
                viewport,
            ),
            None => WaveGeometry::empty(),
        }
    }

    /// Current value of an editable parameter
    pub fn param(&self, param: VoiceParam) -> Result<f64, VoiceError> {
        let physics = || {
            self.model
                .string_physics()
                .ok_or(VoiceError::NotAStringModel(param.name()))
        };
        let value = match param {
            VoiceParam::Strength => self.strength,
            VoiceParam::Duration => self.duration_s,
            VoiceParam::Length => physics()?.length_m,
            VoiceParam::HarmonicNumber => physics()?.harmonic_number,
            VoiceParam::Tension => physics()?.tension_n,
            VoiceParam::LinearDensity => physics()?.linear_density,
        };
        Ok(value)
    }

    /// Apply one edit, keeping the voice unchanged if the result is invalid.
    ///
    /// Once a clip exists it is resynthesized so the preview never lags the
    /// parameters. The playing session keeps its own clip. Returns the new
    /// parameter value.
    pub fn apply_edit(&mut self, param: VoiceParam, op: EditOp) -> Result<f64, VoiceError> {
        let value = op.apply(self.param(param)?);

        let mut model = self.model;
        let mut strength = self.strength;
        let mut duration_s = self.duration_s;
        match (param, &mut model) {
            (VoiceParam::Strength, _) => strength = value,
            (VoiceParam::Duration, _) => duration_s = value,
            (VoiceParam::Length, FrequencyModel::String(p)) => p.length_m = value,
            (VoiceParam::HarmonicNumber, FrequencyModel::String(p)) => p.harmonic_number = value,
            (VoiceParam::Tension, FrequencyModel::String(p)) => p.tension_n = value,
            (VoiceParam::LinearDensity, FrequencyModel::String(p)) => p.linear_density = value,
            (_, FrequencyModel::Tone { .. }) => {
                return Err(VoiceError::NotAStringModel(param.name()))
            }
        }

        validate(
            &model,
            &self.harmonics,
            strength,
            duration_s,
            self.sample_rate_hz,
        )?;
        let frequency_hz = model.frequency()?;

        self.model = model;
        self.strength = strength;
        self.duration_s = duration_s;
        self.frequency_hz = frequency_hz;
        self.refresh_buffer()?;
        Ok(value)
    }

    /// Draw a new default harmonic series for the current model
    pub fn regenerate_harmonics<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), VoiceError> {
        self.harmonics = default_harmonics(&self.model, rng);
        self.refresh_buffer()
    }

    fn refresh_buffer(&mut self) -> Result<(), VoiceError> {
        if self.buffer.is_some() {
            self.make_sound()?;
        }
        Ok(())
    }

    pub fn stats(&self) -> VoiceStats {
        VoiceStats {
            model: self.model,
            duration_s: self.duration_s,
            strength: self.strength,
            harmonic_count: self.harmonics.len(),
            frequency_hz: self.frequency_hz,
        }
    }
}

fn validate(
    model: &FrequencyModel,
    harmonics: &[f64],
    strength: f64,
    duration_s: f64,
    sample_rate_hz: u32,
) -> Result<(), VoiceError> {
    model.frequency()?;
    frame_count(duration_s, sample_rate_hz)?;
    clamp_harmonics(harmonics, strength)?;
    Ok(())
}

/// Readable summary of a voice and how its frequency came about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceStats {
    pub model: FrequencyModel,
    pub duration_s: f64,
    pub strength: f64,
    pub harmonic_count: usize,
    pub frequency_hz: f64,
}

impl fmt::Display for VoiceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.model {
            FrequencyModel::String(p) => {
                writeln!(f, "Length : {}", p.length_m)?;
                writeln!(f, "N : {}", p.harmonic_number)?;
                writeln!(f, "Tension : {}", p.tension_n)?;
                writeln!(f, "String Density : {}", p.linear_density)?;
                writeln!(f, "Duration : {}", self.duration_s)?;
                writeln!(f, "Strength : {}", self.strength)?;
                writeln!(f, "Harmonics : {}", self.harmonic_count)?;
                writeln!(f)?;
                writeln!(
                    f,
                    "String Length: {}        = (2*{}/{})",
                    p.length_term(),
                    p.length_m,
                    p.harmonic_number
                )?;
                writeln!(
                    f,
                    "Base Frequency: {}        = sqrt({}/{})",
                    p.wave_speed(),
                    p.tension_n,
                    p.linear_density
                )?;
                write!(
                    f,
                    "Frequency: {}        = {}*{}",
                    self.frequency_hz,
                    p.length_term(),
                    p.wave_speed()
                )
            }
            FrequencyModel::Tone { .. } => {
                writeln!(f, "Duration : {}", self.duration_s)?;
                writeln!(f, "Strength : {}", self.strength)?;
                writeln!(f, "Harmonics : {}", self.harmonic_count)?;
                writeln!(f)?;
                write!(f, "Frequency: {}", self.frequency_hz)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{PlayerEvent, RecordingPlayer};
    use crate::voice::StringPhysics;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn settings(harmonics: Vec<f64>) -> VoiceSettings {
        VoiceSettings {
            sample_rate_hz: 8000,
            duration_s: 0.5,
            strength: 0.5,
            model: FrequencyModel::default(),
            harmonics: Some(harmonics),
        }
    }

    fn voice(harmonics: Vec<f64>) -> StringVoice<RecordingPlayer> {
        let mut rng = StdRng::seed_from_u64(1);
        StringVoice::new(settings(harmonics), &mut rng, RecordingPlayer::default()).unwrap()
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_default_voice_frequency() {
        let mut rng = StdRng::seed_from_u64(9);
        let voice =
            StringVoice::new(VoiceSettings::default(), &mut rng, RecordingPlayer::default())
                .unwrap();
        assert!((voice.frequency_hz() - 164.55).abs() < 0.05);
        assert_eq!(voice.harmonics().len() % 2, 0);
    }

    #[test]
    fn test_construction_fails_fast() {
        let mut rng = StdRng::seed_from_u64(1);

        let mut bad = settings(vec![0.2]);
        bad.model = FrequencyModel::String(StringPhysics {
            linear_density: 0.0,
            ..Default::default()
        });
        assert!(matches!(
            StringVoice::new(bad, &mut rng, RecordingPlayer::default()),
            Err(VoiceError::NonPositiveDensity(_))
        ));

        assert!(matches!(
            StringVoice::new(settings(vec![]), &mut rng, RecordingPlayer::default()),
            Err(VoiceError::NoHarmonics)
        ));

        let mut no_frames = settings(vec![0.2]);
        no_frames.duration_s = 0.0;
        assert!(matches!(
            StringVoice::new(no_frames, &mut rng, RecordingPlayer::default()),
            Err(VoiceError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_make_sound_is_deterministic() {
        let mut voice = voice(vec![0.2, 0.4, 0.1]);
        let a = voice.make_sound().unwrap().clone();
        let b = voice.make_sound().unwrap().clone();
        assert_eq!(a, b);
        assert_eq!(a.frame_count(), 4000);
    }

    #[test]
    fn test_play_stops_previous_sound() {
        let mut voice = voice(vec![0.2, 0.4, 0.1]);
        let now = Instant::now();

        voice.play(now).unwrap();
        voice.play(now + Duration::from_millis(50)).unwrap();

        assert_eq!(
            voice.player().events,
            vec![
                PlayerEvent::Play(4000),
                PlayerEvent::Stop,
                PlayerEvent::Play(4000)
            ]
        );
        assert_eq!(voice.playback_start(), Some(now + Duration::from_millis(50)));
    }

    #[test]
    fn test_play_resets_watermark() {
        let mut voice = voice(vec![0.2, 0.4, 0.1]);
        let start = Instant::now();
        voice.play(start).unwrap();

        voice.draw_moving_wave(viewport(), start + Duration::from_millis(100));
        assert!(voice.renderer().watermark() > 0);

        let restart = start + Duration::from_millis(200);
        voice.play(restart).unwrap();
        assert_eq!(voice.renderer().watermark(), 0);
    }

    #[test]
    fn test_stop_keeps_start_time() {
        let mut voice = voice(vec![0.3]);
        let start = Instant::now();
        voice.play(start).unwrap();
        voice.stop();
        assert_eq!(voice.playback_start(), Some(start));
        assert_eq!(voice.player().events.last(), Some(&PlayerEvent::Stop));

        voice.clear_playback_start();
        assert!(voice
            .draw_moving_wave(viewport(), start + Duration::from_millis(10))
            .is_empty());
    }

    #[test]
    fn test_nothing_drawn_before_first_sound() {
        let mut voice = voice(vec![0.3]);
        assert!(voice.draw_full_wave(viewport()).is_empty());
        assert!(voice
            .draw_moving_wave(viewport(), Instant::now())
            .is_empty());
    }

    #[test]
    fn test_play_then_draw_immediately() {
        let mut voice = voice(vec![0.2, 0.4, 0.1]);
        let start = Instant::now();
        voice.play(start).unwrap();

        let geometry = voice.draw_moving_wave(viewport(), start);
        assert!(geometry.is_empty());
        assert!(!voice.draw_full_wave(viewport()).is_empty());
    }

    #[test]
    fn test_watermark_freezes_after_clip_end() {
        let mut voice = voice(vec![0.2, 0.4, 0.1]);
        let start = Instant::now();
        voice.play(start).unwrap();

        let mut last = 0;
        for ms in (50..=500).step_by(50) {
            voice.draw_moving_wave(viewport(), start + Duration::from_millis(ms));
            assert!(voice.renderer().watermark() >= last);
            last = voice.renderer().watermark();
        }
        assert_eq!(last, 4000);

        for ms in [600, 1000, 5000] {
            let geometry = voice.draw_moving_wave(viewport(), start + Duration::from_millis(ms));
            assert!(geometry.is_empty());
            assert_eq!(voice.renderer().watermark(), 4000);
        }
    }

    #[test]
    fn test_moving_wave_uses_clip_duration() {
        let mut voice = voice(vec![0.2, 0.4, 0.1]);
        let start = Instant::now();
        voice.play(start).unwrap();

        // editing after playback must not change the running session
        voice
            .apply_edit(VoiceParam::Duration, EditOp::Scale(4.0))
            .unwrap();
        let geometry = voice.draw_moving_wave(viewport(), start + Duration::from_secs(1));
        assert_eq!(geometry.len(), 4000);
    }

    #[test]
    fn test_apply_edit_updates_frequency() {
        let mut voice = voice(vec![0.3]);
        let before = voice.frequency_hz();

        let length = voice
            .apply_edit(VoiceParam::Length, EditOp::Scale(2.0))
            .unwrap();
        assert_eq!(length, 20.0);
        assert!((voice.frequency_hz() - 2.0 * before).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_edit_is_rejected() {
        let mut voice = voice(vec![0.3]);
        let before = voice.stats();

        assert_eq!(
            voice.apply_edit(VoiceParam::HarmonicNumber, EditOp::Add(-1.0)),
            Err(VoiceError::ZeroHarmonicNumber)
        );
        assert!(matches!(
            voice.apply_edit(VoiceParam::LinearDensity, EditOp::Add(-10.0)),
            Err(VoiceError::NonPositiveDensity(_))
        ));
        assert!(matches!(
            voice.apply_edit(VoiceParam::Duration, EditOp::Scale(-1.0)),
            Err(VoiceError::InvalidDuration(_))
        ));
        assert_eq!(voice.stats(), before);
    }

    #[test]
    fn test_huge_duration_edit_is_rejected() {
        let mut voice = voice(vec![0.3]);
        voice.make_sound().unwrap();

        assert!(matches!(
            voice.apply_edit(VoiceParam::Duration, EditOp::Scale(1e20)),
            Err(VoiceError::InvalidDuration(_))
        ));
        assert_eq!(voice.duration_s(), 0.5);
        assert_eq!(voice.buffer().unwrap().frame_count(), 4000);
    }

    #[test]
    fn test_huge_duration_fails_construction() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut huge = settings(vec![0.3]);
        huge.duration_s = 1e20;
        assert!(matches!(
            StringVoice::new(huge, &mut rng, RecordingPlayer::default()),
            Err(VoiceError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_param_reads_each_field() {
        let voice = voice(vec![0.3]);
        assert_eq!(voice.param(VoiceParam::Length), Ok(10.0));
        assert_eq!(voice.param(VoiceParam::HarmonicNumber), Ok(1.0));
        assert_eq!(voice.param(VoiceParam::Tension), Ok(345.23));
        assert_eq!(voice.param(VoiceParam::LinearDensity), Ok(5.1));
        assert_eq!(voice.param(VoiceParam::Strength), Ok(0.5));
        assert_eq!(voice.param(VoiceParam::Duration), Ok(0.5));
    }

    #[test]
    fn test_preview_follows_edits() {
        let mut voice = voice(vec![0.2, 0.4, 0.1]);

        // nothing synthesized yet, edits do not create a clip
        voice
            .apply_edit(VoiceParam::Tension, EditOp::Scale(1.1))
            .unwrap();
        assert!(voice.buffer().is_none());

        let start = Instant::now();
        voice.play(start).unwrap();
        let played = voice.buffer().unwrap().clone();

        voice
            .apply_edit(VoiceParam::Duration, EditOp::Scale(2.0))
            .unwrap();
        assert_eq!(voice.buffer().unwrap().frame_count(), 8000);

        voice
            .apply_edit(VoiceParam::Length, EditOp::Scale(0.5))
            .unwrap();
        assert_ne!(voice.buffer().unwrap(), &played);
        assert!(!voice.draw_full_wave(viewport()).is_empty());

        // the running session still draws the clip that is playing
        let geometry = voice.draw_moving_wave(viewport(), start + Duration::from_secs(1));
        assert_eq!(geometry.len(), 4000);
    }

    #[test]
    fn test_tone_voice_rejects_string_edits() {
        let mut rng = StdRng::seed_from_u64(1);
        let settings = VoiceSettings {
            model: FrequencyModel::Tone { frequency_hz: 440.0 },
            ..settings(vec![1.0])
        };
        let mut voice = StringVoice::new(settings, &mut rng, RecordingPlayer::default()).unwrap();

        assert_eq!(voice.frequency_hz(), 440.0);
        assert_eq!(
            voice.apply_edit(VoiceParam::Tension, EditOp::Scale(2.0)),
            Err(VoiceError::NotAStringModel("tension"))
        );
        assert!(voice
            .apply_edit(VoiceParam::Duration, EditOp::Add(0.5))
            .is_ok());
        assert_eq!(voice.duration_s(), 1.0);
    }

    #[test]
    fn test_regenerate_harmonics() {
        let mut voice = voice(vec![0.3]);
        voice
            .regenerate_harmonics(&mut StdRng::seed_from_u64(5))
            .unwrap();
        assert!(voice.harmonics().len() >= 2);
        assert_eq!(voice.harmonics().len() % 2, 0);
    }

    #[test]
    fn test_stats_display() {
        let voice = voice(vec![0.3]);
        let text = voice.stats().to_string();
        assert!(text.contains("Length : 10"));
        assert!(text.contains("String Length: 20        = (2*10/1)"));
        assert!(text.contains("Frequency: "));
    }
}
