//! The audio output seam used by voices.

use crate::error::AudioError;
use crate::voice::PcmBuffer;

/// Sound output that plays one clip at a time.
///
/// `play` hands over a clip and returns immediately; `stop` is also
/// non-blocking. `has_sound` reports whether a clip has ever been loaded,
/// whether or not it is still audible.
pub trait AudioPlayer {
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), AudioError>;

    fn stop(&mut self);

    fn has_sound(&self) -> bool;
}

impl<P: AudioPlayer + ?Sized> AudioPlayer for Box<P> {
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), AudioError> {
        (**self).play(buffer)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn has_sound(&self) -> bool {
        (**self).has_sound()
    }
}

/// Player that accepts clips and discards them (`--mute`)
#[derive(Debug, Default)]
pub struct SilentPlayer {
    loaded: bool,
}

impl AudioPlayer for SilentPlayer {
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), AudioError> {
        log::debug!("muted: dropping {} frames", buffer.frame_count());
        self.loaded = true;
        Ok(())
    }

    fn stop(&mut self) {}

    fn has_sound(&self) -> bool {
        self.loaded
    }
}
