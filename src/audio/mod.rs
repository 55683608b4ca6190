//! Audio output for synthesized clips.
//!
//! Voices talk to an [`AudioPlayer`]; the application plugs in a cpal-backed
//! player, or a silent one when muted.

mod player;
mod system;

pub use player::{AudioPlayer, SilentPlayer};
pub use system::CpalPlayer;

#[cfg(test)]
pub(crate) use player::testing;
