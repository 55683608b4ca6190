//! Keyboard control surface: held-key snapshot, cooldown and the key table.

use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::params::InputConfig;
use crate::voice::{EditOp, VoiceParam};

/// Keys currently held down
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: HashSet<KeyCode>,
}

impl HeldKeys {
    pub fn press(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    /// Forget everything (e.g. when the window loses focus)
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }
}

/// Throttle for repeated triggers while a key stays down
#[derive(Debug, Clone, Copy)]
pub struct Cooldown {
    /// Time left before the next trigger (seconds)
    remaining_s: f32,

    /// Value set after each trigger (seconds)
    default_s: f32,
}

impl Cooldown {
    pub fn new(default_s: f32) -> Self {
        Self {
            remaining_s: 0.0,
            default_s,
        }
    }

    /// Advance by one frame. Overshoot below zero is cleared on the next tick.
    pub fn tick(&mut self, delta_s: f32) {
        if self.remaining_s > 0.0 {
            self.remaining_s -= delta_s;
        } else if self.remaining_s < 0.0 {
            self.remaining_s = 0.0;
        }
    }

    pub fn ready(&self) -> bool {
        self.remaining_s == 0.0
    }

    pub fn arm(&mut self) {
        self.remaining_s = self.default_s;
    }
}

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Edit(VoiceParam, EditOp),
    Play,
    CycleDrawMode,
    /// Draw a new random harmonic series
    Reroll,
}

/// Flat key -> action table, checked in order
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(KeyCode, Action)>,
}

impl KeyBindings {
    pub fn new(config: &InputConfig) -> Self {
        use Action::*;
        use EditOp::*;
        use VoiceParam::*;

        let up = config.scale_step;
        let down = 1.0 / config.scale_step;

        Self {
            bindings: vec![
                (KeyCode::KeyP, Play),
                (KeyCode::KeyM, CycleDrawMode),
                (KeyCode::KeyR, Reroll),
                (KeyCode::ArrowUp, Edit(Length, Scale(up))),
                (KeyCode::ArrowDown, Edit(Length, Scale(down))),
                (KeyCode::ArrowRight, Edit(HarmonicNumber, Add(config.harmonic_step))),
                (KeyCode::ArrowLeft, Edit(HarmonicNumber, Add(-config.harmonic_step))),
                (KeyCode::KeyW, Edit(Tension, Scale(up))),
                (KeyCode::KeyS, Edit(Tension, Scale(down))),
                (KeyCode::KeyE, Edit(LinearDensity, Scale(up))),
                (KeyCode::KeyD, Edit(LinearDensity, Scale(down))),
                (KeyCode::KeyQ, Edit(Strength, Add(config.strength_step))),
                (KeyCode::KeyA, Edit(Strength, Add(-config.strength_step))),
                (KeyCode::KeyT, Edit(Duration, Scale(up))),
                (KeyCode::KeyG, Edit(Duration, Scale(down))),
            ],
        }
    }

    /// First bound action whose key is held
    pub fn lookup(&self, held: &HeldKeys) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(key, _)| held.is_held(*key))
            .map(|&(_, action)| action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(KeyCode, Action)> {
        self.bindings.iter()
    }
}

/// Per-frame input dispatch
#[derive(Debug, Clone)]
pub struct Controls {
    bindings: KeyBindings,
    cooldown: Cooldown,
}

impl Controls {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            bindings: KeyBindings::new(config),
            cooldown: Cooldown::new(config.cooldown_s),
        }
    }

    /// Advance the cooldown by `delta_s` and return at most one action.
    pub fn update(&mut self, held: &HeldKeys, delta_s: f32) -> Option<Action> {
        self.cooldown.tick(delta_s);
        if !self.cooldown.ready() {
            return None;
        }

        let action = self.bindings.lookup(held)?;
        self.cooldown.arm();
        Some(action)
    }
}
