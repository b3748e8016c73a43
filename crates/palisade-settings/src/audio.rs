//! Audio mixer seam.
//!
//! Sound settings are applied live through a mix/class-volume override, the
//! way the host's audio layer exposes it. The coordinator only knows mix and
//! class names; whether they exist is the mixer's call.

use std::collections::{HashMap, HashSet};

/// Live audio mix state the settings coordinator commits into.
pub trait AudioMixer {
    /// Applies a class-volume override within a mix.
    ///
    /// Returns false when the mix or class is unknown; the caller must treat
    /// that as "nothing happened".
    fn set_class_volume(&mut self, mix: &str, class: &str, volume: f32, pitch: f32) -> bool;

    /// Re-activates a mix so its overrides take effect.
    fn push_mix_modifier(&mut self, mix: &str);
}

/// In-memory mixer for tests and headless hosts.
///
/// Mixes and their classes must be registered before overrides against them
/// succeed, mirroring how a real host loads mix assets up front.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMixer {
    classes: HashMap<String, HashSet<String>>,
    overrides: HashMap<(String, String), (f32, f32)>,
    pushed: Vec<String>,
}

impl HeadlessMixer {
    /// Creates an empty mixer with no registered mixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mix and the sound classes it contains.
    pub fn register_mix<'a>(&mut self, mix: &str, classes: impl IntoIterator<Item = &'a str>) {
        self.classes
            .entry(mix.to_string())
            .or_default()
            .extend(classes.into_iter().map(str::to_string));
    }

    /// Returns the current override for a class, if one was applied.
    #[must_use]
    pub fn class_volume(&self, mix: &str, class: &str) -> Option<f32> {
        self.overrides
            .get(&(mix.to_string(), class.to_string()))
            .map(|&(volume, _)| volume)
    }

    /// Returns the mixes pushed so far, in order.
    #[must_use]
    pub fn pushed_mixes(&self) -> &[String] {
        &self.pushed
    }
}

impl AudioMixer for HeadlessMixer {
    fn set_class_volume(&mut self, mix: &str, class: &str, volume: f32, pitch: f32) -> bool {
        let known = self
            .classes
            .get(mix)
            .is_some_and(|classes| classes.contains(class));
        if !known {
            return false;
        }
        self.overrides
            .insert((mix.to_string(), class.to_string()), (volume, pitch));
        true
    }

    fn push_mix_modifier(&mut self, mix: &str) {
        self.pushed.push(mix.to_string());
    }
}
