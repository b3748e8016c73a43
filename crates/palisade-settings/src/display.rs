//! Display driver seam.
//!
//! The coordinator never talks to a windowing backend directly; it drives
//! this trait. The real host adapts its renderer/window layer behind it, and
//! tests use [`HeadlessDisplay`].

use crate::data::{Resolution, WindowMode};

/// Live display state the settings coordinator commits into.
pub trait DisplayDriver {
    /// Returns the display's supported modes, in the backend's order.
    /// May contain duplicates; the coordinator dedups when caching.
    fn supported_resolutions(&self) -> Vec<Resolution>;

    /// Returns the resolution currently in effect.
    fn current_resolution(&self) -> Resolution;

    /// Returns the window mode currently in effect.
    fn current_window_mode(&self) -> WindowMode;

    /// Sets the overall rendering quality tier.
    fn set_quality_tier(&mut self, tier: u32);

    /// Sets the renderer gamma parameter.
    fn set_gamma(&mut self, gamma: f32);

    /// Sets the screen resolution.
    fn set_resolution(&mut self, resolution: Resolution);

    /// Sets the window mode.
    fn set_window_mode(&mut self, mode: WindowMode);

    /// Commits pending resolution changes without toggling fullscreen state.
    fn confirm_resolution_changes(&mut self);
}

/// In-memory display driver for tests and headless hosts.
#[derive(Debug, Clone)]
pub struct HeadlessDisplay {
    modes: Vec<Resolution>,
    resolution: Resolution,
    window_mode: WindowMode,
    quality_tier: u32,
    gamma: f32,
    confirm_count: u32,
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new(Resolution::common())
    }
}

impl HeadlessDisplay {
    /// Creates a headless display advertising the given modes.
    ///
    /// The initial resolution is the first advertised mode, falling back to
    /// 1080p when the list is empty.
    #[must_use]
    pub fn new(modes: Vec<Resolution>) -> Self {
        let resolution = modes.first().copied().unwrap_or_default();
        Self {
            modes,
            resolution,
            window_mode: WindowMode::Borderless,
            quality_tier: 2,
            gamma: 2.0,
            confirm_count: 0,
        }
    }

    /// Overrides the current resolution, as if the desktop changed.
    #[must_use]
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Overrides the current window mode.
    #[must_use]
    pub fn with_window_mode(mut self, mode: WindowMode) -> Self {
        self.window_mode = mode;
        self
    }

    /// Returns the last committed quality tier.
    #[must_use]
    pub const fn quality_tier(&self) -> u32 {
        self.quality_tier
    }

    /// Returns the last committed gamma.
    #[must_use]
    pub const fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Returns how many times resolution changes were confirmed.
    #[must_use]
    pub const fn confirm_count(&self) -> u32 {
        self.confirm_count
    }
}

impl DisplayDriver for HeadlessDisplay {
    fn supported_resolutions(&self) -> Vec<Resolution> {
        self.modes.clone()
    }

    fn current_resolution(&self) -> Resolution {
        self.resolution
    }

    fn current_window_mode(&self) -> WindowMode {
        self.window_mode
    }

    fn set_quality_tier(&mut self, tier: u32) {
        self.quality_tier = tier;
    }

    fn set_gamma(&mut self, gamma: f32) {
        self.gamma = gamma;
    }

    fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    fn set_window_mode(&mut self, mode: WindowMode) {
        self.window_mode = mode;
    }

    fn confirm_resolution_changes(&mut self) {
        self.confirm_count += 1;
    }
}
