//! Settings data model.
//!
//! Two records with the same field set: [`UserSettings`] is the committed,
//! durable record; [`PendingSettings`] is the staging record UI code mutates,
//! with every field optional so "not queued" needs no sentinel value.

use serde::{Deserialize, Serialize};

/// Lower bound of the gamma range brightness is clamped into at apply time.
pub const GAMMA_MIN: f32 = 0.5;

/// Upper bound of the gamma range.
pub const GAMMA_MAX: f32 = 3.0;

/// Screen resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a new resolution.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 720p HD resolution.
    pub const HD: Self = Self::new(1280, 720);
    /// 1080p Full HD resolution.
    pub const FULL_HD: Self = Self::new(1920, 1080);
    /// 1440p QHD resolution.
    pub const QHD: Self = Self::new(2560, 1440);
    /// 4K UHD resolution.
    pub const UHD: Self = Self::new(3840, 2160);

    /// Common desktop resolutions, smallest first.
    #[must_use]
    pub fn common() -> Vec<Self> {
        vec![
            Self::new(1280, 720),
            Self::new(1366, 768),
            Self::new(1600, 900),
            Self::new(1920, 1080),
            Self::new(2560, 1440),
            Self::new(3840, 2160),
        ]
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::FULL_HD
    }
}

impl std::fmt::Display for Resolution {
    // The formatted label doubles as the lookup key when resolving the live
    // resolution back to an index, so the format must stay stable.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Window mode setting.
///
/// One canonical index mapping (`0 = Fullscreen, 1 = Borderless,
/// 2 = Windowed`) is used everywhere: queued values, queries, and the
/// persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Exclusive fullscreen.
    Fullscreen,
    /// Borderless fullscreen at the desktop resolution.
    #[default]
    Borderless,
    /// Windowed mode.
    Windowed,
}

impl WindowMode {
    /// All modes, in index order.
    pub const ALL: [Self; 3] = [Self::Fullscreen, Self::Borderless, Self::Windowed];

    /// Maps a queued index to a mode. Out-of-range indices map to `None`.
    #[must_use]
    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Fullscreen),
            1 => Some(Self::Borderless),
            2 => Some(Self::Windowed),
            _ => None,
        }
    }

    /// Returns the index of this mode.
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Fullscreen => 0,
            Self::Borderless => 1,
            Self::Windowed => 2,
        }
    }

    /// Returns display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Fullscreen => "Fullscreen",
            Self::Borderless => "Borderless",
            Self::Windowed => "Windowed",
        }
    }

    /// Check if fullscreen.
    #[must_use]
    pub const fn is_fullscreen(self) -> bool {
        matches!(self, Self::Fullscreen | Self::Borderless)
    }
}

/// Volume channel addressed by queue and sound-apply operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeChannel {
    /// Master volume.
    Master,
    /// Sound effects volume.
    Sfx,
    /// Dialogue volume.
    Dialogue,
}

impl VolumeChannel {
    /// All channels.
    pub const ALL: [Self; 3] = [Self::Master, Self::Sfx, Self::Dialogue];

    /// Returns display name, matching the sound-class naming convention.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Sfx => "SFX",
            Self::Dialogue => "Dialogue",
        }
    }
}

/// Committed user settings, durable across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Overall rendering quality tier.
    pub graphics_quality: u32,
    /// Brightness, applied as a gamma parameter.
    pub brightness: f32,
    /// Master volume (0.0 to 1.0).
    pub master_volume: f32,
    /// Sound effects volume (0.0 to 1.0).
    pub sfx_volume: f32,
    /// Dialogue volume (0.0 to 1.0).
    pub dialogue_volume: f32,
    /// Window mode.
    pub window_mode: WindowMode,
    /// Index into the session's supported-resolution list.
    pub resolution_index: usize,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            graphics_quality: 2,
            brightness: 2.0,
            master_volume: 0.5,
            sfx_volume: 0.5,
            dialogue_volume: 0.5,
            window_mode: WindowMode::Borderless,
            resolution_index: 0,
        }
    }
}

impl UserSettings {
    /// Returns the volume for a channel.
    #[must_use]
    pub const fn volume(&self, channel: VolumeChannel) -> f32 {
        match channel {
            VolumeChannel::Master => self.master_volume,
            VolumeChannel::Sfx => self.sfx_volume,
            VolumeChannel::Dialogue => self.dialogue_volume,
        }
    }

    /// Sets the volume for a channel.
    pub fn set_volume(&mut self, channel: VolumeChannel, volume: f32) {
        match channel {
            VolumeChannel::Master => self.master_volume = volume,
            VolumeChannel::Sfx => self.sfx_volume = volume,
            VolumeChannel::Dialogue => self.dialogue_volume = volume,
        }
    }
}

/// Staged, not-yet-committed preference values.
///
/// Every field is optional; `None` means the UI has not queued a change for
/// that field this session. Queue operations accept values without
/// validation, so a queued value may still be out of range until the apply
/// step reconciles it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PendingSettings {
    /// Queued quality tier.
    pub graphics_quality: Option<u32>,
    /// Queued brightness.
    pub brightness: Option<f32>,
    /// Queued master volume.
    pub master_volume: Option<f32>,
    /// Queued sound effects volume.
    pub sfx_volume: Option<f32>,
    /// Queued dialogue volume.
    pub dialogue_volume: Option<f32>,
    /// Queued window-mode index.
    pub window_mode: Option<u32>,
    /// Queued resolution index.
    pub resolution_index: Option<usize>,
}

impl PendingSettings {
    /// Returns true if no field has been queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.graphics_quality.is_none()
            && self.brightness.is_none()
            && self.master_volume.is_none()
            && self.sfx_volume.is_none()
            && self.dialogue_volume.is_none()
            && self.window_mode.is_none()
            && self.resolution_index.is_none()
    }

    /// Resets all fields back to "not queued".
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns the queued volume for a channel, if any.
    #[must_use]
    pub const fn volume(&self, channel: VolumeChannel) -> Option<f32> {
        match channel {
            VolumeChannel::Master => self.master_volume,
            VolumeChannel::Sfx => self.sfx_volume,
            VolumeChannel::Dialogue => self.dialogue_volume,
        }
    }

    /// Sets the queued volume for a channel.
    pub fn set_volume(&mut self, channel: VolumeChannel, volume: f32) {
        match channel {
            VolumeChannel::Master => self.master_volume = Some(volume),
            VolumeChannel::Sfx => self.sfx_volume = Some(volume),
            VolumeChannel::Dialogue => self.dialogue_volume = Some(volume),
        }
    }
}

impl From<&UserSettings> for PendingSettings {
    /// Derives a fully-populated pending view of a committed record.
    fn from(settings: &UserSettings) -> Self {
        Self {
            graphics_quality: Some(settings.graphics_quality),
            brightness: Some(settings.brightness),
            master_volume: Some(settings.master_volume),
            sfx_volume: Some(settings.sfx_volume),
            dialogue_volume: Some(settings.dialogue_volume),
            window_mode: Some(settings.window_mode.index()),
            resolution_index: Some(settings.resolution_index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_label() {
        let res = Resolution::new(1920, 1080);
        assert_eq!(res.to_string(), "1920 x 1080");
        assert_eq!(Resolution::FULL_HD, res);
    }

    #[test]
    fn test_window_mode_index_roundtrip() {
        for mode in WindowMode::ALL {
            assert_eq!(WindowMode::from_index(mode.index()), Some(mode));
        }
        assert_eq!(WindowMode::from_index(3), None);
    }

    #[test]
    fn test_window_mode_fullscreen() {
        assert!(WindowMode::Fullscreen.is_fullscreen());
        assert!(WindowMode::Borderless.is_fullscreen());
        assert!(!WindowMode::Windowed.is_fullscreen());
    }

    #[test]
    fn test_user_settings_defaults() {
        let settings = UserSettings::default();
        assert_eq!(settings.graphics_quality, 2);
        assert!((settings.brightness - 2.0).abs() < f32::EPSILON);
        assert!((settings.master_volume - 0.5).abs() < f32::EPSILON);
        assert_eq!(settings.window_mode, WindowMode::Borderless);
        assert_eq!(settings.resolution_index, 0);
    }

    #[test]
    fn test_user_settings_volume_accessors() {
        let mut settings = UserSettings::default();
        settings.set_volume(VolumeChannel::Sfx, 0.9);
        assert!((settings.volume(VolumeChannel::Sfx) - 0.9).abs() < f32::EPSILON);
        // Other channels untouched
        assert!((settings.volume(VolumeChannel::Master) - 0.5).abs() < f32::EPSILON);
        assert!((settings.volume(VolumeChannel::Dialogue) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pending_settings_empty_and_clear() {
        let mut pending = PendingSettings::default();
        assert!(pending.is_empty());

        pending.brightness = Some(1.5);
        assert!(!pending.is_empty());

        pending.clear();
        assert!(pending.is_empty());
    }

    #[test]
    fn test_pending_view_of_committed_record() {
        let settings = UserSettings::default();
        let pending = PendingSettings::from(&settings);
        assert!(!pending.is_empty());
        assert_eq!(pending.graphics_quality, Some(2));
        assert_eq!(pending.window_mode, Some(1));
        assert_eq!(pending.volume(VolumeChannel::Dialogue), Some(0.5));
    }
}
