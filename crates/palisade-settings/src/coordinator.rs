//! Settings coordinator.
//!
//! Owns the staging record, the committed record, and the session's
//! resolution cache. UI code queues changes one field at a time; the apply
//! step commits queued fields to the live drivers in a fixed order, persists
//! the committed record, and clears the staging record. A separate path
//! applies one volume-channel override without going through the full apply.

use crate::audio::AudioMixer;
use crate::data::{
    PendingSettings, Resolution, UserSettings, VolumeChannel, WindowMode, GAMMA_MAX, GAMMA_MIN,
};
use crate::display::DisplayDriver;
use crate::events::SettingsEvent;
use palisade_common::events::EventBus;
use palisade_common::slot::{load_from_slot, save_to_slot, SlotKey, SlotStorage};
use tracing::{debug, info, warn};

/// Slot the committed settings record persists under.
pub const SETTINGS_SLOT: SlotKey = SlotKey::new("user_settings", 0);

/// Pitch used for class-volume overrides.
pub const DEFAULT_MIX_PITCH: f32 = 1.0;

/// Coordinator for user preferences with queue-then-apply semantics.
pub struct SettingsCoordinator<S, D, A> {
    /// Staged, not-yet-committed values.
    pending: PendingSettings,
    /// Last committed record.
    saved: UserSettings,
    /// Built-in defaults.
    defaults: UserSettings,
    /// Supported resolutions, built once per session from the driver.
    resolution_cache: Option<Vec<Resolution>>,
    storage: S,
    display: D,
    mixer: A,
    bus: EventBus<SettingsEvent>,
}

impl<S, D, A> SettingsCoordinator<S, D, A>
where
    S: SlotStorage,
    D: DisplayDriver,
    A: AudioMixer,
{
    /// Creates a coordinator over the given storage and drivers.
    ///
    /// Call [`initialize`](Self::initialize) before use to load any
    /// persisted settings.
    #[must_use]
    pub fn new(storage: S, display: D, mixer: A) -> Self {
        Self {
            pending: PendingSettings::default(),
            saved: UserSettings::default(),
            defaults: UserSettings::default(),
            resolution_cache: None,
            storage,
            display,
            mixer,
            bus: EventBus::default(),
        }
    }

    /// Loads the persisted record if a save exists, else adopts defaults.
    ///
    /// Broadcasts [`SettingsEvent::Initialized`] either way. When a save
    /// existed, its values are immediately re-applied to the live drivers so
    /// a restart restores the user's committed preferences.
    pub fn initialize(&mut self) {
        if self.storage.slot_exists(SETTINGS_SLOT) {
            match load_from_slot::<UserSettings>(&self.storage, SETTINGS_SLOT) {
                Ok(Some(saved)) => {
                    info!("user settings loaded");
                    self.saved = saved;
                    self.pending = PendingSettings::from(&self.saved);
                    self.bus
                        .publish(SettingsEvent::Initialized(self.pending.clone()));
                    self.apply_settings();
                    return;
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "failed to load user settings, using defaults"),
            }
        }

        self.saved = self.defaults.clone();
        self.bus
            .publish(SettingsEvent::Initialized(PendingSettings::from(
                &self.defaults,
            )));
    }

    // === Queue operations ===
    //
    // Each sets exactly one staged field to the caller-supplied value.
    // No validation happens here; apply reconciles out-of-range values.

    /// Queues an overall rendering quality tier.
    pub fn queue_graphics_quality(&mut self, tier: u32) {
        self.pending.graphics_quality = Some(tier);
        self.bus.publish(SettingsEvent::Queued);
    }

    /// Queues a brightness value.
    pub fn queue_brightness(&mut self, value: f32) {
        self.pending.brightness = Some(value);
        self.bus.publish(SettingsEvent::Queued);
    }

    /// Queues a volume value for one channel.
    pub fn queue_volume(&mut self, value: f32, channel: VolumeChannel) {
        self.pending.set_volume(channel, value);
        self.bus.publish(SettingsEvent::Queued);
    }

    /// Queues a resolution by index into the available-resolution list.
    pub fn queue_resolution(&mut self, index: usize) {
        self.pending.resolution_index = Some(index);
        self.bus.publish(SettingsEvent::Queued);
    }

    /// Queues a window mode by index.
    pub fn queue_window_mode(&mut self, index: u32) {
        self.pending.window_mode = Some(index);
        self.bus.publish(SettingsEvent::Queued);
    }

    /// Commits every queued field to the live drivers and the persisted
    /// record, in the order quality, brightness, resolution, window mode.
    ///
    /// Queued volumes are not consumed here; they only reach the mixer
    /// through [`apply_sound_settings`](Self::apply_sound_settings). After
    /// committing, the full record is persisted,
    /// [`SettingsEvent::Applied`] is broadcast, and the staging record is
    /// cleared.
    pub fn apply_settings(&mut self) {
        let cache = self.resolution_cache().to_vec();

        if let Some(tier) = self.pending.graphics_quality {
            self.saved.graphics_quality = tier;
            self.display.set_quality_tier(tier);
        }

        if let Some(brightness) = self.pending.brightness {
            let gamma = brightness.clamp(GAMMA_MIN, GAMMA_MAX);
            self.saved.brightness = gamma;
            self.display.set_gamma(gamma);
        }

        if let Some(index) = self.pending.resolution_index {
            if let Some(&resolution) = cache.get(index) {
                self.saved.resolution_index = index;
                self.display.set_resolution(resolution);
                self.display.confirm_resolution_changes();
            } else {
                debug!(index, "queued resolution index out of range, skipped");
            }
        }

        if let Some(index) = self.pending.window_mode {
            if let Some(mode) = WindowMode::from_index(index) {
                self.display.set_window_mode(mode);
                self.saved.window_mode = mode;
                if mode == WindowMode::Borderless {
                    // Borderless stays pinned to the desktop resolution.
                    let current = self.display.current_resolution();
                    if let Some(position) = cache.iter().position(|&r| r == current) {
                        self.pending.resolution_index = Some(position);
                        self.saved.resolution_index = position;
                        self.display.set_resolution(current);
                        self.display.confirm_resolution_changes();
                    }
                }
            } else {
                debug!(index, "queued window mode index out of range, skipped");
            }
        }

        self.persist();
        info!("settings applied");
        self.bus.publish(SettingsEvent::Applied(self.saved.clone()));
        self.pending.clear();
    }

    /// Applies one channel's queued volume as a live mix override.
    ///
    /// No-op when that channel has no queued value. Otherwise the value is
    /// clamped into `[0.0, 1.0]`, applied as a class-volume override,
    /// committed and persisted, the mix modifier is re-pushed, and
    /// [`SettingsEvent::SoundApplied`] is broadcast. A missing mix or class
    /// aborts before any state changes.
    pub fn apply_sound_settings(&mut self, mix: &str, class: &str, channel: VolumeChannel) {
        let Some(queued) = self.pending.volume(channel) else {
            return;
        };
        let volume = queued.clamp(0.0, 1.0);

        if !self
            .mixer
            .set_class_volume(mix, class, volume, DEFAULT_MIX_PITCH)
        {
            warn!(mix, class, "unknown sound mix or class, volume not applied");
            return;
        }

        self.saved.set_volume(channel, volume);
        self.persist();
        self.mixer.push_mix_modifier(mix);
        self.bus.publish(SettingsEvent::SoundApplied(channel));
    }

    /// Discards all queued changes and broadcasts
    /// [`SettingsEvent::Reverted`].
    pub fn revert_pending_settings(&mut self) {
        self.pending.clear();
        self.bus
            .publish(SettingsEvent::Reverted(self.pending.clone()));
    }

    /// Loads built-in defaults into the staging record and applies them.
    ///
    /// The resolution index is re-derived from the live resolution first, so
    /// resetting does not force a jarring resolution change.
    pub fn reset_to_defaults(&mut self) {
        let mut pending = PendingSettings::from(&self.defaults);
        let current = self.display.current_resolution();
        pending.resolution_index = self.resolution_cache().iter().position(|&r| r == current);

        self.pending = pending;
        self.bus
            .publish(SettingsEvent::ResetToDefaults(self.pending.clone()));
        self.apply_settings();
    }

    // === Queries ===

    /// Returns the available resolutions as display labels.
    pub fn available_resolutions(&mut self) -> Vec<String> {
        self.resolution_cache()
            .iter()
            .map(Resolution::to_string)
            .collect()
    }

    /// Returns the live resolution's position in the available list, or
    /// `None` when the live resolution is not an advertised mode.
    pub fn current_resolution_index(&mut self) -> Option<usize> {
        let label = self.display.current_resolution().to_string();
        self.available_resolutions()
            .iter()
            .position(|entry| *entry == label)
    }

    /// Returns the index of the live window mode.
    #[must_use]
    pub fn current_window_mode(&self) -> u32 {
        self.display.current_window_mode().index()
    }

    /// Returns the built-in default settings.
    #[must_use]
    pub const fn default_settings(&self) -> &UserSettings {
        &self.defaults
    }

    /// Returns the current settings snapshot as a pending view.
    ///
    /// Prefers in-memory staged values when any field is queued, else the
    /// persisted record, else the built-in defaults.
    #[must_use]
    pub fn current_settings_data(&self) -> PendingSettings {
        if !self.pending.is_empty() {
            return self.pending.clone();
        }
        match load_from_slot::<UserSettings>(&self.storage, SETTINGS_SLOT) {
            Ok(Some(saved)) => PendingSettings::from(&saved),
            Ok(None) => PendingSettings::from(&self.defaults),
            Err(e) => {
                warn!(error = %e, "failed to read settings save, falling back to defaults");
                PendingSettings::from(&self.defaults)
            }
        }
    }

    /// Returns the staged record.
    #[must_use]
    pub const fn pending_settings(&self) -> &PendingSettings {
        &self.pending
    }

    /// Returns the last committed record.
    #[must_use]
    pub const fn saved_settings(&self) -> &UserSettings {
        &self.saved
    }

    /// Returns the coordinator's event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus<SettingsEvent> {
        &self.bus
    }

    /// Returns the display driver.
    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// Returns the audio mixer.
    #[must_use]
    pub const fn mixer(&self) -> &A {
        &self.mixer
    }

    /// Returns the slot storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the cached resolutions, building the cache on first use.
    fn resolution_cache(&mut self) -> &[Resolution] {
        if self.resolution_cache.is_none() {
            let mut cache: Vec<Resolution> = Vec::new();
            for resolution in self.display.supported_resolutions() {
                if !cache.contains(&resolution) {
                    cache.push(resolution);
                }
            }
            self.resolution_cache = Some(cache);
        }
        self.resolution_cache.as_deref().unwrap_or(&[])
    }

    /// Persists the committed record. Storage failures are logged and
    /// otherwise ignored; live state stays ahead of the save.
    fn persist(&mut self) {
        if let Err(e) = save_to_slot(&mut self.storage, SETTINGS_SLOT, &self.saved) {
            warn!(error = %e, "failed to persist user settings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::HeadlessMixer;
    use crate::display::HeadlessDisplay;
    use palisade_common::slot::MemorySlotStorage;
    use proptest::prelude::*;

    const MIX: &str = "GameMix";

    type TestCoordinator = SettingsCoordinator<MemorySlotStorage, HeadlessDisplay, HeadlessMixer>;

    fn coordinator() -> TestCoordinator {
        let mut mixer = HeadlessMixer::new();
        mixer.register_mix(MIX, ["Master", "SFX", "Dialogue"]);
        SettingsCoordinator::new(MemorySlotStorage::new(), HeadlessDisplay::default(), mixer)
    }

    #[test]
    fn test_queue_sets_exactly_one_field() {
        let mut coord = coordinator();
        coord.queue_brightness(1.5);

        let pending = coord.pending_settings();
        assert_eq!(pending.brightness, Some(1.5));
        assert!(pending.graphics_quality.is_none());
        assert!(pending.master_volume.is_none());
        assert!(pending.sfx_volume.is_none());
        assert!(pending.dialogue_volume.is_none());
        assert!(pending.resolution_index.is_none());
        assert!(pending.window_mode.is_none());
        assert_eq!(coord.events().drain(), vec![SettingsEvent::Queued]);
    }

    #[test]
    fn test_apply_consumes_queued_fields_and_clears() {
        let mut coord = coordinator();
        coord.queue_graphics_quality(3);
        coord.queue_resolution(2);
        coord.events().drain();

        coord.apply_settings();

        assert!(coord.pending_settings().is_empty());
        assert_eq!(coord.saved_settings().graphics_quality, 3);
        assert_eq!(coord.saved_settings().resolution_index, 2);
        assert_eq!(coord.display().quality_tier(), 3);
        assert_eq!(coord.display().current_resolution(), Resolution::new(1600, 900));
        // Untouched fields keep their committed values
        assert!((coord.saved_settings().master_volume - 0.5).abs() < f32::EPSILON);

        let events = coord.events().drain();
        assert_eq!(events, vec![SettingsEvent::Applied(coord.saved_settings().clone())]);
    }

    #[test]
    fn test_apply_clamps_brightness_into_gamma_range() {
        let mut coord = coordinator();
        coord.queue_brightness(9.0);
        coord.apply_settings();
        assert!((coord.display().gamma() - GAMMA_MAX).abs() < f32::EPSILON);
        assert!((coord.saved_settings().brightness - GAMMA_MAX).abs() < f32::EPSILON);

        coord.queue_brightness(0.1);
        coord.apply_settings();
        assert!((coord.display().gamma() - GAMMA_MIN).abs() < f32::EPSILON);
    }

    #[test]
    fn test_apply_skips_out_of_range_resolution_index() {
        let mut coord = coordinator();
        let before = coord.display().current_resolution();
        coord.queue_resolution(99);
        coord.apply_settings();

        assert_eq!(coord.display().current_resolution(), before);
        assert_eq!(coord.saved_settings().resolution_index, 0);
        assert!(coord.pending_settings().is_empty());
    }

    #[test]
    fn test_apply_skips_out_of_range_window_mode() {
        let mut coord = coordinator();
        coord.queue_window_mode(7);
        coord.apply_settings();
        assert_eq!(coord.saved_settings().window_mode, WindowMode::Borderless);
    }

    #[test]
    fn test_borderless_pins_resolution_to_desktop() {
        let display = HeadlessDisplay::default().with_resolution(Resolution::QHD);
        let mut coord = SettingsCoordinator::new(
            MemorySlotStorage::new(),
            display,
            HeadlessMixer::new(),
        );

        coord.queue_window_mode(1);
        coord.apply_settings();

        // QHD is the fifth entry of the common mode list
        assert_eq!(coord.saved_settings().resolution_index, 4);
        assert_eq!(coord.display().current_resolution(), Resolution::QHD);
        assert_eq!(coord.saved_settings().window_mode, WindowMode::Borderless);
    }

    #[test]
    fn test_fullscreen_does_not_repin_resolution() {
        let display = HeadlessDisplay::default().with_resolution(Resolution::QHD);
        let mut coord = SettingsCoordinator::new(
            MemorySlotStorage::new(),
            display,
            HeadlessMixer::new(),
        );

        coord.queue_window_mode(0);
        coord.apply_settings();

        assert_eq!(coord.saved_settings().window_mode, WindowMode::Fullscreen);
        assert_eq!(coord.saved_settings().resolution_index, 0);
    }

    #[test]
    fn test_sound_apply_is_noop_when_not_queued() {
        let mut coord = coordinator();
        coord.apply_sound_settings(MIX, "Master", VolumeChannel::Master);

        assert!(coord.mixer().class_volume(MIX, "Master").is_none());
        assert!(!coord.storage().slot_exists(SETTINGS_SLOT));
        assert!(coord.events().drain().is_empty());
    }

    #[test]
    fn test_sound_apply_clamps_and_persists() {
        let mut coord = coordinator();
        coord.queue_volume(1.5, VolumeChannel::Sfx);
        coord.events().drain();

        coord.apply_sound_settings(MIX, "SFX", VolumeChannel::Sfx);

        assert_eq!(coord.mixer().class_volume(MIX, "SFX"), Some(1.0));
        assert!((coord.saved_settings().sfx_volume - 1.0).abs() < f32::EPSILON);
        assert_eq!(coord.mixer().pushed_mixes(), [MIX]);
        assert_eq!(
            coord.events().drain(),
            vec![SettingsEvent::SoundApplied(VolumeChannel::Sfx)]
        );

        let persisted: Option<UserSettings> =
            load_from_slot(coord.storage(), SETTINGS_SLOT).expect("Load failed");
        let persisted = persisted.expect("Slot should exist");
        assert!((persisted.sfx_volume - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sound_apply_negative_queue_clamps_to_zero() {
        // A queued negative value is a real value, not "unset"; it clamps
        // to silence rather than being dropped.
        let mut coord = coordinator();
        coord.queue_volume(-0.2, VolumeChannel::Dialogue);
        coord.apply_sound_settings(MIX, "Dialogue", VolumeChannel::Dialogue);

        assert_eq!(coord.mixer().class_volume(MIX, "Dialogue"), Some(0.0));
        assert!((coord.saved_settings().dialogue_volume).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sound_apply_writes_only_its_channel() {
        let mut coord = coordinator();
        coord.queue_volume(0.8, VolumeChannel::Sfx);
        coord.queue_volume(0.3, VolumeChannel::Master);

        coord.apply_sound_settings(MIX, "SFX", VolumeChannel::Sfx);

        assert!((coord.saved_settings().sfx_volume - 0.8).abs() < f32::EPSILON);
        // Master stays at its committed value until its own apply
        assert!((coord.saved_settings().master_volume - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sound_apply_aborts_on_missing_mix() {
        let mut coord = coordinator();
        coord.queue_volume(0.8, VolumeChannel::Master);
        coord.events().drain();

        coord.apply_sound_settings("NoSuchMix", "Master", VolumeChannel::Master);

        assert!((coord.saved_settings().master_volume - 0.5).abs() < f32::EPSILON);
        assert!(!coord.storage().slot_exists(SETTINGS_SLOT));
        assert!(coord.events().drain().is_empty());
    }

    #[test]
    fn test_revert_discards_pending() {
        let mut coord = coordinator();
        coord.queue_graphics_quality(0);
        coord.queue_brightness(1.0);
        coord.events().drain();

        coord.revert_pending_settings();

        assert!(coord.pending_settings().is_empty());
        assert_eq!(
            coord.events().drain(),
            vec![SettingsEvent::Reverted(PendingSettings::default())]
        );
    }

    #[test]
    fn test_reset_to_defaults_keeps_live_resolution() {
        let mut coord = coordinator();
        coord.queue_graphics_quality(0);
        coord.queue_resolution(3);
        coord.apply_settings();
        assert_eq!(coord.display().current_resolution(), Resolution::FULL_HD);

        coord.events().drain();
        coord.reset_to_defaults();

        let saved = coord.saved_settings();
        let defaults = UserSettings::default();
        assert_eq!(saved.graphics_quality, defaults.graphics_quality);
        assert!((saved.brightness - defaults.brightness).abs() < f32::EPSILON);
        assert_eq!(saved.window_mode, defaults.window_mode);
        // Resolution index stays where the live resolution is, not the
        // built-in default of 0
        assert_eq!(saved.resolution_index, 3);
        assert_eq!(coord.display().current_resolution(), Resolution::FULL_HD);

        let events = coord.events().drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SettingsEvent::ResetToDefaults(_)));
        assert!(matches!(events[1], SettingsEvent::Applied(_)));
    }

    #[test]
    fn test_available_resolutions_labels() {
        let mut coord = coordinator();
        let labels = coord.available_resolutions();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], "1280 x 720");
        assert_eq!(labels[5], "3840 x 2160");
    }

    #[test]
    fn test_resolution_cache_dedups_modes() {
        let display = HeadlessDisplay::new(vec![
            Resolution::HD,
            Resolution::HD,
            Resolution::FULL_HD,
        ]);
        let mut coord =
            SettingsCoordinator::new(MemorySlotStorage::new(), display, HeadlessMixer::new());
        assert_eq!(coord.available_resolutions().len(), 2);
    }

    #[test]
    fn test_current_resolution_index() {
        let mut coord = coordinator();
        assert_eq!(coord.current_resolution_index(), Some(0));

        let display = HeadlessDisplay::default().with_resolution(Resolution::new(640, 480));
        let mut coord =
            SettingsCoordinator::new(MemorySlotStorage::new(), display, HeadlessMixer::new());
        assert_eq!(coord.current_resolution_index(), None);
    }

    #[test]
    fn test_current_window_mode_uses_canonical_mapping() {
        let display = HeadlessDisplay::default().with_window_mode(WindowMode::Windowed);
        let coord =
            SettingsCoordinator::new(MemorySlotStorage::new(), display, HeadlessMixer::new());
        assert_eq!(coord.current_window_mode(), 2);
    }

    #[test]
    fn test_initialize_without_save_uses_defaults() {
        let mut coord = coordinator();
        coord.initialize();

        assert_eq!(coord.saved_settings(), &UserSettings::default());
        assert!(coord.pending_settings().is_empty());
        let events = coord.events().drain();
        assert_eq!(
            events,
            vec![SettingsEvent::Initialized(PendingSettings::from(
                &UserSettings::default()
            ))]
        );
        // First launch does not write the slot until something is applied
        assert!(!coord.storage().slot_exists(SETTINGS_SLOT));
    }

    #[test]
    fn test_initialize_with_save_restores_and_applies() {
        let mut storage = MemorySlotStorage::new();
        let settings = UserSettings {
            graphics_quality: 1,
            brightness: 1.25,
            ..UserSettings::default()
        };
        save_to_slot(&mut storage, SETTINGS_SLOT, &settings).expect("Seed save failed");

        let mut coord =
            SettingsCoordinator::new(storage, HeadlessDisplay::default(), HeadlessMixer::new());
        coord.initialize();

        assert_eq!(coord.saved_settings().graphics_quality, 1);
        assert_eq!(coord.display().quality_tier(), 1);
        assert!((coord.display().gamma() - 1.25).abs() < f32::EPSILON);
        assert!(coord.pending_settings().is_empty());

        let events = coord.events().drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SettingsEvent::Initialized(_)));
        assert!(matches!(events[1], SettingsEvent::Applied(_)));
    }

    #[test]
    fn test_current_settings_data_prefers_pending() {
        let mut coord = coordinator();
        coord.queue_brightness(1.1);

        let data = coord.current_settings_data();
        assert_eq!(data.brightness, Some(1.1));
        assert!(data.graphics_quality.is_none());
    }

    #[test]
    fn test_current_settings_data_falls_back_to_save() {
        let mut coord = coordinator();
        coord.queue_graphics_quality(0);
        coord.apply_settings();

        // Pending is now empty, so the snapshot comes from storage
        let data = coord.current_settings_data();
        assert_eq!(data.graphics_quality, Some(0));
    }

    #[test]
    fn test_current_settings_data_falls_back_to_defaults() {
        let coord = coordinator();
        let data = coord.current_settings_data();
        assert_eq!(data, PendingSettings::from(&UserSettings::default()));
    }

    proptest! {
        #[test]
        fn prop_sound_apply_clamps_into_unit_range(queued in -10.0f32..10.0) {
            let mut coord = coordinator();
            coord.queue_volume(queued, VolumeChannel::Master);
            coord.apply_sound_settings(MIX, "Master", VolumeChannel::Master);

            let applied = coord.saved_settings().master_volume;
            prop_assert!((0.0..=1.0).contains(&applied));
            prop_assert!((applied - queued.clamp(0.0, 1.0)).abs() < f32::EPSILON);
        }

        #[test]
        fn prop_apply_commits_brightness_in_gamma_range(queued in -10.0f32..10.0) {
            let mut coord = coordinator();
            coord.queue_brightness(queued);
            coord.apply_settings();

            let applied = coord.saved_settings().brightness;
            prop_assert!((GAMMA_MIN..=GAMMA_MAX).contains(&applied));
        }
    }
}
