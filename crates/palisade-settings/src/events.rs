//! Settings notifications.

use crate::data::{PendingSettings, UserSettings, VolumeChannel};
use serde::{Deserialize, Serialize};

/// Notifications broadcast by the settings coordinator.
///
/// One variant per coordinator lifecycle point; listeners drain these from
/// the coordinator's event bus on the host update loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingsEvent {
    /// A setting was queued but not yet applied.
    Queued,
    /// Settings were loaded (or defaulted) at startup; carries the derived
    /// pending view.
    Initialized(PendingSettings),
    /// Pending settings were applied and persisted; carries the committed
    /// record.
    Applied(UserSettings),
    /// A volume override was applied and persisted for one channel.
    SoundApplied(VolumeChannel),
    /// Pending settings were discarded.
    Reverted(PendingSettings),
    /// Settings were reset to built-in defaults; carries the new pending
    /// view before it is applied.
    ResetToDefaults(PendingSettings),
}
