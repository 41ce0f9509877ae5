// Guild settings record
// One per guild, mutated only through its own setters

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::SettingsManager;

/// Volume a guild starts with
pub const DEFAULT_VOLUME: i32 = 100;

/// Playback repeat behaviour
///
/// Older documents stored this as a boolean; see `store::document` for the upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RepeatMode {
    #[default]
    None,
    #[serde(alias = "REPEAT")]
    All,
    Single,
}

impl RepeatMode {
    /// Name used in the persisted document
    pub fn as_str(self) -> &'static str {
        match self {
            RepeatMode::None => "NONE",
            RepeatMode::All => "ALL",
            RepeatMode::Single => "SINGLE",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == RepeatMode::None
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepeatMode::None => "Off",
            RepeatMode::All => "All",
            RepeatMode::Single => "Single",
        };
        f.write_str(label)
    }
}

/// Point-in-time copy of a guild's settings
///
/// Also the row shape of the persisted document: every field is skipped on
/// save while it holds its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsValues {
    #[serde(default, with = "snowflake", skip_serializing_if = "Option::is_none")]
    pub text_channel_id: Option<u64>,
    #[serde(default, with = "snowflake", skip_serializing_if = "Option::is_none")]
    pub voice_channel_id: Option<u64>,
    #[serde(default, with = "snowflake", skip_serializing_if = "Option::is_none")]
    pub dj_role_id: Option<u64>,
    #[serde(
        default = "default_volume",
        deserialize_with = "whole_number::deserialize",
        skip_serializing_if = "is_default_volume"
    )]
    pub volume: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_playlist: Option<String>,
    #[serde(rename = "repeat", default, skip_serializing_if = "RepeatMode::is_none")]
    pub repeat_mode: RepeatMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            text_channel_id: None,
            voice_channel_id: None,
            dj_role_id: None,
            volume: DEFAULT_VOLUME,
            default_playlist: None,
            repeat_mode: RepeatMode::None,
            prefix: None,
        }
    }
}

fn default_volume() -> i32 {
    DEFAULT_VOLUME
}

fn is_default_volume(volume: &i32) -> bool {
    *volume == DEFAULT_VOLUME
}

/// 0 is the "unset" sentinel for Discord ids
fn non_zero(id: Option<u64>) -> Option<u64> {
    id.filter(|&id| id != 0)
}

/// Discord ids are written as decimal strings so 53-bit JSON readers keep them intact.
/// Plain integers are accepted on read; anything unparseable reads as unset.
mod snowflake {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(id: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_str(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        let id = match Option::<RawId>::deserialize(deserializer)? {
            Some(RawId::Text(text)) => text.trim().parse::<u64>().ok(),
            Some(RawId::Number(id)) => Some(id),
            None => None,
        };
        Ok(super::non_zero(id))
    }
}

/// Volume may have been written as `80.0` by other tools; any whole value in range is accepted.
mod whole_number {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Int(i64),
        Float(f64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        let value = match RawNumber::deserialize(deserializer)? {
            RawNumber::Int(value) => value,
            RawNumber::Float(value) if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 => {
                value as i64
            }
            RawNumber::Float(value) => {
                return Err(D::Error::custom(format!("expected a whole number, found {}", value)))
            }
        };
        i32::try_from(value).map_err(|_| D::Error::custom(format!("{} is out of range", value)))
    }
}

/// Settings for one guild
///
/// Holds a weak handle back to the manager that owns it; every setter asks
/// that manager to rewrite the whole settings document.
#[derive(Debug)]
pub struct Settings {
    guild_id: u64,
    values: RwLock<SettingsValues>,
    manager: Weak<SettingsManager>,
}

impl Settings {
    pub(crate) fn new(guild_id: u64, values: SettingsValues, manager: Weak<SettingsManager>) -> Self {
        Self {
            guild_id,
            values: RwLock::new(values),
            manager,
        }
    }

    pub fn guild_id(&self) -> u64 {
        self.guild_id
    }

    pub fn text_channel_id(&self) -> Option<u64> {
        self.read().text_channel_id
    }

    pub fn voice_channel_id(&self) -> Option<u64> {
        self.read().voice_channel_id
    }

    pub fn dj_role_id(&self) -> Option<u64> {
        self.read().dj_role_id
    }

    pub fn volume(&self) -> i32 {
        self.read().volume
    }

    pub fn default_playlist(&self) -> Option<String> {
        self.read().default_playlist.clone()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.read().repeat_mode
    }

    /// Guild-specific prefix, `None` when the global default applies
    pub fn prefix(&self) -> Option<String> {
        self.read().prefix.clone()
    }

    /// Guild prefix, falling back to `default`
    pub fn prefix_or(&self, default: &str) -> String {
        self.prefix().unwrap_or_else(|| default.to_string())
    }

    /// Copy of every field at this instant
    pub fn values(&self) -> SettingsValues {
        self.read().clone()
    }

    pub fn set_text_channel(&self, channel_id: Option<u64>) {
        self.update(|values| values.text_channel_id = non_zero(channel_id));
    }

    pub fn set_voice_channel(&self, channel_id: Option<u64>) {
        self.update(|values| values.voice_channel_id = non_zero(channel_id));
    }

    pub fn set_dj_role(&self, role_id: Option<u64>) {
        self.update(|values| values.dj_role_id = non_zero(role_id));
    }

    /// Stored as given, no range clamp
    pub fn set_volume(&self, volume: i32) {
        self.update(|values| values.volume = volume);
    }

    pub fn set_default_playlist(&self, playlist: Option<String>) {
        self.update(|values| values.default_playlist = playlist);
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) {
        self.update(|values| values.repeat_mode = mode);
    }

    pub fn set_prefix(&self, prefix: Option<String>) {
        self.update(|values| values.prefix = prefix);
    }

    fn read(&self) -> RwLockReadGuard<'_, SettingsValues> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, apply: impl FnOnce(&mut SettingsValues)) {
        // Guard must be released before saving, the save reads every record
        {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            apply(&mut values);
        }

        match self.manager.upgrade() {
            Some(manager) => manager.write_settings(),
            None => debug!(
                "Settings manager dropped, change for guild {} kept in memory only",
                self.guild_id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detached(values: SettingsValues) -> Settings {
        Settings::new(1, values, Weak::new())
    }

    #[test]
    fn test_default_values() {
        let values = SettingsValues::default();
        assert_eq!(values.volume, 100);
        assert_eq!(values.repeat_mode, RepeatMode::None);
        assert!(values.text_channel_id.is_none());
        assert!(values.voice_channel_id.is_none());
        assert!(values.dj_role_id.is_none());
        assert!(values.default_playlist.is_none());
        assert!(values.prefix.is_none());
    }

    #[test]
    fn test_default_values_serialize_empty() {
        let value = serde_json::to_value(SettingsValues::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let values = SettingsValues {
            text_channel_id: Some(u64::MAX),
            dj_role_id: Some(42),
            ..SettingsValues::default()
        };
        let value = serde_json::to_value(values).unwrap();
        assert_eq!(
            value,
            json!({"text_channel_id": "18446744073709551615", "dj_role_id": "42"})
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let values: SettingsValues = serde_json::from_value(json!({})).unwrap();
        assert_eq!(values, SettingsValues::default());
    }

    #[test]
    fn test_id_parsing() {
        let values: SettingsValues = serde_json::from_value(json!({
            "text_channel_id": "555",
            "voice_channel_id": 777,
            "dj_role_id": "not-a-number"
        }))
        .unwrap();
        assert_eq!(values.text_channel_id, Some(555));
        assert_eq!(values.voice_channel_id, Some(777));
        assert_eq!(values.dj_role_id, None);
    }

    #[test]
    fn test_zero_id_reads_as_unset() {
        let values: SettingsValues =
            serde_json::from_value(json!({"text_channel_id": "0"})).unwrap();
        assert_eq!(values.text_channel_id, None);
    }

    #[test]
    fn test_repeat_names() {
        let values: SettingsValues = serde_json::from_value(json!({"repeat": "SINGLE"})).unwrap();
        assert_eq!(values.repeat_mode, RepeatMode::Single);

        let values: SettingsValues = serde_json::from_value(json!({"repeat": "REPEAT"})).unwrap();
        assert_eq!(values.repeat_mode, RepeatMode::All);

        assert!(serde_json::from_value::<SettingsValues>(json!({"repeat": "SHUFFLE"})).is_err());
    }

    #[test]
    fn test_volume_accepts_whole_floats() {
        let values: SettingsValues = serde_json::from_value(json!({"volume": 80.0})).unwrap();
        assert_eq!(values.volume, 80);

        let values: SettingsValues = serde_json::from_value(json!({"volume": 80})).unwrap();
        assert_eq!(values.volume, 80);

        assert!(serde_json::from_value::<SettingsValues>(json!({"volume": 80.5})).is_err());
        assert!(serde_json::from_value::<SettingsValues>(json!({"volume": 5_000_000_000u64})).is_err());
        assert!(serde_json::from_value::<SettingsValues>(json!({"volume": "loud"})).is_err());
    }

    #[test]
    fn test_setters_without_manager() {
        let settings = detached(SettingsValues::default());
        settings.set_volume(250);
        settings.set_text_channel(Some(0));
        settings.set_voice_channel(Some(9));
        settings.set_prefix(Some("?".to_string()));

        assert_eq!(settings.volume(), 250);
        assert_eq!(settings.text_channel_id(), None);
        assert_eq!(settings.voice_channel_id(), Some(9));
        assert_eq!(settings.prefix_or("!"), "?");
    }

    #[test]
    fn test_prefix_fallback() {
        let settings = detached(SettingsValues::default());
        assert_eq!(settings.prefix_or("!"), "!");
    }
}
