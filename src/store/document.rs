// serversettings.json codec
//
// Layout: { "<guild id>": { "text_channel_id": "...", "volume": 80, ... }, ... }

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::warn;

use super::SettingsError;
use crate::models::settings::{RepeatMode, SettingsValues};

/// Rewrites a raw row from an older document layout in place.
/// Must be a no-op when the field it targets is absent or already current.
pub type LegacyUpgrade = fn(&mut Map<String, Value>);

/// Applied in order to every row before it is decoded
pub const LEGACY_UPGRADES: &[LegacyUpgrade] = &[upgrade_boolean_repeat];

/// 0.2.7 and older stored `repeat` as a boolean
fn upgrade_boolean_repeat(row: &mut Map<String, Value>) {
    let repeat = match row.get("repeat") {
        Some(Value::Bool(repeat)) => *repeat,
        _ => return,
    };
    let mode = if repeat { RepeatMode::All } else { RepeatMode::None };
    row.insert("repeat".to_string(), Value::String(mode.as_str().to_string()));
}

/// Parse a whole document.
///
/// Fails only when the text is not a JSON object. Rows with a bad key or body
/// are logged and skipped.
pub fn decode(text: &str) -> Result<Vec<(u64, SettingsValues)>, SettingsError> {
    let Value::Object(rows) = serde_json::from_str::<Value>(text)? else {
        return Err(SettingsError::NotAnObject);
    };

    let mut decoded = Vec::with_capacity(rows.len());
    for (key, row) in rows {
        match decode_row(&key, row) {
            Ok(values) => decoded.push(values),
            Err(e) => warn!("Skipping stored settings for guild {:?}: {}", key, e),
        }
    }

    Ok(decoded)
}

fn decode_row(key: &str, row: Value) -> Result<(u64, SettingsValues), SettingsError> {
    let guild_id = key
        .parse::<u64>()
        .map_err(|_| SettingsError::InvalidGuildId(key.to_string()))?;

    let Value::Object(mut row) = row else {
        return Err(SettingsError::NotAnObject);
    };
    for upgrade in LEGACY_UPGRADES {
        upgrade(&mut row);
    }

    let values = serde_json::from_value(Value::Object(row))?;
    Ok((guild_id, values))
}

/// Render every guild's settings, 4-space indented, guilds in id order
pub fn encode(rows: &BTreeMap<u64, SettingsValues>) -> Result<Vec<u8>, SettingsError> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    rows.serialize(&mut serializer)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_one(text: &str) -> SettingsValues {
        let mut rows = decode(text).unwrap();
        assert_eq!(rows.len(), 1);
        rows.remove(0).1
    }

    #[test]
    fn test_decode_row() {
        let rows = decode(r#"{"123": {"text_channel_id": "555", "volume": 80, "repeat": "ALL"}}"#).unwrap();
        assert_eq!(rows.len(), 1);

        let (guild_id, values) = &rows[0];
        assert_eq!(*guild_id, 123);
        assert_eq!(values.text_channel_id, Some(555));
        assert_eq!(values.volume, 80);
        assert_eq!(values.repeat_mode, RepeatMode::All);
        assert_eq!(values.voice_channel_id, None);
        assert_eq!(values.dj_role_id, None);
        assert_eq!(values.default_playlist, None);
        assert_eq!(values.prefix, None);
    }

    #[test]
    fn test_legacy_boolean_repeat() {
        assert_eq!(decode_one(r#"{"7": {"repeat": true}}"#).repeat_mode, RepeatMode::All);
        assert_eq!(decode_one(r#"{"7": {"repeat": false}}"#).repeat_mode, RepeatMode::None);
    }

    #[test]
    fn test_upgrade_skips_current_rows() {
        let mut row = json!({"repeat": "SINGLE"}).as_object().cloned().unwrap();
        upgrade_boolean_repeat(&mut row);
        assert_eq!(row.get("repeat"), Some(&json!("SINGLE")));

        let mut row = Map::new();
        upgrade_boolean_repeat(&mut row);
        assert!(row.is_empty());
    }

    #[test]
    fn test_float_volume_keeps_row() {
        let values = decode_one(r#"{"5": {"volume": 80.0, "prefix": "?", "voice_channel_id": "9"}}"#);
        assert_eq!(values.volume, 80);
        assert_eq!(values.prefix.as_deref(), Some("?"));
        assert_eq!(values.voice_channel_id, Some(9));
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(decode("[1, 2, 3]"), Err(SettingsError::NotAnObject)));
        assert!(matches!(decode("{ nope"), Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_bad_rows_skipped() {
        let rows = decode(
            r#"{
                "abc": {"volume": 10},
                "1": "not an object",
                "2": {"volume": "loud"},
                "3": {"volume": 30}
            }"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 3);
        assert_eq!(rows[0].1.volume, 30);
    }

    #[test]
    fn test_encode_omits_defaults() {
        let mut rows = BTreeMap::new();
        rows.insert(1, SettingsValues::default());
        rows.insert(
            2,
            SettingsValues {
                volume: 60,
                ..SettingsValues::default()
            },
        );

        let value: Value = serde_json::from_slice(&encode(&rows).unwrap()).unwrap();
        assert_eq!(value, json!({"1": {}, "2": {"volume": 60}}));
    }

    #[test]
    fn test_encode_layout() {
        let mut rows = BTreeMap::new();
        rows.insert(
            10,
            SettingsValues {
                dj_role_id: Some(5),
                repeat_mode: RepeatMode::Single,
                ..SettingsValues::default()
            },
        );
        rows.insert(9, SettingsValues::default());

        let text = String::from_utf8(encode(&rows).unwrap()).unwrap();
        assert_eq!(
            text,
            "{\n    \"9\": {},\n    \"10\": {\n        \"dj_role_id\": \"5\",\n        \"repeat\": \"SINGLE\"\n    }\n}"
        );
    }
}
