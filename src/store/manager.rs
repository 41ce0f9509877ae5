// Settings manager
// Guild id -> Settings, backed by a single JSON document

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use dashmap::DashMap;
use tracing::{debug, info, warn};

use super::{document, GuildKey, SettingsError};
use crate::models::settings::{Settings, SettingsValues};

/// Owns every guild's settings
///
/// Load and save failures are logged and swallowed here: callers always get
/// settings back, and a failed save leaves the in-memory value in place.
#[derive(Debug)]
pub struct SettingsManager {
    path: PathBuf,
    settings: DashMap<u64, Arc<Settings>>,
    /// Serializes saves so each document is written from one snapshot
    write_lock: Mutex<()>,
    /// Handed to new records so they can ask for a save
    handle: Weak<SettingsManager>,
}

impl SettingsManager {
    /// Load the settings document at `path`.
    ///
    /// A missing or unreadable document starts an empty manager.
    pub fn load(path: impl Into<PathBuf>) -> Arc<Self> {
        let path = path.into();

        let loaded = match read_document(&path) {
            Ok(rows) => {
                info!("Loaded settings for {} guild(s) from {}", rows.len(), path.display());
                rows
            }
            Err(e) => {
                warn!(
                    "Failed to load server settings from {} (this is normal if no settings have been set yet): {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        };

        Arc::new_cyclic(|handle: &Weak<SettingsManager>| {
            let settings = DashMap::with_capacity(loaded.len());
            for (guild_id, values) in loaded {
                settings.insert(guild_id, Arc::new(Settings::new(guild_id, values, handle.clone())));
            }

            Self {
                path,
                settings,
                write_lock: Mutex::new(()),
                handle: handle.clone(),
            }
        })
    }

    /// Settings for a guild, created with defaults on first access.
    ///
    /// Every call for the same guild returns the same record.
    pub fn get_settings(&self, guild: impl GuildKey) -> Arc<Settings> {
        let guild_id = guild.guild_key();

        self.settings
            .entry(guild_id)
            .or_insert_with(|| {
                debug!("Creating default settings for guild {}", guild_id);
                Arc::new(Settings::new(guild_id, SettingsValues::default(), self.handle.clone()))
            })
            .value()
            .clone()
    }

    /// Prefix to match commands against: the guild's own, or `default`.
    /// `None` (a DM) always gets `default`.
    pub fn effective_prefix<K: GuildKey>(&self, guild: Option<K>, default: &str) -> String {
        match guild {
            Some(guild) => self.get_settings(guild).prefix_or(default),
            None => default.to_string(),
        }
    }

    /// Rewrite the whole document from the current settings
    pub fn write_settings(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let snapshot: BTreeMap<u64, SettingsValues> = self
            .settings
            .iter()
            .map(|entry| (*entry.key(), entry.value().values()))
            .collect();

        match write_document(&self.path, &snapshot) {
            Ok(()) => debug!("Wrote settings for {} guild(s) to {}", snapshot.len(), self.path.display()),
            Err(e) => warn!("Failed to write to {}: {}", self.path.display(), e),
        }
    }

    /// Number of guilds with settings, stored or created since load
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_document(path: &Path) -> Result<Vec<(u64, SettingsValues)>, SettingsError> {
    let text = fs::read_to_string(path)?;
    document::decode(&text)
}

fn write_document(path: &Path, rows: &BTreeMap<u64, SettingsValues>) -> Result<(), SettingsError> {
    let bytes = document::encode(rows)?;
    fs::write(path, bytes)?;
    Ok(())
}
