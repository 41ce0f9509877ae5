// Guild settings persistence
// Loads serversettings.json at startup and rewrites it on every change

mod document;
mod error;
mod key;
mod manager;

pub use error::SettingsError;
pub use key::GuildKey;
pub use manager::SettingsManager;
