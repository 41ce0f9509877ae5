// Data models
pub mod settings;
