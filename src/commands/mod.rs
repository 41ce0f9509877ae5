// Bot commands
pub mod help;
pub mod register;
pub mod settings;
