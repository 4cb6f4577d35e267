pub mod config;
pub mod handlers;

pub use config::Settings;
