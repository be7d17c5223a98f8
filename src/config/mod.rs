// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{default_config_path, load_config};
pub use settings::{Config, FeaturesConfig, HoursWindow, Preferences, UserProfile};
