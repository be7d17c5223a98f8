// Configuration structs

use serde::{Deserialize, Serialize};

use crate::model::WallTime;

/// Top-level configuration: who the plan is for and which optional
/// behaviors are switched on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub features: FeaturesConfig,
}

/// The user the scheduler plans around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default = "default_name")]
    pub name: String,
    /// Minutes realistically available for goal work per day.
    #[serde(default = "default_available_minutes")]
    pub daily_available_minutes: u32,
    /// Hours blocked by classes or work.
    #[serde(default = "default_college_hours")]
    pub college_hours: HoursWindow,
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: HoursWindow,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            name: default_name(),
            daily_available_minutes: default_available_minutes(),
            college_hours: default_college_hours(),
            sleep_hours: default_sleep_hours(),
            preferences: Preferences::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HoursWindow {
    pub start: WallTime,
    pub end: WallTime,
}

/// Session-shape preferences that drive slot placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_session_length")]
    pub preferred_session_length: u32,
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
    #[serde(default = "default_focus_start")]
    pub focus_time_start: WallTime,
    #[serde(default = "default_focus_end")]
    pub focus_time_end: WallTime,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            preferred_session_length: default_session_length(),
            break_duration: default_break_duration(),
            focus_time_start: default_focus_start(),
            focus_time_end: default_focus_end(),
            notifications_enabled: true,
        }
    }
}

/// Feature flags (optional behaviors).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Generate tasks with the Gemini provider, falling back to the
    /// rule-based planner on any failure.
    #[serde(default)]
    pub ai_generation: bool,
    /// API key for the Gemini provider. Falls back to the GEMINI_API_KEY
    /// environment variable when unset.
    #[serde(default)]
    pub gemini_api_key: Option<String>,
}

impl FeaturesConfig {
    /// Resolve the Gemini API key from config, then the environment.
    pub fn gemini_api_key(&self) -> Option<String> {
        self.gemini_api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }
}

fn default_name() -> String {
    "you".to_string()
}

fn default_available_minutes() -> u32 {
    180
}

fn default_college_hours() -> HoursWindow {
    HoursWindow {
        start: WallTime::new(8, 0),
        end: WallTime::new(17, 0),
    }
}

fn default_sleep_hours() -> HoursWindow {
    HoursWindow {
        start: WallTime::new(23, 0),
        end: WallTime::new(6, 0),
    }
}

fn default_session_length() -> u32 {
    45
}

fn default_break_duration() -> u32 {
    10
}

fn default_focus_start() -> WallTime {
    WallTime::new(18, 0)
}

fn default_focus_end() -> WallTime {
    WallTime::new(22, 0)
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let profile = UserProfile::default();
        assert_eq!(profile.preferences.preferred_session_length, 45);
        assert_eq!(profile.preferences.break_duration, 10);
        assert_eq!(profile.preferences.focus_time_start.to_string(), "18:00");
        assert_eq!(profile.daily_available_minutes, 180);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [profile.preferences]
            preferred_session_length = 30
            focus_time_start = "19:00"
            "#,
        )
        .unwrap();
        assert_eq!(config.profile.preferences.preferred_session_length, 30);
        assert_eq!(config.profile.preferences.focus_time_start.to_string(), "19:00");
        assert_eq!(config.profile.preferences.break_duration, 10);
        assert!(!config.features.ai_generation);
    }

    #[test]
    fn test_malformed_time_in_config_is_an_error() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [profile.preferences]
            focus_time_start = "25:00"
            "#,
        );
        assert!(result.is_err());
    }
}
