//! Configuration settings for docvox.

use crate::error::{DocvoxError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Environment variable holding the knowledge-base platform API key.
pub const PLATFORM_API_KEY_ENV: &str = "DOCVOX_PLATFORM_API_KEY";

/// Environment variable holding the voice service API key.
pub const VOICE_API_KEY_ENV: &str = "DOCVOX_VOICE_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub platform: PlatformSettings,
    pub chat: ChatSettings,
    pub voice: VoiceServiceSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where reports and narration audio are written.
    pub output_dir: String,
    /// Directory for rolling log files. None = log to stderr only.
    pub log_dir: Option<String>,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// HTTP request timeout in seconds. 0 disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: "outputs".to_string(),
            log_dir: None,
            log_level: "info".to_string(),
            request_timeout_secs: 300,
        }
    }
}

/// Knowledge-base platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    /// Base URL for file and knowledge-base management.
    pub api_base: String,
    /// Base URL of the OpenAI-compatible model endpoints.
    pub openai_base: String,
    /// API key. Overridden by DOCVOX_PLATFORM_API_KEY when set.
    pub api_key: Option<String>,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            api_base: "https://chat-api.tamu.ai".to_string(),
            openai_base: "https://chat-api.tamu.ai/openai".to_string(),
            api_key: None,
        }
    }
}

/// Chat completion defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Model used when none is given on the command line.
    pub model: String,
    /// Sampling temperature (0.0 to 2.0).
    pub temperature: f32,
    /// Base system prompt, before document augmentation.
    pub system_prompt: String,
    /// Base user prompt, before document augmentation.
    pub user_prompt: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "protected.gpt-5".to_string(),
            temperature: 0.2,
            system_prompt: "You are a helpful teaching assistant for CS courses at Texas A&M."
                .to_string(),
            user_prompt: "Explain the content of this document in simple terms.".to_string(),
        }
    }
}

/// Voice synthesis service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceServiceSettings {
    /// Base URL of the voice service API.
    pub api_base: String,
    /// API key. Overridden by DOCVOX_VOICE_API_KEY when set.
    pub api_key: Option<String>,
    /// Synthesis model.
    pub model: String,
    /// Preset voice used when no cloned voice is given.
    pub default_voice: String,
    /// Voice stability (0.0 to 1.0).
    pub stability: f32,
    /// Voice similarity boost (0.0 to 1.0).
    pub similarity_boost: f32,
    /// Style exaggeration (0.0 to 1.0).
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceServiceSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.elevenlabs.io/v1".to_string(),
            api_key: None,
            model: "eleven_turbo_v2_5".to_string(),
            default_voice: "Rachel".to_string(),
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Check that the configured base URLs parse and the temperature is in range.
    pub fn validate(&self) -> Result<()> {
        check_temperature(self.chat.temperature)?;
        for (key, value) in [
            ("platform.api_base", &self.platform.api_base),
            ("platform.openai_base", &self.platform.openai_base),
            ("voice.api_base", &self.voice.api_base),
        ] {
            Url::parse(value)
                .map_err(|e| DocvoxError::Config(format!("{} '{}' is not a URL: {}", key, value, e)))?;
        }
        Ok(())
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DocvoxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docvox")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Get the expanded log directory path, if file logging is enabled.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.general.log_dir.as_deref().map(Self::expand_path)
    }

    /// Platform API key, preferring the environment over the config file.
    pub fn platform_api_key(&self) -> Option<String> {
        key_from_env_or(PLATFORM_API_KEY_ENV, self.platform.api_key.as_ref())
    }

    /// Voice service API key, preferring the environment over the config file.
    pub fn voice_api_key(&self) -> Option<String> {
        key_from_env_or(VOICE_API_KEY_ENV, self.voice.api_key.as_ref())
    }
}

/// Accepted sampling temperature range.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Reject temperatures outside [`TEMPERATURE_RANGE`].
pub fn check_temperature(temperature: f32) -> Result<()> {
    if TEMPERATURE_RANGE.contains(&temperature) {
        Ok(())
    } else {
        Err(DocvoxError::Config(format!(
            "chat.temperature must be between {} and {}, got {}",
            TEMPERATURE_RANGE.start(),
            TEMPERATURE_RANGE.end(),
            temperature
        )))
    }
}

fn key_from_env_or(var: &str, fallback: Option<&String>) -> Option<String> {
    pick_key(std::env::var(var).ok(), fallback)
}

/// Blank values on either side count as unset.
fn pick_key(env_value: Option<String>, fallback: Option<&String>) -> Option<String> {
    env_value
        .filter(|k| !k.trim().is_empty())
        .or_else(|| fallback.filter(|k| !k.trim().is_empty()).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [chat]
            model = "protected.llama"

            [voice]
            default_voice = "Adam"
            "#,
        )
        .unwrap();

        assert_eq!(settings.chat.model, "protected.llama");
        assert!((settings.chat.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(settings.voice.default_voice, "Adam");
        assert_eq!(settings.voice.model, "eleven_turbo_v2_5");
        assert_eq!(settings.platform.api_base, "https://chat-api.tamu.ai");
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.general.output_dir, "outputs");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.chat.user_prompt = "Summarize.".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.chat.user_prompt, "Summarize.");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut settings = Settings::default();
        settings.voice.api_base = "not a url".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("voice.api_base"));
    }

    #[test]
    fn test_blank_env_key_falls_back_to_file() {
        let from_file = "from-file".to_string();
        assert_eq!(pick_key(Some(String::new()), Some(&from_file)), Some(from_file.clone()));
        assert_eq!(pick_key(Some("  ".to_string()), Some(&from_file)), Some(from_file.clone()));
        assert_eq!(pick_key(Some("from-env".to_string()), Some(&from_file)).as_deref(), Some("from-env"));
        assert_eq!(pick_key(None, Some(&" ".to_string())), None);
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let mut settings = Settings::default();
        settings.chat.temperature = 2.5;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("chat.temperature"));

        settings.chat.temperature = 2.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_temperature_in_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat]\ntemperature = -0.5\n").unwrap();
        assert!(Settings::load_from(Some(&path)).is_err());
    }
}
