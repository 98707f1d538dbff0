//! Configuration module for docvox.
//!
//! Handles loading and managing application settings and service credentials.

mod settings;

pub use settings::{
    check_temperature, ChatSettings, GeneralSettings, PlatformSettings, Settings,
    VoiceServiceSettings, PLATFORM_API_KEY_ENV, TEMPERATURE_RANGE, VOICE_API_KEY_ENV,
};
