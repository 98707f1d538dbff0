//! Voice cloning and emotion-tagged speech synthesis.

mod catalog;
mod client;
mod emotion;

pub use catalog::{
    preset_voice_id, preset_voice_names, VoiceSelection, DEFAULT_PRESET, PRESET_VOICES,
};
pub use client::{VoiceClient, DEFAULT_VOICE_API_BASE, DEFAULT_VOICE_MODEL};
pub use emotion::Emotion;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Synthesis tuning sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

/// A voice known to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Synthesized audio and the emotion it was requested with.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioResult {
    /// Encoded audio (MP3).
    pub bytes: Vec<u8>,
    pub emotion: Emotion,
}

/// Trait for text-to-speech services.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Narrate `text` with `voice_id`. Unknown emotion tags are treated as neutral.
    async fn synthesize(&self, text: &str, voice_id: &str, emotion: &str) -> Result<AudioResult>;
}
