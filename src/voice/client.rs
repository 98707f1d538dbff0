//! HTTP client for the voice cloning and text-to-speech service.

use super::{AudioResult, Emotion, SpeechSynthesizer, VoiceInfo, VoiceSettings};
use crate::config::{Settings, VOICE_API_KEY_ENV};
use crate::error::{DocvoxError, Result};
use crate::http::{check_status, create_client_with_timeout, decode_json, timeout_from_secs};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Default voice service base URL.
pub const DEFAULT_VOICE_API_BASE: &str = "https://api.elevenlabs.io/v1";

/// Default synthesis model.
pub const DEFAULT_VOICE_MODEL: &str = "eleven_turbo_v2_5";

/// Client for voice cloning and speech synthesis.
pub struct VoiceClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

#[derive(Debug, Deserialize)]
struct CloneResponse {
    voice_id: String,
}

#[derive(Debug, Deserialize)]
struct VoiceList {
    voices: Vec<VoiceInfo>,
}

impl VoiceClient {
    /// Create a client against the default service URL.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(api_key, DEFAULT_VOICE_API_BASE)
    }

    /// Create a client against a custom service URL.
    pub fn with_config(api_key: &str, api_base: &str) -> Result<Self> {
        Ok(Self {
            http: crate::http::create_client()?,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: DEFAULT_VOICE_MODEL.to_string(),
            voice_settings: VoiceSettings::default(),
        })
    }

    /// Create a client from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.voice_api_key().ok_or_else(|| {
            DocvoxError::Config(format!(
                "Voice API key not set. Set {} or voice.api_key in the config file",
                VOICE_API_KEY_ENV
            ))
        })?;

        let http =
            create_client_with_timeout(timeout_from_secs(settings.general.request_timeout_secs))?;
        let voice = &settings.voice;
        Ok(Self::with_config(&api_key, &voice.api_base)?
            .with_http_client(http)
            .with_model(&voice.model)
            .with_voice_settings(VoiceSettings {
                stability: voice.stability,
                similarity_boost: voice.similarity_boost,
                style: voice.style,
                use_speaker_boost: voice.use_speaker_boost,
            }))
    }

    /// Replace the underlying HTTP client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Set the model used by [`SpeechSynthesizer::synthesize`].
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set the voice settings used by [`SpeechSynthesizer::synthesize`].
    pub fn with_voice_settings(mut self, settings: VoiceSettings) -> Self {
        self.voice_settings = settings;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn send(
        &self,
        operation: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        builder
            .header("xi-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| DocvoxError::transport(operation, e))
    }

    /// Clone a voice from one or more audio samples and return its identifier.
    ///
    /// Only emptiness is checked locally; sample length and format are left to
    /// the service.
    #[instrument(skip(self, samples, description), fields(samples = samples.len()))]
    pub async fn clone_voice(
        &self,
        name: &str,
        samples: Vec<Vec<u8>>,
        description: &str,
    ) -> Result<String> {
        if samples.is_empty() {
            return Err(DocvoxError::Validation(
                "At least one voice sample is required to clone a voice".to_string(),
            ));
        }

        let op = format!("Clone voice '{}'", name);
        let mut form = Form::new()
            .text("name", name.to_string())
            .text("description", description.to_string());
        for (idx, sample) in samples.into_iter().enumerate() {
            form = form.part("files", Part::bytes(sample).file_name(format!("sample_{}", idx + 1)));
        }

        let request = self
            .http
            .post(self.url("/voices/add"))
            .header(ACCEPT, "application/json")
            .multipart(form);
        let response = self.send(&op, request).await?;
        let cloned: CloneResponse = decode_json(&op, response).await?;

        info!("Cloned voice: {} (ID: {})", name, cloned.voice_id);
        Ok(cloned.voice_id)
    }

    /// Synthesize `text` with the given voice.
    ///
    /// `emotion` is parsed leniently: unknown tags become `neutral`. The tag is
    /// reported back in the result and does not change the request. A response
    /// with no audio bytes fails with [`DocvoxError::EmptyAudio`].
    #[instrument(skip(self, text, settings), fields(text_len = text.len()))]
    pub async fn generate_audio(
        &self,
        text: &str,
        voice_id: &str,
        emotion: &str,
        model: &str,
        settings: &VoiceSettings,
    ) -> Result<AudioResult> {
        let emotion = Emotion::parse_lenient(emotion);
        let op = "Generate audio";

        let body = SynthesisRequest {
            text,
            model_id: model,
            voice_settings: settings,
        };
        let request = self
            .http
            .post(self.url(&format!("/text-to-speech/{}", voice_id)))
            .header(ACCEPT, "audio/mpeg")
            .json(&body);
        let response = self.send(op, request).await?;
        let response = check_status(op, response).await?;

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DocvoxError::transport(op, e))?;
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(DocvoxError::EmptyAudio {
                voice_id: voice_id.to_string(),
            });
        }

        info!(
            "Generated audio with emotion '{}' (size: {} bytes)",
            emotion,
            bytes.len()
        );
        Ok(AudioResult { bytes, emotion })
    }

    /// List preset and cloned voices visible to the credential.
    #[instrument(skip(self))]
    pub async fn list_voices(&self) -> Result<Vec<VoiceInfo>> {
        let op = "List voices";
        let request = self
            .http
            .get(self.url("/voices"))
            .header(ACCEPT, "application/json");
        let response = self.send(op, request).await?;
        let list: VoiceList = decode_json(op, response).await?;

        info!("Retrieved {} voices", list.voices.len());
        Ok(list.voices)
    }

    /// Delete a cloned voice. Returns `false` when the service refuses.
    #[instrument(skip(self))]
    pub async fn delete_voice(&self, voice_id: &str) -> Result<bool> {
        let op = format!("Delete voice '{}'", voice_id);
        let request = self.http.delete(self.url(&format!("/voices/{}", voice_id)));
        let response = self.send(&op, request).await?;

        let status = response.status();
        if status.is_success() {
            info!("Deleted voice: {}", voice_id);
            Ok(true)
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!("Voice service refused to delete {}: {} {}", voice_id, status, body.trim());
            Ok(false)
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for VoiceClient {
    async fn synthesize(&self, text: &str, voice_id: &str, emotion: &str) -> Result<AudioResult> {
        debug!("Synthesizing with model {}", self.model);
        self.generate_audio(text, voice_id, emotion, &self.model, &self.voice_settings)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_carries_voice_settings() {
        let mut settings = Settings::default();
        settings.voice.api_key = Some("xi".to_string());
        settings.voice.stability = 0.9;
        settings.voice.model = "eleven_multilingual_v2".to_string();

        let client = VoiceClient::from_settings(&settings).unwrap();
        assert_eq!(client.model, "eleven_multilingual_v2");
        assert!((client.voice_settings.stability - 0.9).abs() < f32::EPSILON);
        assert_eq!(client.url("/voices"), "https://api.elevenlabs.io/v1/voices");
    }

    #[test]
    fn test_synthesis_request_shape() {
        let settings = VoiceSettings::default();
        let body = SynthesisRequest {
            text: "hello",
            model_id: DEFAULT_VOICE_MODEL,
            voice_settings: &settings,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model_id"], "eleven_turbo_v2_5");
        assert_eq!(json["voice_settings"]["use_speaker_boost"], true);
        assert_eq!(json["voice_settings"]["similarity_boost"], 0.75);
    }
}
