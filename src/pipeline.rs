//! Pipeline for docvox.
//!
//! Runs selected knowledge-base documents through the chat model one at a
//! time, writes a report per answer, and narrates answers on request.

use crate::config::{ChatSettings, Settings};
use crate::error::{DocvoxError, Result};
use crate::feedback::AudioStyle;
use crate::history::{ProcessingHistory, ProcessingHistoryEntry};
use crate::platform::{DocumentChat, PlatformClient};
use crate::report::{write_audio, write_report};
use crate::voice::{Emotion, SpeechSynthesizer, VoiceClient};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// A document selected by knowledge-base name and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    pub kb_name: String,
    pub file_name: String,
}

impl FileTarget {
    pub fn new(kb_name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            kb_name: kb_name.into(),
            file_name: file_name.into(),
        }
    }
}

impl std::str::FromStr for FileTarget {
    type Err = String;

    /// Parse `KB:FILE`, splitting on the first colon.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((kb, file)) if !kb.is_empty() && !file.is_empty() => Ok(FileTarget::new(kb, file)),
            _ => Err(format!("Expected KB:FILE, got '{}'", s)),
        }
    }
}

impl std::fmt::Display for FileTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kb_name, self.file_name)
    }
}

/// Prompt pair and model settings applied to every file in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: String,
    pub temperature: f32,
}

impl From<&ChatSettings> for ChatRequest {
    fn from(settings: &ChatSettings) -> Self {
        Self {
            system_prompt: settings.system_prompt.clone(),
            user_prompt: settings.user_prompt.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }
}

/// Per-file results of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(FileTarget, Result<ProcessingHistoryEntry>)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Result of narrating one answer.
#[derive(Debug, Clone)]
pub struct NarrationResult {
    pub path: PathBuf,
    pub size_bytes: usize,
    /// Emotion actually used, after unknown tags fall back to neutral.
    pub emotion: Emotion,
    pub style: AudioStyle,
}

/// The main pipeline: chat, report, history, narration.
pub struct Pipeline {
    chat: Arc<dyn DocumentChat>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    output_dir: PathBuf,
    history: ProcessingHistory,
}

impl Pipeline {
    /// Create a pipeline with custom components.
    pub fn new(chat: Arc<dyn DocumentChat>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            chat,
            synthesizer: None,
            output_dir: output_dir.into(),
            history: ProcessingHistory::new(),
        }
    }

    /// Enable narration through `synthesizer`.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Build a pipeline from settings. Narration is enabled only when a
    /// voice API key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let chat = Arc::new(PlatformClient::from_settings(settings)?);
        let mut pipeline = Self::new(chat, settings.output_dir());

        if settings.voice_api_key().is_some() {
            pipeline = pipeline.with_synthesizer(Arc::new(VoiceClient::from_settings(settings)?));
        } else {
            info!("Voice API key not set; narration disabled");
        }

        Ok(pipeline)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn history(&self) -> &ProcessingHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn can_narrate(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Ask the model about one document, save the answer as a report, and
    /// record it in the history.
    #[instrument(skip(self, request), fields(target = %target))]
    pub async fn process_file(
        &mut self,
        target: &FileTarget,
        request: &ChatRequest,
    ) -> Result<ProcessingHistoryEntry> {
        let response = self
            .chat
            .chat_with_file(
                &target.kb_name,
                &target.file_name,
                &request.system_prompt,
                &request.user_prompt,
                &request.model,
                request.temperature,
            )
            .await?;

        let doc_path = write_report(&self.output_dir, &target.file_name, &response)?;

        let entry = ProcessingHistoryEntry::new(
            target.kb_name.clone(),
            target.file_name.clone(),
            response,
            doc_path,
            request.model.clone(),
        );
        self.history.push(entry.clone());

        info!("Processed file: {}", target.file_name);
        Ok(entry)
    }

    /// Process `targets` one after another. A failing file is recorded and the
    /// batch moves on.
    pub async fn process_batch(
        &mut self,
        targets: &[FileTarget],
        request: &ChatRequest,
        progress: Option<&ProgressBar>,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for (idx, target) in targets.iter().enumerate() {
            if let Some(pb) = progress {
                pb.set_message(format!("{}/{}: {}", idx + 1, targets.len(), target.file_name));
            }

            let outcome = self.process_file(target, request).await;
            if let Err(e) = &outcome {
                error!("Error processing {}: {}", target, e);
            }
            report.outcomes.push((target.clone(), outcome));

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        info!(
            "Batch finished: {} processed, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }

    /// Narrate an answer and save the audio next to the reports.
    pub async fn narrate(
        &self,
        response: &str,
        file_name: &str,
        voice_id: &str,
        emotion: &str,
        style: AudioStyle,
    ) -> Result<NarrationResult> {
        let synthesizer = self.synthesizer.as_deref().ok_or_else(|| {
            DocvoxError::Config(
                "Voice API key is not configured; narration is unavailable".to_string(),
            )
        })?;

        narrate_to_file(
            synthesizer,
            &self.output_dir,
            response,
            file_name,
            voice_id,
            emotion,
            style,
        )
        .await
    }
}

/// Narrate `response` in `style` and write the audio into `output_dir`.
#[instrument(skip(synthesizer, output_dir, response))]
pub async fn narrate_to_file(
    synthesizer: &dyn SpeechSynthesizer,
    output_dir: &Path,
    response: &str,
    file_name: &str,
    voice_id: &str,
    emotion: &str,
    style: AudioStyle,
) -> Result<NarrationResult> {
    let text = style.narration_text(response);
    info!("Narrating {} chars ({} style)", text.len(), style);

    let audio = synthesizer.synthesize(&text, voice_id, emotion).await?;
    if audio.emotion.as_str() != emotion {
        warn!("Narrated with '{}' instead of '{}'", audio.emotion, emotion);
    }

    let path = write_audio(output_dir, file_name, audio.emotion, style, &audio.bytes)?;

    Ok(NarrationResult {
        path,
        size_bytes: audio.bytes.len(),
        emotion: audio.emotion,
        style,
    })
}
