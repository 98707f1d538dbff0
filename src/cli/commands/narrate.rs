//! Narrate command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{NarrationArgs, Output};
use crate::config::Settings;
use crate::feedback::AudioStyle;
use crate::pipeline::narrate_to_file;
use crate::report::{format_file_size, report_body};
use crate::voice::{VoiceClient, VoiceSelection};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Resolved narration options.
pub(crate) struct Narration {
    pub voice_id: String,
    pub voice_label: String,
    pub emotion: String,
    pub style: AudioStyle,
}

impl Narration {
    pub(crate) fn from_args(args: &NarrationArgs, settings: &Settings) -> Result<Self> {
        let style: AudioStyle = args.style.parse().map_err(anyhow::Error::msg)?;

        let selection = match (&args.voice_id, &args.voice) {
            (Some(id), _) => VoiceSelection::Cloned(id.clone()),
            (None, Some(name)) => VoiceSelection::Preset(name.clone()),
            (None, None) => VoiceSelection::Preset(settings.voice.default_voice.clone()),
        };
        let (voice_id, voice_label) = selection.resolve();

        Ok(Self {
            voice_id,
            voice_label,
            emotion: args.emotion.clone(),
            style,
        })
    }
}

/// Text to narrate from a file: the answer alone when the file is a saved
/// report, otherwise the whole file.
fn narration_source(raw: String) -> String {
    let body = report_body(&raw).map(str::to_string);
    match body {
        Some(body) => {
            debug!("Input is a saved report; narrating its answer only");
            body
        }
        None => raw,
    }
}

/// Run the narrate command.
pub async fn run_narrate(
    input: &Path,
    name: Option<&str>,
    args: &NarrationArgs,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Voice, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let narration = Narration::from_args(args, &settings)?;

    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let text = narration_source(raw);
    if text.trim().is_empty() {
        anyhow::bail!("Nothing to narrate: {} is empty", input.display());
    }

    let file_name = match name {
        Some(n) => n.to_string(),
        None => input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "narration".to_string()),
    };

    let client = VoiceClient::from_settings(&settings)?;
    Output::info(&format!(
        "Narrating with {} ({}, {})",
        narration.voice_label, narration.emotion, narration.style
    ));
    let spinner = Output::spinner("Generating audio...");

    let result = narrate_to_file(
        &client,
        &settings.output_dir(),
        &text,
        &file_name,
        &narration.voice_id,
        &narration.emotion,
        narration.style,
    )
    .await;
    spinner.finish_and_clear();

    match result {
        Ok(audio) => {
            Output::success(&format!("Audio saved to {}", audio.path.display()));
            Output::kv("Size", &format_file_size(audio.size_bytes as u64));
            Output::kv("Emotion", audio.emotion.as_str());
        }
        Err(e) => {
            Output::error(&format!("Error generating audio: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::DEFAULT_PRESET;

    fn args(voice: Option<&str>, voice_id: Option<&str>, style: &str) -> NarrationArgs {
        NarrationArgs {
            emotion: "happy".to_string(),
            style: style.to_string(),
            voice: voice.map(String::from),
            voice_id: voice_id.map(String::from),
        }
    }

    #[test]
    fn test_cloned_voice_wins() {
        let n = Narration::from_args(&args(None, Some("abc123"), "feedback"), &Settings::default())
            .unwrap();
        assert_eq!(n.voice_id, "abc123");
        assert_eq!(n.voice_label, "Cloned Voice");
        assert_eq!(n.style, AudioStyle::Feedback);
    }

    #[test]
    fn test_default_voice_from_settings() {
        let n = Narration::from_args(&args(None, None, "direct"), &Settings::default()).unwrap();
        assert_eq!(n.voice_label, DEFAULT_PRESET);
        assert_eq!(n.emotion, "happy");
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(Narration::from_args(&args(Some("Adam"), None, "sung"), &Settings::default()).is_err());
    }

    #[test]
    fn test_saved_report_narrates_answer_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = crate::report::write_report(dir.path(), "notes.pdf", "Good structure.").unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();

        let text = narration_source(raw);
        assert_eq!(text, "Good structure.");

        let spoken = AudioStyle::Feedback.narration_text(&text);
        assert!(!spoken.contains("AI Generated Response"));
        assert!(!spoken.contains("Generated on:"));
        assert!(!spoken.contains("____"));
    }

    #[test]
    fn test_plain_text_narrated_as_is() {
        assert_eq!(narration_source("Plain notes.\n".to_string()), "Plain notes.\n");
    }
}
