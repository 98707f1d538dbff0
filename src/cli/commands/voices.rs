//! Voice management commands.

use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, VoicesAction};
use crate::config::Settings;
use crate::voice::{VoiceClient, PRESET_VOICES};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Run the voices command.
pub async fn run_voices(action: VoicesAction, settings: Settings) -> Result<()> {
    match action {
        VoicesAction::Presets => {
            show_presets(&settings);
            Ok(())
        }
        VoicesAction::List => list_voices(settings).await,
        VoicesAction::Clone {
            name,
            samples,
            description,
        } => clone_voice(&name, &samples, &description, settings).await,
        VoicesAction::Delete { voice_id } => delete_voice(&voice_id, settings).await,
    }
}

fn show_presets(settings: &Settings) {
    Output::header(&format!("Preset Voices ({})", PRESET_VOICES.len()));
    for (name, id) in PRESET_VOICES {
        if *name == settings.voice.default_voice {
            Output::voice_info(&format!("{} (default)", name), id, None);
        } else {
            Output::voice_info(name, id, None);
        }
    }
}

fn voice_client(settings: &Settings) -> Result<VoiceClient> {
    if let Err(e) = preflight::check(Operation::Voice, settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }
    Ok(VoiceClient::from_settings(settings)?)
}

async fn list_voices(settings: Settings) -> Result<()> {
    let client = voice_client(&settings)?;
    let spinner = Output::spinner("Fetching voices...");
    let voices = client.list_voices().await;
    spinner.finish_and_clear();

    match voices {
        Ok(voices) if voices.is_empty() => Output::info("No voices on this account."),
        Ok(voices) => {
            Output::header(&format!("Voices ({})", voices.len()));
            for voice in &voices {
                Output::voice_info(&voice.name, &voice.voice_id, voice.category.as_deref());
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to list voices: {}", e));
            return Err(e.into());
        }
    }
    Ok(())
}

async fn clone_voice(
    name: &str,
    samples: &[PathBuf],
    description: &str,
    settings: Settings,
) -> Result<()> {
    let client = voice_client(&settings)?;

    let mut audio = Vec::with_capacity(samples.len());
    for path in samples {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read sample {}", path.display()))?;
        audio.push(bytes);
    }

    let spinner = Output::spinner(&format!("Cloning voice '{}'...", name));
    let result = client.clone_voice(name, audio, description).await;
    spinner.finish_and_clear();

    match result {
        Ok(voice_id) => {
            Output::success(&format!("Voice '{}' created", name));
            Output::kv("Voice ID", &voice_id);
            Output::info(&format!("Narrate with it using --voice-id {}", voice_id));
        }
        Err(e) => {
            Output::error(&format!("Error cloning voice: {}", e));
            return Err(e.into());
        }
    }
    Ok(())
}

async fn delete_voice(voice_id: &str, settings: Settings) -> Result<()> {
    let client = voice_client(&settings)?;

    if client.delete_voice(voice_id).await? {
        Output::success(&format!("Deleted voice {}", voice_id));
        Ok(())
    } else {
        Output::error(&format!("Voice {} was not deleted", voice_id));
        anyhow::bail!("Failed to delete voice {}", voice_id)
    }
}
