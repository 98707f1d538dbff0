//! Pre-flight checks before remote operations.
//!
//! Validates that the credentials an operation needs are configured before
//! any request is made.

use crate::config::{Settings, PLATFORM_API_KEY_ENV, VOICE_API_KEY_ENV};
use crate::error::{DocvoxError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Knowledge-base and model operations require the platform key.
    Platform,
    /// Voice operations require the voice key.
    Voice,
    /// Processing with narration requires both keys.
    ProcessAndNarrate,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Platform => check_platform_key(settings)?,
        Operation::Voice => check_voice_key(settings)?,
        Operation::ProcessAndNarrate => {
            check_platform_key(settings)?;
            check_voice_key(settings)?;
        }
    }
    Ok(())
}

fn check_platform_key(settings: &Settings) -> Result<()> {
    match settings.platform_api_key() {
        Some(_) => Ok(()),
        None => Err(DocvoxError::Config(format!(
            "Platform API key not set. Set it with: export {}='...'",
            PLATFORM_API_KEY_ENV
        ))),
    }
}

fn check_voice_key(settings: &Settings) -> Result<()> {
    match settings.voice_api_key() {
        Some(_) => Ok(()),
        None => Err(DocvoxError::Config(format!(
            "Voice API key not set (needed for audio). Set it with: export {}='...'",
            VOICE_API_KEY_ENV
        ))),
    }
}
