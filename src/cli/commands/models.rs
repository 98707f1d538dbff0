//! Models command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::platform::PlatformClient;
use anyhow::Result;

/// Run the models command.
pub async fn run_models(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Platform, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'docvox doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let client = PlatformClient::from_settings(&settings)?;
    let spinner = Output::spinner("Fetching models...");

    match client.list_models().await {
        Ok(models) => {
            spinner.finish_and_clear();
            Output::header(&format!("Available Models ({})", models.len()));
            for model in &models {
                if *model == settings.chat.model {
                    Output::list_item(&format!("{} (default)", model));
                } else {
                    Output::list_item(model);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to list models: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
