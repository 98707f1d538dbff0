//! Upload and file search commands.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::platform::{FileUpload, PlatformClient};
use anyhow::Result;
use std::path::PathBuf;
use tracing::error;

/// Run the upload command.
pub async fn run_upload(
    files: &[PathBuf],
    kb: Option<&str>,
    purpose: &str,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Platform, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let client = PlatformClient::from_settings(&settings)?;
    let pb = Output::progress_bar(files.len() as u64, "Uploading");
    let mut failures = 0usize;

    for path in files {
        let shown = path.display().to_string();
        pb.set_message(shown.clone());

        let result = async {
            let handle = client
                .upload_file(FileUpload::from_path(path).with_purpose(purpose))
                .await?;
            if let Some(kb_name) = kb {
                client.add_file_to_knowledge_base(kb_name, &handle.id).await?;
            }
            Ok::<_, crate::error::DocvoxError>(handle)
        }
        .await;

        match result {
            Ok(handle) => pb.println(format!("  uploaded {} ({})", shown, handle.id)),
            Err(e) => {
                failures += 1;
                error!("Upload error for {}: {}", shown, e);
                pb.println(format!("  failed {}: {}", shown, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let uploaded = files.len() - failures;
    match kb {
        Some(kb_name) => Output::success(&format!("Uploaded {} file(s) to '{}'", uploaded, kb_name)),
        None => Output::success(&format!("Uploaded {} file(s)", uploaded)),
    }

    if failures > 0 {
        Output::warning(&format!("{} upload(s) failed", failures));
        anyhow::bail!("{} of {} uploads failed", failures, files.len());
    }

    Ok(())
}

/// Run the find-file command.
pub async fn run_find_file(name: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Platform, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let client = PlatformClient::from_settings(&settings)?;
    match client.find_file(name).await {
        Ok(found) => println!("{}", serde_json::to_string_pretty(&found)?),
        Err(e) => {
            Output::error(&format!("Failed to find file '{}': {}", name, e));
            return Err(e.into());
        }
    }

    Ok(())
}
