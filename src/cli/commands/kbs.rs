//! Knowledge base listing and creation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::platform::PlatformClient;
use anyhow::Result;

/// Run the kbs command.
pub async fn run_kbs(kb_filter: Option<&str>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Platform, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let client = PlatformClient::from_settings(&settings)?;
    let kbs = match client.list_knowledge_bases().await {
        Ok(kbs) => kbs,
        Err(e) => {
            Output::error(&format!("Failed to list knowledge bases: {}", e));
            return Err(e.into());
        }
    };

    let shown: Vec<_> = kbs
        .iter()
        .filter(|kb| kb_filter.map_or(true, |name| kb.name == name))
        .collect();

    if shown.is_empty() {
        match kb_filter {
            Some(name) => {
                Output::warning(&format!("Knowledge base '{}' not found.", name));
                let names: Vec<&str> = kbs.iter().map(|kb| kb.name.as_str()).collect();
                Output::info(&format!("Available: {}", names.join(", ")));
            }
            None => Output::info("No knowledge bases yet. Create one with 'docvox create-kb <name>'."),
        }
        return Ok(());
    }

    Output::header(&format!("Knowledge Bases ({})", shown.len()));
    for kb in &shown {
        Output::kb_info(&kb.name, &kb.id, kb.files().len());
        if kb.files().is_empty() {
            println!("    (no files)");
        }
        for file in kb.files() {
            Output::file_item(file.name().unwrap_or("Unnamed"), &file.id);
        }
    }

    let total_files: usize = shown.iter().map(|kb| kb.files().len()).sum();
    println!();
    Output::kv("Total files", &total_files.to_string());

    Ok(())
}

/// Run the create-kb command.
pub async fn run_create_kb(name: &str, description: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Platform, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let client = PlatformClient::from_settings(&settings)?;
    match client.create_knowledge_base(name, description).await {
        Ok(kb) => {
            Output::success(&format!("Created knowledge base '{}'", kb.name));
            Output::kv("ID", &kb.id);
        }
        Err(e) => {
            Output::error(&format!("Failed to create knowledge base: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
