//! Process command implementation.

use super::narrate::Narration;
use crate::cli::preflight::{self, Operation};
use crate::cli::{NarrationArgs, Output};
use crate::config::{check_temperature, Settings};
use crate::pipeline::{ChatRequest, FileTarget, Pipeline};
use crate::platform::PlatformClient;
use crate::report::format_file_size;
use anyhow::Result;
use tracing::{debug, error};

/// Options for the process command.
pub struct ProcessOptions {
    pub kb: Option<String>,
    pub files: Vec<String>,
    pub all: bool,
    pub targets: Vec<FileTarget>,
    pub system: Option<String>,
    pub user: Option<String>,
    pub instructions: Option<FileTarget>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub narrate: bool,
    pub narration: NarrationArgs,
}

/// Run the process command.
pub async fn run_process(opts: ProcessOptions, settings: Settings) -> Result<()> {
    let operation = if opts.narrate {
        Operation::ProcessAndNarrate
    } else {
        Operation::Platform
    };
    if let Err(e) = preflight::check(operation, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'docvox doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut request = ChatRequest::from(&settings.chat);
    if let Some(model) = &opts.model {
        request.model = model.clone();
    }
    if let Some(temperature) = opts.temperature {
        check_temperature(temperature)?;
        request.temperature = temperature;
    }
    if let Some(user) = &opts.user {
        request.user_prompt = user.clone();
    }
    if let Some(system) = &opts.system {
        request.system_prompt = system.clone();
    }

    // Validate narration options before spending any chat calls.
    let narration = if opts.narrate {
        Some(Narration::from_args(&opts.narration, &settings)?)
    } else {
        None
    };

    let client = PlatformClient::from_settings(&settings)?;

    let kb_files = match (&opts.kb, opts.all) {
        (Some(kb_name), true) => {
            let kbs = client.list_knowledge_bases().await?;
            match kbs.iter().find(|kb| &kb.name == kb_name) {
                Some(kb) => kb.file_names(),
                None => anyhow::bail!("Knowledge base '{}' not found", kb_name),
            }
        }
        _ => opts.files.clone(),
    };

    let targets = collect_targets(opts.kb.as_deref(), &kb_files, &opts.targets)?;

    if let Some(source) = &opts.instructions {
        let spinner = Output::spinner(&format!("Loading instructions from {}...", source));
        let loaded = client
            .file_content(&source.kb_name, &source.file_name, &request.model)
            .await;
        spinner.finish_and_clear();
        match loaded {
            Ok(text) => {
                debug!("Loaded {} chars of instructions", text.len());
                request.system_prompt = text;
                Output::success(&format!("Loaded instructions from {}", source));
            }
            Err(e) => {
                Output::error(&format!("Error loading instructions: {}", e));
                return Err(e.into());
            }
        }
    }

    let mut pipeline = Pipeline::from_settings(&settings)?;

    Output::info(&format!(
        "Processing {} file(s) with {}",
        targets.len(),
        request.model
    ));
    let pb = Output::progress_bar(targets.len() as u64, "Processing");
    let report = pipeline.process_batch(&targets, &request, Some(&pb)).await;
    pb.finish_and_clear();

    for (target, outcome) in &report.outcomes {
        match outcome {
            Ok(entry) => {
                Output::answer_preview(&entry.file_name, &entry.response);
                Output::kv("Report", &entry.doc_path.display().to_string());
            }
            Err(e) => Output::error(&format!("Error processing {}: {}", target, e)),
        }
    }

    if let Some(narration) = &narration {
        Output::header(&format!(
            "Narration ({}, {}, {})",
            narration.voice_label, narration.emotion, narration.style
        ));
        for entry in pipeline.history().entries() {
            let result = pipeline
                .narrate(
                    &entry.response,
                    &entry.file_name,
                    &narration.voice_id,
                    &narration.emotion,
                    narration.style,
                )
                .await;
            match result {
                Ok(audio) => Output::kv(
                    &entry.file_name,
                    &format!(
                        "{} ({})",
                        audio.path.display(),
                        format_file_size(audio.size_bytes as u64)
                    ),
                ),
                Err(e) => {
                    error!("Error generating audio for {}: {}", entry.file_name, e);
                    Output::error(&format!("Error generating audio for {}: {}", entry.file_name, e));
                }
            }
        }
    }

    println!();
    Output::success(&format!(
        "Processed {} of {} file(s)",
        report.succeeded(),
        targets.len()
    ));
    Output::kv("Output directory", &pipeline.output_dir().display().to_string());

    if report.failed() > 0 {
        anyhow::bail!("{} file(s) failed", report.failed());
    }

    Ok(())
}

/// Combine `kb` + `files` with explicit `KB:FILE` targets, keeping order and
/// dropping duplicates.
fn collect_targets(
    kb: Option<&str>,
    files: &[String],
    extra: &[FileTarget],
) -> Result<Vec<FileTarget>> {
    if kb.is_none() && !files.is_empty() {
        anyhow::bail!("File names need --kb (or use --target KB:FILE)");
    }

    let mut targets: Vec<FileTarget> = Vec::new();
    let from_kb = kb
        .into_iter()
        .flat_map(|kb_name| files.iter().map(move |f| FileTarget::new(kb_name, f.as_str())));

    for target in from_kb.chain(extra.iter().cloned()) {
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    if targets.is_empty() {
        anyhow::bail!("No files selected. Pass file names with --kb, --all, or --target KB:FILE");
    }
    Ok(targets)
}
