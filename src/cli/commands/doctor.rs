//! Doctor command - verify configuration and service connectivity.

use crate::cli::Output;
use crate::config::{Settings, PLATFORM_API_KEY_ENV, VOICE_API_KEY_ENV};
use crate::platform::PlatformClient;
use crate::report::format_file_size;
use crate::voice::VoiceClient;
use console::style;
use std::path::{Path, PathBuf};

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks. `config_path` is the `--config` override, if any.
pub async fn run_doctor(settings: &Settings, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    Output::header("docvox Doctor");
    println!();
    println!("Checking configuration and services...\n");

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);
    let section = vec![check_config_file(&config_path)];
    print_section(&section);
    checks.extend(section);

    println!("{}", style("Directories").bold());
    let section = check_directories(settings);
    print_section(&section);
    checks.extend(section);

    println!("{}", style("API Keys").bold());
    let section = vec![
        check_api_key(
            "Platform API key",
            PLATFORM_API_KEY_ENV,
            settings.platform_api_key(),
            true,
        ),
        check_api_key(
            "Voice API key",
            VOICE_API_KEY_ENV,
            settings.voice_api_key(),
            false,
        ),
    ];
    print_section(&section);
    checks.extend(section);

    println!("{}", style("Connectivity").bold());
    let mut section = Vec::new();
    if settings.platform_api_key().is_some() {
        section.push(check_platform(settings).await);
    }
    if settings.voice_api_key().is_some() {
        section.push(check_voice(settings).await);
    }
    if section.is_empty() {
        println!("  (skipped, no API keys configured)\n");
    } else {
        print_section(&section);
    }
    checks.extend(section);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using docvox.",
            errors
        ));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! docvox is ready to use.");
    }

    Ok(())
}

fn print_section(checks: &[CheckResult]) {
    for check in checks {
        check.print();
    }
    println!();
}

/// Mask a secret, keeping a short prefix and suffix.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_api_key(name: &str, env_var: &str, key: Option<String>, required: bool) -> CheckResult {
    let hint = format!("Set with: export {}='...'", env_var);
    match key {
        Some(key) => CheckResult::ok(name, &format!("configured ({})", mask_key(&key))),
        None if required => CheckResult::error(name, "not set", &hint),
        None => CheckResult::warning(name, "not set (narration and voice commands disabled)", &hint),
    }
}

fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    let mut results = vec![check_dir("Output directory", &settings.output_dir())];
    if let Some(log_dir) = settings.log_dir() {
        results.push(check_dir("Log directory", &log_dir));
    }
    results
}

fn check_dir(name: &str, dir: &Path) -> CheckResult {
    if !dir.exists() {
        return CheckResult::warning(
            name,
            &format!("{} (will be created)", dir.display()),
            "Directory will be created on first use",
        );
    }

    let total: u64 = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter_map(|e| e.metadata().ok())
                .filter(|m| m.is_file())
                .map(|m| m.len())
                .sum()
        })
        .unwrap_or(0);
    CheckResult::ok(
        name,
        &format!("{} ({})", dir.display(), format_file_size(total)),
    )
}

fn check_config_file(config_path: &Path) -> CheckResult {
    if !config_path.exists() {
        return CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: docvox config edit",
        );
    }
    match Settings::load_from(Some(&config_path.to_path_buf())) {
        Ok(_) => CheckResult::ok("Config file", &config_path.display().to_string()),
        Err(e) => CheckResult::error(
            "Config file",
            &e.to_string(),
            &format!("Fix or remove {}", config_path.display()),
        ),
    }
}

async fn check_platform(settings: &Settings) -> CheckResult {
    let name = "Platform";
    let client = match PlatformClient::from_settings(settings) {
        Ok(c) => c,
        Err(e) => return CheckResult::error(name, &e.to_string(), "Check [platform] settings"),
    };
    match client.list_models().await {
        Ok(models) => CheckResult::ok(
            name,
            &format!("{} ({} models)", settings.platform.api_base, models.len()),
        ),
        Err(e) => CheckResult::error(
            name,
            &e.to_string(),
            "Check the platform API key and platform.api_base",
        ),
    }
}

async fn check_voice(settings: &Settings) -> CheckResult {
    let name = "Voice service";
    let client = match VoiceClient::from_settings(settings) {
        Ok(c) => c,
        Err(e) => return CheckResult::error(name, &e.to_string(), "Check [voice] settings"),
    };
    match client.list_voices().await {
        Ok(voices) => CheckResult::ok(
            name,
            &format!("{} ({} voices)", settings.voice.api_base, voices.len()),
        ),
        Err(e) => CheckResult::warning(
            name,
            &e.to_string(),
            "Check the voice API key and voice.api_base",
        ),
    }
}
