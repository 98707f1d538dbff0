//! Output artifacts: text reports and narration audio files.

use crate::error::Result;
use crate::feedback::AudioStyle;
use crate::voice::Emotion;
use chrono::{DateTime, Local};
use regex::Regex;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

/// Title line of every report.
pub const REPORT_TITLE: &str = "AI Generated Response";

const MAX_STEM_LEN: usize = 100;

fn invalid_chars() -> &'static Regex {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    INVALID.get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Invalid regex"))
}

/// Render a report for `content`.
pub fn render_report(content: &str, generated_at: DateTime<Local>) -> String {
    format!(
        "# {}\n\nGenerated on: {}\n\n{}\n\n{}\n",
        REPORT_TITLE,
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        "_".repeat(80),
        content
    )
}

/// Turn a document name into a safe file stem.
///
/// Drops the last extension, replaces characters that are invalid in file
/// names with `_`, and caps the length at 100 characters.
pub fn sanitize_filename(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => filename,
    };
    invalid_chars()
        .replace_all(stem, "_")
        .chars()
        .take(MAX_STEM_LEN)
        .collect()
}

/// Format a byte count with binary units.
pub fn format_file_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

fn timestamp_tag(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// File name for a report about `file_name`.
pub fn report_filename(file_name: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.md", sanitize_filename(file_name), timestamp_tag(at))
}

/// File name for narration of `file_name`.
pub fn audio_filename(
    file_name: &str,
    emotion: Emotion,
    style: AudioStyle,
    at: DateTime<Local>,
) -> String {
    format!(
        "{}_{}_{}_{}.mp3",
        sanitize_filename(file_name),
        emotion,
        style.suffix(),
        timestamp_tag(at)
    )
}

/// Write a report for `file_name` into `dir` and return its path.
///
/// Never overwrites: a name already taken in `dir` gets a `_2`, `_3`, ...
/// suffix.
pub fn write_report(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    let now = Local::now();
    let name = report_filename(file_name, now);
    let path = write_new(dir, &name, render_report(content, now).as_bytes())?;
    info!("Created report: {}", path.display());
    Ok(path)
}

/// Write narration audio for `file_name` into `dir` and return its path.
/// Existing files are kept, as with [`write_report`].
pub fn write_audio(
    dir: &Path,
    file_name: &str,
    emotion: Emotion,
    style: AudioStyle,
    bytes: &[u8],
) -> Result<PathBuf> {
    let name = audio_filename(file_name, emotion, style, Local::now());
    let path = write_new(dir, &name, bytes)?;
    info!("Saved audio file: {} ({})", path.display(), format_file_size(bytes.len() as u64));
    Ok(path)
}

/// Create a new file named `name` (or the first free `stem_N.ext`) in `dir`.
fn write_new(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let (stem, ext) = name.rsplit_once('.').unwrap_or((name, ""));

    let mut n = 1usize;
    loop {
        let candidate = match (n, ext.is_empty()) {
            (1, _) => name.to_string(),
            (_, true) => format!("{}_{}", stem, n),
            (_, false) => format!("{}_{}.{}", stem, n, ext),
        };
        let path = dir.join(candidate);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(bytes)?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Recover the answer from a rendered report, or `None` if `text` is not one.
pub fn report_body(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(format!("# {}\n\n", REPORT_TITLE).as_str())?;
    let rest = rest.strip_prefix("Generated on: ")?;
    let (_, rest) = rest.split_once('\n')?;
    let rest = rest.strip_prefix('\n')?;
    let rest = rest.strip_prefix("_".repeat(80).as_str())?;
    let rest = rest.strip_prefix("\n\n")?;
    Some(rest.strip_suffix('\n').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("notes.pdf"), "notes");
        assert_eq!(sanitize_filename("a.b.c"), "a.b");
        assert_eq!(sanitize_filename("What? <draft>|v2.docx"), "What_ _draft__v2");
        assert_eq!(sanitize_filename("no_extension"), "no_extension");
        assert_eq!(sanitize_filename(&"x".repeat(150)).len(), 100);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500.00 B");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_file_size(3 * 1024u64.pow(4)), "3.00 TB");
    }

    #[test]
    fn test_file_names() {
        let at = fixed_time();
        assert_eq!(report_filename("notes.pdf", at), "notes_20240309_140507.md");
        assert_eq!(
            audio_filename("notes.pdf", Emotion::Happy, AudioStyle::Feedback, at),
            "notes_happy_feedback_20240309_140507.mp3"
        );
    }

    #[test]
    fn test_render_report() {
        let report = render_report("The answer.", fixed_time());
        assert!(report.starts_with("# AI Generated Response\n\nGenerated on: 2024-03-09 14:05:07\n"));
        assert!(report.contains(&"_".repeat(80)));
        assert!(report.ends_with("The answer.\n"));
    }

    #[test]
    fn test_write_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let report = write_report(dir.path(), "notes.pdf", "body").unwrap();
        assert!(std::fs::read_to_string(&report).unwrap().contains("body"));

        let audio = write_audio(dir.path(), "notes.pdf", Emotion::Sad, AudioStyle::Direct, b"ID3")
            .unwrap();
        assert_eq!(std::fs::read(&audio).unwrap(), b"ID3");
        assert!(audio.file_name().unwrap().to_str().unwrap().starts_with("notes_sad_direct_"));
    }

    #[test]
    fn test_same_stem_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_report(dir.path(), "notes.pdf", "first answer").unwrap();
        let second = write_report(dir.path(), "notes.docx", "second answer").unwrap();

        assert_ne!(first, second);
        assert!(std::fs::read_to_string(&first).unwrap().contains("first answer"));
        assert!(std::fs::read_to_string(&second).unwrap().contains("second answer"));
    }

    #[test]
    fn test_write_new_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_new(dir.path(), "x.md", b"a").unwrap();
        let b = write_new(dir.path(), "x.md", b"b").unwrap();
        let c = write_new(dir.path(), "x.md", b"c").unwrap();
        assert_eq!(a.file_name().unwrap(), "x.md");
        assert_eq!(b.file_name().unwrap(), "x_2.md");
        assert_eq!(c.file_name().unwrap(), "x_3.md");
        assert_eq!(std::fs::read(&a).unwrap(), b"a");
    }

    #[test]
    fn test_report_body_inverts_render() {
        let content = "Line one.\n\nLine two.";
        assert_eq!(report_body(&render_report(content, fixed_time())), Some(content));
        assert_eq!(report_body("Just some notes."), None);
    }
}
