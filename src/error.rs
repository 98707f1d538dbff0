//! Error types for docvox.

use thiserror::Error;

/// Library-level error type for docvox operations.
#[derive(Error, Debug)]
pub enum DocvoxError {
    /// A remote service answered with a non-success status, failed in transport,
    /// or returned a payload that does not have the expected shape.
    #[error("{operation} failed: {message}")]
    RemoteService {
        operation: String,
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A name lookup against an already-fetched snapshot failed.
    #[error("{kind} '{name}' not found{}. Available: {available:?}", scope_suffix(.scope))]
    NotFound {
        kind: LookupKind,
        name: String,
        scope: Option<String>,
        available: Vec<String>,
    },

    /// Synthesis succeeded at the transport level but produced no audio.
    #[error("Voice service returned empty audio data for voice '{voice_id}'")]
    EmptyAudio { voice_id: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// What a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    KnowledgeBase,
    File,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::KnowledgeBase => write!(f, "Knowledge base"),
            LookupKind::File => write!(f, "File"),
        }
    }
}

fn scope_suffix(scope: &Option<String>) -> String {
    match scope {
        Some(kb) => format!(" in KB '{}'", kb),
        None => String::new(),
    }
}

impl DocvoxError {
    /// Build a remote-service error for a response that did not have the expected shape.
    pub fn malformed(operation: &str, message: impl Into<String>) -> Self {
        DocvoxError::RemoteService {
            operation: operation.to_string(),
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Build a remote-service error for a non-success HTTP status.
    pub fn status(operation: &str, status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body.trim())
        };
        DocvoxError::RemoteService {
            operation: operation.to_string(),
            message,
            status: Some(status),
            source: None,
        }
    }

    /// Build a remote-service error from a transport or decoding failure.
    pub fn transport(operation: &str, err: reqwest::Error) -> Self {
        DocvoxError::RemoteService {
            operation: operation.to_string(),
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
            source: Some(err),
        }
    }

    /// The alternatives a failed lookup saw, if this is a lookup failure.
    pub fn available(&self) -> Option<&[String]> {
        match self {
            DocvoxError::NotFound { available, .. } => Some(available),
            _ => None,
        }
    }
}

/// Result type alias for docvox operations.
pub type Result<T> = std::result::Result<T, DocvoxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_lists_alternatives() {
        let err = DocvoxError::NotFound {
            kind: LookupKind::File,
            name: "missing.pdf".to_string(),
            scope: Some("CS101".to_string()),
            available: vec!["syllabus.pdf".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "File 'missing.pdf' not found in KB 'CS101'. Available: [\"syllabus.pdf\"]"
        );
        assert_eq!(err.available(), Some(&["syllabus.pdf".to_string()][..]));
    }

    #[test]
    fn test_status_error_keeps_body() {
        let err = DocvoxError::status("Upload file 'a.pdf'", 413, "too large\n");
        assert_eq!(err.to_string(), "Upload file 'a.pdf' failed: HTTP 413: too large");
        assert!(matches!(err, DocvoxError::RemoteService { status: Some(413), .. }));
    }
}
