//! Knowledge-base platform: file and knowledge-base management plus chat
//! completions grounded in a selected document.

mod client;
mod models;
mod prompt;

pub use client::{PlatformClient, DEFAULT_API_BASE, DEFAULT_OPENAI_BASE};
pub use models::{FileHandle, FileMeta, FileUpload, KnowledgeBase, KnowledgeFile};
pub use prompt::{
    augment_system_prompt, augment_user_prompt, DOCUMENT_READER_SYSTEM_PROMPT,
    DOCUMENT_READER_USER_PROMPT,
};

use crate::error::{DocvoxError, LookupKind, Result};
use async_trait::async_trait;
use tracing::debug;

/// Trait for services that answer prompts about a knowledge-base document.
#[async_trait]
pub trait DocumentChat: Send + Sync {
    /// Ask the model about `file_name` in `kb_name` and return its answer.
    async fn chat_with_file(
        &self,
        kb_name: &str,
        file_name: &str,
        base_system_prompt: &str,
        base_user_prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String>;
}

/// Find a file's identifier by knowledge-base name and file name.
///
/// Only the first knowledge base named `kb_name` is searched. On failure the
/// error lists the knowledge-base names (unknown KB) or that KB's file names
/// (unknown file) seen in `kbs`.
pub fn resolve_file_id(kbs: &[KnowledgeBase], kb_name: &str, file_name: &str) -> Result<String> {
    let kb = kbs
        .iter()
        .find(|kb| kb.name == kb_name)
        .ok_or_else(|| DocvoxError::NotFound {
            kind: LookupKind::KnowledgeBase,
            name: kb_name.to_string(),
            scope: None,
            available: kbs.iter().map(|kb| kb.name.clone()).collect(),
        })?;

    let file = kb
        .files()
        .iter()
        .find(|f| f.name() == Some(file_name))
        .ok_or_else(|| DocvoxError::NotFound {
            kind: LookupKind::File,
            name: file_name.to_string(),
            scope: Some(kb_name.to_string()),
            available: kb.file_names(),
        })?;

    debug!("Found file ID {} for {} in {}", file.id, file_name, kb_name);
    Ok(file.id.clone())
}
