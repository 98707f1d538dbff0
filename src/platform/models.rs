//! Wire types for the knowledge-base platform.

use crate::error::{DocvoxError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A knowledge base as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Null and absent both mean "no files".
    #[serde(default)]
    pub files: Option<Vec<KnowledgeFile>>,
}

impl KnowledgeBase {
    /// Files in this knowledge base, in service order.
    pub fn files(&self) -> &[KnowledgeFile] {
        self.files.as_deref().unwrap_or_default()
    }

    /// Display names of the files that have one.
    pub fn file_names(&self) -> Vec<String> {
        self.files()
            .iter()
            .filter_map(|f| f.name().map(str::to_string))
            .collect()
    }
}

/// A file entry nested under a knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeFile {
    pub id: String,
    #[serde(default)]
    pub meta: FileMeta,
}

impl KnowledgeFile {
    /// Display name, read from `meta.name`.
    pub fn name(&self) -> Option<&str> {
        self.meta.name.as_deref()
    }
}

/// File metadata. Only the name is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Service-assigned handle for an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHandle {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub meta: Option<FileMeta>,
}

/// A file to upload: either a path on disk, or in-memory bytes with a filename.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_path: Option<PathBuf>,
    pub file_bytes: Option<Vec<u8>>,
    pub filename: Option<String>,
    pub purpose: String,
}

impl Default for FileUpload {
    fn default() -> Self {
        Self {
            file_path: None,
            file_bytes: None,
            filename: None,
            purpose: "fine-tune".to_string(),
        }
    }
}

impl FileUpload {
    /// Upload the file at `path`, named after its last path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Upload in-memory content under `filename`.
    pub fn from_bytes(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            file_bytes: Some(bytes),
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    /// Set the upload purpose.
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    /// Name the upload will carry, if the upload is well-formed.
    pub fn display_name(&self) -> Option<String> {
        if let Some(path) = &self.file_path {
            return path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string);
        }
        self.filename.clone().filter(|n| !n.is_empty())
    }

    /// Resolve to `(filename, bytes)`. A path wins over in-memory content.
    pub(crate) async fn into_parts(self) -> Result<(String, Vec<u8>, String)> {
        if let Some(path) = &self.file_path {
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    DocvoxError::Validation(format!(
                        "Upload path has no file name: {}",
                        path.display()
                    ))
                })?;
            let bytes = tokio::fs::read(path).await?;
            return Ok((filename, bytes, self.purpose));
        }

        match (self.file_bytes, self.filename) {
            (Some(bytes), Some(filename)) if !bytes.is_empty() && !filename.is_empty() => {
                Ok((filename, bytes, self.purpose))
            }
            _ => Err(DocvoxError::Validation(
                "Must provide either file_path or (file_bytes and filename)".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelList {
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateKnowledgeRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddFileRequest<'a> {
    pub file_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Pull out `choices[0].message.content`, naming the first missing link.
    pub fn into_content(self) -> std::result::Result<String, &'static str> {
        let choice = self
            .choices
            .ok_or("choices")?
            .into_iter()
            .next()
            .ok_or("choices[0]")?;
        let message = choice.message.ok_or("choices[0].message")?;
        message.content.ok_or("choices[0].message.content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_base_null_files() {
        let kbs: Vec<KnowledgeBase> = serde_json::from_str(
            r#"[{"id": "kb1", "name": "Empty", "files": null},
                {"id": "kb2", "name": "Bare"}]"#,
        )
        .unwrap();
        assert!(kbs[0].files().is_empty());
        assert!(kbs[1].files().is_empty());
    }

    #[test]
    fn test_file_names_skip_unnamed() {
        let kb: KnowledgeBase = serde_json::from_str(
            r#"{"id": "kb", "name": "CS101", "files": [
                {"id": "f-1", "meta": {"name": "a.pdf", "size": 10}},
                {"id": "f-2"},
                {"id": "f-3", "meta": {"name": "b.pdf"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(kb.file_names(), vec!["a.pdf", "b.pdf"]);
        assert_eq!(kb.files()[1].name(), None);
    }

    #[test]
    fn test_content_path_reports_missing_link() {
        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(empty.into_content(), Err("choices[0]"));

        let none: ChatCompletionResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(none.into_content(), Err("choices"));

        let no_content: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#).unwrap();
        assert_eq!(no_content.into_content(), Err("choices[0].message.content"));

        let ok: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "hi"}}]}"#).unwrap();
        assert_eq!(ok.into_content(), Ok("hi".to_string()));
    }

    #[tokio::test]
    async fn test_upload_requires_source() {
        let err = FileUpload::default().into_parts().await.unwrap_err();
        assert!(matches!(err, DocvoxError::Validation(_)));

        let err = FileUpload::from_bytes(Vec::new(), "empty.txt")
            .into_parts()
            .await
            .unwrap_err();
        assert!(matches!(err, DocvoxError::Validation(_)));

        let (name, bytes, purpose) = FileUpload::from_bytes(b"x".to_vec(), "x.txt")
            .with_purpose("assistants")
            .into_parts()
            .await
            .unwrap();
        assert_eq!((name.as_str(), bytes.len(), purpose.as_str()), ("x.txt", 1, "assistants"));
    }
}
