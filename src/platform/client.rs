//! HTTP client for the knowledge-base platform and its OpenAI-compatible model API.

use super::models::{
    AddFileRequest, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    CreateKnowledgeRequest, FileHandle, FileUpload, KnowledgeBase, ModelList,
};
use super::prompt::{
    augment_system_prompt, augment_user_prompt, DOCUMENT_READER_SYSTEM_PROMPT,
    DOCUMENT_READER_USER_PROMPT,
};
use super::{resolve_file_id, DocumentChat};
use crate::config::{Settings, PLATFORM_API_KEY_ENV};
use crate::error::{DocvoxError, LookupKind, Result};
use crate::http::{create_client_with_timeout, decode_json, timeout_from_secs};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, instrument};

/// Default base URL for file and knowledge-base management.
pub const DEFAULT_API_BASE: &str = "https://chat-api.tamu.ai";

/// Default base URL for model listing and chat completions.
pub const DEFAULT_OPENAI_BASE: &str = "https://chat-api.tamu.ai/openai";

/// Client for the knowledge-base platform.
pub struct PlatformClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    openai_base: String,
}

impl PlatformClient {
    /// Create a client against the default service URLs.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(api_key, DEFAULT_API_BASE, DEFAULT_OPENAI_BASE)
    }

    /// Create a client against custom service URLs.
    pub fn with_config(api_key: &str, api_base: &str, openai_base: &str) -> Result<Self> {
        Ok(Self {
            http: crate::http::create_client()?,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            openai_base: openai_base.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.platform_api_key().ok_or_else(|| {
            DocvoxError::Config(format!(
                "Platform API key not set. Set {} or platform.api_key in the config file",
                PLATFORM_API_KEY_ENV
            ))
        })?;

        let client = Self::with_config(
            &api_key,
            &settings.platform.api_base,
            &settings.platform.openai_base,
        )?;
        let http =
            create_client_with_timeout(timeout_from_secs(settings.general.request_timeout_secs))?;
        Ok(client.with_http_client(http))
    }

    /// Replace the underlying HTTP client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn management_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.api_base, path)
    }

    fn openai_url(&self, path: &str) -> String {
        format!("{}{}", self.openai_base, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
    }

    async fn send(
        &self,
        operation: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        self.authorized(builder)
            .send()
            .await
            .map_err(|e| DocvoxError::transport(operation, e))
    }

    /// List the identifiers of every invokable model.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let op = "List models";
        let response = self.send(op, self.http.get(self.openai_url("/models"))).await?;
        let list: ModelList = decode_json(op, response).await?;

        let models: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
        info!("Retrieved {} available models", models.len());
        Ok(models)
    }

    /// List every knowledge base visible to the credential, with nested files.
    #[instrument(skip(self))]
    pub async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBase>> {
        let op = "List knowledge bases";
        let response = self
            .send(op, self.http.get(self.management_url("/knowledge/list")))
            .await?;
        let kbs: Vec<KnowledgeBase> = decode_json(op, response).await?;

        info!("Retrieved {} knowledge bases", kbs.len());
        Ok(kbs)
    }

    /// Upload a file as multipart form data.
    ///
    /// An upload with neither a path nor non-empty bytes and a filename is
    /// rejected locally with [`DocvoxError::Validation`].
    #[instrument(skip(self, upload), fields(filename = ?upload.display_name()))]
    pub async fn upload_file(&self, upload: FileUpload) -> Result<FileHandle> {
        let (filename, bytes, purpose) = upload.into_parts().await?;
        let op = format!("Upload file '{}'", filename);

        debug!("Uploading {} bytes", bytes.len());
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.clone()))
            .text("purpose", purpose);

        let response = self
            .send(&op, self.http.post(self.management_url("/files/")).multipart(form))
            .await?;
        let handle: FileHandle = decode_json(&op, response).await?;

        info!("Uploaded file {} as {}", filename, handle.id);
        Ok(handle)
    }

    /// Search uploaded files by name and return the service's metadata as-is.
    #[instrument(skip(self))]
    pub async fn find_file(&self, file_name: &str) -> Result<serde_json::Value> {
        let op = format!("Find file '{}'", file_name);
        let request = self
            .http
            .get(self.management_url("/files/search"))
            .query(&[("filename", file_name)]);
        let response = self.send(&op, request).await?;
        let data = decode_json(&op, response).await?;

        info!("Found file: {}", file_name);
        Ok(data)
    }

    /// Create a new, empty knowledge base.
    #[instrument(skip(self, description))]
    pub async fn create_knowledge_base(&self, name: &str, description: &str) -> Result<KnowledgeBase> {
        let op = format!("Create knowledge base '{}'", name);
        let request = self
            .http
            .post(self.management_url("/knowledge/create"))
            .json(&CreateKnowledgeRequest { name, description });
        let response = self.send(&op, request).await?;
        let kb: KnowledgeBase = decode_json(&op, response).await?;

        info!("Created knowledge base {} ({})", kb.name, kb.id);
        Ok(kb)
    }

    /// Link an uploaded file into the knowledge base called `kb_name`.
    ///
    /// The name is resolved against a fresh listing; an unknown name fails with
    /// [`DocvoxError::NotFound`] without attempting the add.
    #[instrument(skip(self))]
    pub async fn add_file_to_knowledge_base(
        &self,
        kb_name: &str,
        file_id: &str,
    ) -> Result<serde_json::Value> {
        let kbs = self.list_knowledge_bases().await?;
        let kb_id = kbs
            .iter()
            .find(|kb| kb.name == kb_name)
            .map(|kb| kb.id.clone())
            .ok_or_else(|| DocvoxError::NotFound {
                kind: LookupKind::KnowledgeBase,
                name: kb_name.to_string(),
                scope: None,
                available: kbs.iter().map(|kb| kb.name.clone()).collect(),
            })?;

        let op = format!("Add file '{}' to knowledge base '{}'", file_id, kb_name);
        let request = self
            .http
            .post(self.management_url(&format!("/knowledge/{}/file/add", kb_id)))
            .json(&AddFileRequest { file_id });
        let response = self.send(&op, request).await?;
        let data = decode_json(&op, response).await?;

        info!("Added file {} to knowledge base {}", file_id, kb_name);
        Ok(data)
    }

    /// Run a single non-streaming chat completion and return the first choice's text.
    #[instrument(skip(self, system_prompt, user_prompt))]
    pub async fn chat_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String> {
        let op = "Chat completion";
        let body = ChatCompletionRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature,
            stream: false,
        };

        let request = self.http.post(self.openai_url("/chat/completions")).json(&body);
        let response = self.send(op, request).await?;
        let completion: ChatCompletionResponse = decode_json(op, response).await?;

        let content = completion
            .into_content()
            .map_err(|field| DocvoxError::malformed(op, format!("response is missing {}", field)))?;

        info!("Got chat completion (length: {})", content.len());
        Ok(content)
    }

    /// Ask the model about one knowledge-base document.
    ///
    /// Resolves the file against a fresh listing, appends the document block to
    /// both prompts, then runs [`chat_completion`](Self::chat_completion).
    #[instrument(skip(self, base_system_prompt, base_user_prompt))]
    pub async fn chat_with_file(
        &self,
        kb_name: &str,
        file_name: &str,
        base_system_prompt: &str,
        base_user_prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String> {
        let kbs = self.list_knowledge_bases().await?;
        let file_id = resolve_file_id(&kbs, kb_name, file_name)?;

        let system_prompt = augment_system_prompt(base_system_prompt, kb_name, &file_id, file_name);
        let user_prompt = augment_user_prompt(base_user_prompt, kb_name, &file_id, file_name);

        info!("Processing file {} from KB {}", file_name, kb_name);
        self.chat_completion(&system_prompt, &user_prompt, model, temperature)
            .await
    }

    /// Have the model read a document back verbatim.
    pub async fn file_content(&self, kb_name: &str, file_name: &str, model: &str) -> Result<String> {
        self.chat_with_file(
            kb_name,
            file_name,
            DOCUMENT_READER_SYSTEM_PROMPT,
            DOCUMENT_READER_USER_PROMPT,
            model,
            0.0,
        )
        .await
    }
}

#[async_trait]
impl DocumentChat for PlatformClient {
    async fn chat_with_file(
        &self,
        kb_name: &str,
        file_name: &str,
        base_system_prompt: &str,
        base_user_prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String> {
        PlatformClient::chat_with_file(
            self,
            kb_name,
            file_name,
            base_system_prompt,
            base_user_prompt,
            model,
            temperature,
        )
        .await
    }
}
