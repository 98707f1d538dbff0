//! docvox - knowledge-base documents in, answers and narration out
//!
//! Orchestrates two hosted services: an AI platform that stores documents in
//! knowledge bases and answers questions about them, and a voice service that
//! clones voices and turns answers into speech.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `platform` - Knowledge bases, uploads, and document chat
//! - `voice` - Voice cloning, preset voices, and speech synthesis
//! - `feedback` - Feedback-style framing for narrated answers
//! - `report` - Report and audio file output
//! - `history` - In-memory record of processed documents
//! - `pipeline` - Batch processing and narration
//!
//! # Example
//!
//! ```rust,no_run
//! use docvox::config::Settings;
//! use docvox::pipeline::{ChatRequest, FileTarget, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut pipeline = Pipeline::from_settings(&settings)?;
//!
//!     let request = ChatRequest::from(&settings.chat);
//!     let entry = pipeline
//!         .process_file(&FileTarget::new("CS101", "syllabus.pdf"), &request)
//!         .await?;
//!     println!("Report written to {}", entry.doc_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod history;
pub mod http;
pub mod pipeline;
pub mod platform;
pub mod report;
pub mod voice;

pub use error::{DocvoxError, Result};
