//! CLI command implementations.

mod config;
mod doctor;
mod kbs;
mod models;
mod narrate;
mod process;
mod upload;
mod voices;

pub use config::run_config;
pub use doctor::run_doctor;
pub use kbs::{run_create_kb, run_kbs};
pub use models::run_models;
pub use narrate::run_narrate;
pub use process::{run_process, ProcessOptions};
pub use upload::{run_find_file, run_upload};
pub use voices::run_voices;
