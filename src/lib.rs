//! Blog title, article and topic generator backed by Google Gemini.
//!
//! The crate serves a single page, collects a task, a topic and an optional
//! image, turns the task and topic into a prompt, and forwards text and image
//! parts to the Gemini `generateContent` endpoint.

pub mod config;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod input;
pub mod page;
pub mod presenter;
pub mod server;
pub mod task;

pub use config::Config;
pub use error::{AppError, GatewayError};
pub use gateway::{ContentGenerator, Gateway, Part, Reply, MISSING_INPUT_MESSAGE};
pub use gemini::GeminiClient;
pub use input::{GenerateForm, ImageKind, UploadedImage};
pub use presenter::{Outcome, Presentation, DOWNLOAD_FILENAME, DOWNLOAD_MIME};
pub use server::{app, AppState};
pub use task::{build_prompt, Task};
