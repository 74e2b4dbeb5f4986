//! The boundary between the page and the generation service.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::GatewayError;
use crate::input::UploadedImage;

/// Returned instead of calling the model when there is nothing to send.
pub const MISSING_INPUT_MESSAGE: &str = "Please provide input text or upload an image.";

/// One element of the ordered content list sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part<'a> {
    Text(&'a str),
    Image(&'a UploadedImage),
}

/// Something that can turn an ordered list of parts into text.
///
/// [`crate::GeminiClient`] is the production implementation.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(&self, parts: &[Part<'_>]) -> Result<String, GatewayError>;

    /// Model identifier, for display.
    fn model(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Generated(String),
    /// Neither a prompt nor an image was supplied.
    MissingInput,
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Generated(text) => text,
            Reply::MissingInput => MISSING_INPUT_MESSAGE,
        }
    }
}

#[derive(Clone)]
pub struct Gateway {
    generator: Arc<dyn ContentGenerator>,
}

impl Gateway {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Sends the prompt and/or image to the model in a single call.
    ///
    /// With both present the text part comes first. An empty prompt counts as
    /// absent. With neither present no call is made and
    /// [`Reply::MissingInput`] is returned.
    #[instrument(skip_all, fields(model = %self.generator.model()))]
    pub async fn generate(
        &self,
        prompt: Option<&str>,
        image: Option<&UploadedImage>,
    ) -> Result<Reply, GatewayError> {
        let prompt = prompt.filter(|p| !p.is_empty());

        let parts = match (prompt, image) {
            (Some(prompt), Some(image)) => vec![Part::Text(prompt), Part::Image(image)],
            (None, Some(image)) => vec![Part::Image(image)],
            (Some(prompt), None) => vec![Part::Text(prompt)],
            (None, None) => {
                debug!("No prompt or image, skipping model call");
                return Ok(Reply::MissingInput);
            }
        };

        info!(parts = parts.len(), with_image = image.is_some(), "📤 Sending request to model");

        match self.generator.generate_content(&parts).await {
            Ok(text) => {
                info!(chars = text.chars().count(), "✅ Model replied");
                Ok(Reply::Generated(text))
            }
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "Model call failed");
                Err(err)
            }
        }
    }
}
