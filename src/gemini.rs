//! Client for the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::error::GatewayError;
use crate::gateway::{ContentGenerator, Part};

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

impl<'a> From<&Part<'a>> for RequestPart<'a> {
    fn from(part: &Part<'a>) -> Self {
        match *part {
            Part::Text(text) => RequestPart::Text { text },
            Part::Image(image) => RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: image.kind.mime_type(),
                    data: general_purpose::STANDARD.encode(&image.bytes),
                },
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    fn into_text(self) -> Result<String, GatewayError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GatewayError::InvalidInput(format!(
                "The prompt was blocked by the model (reason: {reason})"
            )));
        }

        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            GatewayError::Unknown("The model returned no candidates".to_string())
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(GatewayError::Unknown(format!(
                "The model returned no text (finish reason: {reason})"
            )));
        }

        Ok(text)
    }
}

/// Maps a non-success HTTP status and body to an error variant.
pub(crate) fn classify(status: u16, body: &str) -> GatewayError {
    let api = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let message = match &api {
        Some(api) if !api.message.is_empty() => format!("{status} {}", api.message),
        _ => format!("{status} {}", body.trim()),
    };
    let api_status = api.as_ref().map(|a| a.status.as_str()).unwrap_or_default();

    match status {
        401 | 403 => GatewayError::Unauthenticated(message),
        400 if body.contains("API_KEY_INVALID") || api_status == "UNAUTHENTICATED" => {
            GatewayError::Unauthenticated(message)
        }
        429 => GatewayError::RateLimited(message),
        400..=499 => GatewayError::InvalidInput(message),
        _ => GatewayError::Unknown(message),
    }
}

/// Talks to `{base_url}/v1beta/models/{model}:generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    #[instrument(skip_all, fields(model = %self.model, parts = parts.len()))]
    async fn generate_content(&self, parts: &[Part<'_>]) -> Result<String, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::Unauthenticated(
                "No API key configured. Set GOOGLE_API_KEY in the environment or .env file"
                    .to_string(),
            ));
        }

        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: parts.iter().map(RequestPart::from).collect(),
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                GatewayError::NetworkFailure(format!("Request to Gemini failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GatewayError::NetworkFailure(format!("Reading the Gemini response failed: {e}"))
        })?;

        debug!(
            status = status.as_u16(),
            body = %truncate_for_log(&body, 500),
            "Gemini response"
        );

        if !status.is_success() {
            return Err(classify(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::Unknown(format!("Could not parse the Gemini response: {e}"))
        })?;

        parsed.into_text()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}
