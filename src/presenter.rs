//! Shapes a gateway result for display and download.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::GatewayError;
use crate::gateway::Reply;

pub const DOWNLOAD_FILENAME: &str = "genai_blog.txt";
pub const DOWNLOAD_MIME: &str = "text/plain";

/// Which path produced the displayed text.
///
/// The page renders all three the same way; the tag only tells API clients
/// whether they are looking at a model answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Generated,
    MissingInput,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub text: String,
    pub outcome: Outcome,
    pub error_kind: Option<&'static str>,
}

impl Presentation {
    pub fn from_result(result: &Result<Reply, GatewayError>) -> Self {
        match result {
            Ok(reply @ Reply::Generated(_)) => Self {
                text: reply.text().to_string(),
                outcome: Outcome::Generated,
                error_kind: None,
            },
            Ok(reply @ Reply::MissingInput) => Self {
                text: reply.text().to_string(),
                outcome: Outcome::MissingInput,
                error_kind: None,
            },
            Err(err) => Self {
                text: err.display_text(),
                outcome: Outcome::Error,
                error_kind: Some(err.kind()),
            },
        }
    }
}

/// Serves `text` unchanged as a plain-text attachment.
pub fn download(text: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, format!("{DOWNLOAD_MIME}; charset=utf-8")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
            ),
        ],
        text,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MISSING_INPUT_MESSAGE;

    #[test]
    fn generated_text_passes_through() {
        let text = "  # Title\n\n* one\n* two  \n";
        let p = Presentation::from_result(&Ok(Reply::Generated(text.to_string())));
        assert_eq!(p.text, text);
        assert_eq!(p.outcome, Outcome::Generated);
        assert_eq!(p.error_kind, None);
    }

    #[test]
    fn missing_input_shows_the_sentinel() {
        let p = Presentation::from_result(&Ok(Reply::MissingInput));
        assert_eq!(p.text, MISSING_INPUT_MESSAGE);
        assert_eq!(p.outcome, Outcome::MissingInput);
    }

    #[test]
    fn errors_render_as_text() {
        let p = Presentation::from_result(&Err(GatewayError::NetworkFailure(
            "connection refused".to_string(),
        )));
        assert_eq!(p.text, "Error: connection refused");
        assert_eq!(p.outcome, Outcome::Error);
        assert_eq!(p.error_kind, Some("network_failure"));
    }

    #[test]
    fn download_sets_attachment_headers() {
        let response = download("hello".to_string());
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"genai_blog.txt\""
        );
    }
}
