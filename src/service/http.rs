//! HTTP suggestion service client
//!
//! Talks to the writing copilot backend's `POST /auto_suggest` endpoint.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{ServiceRequest, ServiceResponse, SuggestionService, TransportError};
use crate::config::ServiceConfig;
use crate::suggestion::{SuggestionItem, SuggestionType, clamp_confidence};

/// Path of the suggestion endpoint, relative to the configured base URL
const AUTO_SUGGEST_PATH: &str = "/auto_suggest";

/// Request body sent to the service
#[derive(Debug, Serialize)]
struct AutoSuggestBody<'a> {
    user_id: &'a str,
    session_id: &'a str,
    context_id: String,
    current_text: &'a str,
    cursor_position: usize,
}

/// Response body as sent by the service
#[derive(Debug, Deserialize)]
struct AutoSuggestResponse {
    suggestions: Vec<WireSuggestion>,
    #[serde(default)]
    suggestion_type: Option<String>,
    #[serde(default)]
    confidence_score: Option<f32>,
}

/// A suggestion is either a bare string or a structured object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireSuggestion {
    Text(String),
    Item {
        text: String,
        #[serde(default)]
        confidence: Option<f32>,
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
}

/// HTTP implementation of [`SuggestionService`]
#[derive(Debug, Clone)]
pub struct HttpSuggestionService {
    client: reqwest::Client,
    url: String,
}

impl HttpSuggestionService {
    /// Create a client from configuration
    ///
    /// Returns an error if the endpoint is empty or the HTTP client cannot
    /// be built.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, TransportError> {
        let endpoint = config.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(TransportError::NotConfigured(
                "Missing or empty endpoint in [service] config".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            url: format!("{}{}", endpoint, AUTO_SUGGEST_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SuggestionService for HttpSuggestionService {
    fn request_suggestions(
        &self,
        request: ServiceRequest,
    ) -> BoxFuture<'static, Result<ServiceResponse, TransportError>> {
        let client = self.client.clone();
        let url = self.url.clone();

        async move {
            let body = build_request_body(&request);
            let response = client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(TransportError::Api {
                    code: status.as_u16(),
                    message,
                });
            }

            let text = response.text().await.map_err(map_reqwest_error)?;
            parse_response(&text)
        }
        .boxed()
    }
}

fn build_request_body(request: &ServiceRequest) -> AutoSuggestBody<'_> {
    AutoSuggestBody {
        user_id: &request.user_id,
        session_id: &request.session_id,
        context_id: request.context_id.to_string(),
        current_text: &request.text,
        cursor_position: request.cursor,
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_decode() {
        TransportError::Parse(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

/// Parse a response body into suggestions
///
/// Items without their own type or confidence inherit the response-level
/// `suggestion_type` / `confidence_score`.
pub(crate) fn parse_response(body: &str) -> Result<ServiceResponse, TransportError> {
    let wire: AutoSuggestResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Parse(e.to_string()))?;

    let suggestion_type = wire
        .suggestion_type
        .as_deref()
        .map(SuggestionType::parse_type)
        .unwrap_or_default();
    let confidence_score = wire.confidence_score.unwrap_or(0.0);

    let suggestions = wire
        .suggestions
        .into_iter()
        .map(|suggestion| match suggestion {
            WireSuggestion::Text(text) => {
                SuggestionItem::new(text, suggestion_type, confidence_score)
            }
            WireSuggestion::Item {
                text,
                confidence,
                kind,
            } => SuggestionItem::new(
                text,
                kind.as_deref()
                    .map(SuggestionType::parse_type)
                    .unwrap_or(suggestion_type),
                confidence.unwrap_or(confidence_score),
            ),
        })
        .collect();

    Ok(ServiceResponse {
        suggestions,
        suggestion_type,
        confidence_score: clamp_confidence(confidence_score),
    })
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
