//! Client for the remote "Ask" endpoint.
//!
//! The endpoint takes `{ "question": string }` and answers with
//! `{ "answer": string }` on success or `{ "detail": string }` on failure.

use async_trait::async_trait;
use dioxus::logger::tracing::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::EndpointDescriptor;

pub const REJECTED_FALLBACK: &str = "Something went wrong.";
pub const UNREACHABLE_MESSAGE: &str = "Server not reachable.";

#[derive(Debug, Error)]
pub enum AskError {
    /// The endpoint answered with a non-success status.
    #[error("endpoint rejected the question ({status}): {}", .detail.as_deref().unwrap_or(REJECTED_FALLBACK))]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
    /// Transport failure, or a body that could not be decoded.
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
}

impl AskError {
    /// Text shown inline and in the notification.
    pub fn user_message(&self) -> String {
        match self {
            AskError::Rejected { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| REJECTED_FALLBACK.to_string()),
            AskError::Unreachable(_) => UNREACHABLE_MESSAGE.to_string(),
        }
    }
}

#[async_trait(?Send)]
pub trait AskClient {
    async fn ask(&self, question: &str) -> Result<String, AskError>;
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Value,
}

impl ErrorBody {
    fn into_detail(self) -> Option<String> {
        match self.detail {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpAskClient {
    endpoint: EndpointDescriptor,
    http: Client,
}

impl HttpAskClient {
    pub fn new(endpoint: EndpointDescriptor) -> Self {
        Self {
            endpoint,
            http: Client::new(),
        }
    }
}

#[async_trait(?Send)]
impl AskClient for HttpAskClient {
    async fn ask(&self, question: &str) -> Result<String, AskError> {
        debug!("{} {}", self.endpoint.method, self.endpoint.url);
        let resp = self
            .http
            .request(self.endpoint.method.clone(), &self.endpoint.url)
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(|e| AskError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            let body: AskResponse = resp
                .json()
                .await
                .map_err(|e| AskError::Unreachable(e.to_string()))?;
            Ok(body.answer)
        } else {
            let body: ErrorBody = resp
                .json()
                .await
                .map_err(|e| AskError::Unreachable(e.to_string()))?;
            Err(AskError::Rejected {
                status,
                detail: body.into_detail(),
            })
        }
    }
}
