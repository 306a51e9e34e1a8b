//! Typed client for the marketplace REST API.
//!
//! The HTTP layer is abstracted behind [`HttpTransport`] so the same
//! decoding and error mapping runs in the browser (fetch) and in tests.
//! Successful responses are wrapped in a `{"data": T}` envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth_form::{AuthMode, AuthRequest};
use crate::buy_request::BuyRequest;
use crate::conversation::Conversation;
use crate::listing::Listing;
use crate::review::ReviewSubmission;

pub mod endpoints {
    pub const LISTINGS: &str = "/api/listings";
    pub const BUY_REQUESTS: &str = "/api/buy-requests";
    pub const REVIEWS: &str = "/api/reviews";
    pub const AUTH_SIGNUP: &str = "/api/auth/signup";
    pub const AUTH_LOGIN: &str = "/api/auth/login";

    pub fn conversation(id: &str) -> String {
        format!("/api/conversations/{id}")
    }

    pub fn conversation_messages(id: &str) -> String {
        format!("/api/conversations/{id}/messages")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found")]
    NotFound,

    #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The server-supplied message when there is one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Raw HTTP response handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Minimal HTTP capability the client needs. `Err` is reserved for
/// failures where no response arrived at all.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn get(&self, path: &str) -> Result<HttpResponse, ApiError>;
    async fn post_json(&self, path: &str, body: String) -> Result<HttpResponse, ApiError>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Pull a human-readable message out of an error body, if it has one.
pub fn error_message_from_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// Map non-success statuses onto [`ApiError`].
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200..=299 => Ok(()),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::Status {
            status,
            message: error_message_from_body(&response.body),
        }),
    }
}

pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|e| e.data)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    text: &'a str,
}

pub struct ApiClient<T> {
    transport: T,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn get_data<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.transport.get(path).await?;
        check_status(&response)?;
        decode_envelope(&response.body)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<HttpResponse, ApiError> {
        let json = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self.transport.post_json(path, json).await?;
        check_status(&response)?;
        Ok(response)
    }

    pub async fn get_conversation(&self, id: &str) -> Result<Conversation, ApiError> {
        self.get_data(&endpoints::conversation(id)).await
    }

    pub async fn send_message(&self, conversation_id: &str, text: &str) -> Result<(), ApiError> {
        self.post(
            &endpoints::conversation_messages(conversation_id),
            &SendMessageBody { text },
        )
        .await
        .map(|_| ())
    }

    pub async fn submit_review(&self, review: &ReviewSubmission) -> Result<(), ApiError> {
        self.post(endpoints::REVIEWS, review).await.map(|_| ())
    }

    pub async fn list_listings(&self) -> Result<Vec<Listing>, ApiError> {
        self.get_data(endpoints::LISTINGS).await
    }

    pub async fn create_buy_request(&self, request: &BuyRequest) -> Result<(), ApiError> {
        self.post(endpoints::BUY_REQUESTS, request).await.map(|_| ())
    }

    pub async fn authenticate(&self, mode: AuthMode, request: &AuthRequest) -> Result<(), ApiError> {
        let path = match mode {
            AuthMode::Signup => endpoints::AUTH_SIGNUP,
            AuthMode::Login => endpoints::AUTH_LOGIN,
        };
        self.post(path, request).await.map(|_| ())
    }

    /// Fetch a plain-text static asset (no envelope).
    pub async fn fetch_text(&self, path: &str) -> Result<String, ApiError> {
        let response = self.transport.get(path).await?;
        check_status(&response)?;
        Ok(response.body)
    }
}
