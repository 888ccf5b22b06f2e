// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Headless - REST client for the contacts endpoint
//
// Implements the engine's ContactApi trait over HTTP/JSON.

use freightdesk_core::{ApiError, AppError, AppSettings, ContactApi, ContactPayload, ContactRecord};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// HTTP implementation of the contact collaborator
pub struct RestContactApi {
    http_client: Client,
    base_url: String,
}

impl RestContactApi {
    pub fn new(settings: &AppSettings) -> Result<Self, AppError> {
        settings.validate()?;

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .read_timeout(Duration::from_secs(settings.read_timeout_secs))
            .build()
            .map_err(|e| AppError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Collection URL for creates, detail URL otherwise
    fn contact_url(&self, id: Option<u64>) -> String {
        match id {
            Some(id) => format!("{}/contacts/{}/", self.base_url, id),
            None => format!("{}/contacts/", self.base_url),
        }
    }

    /// Turn a response into a record or the error the body describes
    async fn read_record(response: Response) -> Result<ContactRecord, ApiError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::Decode(format!("Failed to parse contact: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Contacts endpoint returned {}: {}", status, body);
        Err(error_from_body(status, &body))
    }
}

/// Classify a failed request by its transport error
fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_connect() {
        ApiError::Network(format!("Cannot connect to server - {}", e))
    } else if e.is_timeout() {
        ApiError::Network("Request timed out".to_string())
    } else {
        ApiError::Network(format!("Request failed: {}", e))
    }
}

/// Classify a non-success response by its status and body
fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return ApiError::Status(status.as_u16());
    };

    let detail = fields
        .get("detail")
        .and_then(Value::as_str)
        .map(str::to_string);

    match (status, detail) {
        (StatusCode::BAD_REQUEST, Some(detail)) if fields.len() == 1 => ApiError::Message(detail),
        (StatusCode::BAD_REQUEST, _) if !fields.is_empty() => ApiError::Validation(fields),
        (_, Some(detail)) => ApiError::Message(detail),
        _ => ApiError::Status(status.as_u16()),
    }
}

impl ContactApi for RestContactApi {
    async fn fetch_record(&self, id: u64) -> Result<ContactRecord, ApiError> {
        let url = self.contact_url(Some(id));
        tracing::info!("Fetching contact {}", id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read_record(response).await
    }

    async fn submit_record(
        &self,
        id: Option<u64>,
        payload: &ContactPayload,
    ) -> Result<ContactRecord, ApiError> {
        let url = self.contact_url(id);
        let request = match id {
            Some(_) => self.http_client.put(&url),
            None => self.http_client.post(&url),
        };

        let response = request
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read_record(response).await
    }
}
