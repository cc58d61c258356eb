//! HTTP client for the LubeLogger REST API.

use std::time::Duration;

use serde_json::Value;
use uuid::Uuid;

use super::error::ApiError;
use crate::credentials::Credentials;
use crate::models::{Record, Vehicle};

/// Default bound on a single request, connect included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the queued entry id so the server can drop duplicates.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// The remote operations the companion needs.
///
/// In production, [`ApiClient`] implements this over HTTP.
/// In tests, a scripted implementation controls each outcome.
#[allow(async_fn_in_trait)]
pub trait RecordApi {
    /// Submits one record. Returns the decoded JSON acknowledgement.
    async fn add_record(
        &self,
        credentials: &Credentials,
        vehicle_id: i64,
        record: &Record,
        idempotency_key: Uuid,
    ) -> Result<Value, ApiError>;

    /// Fetches the vehicle list.
    async fn fetch_vehicles(&self, credentials: &Credentials) -> Result<Vec<Vehicle>, ApiError>;
}

/// reqwest-backed API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client whose requests fail as unreachable after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(Self { http })
    }

    fn record_url(credentials: &Credentials, record: &Record) -> String {
        credentials.url(&format!("/api/vehicle/{}records/add", record.record_type()))
    }
}

impl RecordApi for ApiClient {
    async fn add_record(
        &self,
        credentials: &Credentials,
        vehicle_id: i64,
        record: &Record,
        idempotency_key: Uuid,
    ) -> Result<Value, ApiError> {
        let url = Self::record_url(credentials, record);
        tracing::debug!("POST {} (vehicle {}, key {})", url, vehicle_id, idempotency_key);

        let response = self
            .http
            .post(&url)
            .query(&[("vehicleId", vehicle_id)])
            .basic_auth(&credentials.username, Some(&credentials.password))
            .header(IDEMPOTENCY_HEADER, idempotency_key.to_string())
            .form(&record.form_fields())
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn fetch_vehicles(&self, credentials: &Credentials) -> Result<Vec<Vehicle>, ApiError> {
        let url = credentials.url("/api/vehicle/info");
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<Vehicle>>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
