//! HTTP client for the picklijst API: full loads via the reconcile
//! endpoint and debounced line writes via the patch endpoint.

use async_trait::async_trait;
use chrono::NaiveDate;
use picklijst_core::types::DbId;
use serde::Deserialize;

use crate::error::ClientError;
use crate::messages::{LinePatch, LineRow, LoadedLine};
use crate::queue::LineWriter;

/// `{ "data": ... }` envelope used by every API response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ReconcilePayload {
    run: RunInfo,
    lines: Vec<LoadedLine>,
}

/// The run row as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct RunInfo {
    pub id: DbId,
    pub run_date: NaiveDate,
}

/// A reconciled run: its identity plus the complete, sorted line set
/// ready for the cache.
#[derive(Debug)]
pub struct LoadedRun {
    pub run: RunInfo,
    pub lines: Vec<LineRow>,
}

/// Authenticated HTTP client for the service.
///
/// Construct once per session and share; `reqwest::Client` pools
/// connections internally.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl ApiClient {
    /// Create a client for the service at `base_url` (no trailing slash
    /// needed), authenticating with `access_token`.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Load (and lazily materialize) the run for a date: the server
    /// ensures every templated (store, metal) pair has a line, then
    /// returns the full sorted set.
    pub async fn reconcile(
        &self,
        run_date: NaiveDate,
        weekday: i32,
    ) -> Result<LoadedRun, ClientError> {
        let url = format!("{}/api/v1/runs/reconcile", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({
                "run_date": run_date,
                "weekday": weekday,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let payload: Envelope<ReconcilePayload> = response.json().await?;
        Ok(LoadedRun {
            run: payload.data.run,
            lines: payload.data.lines.into_iter().map(LineRow::from).collect(),
        })
    }
}

#[async_trait]
impl LineWriter for ApiClient {
    async fn write_line(&self, id: DbId, patch: LinePatch) -> Result<(), ClientError> {
        let url = format!("{}/api/v1/lines/{id}", self.base_url);
        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.access_token)
            .json(&patch)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }
}

/// Turn a non-success response into a [`ClientError::Rejected`], pulling
/// the human-readable message out of the error envelope when present.
async fn rejection(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or_else(|| "Request failed".to_string());
    ClientError::Rejected { status, message }
}
