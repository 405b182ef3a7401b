//! HTTP client for the snapshot server.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use buyin_common::{LedgerState, Result, SnapshotId, TrackerError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SaveResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Publishes ledgers and fetches published snapshots.
pub struct SnapshotClient {
    base_url: String,
    http: reqwest::Client,
}

impl SnapshotClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TrackerError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Link under which a snapshot's read-only page is shared.
    pub fn share_link(&self, id: &SnapshotId) -> String {
        self.endpoint(&format!("/{}", id))
    }

    /// Publish `state` and return its identifier.
    pub async fn publish(&self, state: &LedgerState) -> Result<SnapshotId> {
        let url = self.endpoint("/api/save");
        debug!(url = %url, players = state.players.len(), "Publishing ledger");

        let response = self
            .http
            .post(&url)
            .json(state)
            .send()
            .await
            .map_err(|e| TrackerError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TrackerError::Network(error_message(response).await));
        }

        let body: SaveResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::Serialization(e.to_string()))?;
        let id = SnapshotId::new(body.id);
        info!(snapshot_id = %id, "Ledger published");
        Ok(id)
    }

    /// Fetch a published snapshot. `None` when the server does not know it.
    pub async fn retrieve(&self, id: &SnapshotId) -> Result<Option<LedgerState>> {
        let url = self.endpoint(&format!("/api/load/{}", id));
        debug!(url = %url, "Fetching snapshot");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TrackerError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(TrackerError::Network(error_message(response).await));
        }

        let state: LedgerState = response
            .json()
            .await
            .map_err(|e| TrackerError::Serialization(e.to_string()))?;
        state.validate()?;
        Ok(Some(state))
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => format!("{} ({})", body.error, status),
        Err(_) => format!("server returned {}", status),
    }
}
