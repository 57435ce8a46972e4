//! HTTP clients for the external player and marketplace services.
//!
//! Failures are reported to the caller as `RemoteError`; nothing here retries.

use crate::logic::{MarketQuery, RemoteListing};
use crate::models::{Player, PlayerId, RemotePlayer};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Per-request timeout for both services.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Players fetched per owner query.
const OWNED_PLAYERS_LIMIT: u32 = 1500;

/// Errors talking to an external service.
#[derive(Debug)]
pub enum RemoteError {
    /// Could not reach the service or read its response.
    Transport(String),
    /// The service answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body did not match the expected shape.
    Decode(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Transport(msg) => write!(f, "Failed to contact service: {}", msg),
            RemoteError::Status { status, body } => write!(f, "Service returned {}: {}", status, body),
            RemoteError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

/// Build the shared HTTP client.
pub fn http_client() -> Result<Client, RemoteError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(RemoteError::from)
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}

/// The player API returns either a bare list or `{ "players": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlayersPayload {
    List(Vec<RemotePlayer>),
    Wrapped { players: Vec<RemotePlayer> },
}

impl PlayersPayload {
    fn into_players(self) -> Vec<Player> {
        let raw = match self {
            PlayersPayload::List(v) => v,
            PlayersPayload::Wrapped { players } => players,
        };
        raw.into_iter().map(Player::from).collect()
    }
}

/// Client for the player pool service.
#[derive(Clone)]
pub struct PlayerApiClient {
    client: Client,
    base_url: String,
    owner_wallet: String,
}

impl PlayerApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, owner_wallet: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            owner_wallet: owner_wallet.into(),
        }
    }

    /// All players owned by the configured wallet.
    pub async fn owned_players(&self) -> Result<Vec<Player>, RemoteError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("limit", OWNED_PLAYERS_LIMIT.to_string()),
                ("ownerWalletAddress", self.owner_wallet.clone()),
            ])
            .send()
            .await?;
        let payload: PlayersPayload = check(resp).await?.json().await?;
        let players = payload.into_players();
        log::debug!("fetched {} owned players", players.len());
        Ok(players)
    }

    /// Owned players restricted to `ids`, in the order given. Unknown ids are skipped.
    pub async fn players_by_ids(&self, ids: &[PlayerId]) -> Result<Vec<Player>, RemoteError> {
        let owned = self.owned_players().await?;
        Ok(select_by_ids(owned, ids))
    }
}

/// Keep only `ids`, in their order, skipping ids not in `players`.
pub fn select_by_ids(players: Vec<Player>, ids: &[PlayerId]) -> Vec<Player> {
    ids.iter()
        .filter_map(|id| players.iter().find(|p| p.id == *id).cloned())
        .collect()
}

/// Client for the marketplace listing service.
#[derive(Clone)]
pub struct MarketplaceClient {
    client: Client,
    base_url: String,
}

impl MarketplaceClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Run a listing search with the caller's bearer token.
    pub async fn search(
        &self,
        query: &MarketQuery,
        auth_token: &str,
    ) -> Result<Vec<RemoteListing>, RemoteError> {
        let resp = self
            .client
            .get(&self.base_url)
            .bearer_auth(auth_token)
            .query(&query.params)
            .send()
            .await?;
        let listings: Vec<RemoteListing> = check(resp).await?.json().await?;
        log::debug!("marketplace returned {} listings", listings.len());
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players_payload_accepts_both_shapes() {
        let bare: PlayersPayload =
            serde_json::from_str(r#"[{"id": 1, "metadata": {"positions": ["GK"]}}]"#).unwrap();
        assert_eq!(bare.into_players().len(), 1);
        let wrapped: PlayersPayload =
            serde_json::from_str(r#"{"players": [{"id": 2}, {"id": 3}]}"#).unwrap();
        let ids: Vec<_> = wrapped.into_players().iter().map(|p| p.id).collect();
        assert_eq!(ids, [2, 3]);
    }

    #[test]
    fn select_by_ids_keeps_requested_order() {
        let players = vec![Player::new(1, "a", ""), Player::new(2, "b", ""), Player::new(3, "c", "")];
        let picked: Vec<_> = select_by_ids(players, &[3, 9, 1]).iter().map(|p| p.id).collect();
        assert_eq!(picked, [3, 1]);
    }
}
