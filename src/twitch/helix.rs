use super::auth::AppAccessToken;
use super::types::*;
use super::ChannelDirectory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Helix accepts at most 100 `id` / `name` params per `games` request.
const MAX_GAMES_PER_REQUEST: usize = 100;

pub struct HelixClient {
    client: Client,
    auth: AppAccessToken,
    base_url: String,
}

impl HelixClient {
    pub fn new(client: Client, auth: AppAccessToken, base_url: &str) -> Self {
        Self {
            client,
            auth,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Request an app access token and build a client around it.
    pub async fn connect(
        base_url: &str,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .context("failed to build HTTP client")?;
        let auth = AppAccessToken::request(&client, token_url, client_id, client_secret).await?;
        tracing::info!(client_id = auth.client_id(), "authenticated with Twitch API");
        Ok(Self::new(client, auth, base_url))
    }

    async fn fetch_games(&self, key: &str, values: &[String]) -> Result<Vec<Game>> {
        let mut games = Vec::new();
        for chunk in values.chunks(MAX_GAMES_PER_REQUEST) {
            let query: Vec<(&str, &str)> = chunk.iter().map(|v| (key, v.as_str())).collect();
            let resp: HelixResponse<Game> = self.get_authed("/games", &query).await?;
            games.extend(resp.data);
        }
        Ok(games)
    }

    /// Authenticated GET request.
    async fn get_authed<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<HelixResponse<T>> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.get(&url).query(query);
        for (k, v) in &self.auth.headers() {
            req = req.header(k, v);
        }
        let resp = req.send().await.context("GET request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed ({}): {}", path, status, body);
        }
        resp.json().await.context("failed to parse response")
    }
}

#[async_trait]
impl ChannelDirectory for HelixClient {
    async fn search_channel(&self, name: &str) -> Result<Option<ChannelStatus>> {
        // Only the topmost result; ideally an exact match.
        let resp: HelixResponse<ChannelStatus> = self
            .get_authed("/search/channels", &[("query", name), ("first", "1")])
            .await
            .with_context(|| format!("channel search for `{}` failed", name))?;
        Ok(resp.data.into_iter().next())
    }

    async fn games_by_names(&self, names: &[String]) -> Result<Vec<Game>> {
        self.fetch_games("name", names).await
    }

    async fn games_by_ids(&self, ids: &[String]) -> Result<Vec<Game>> {
        self.fetch_games("id", ids).await
    }
}
