use super::types::TokenResponse;
use anyhow::{Context, Result};
use reqwest::Client;

/// App access token from the OAuth client-credentials grant.
/// Requested once at startup and never refreshed.
pub struct AppAccessToken {
    client_id: String,
    access_token: String,
}

impl AppAccessToken {
    pub async fn request(
        client: &Client,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self> {
        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ];
        let resp = client
            .post(token_url)
            .form(&params)
            .send()
            .await
            .context("app access token request failed")?;

        let status = resp.status();
        if status.as_u16() == 400 || status.as_u16() == 401 || status.as_u16() == 403 {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!(
                "Twitch rejected the client credentials ({}).\n\
                 Check twitch_client_id / twitch_client_secret (or TWITCH_CLIENT_SECRET).\n\
                 Server response: {}",
                status,
                body
            );
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("app access token request failed ({}): {}", status, body);
        }

        let token: TokenResponse = resp
            .json()
            .await
            .context("failed to parse token response")?;
        tracing::debug!(
            expires_in = token.expires_in,
            token_type = %token.token_type,
            "obtained app access token"
        );

        Ok(Self::new(client_id.to_string(), token.access_token))
    }

    pub fn new(client_id: String, access_token: String) -> Self {
        Self {
            client_id,
            access_token,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Build auth headers for a Helix request.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Client-Id".to_string(), self.client_id.clone()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.access_token),
            ),
        ]
    }
}
