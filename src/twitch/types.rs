use serde::Deserialize;

/// OAuth client-credentials grant response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}

/// Every Helix endpoint wraps its payload in `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct HelixResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Result entry from `search/channels`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChannelStatus {
    pub broadcaster_login: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub is_live: bool,
    /// Empty when the channel has never set a category.
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub game_name: String,
}

/// Category ("game") metadata from the `games` endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Game {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_channels_payload() {
        let body = r#"{
            "data": [{
                "broadcaster_language": "en",
                "broadcaster_login": "bob",
                "display_name": "Bob",
                "game_id": "516575",
                "game_name": "VALORANT",
                "id": "41245072",
                "is_live": true,
                "tags": [],
                "thumbnail_url": "https://example/thumb.png",
                "title": "ranked",
                "started_at": "2024-01-01T00:00:00Z"
            }],
            "pagination": {"cursor": "abc"}
        }"#;
        let parsed: HelixResponse<ChannelStatus> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 1);
        let channel = &parsed.data[0];
        assert_eq!(channel.broadcaster_login, "bob");
        assert!(channel.is_live);
        assert_eq!(channel.game_id, "516575");
    }

    #[test]
    fn test_offline_channel_without_category() {
        let body = r#"{"data": [{"broadcaster_login": "alice", "display_name": "alice", "is_live": false, "game_id": ""}]}"#;
        let parsed: HelixResponse<ChannelStatus> = serde_json::from_str(body).unwrap();
        assert!(!parsed.data[0].is_live);
        assert!(parsed.data[0].game_id.is_empty());
    }

    #[test]
    fn test_missing_data_is_empty() {
        let parsed: HelixResponse<Game> = serde_json::from_str("{}").unwrap();
        assert!(parsed.data.is_empty());
    }

    #[test]
    fn test_token_response() {
        let body = r#"{"access_token": "jostpf5q0uzmxmkba9iyug38kjtgh", "expires_in": 5011271, "token_type": "bearer"}"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.access_token, "jostpf5q0uzmxmkba9iyug38kjtgh");
        assert_eq!(token.token_type, "bearer");
    }
}
