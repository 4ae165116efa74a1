pub mod auth;
pub mod chat;
pub mod helix;
pub mod irc;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::{ChannelStatus, Game};

/// Read side of the platform: channel lookups and category metadata.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Best match for `name`, or `None` when the search returns nothing.
    async fn search_channel(&self, name: &str) -> Result<Option<ChannelStatus>>;
    async fn games_by_names(&self, names: &[String]) -> Result<Vec<Game>>;
    async fn games_by_ids(&self, ids: &[String]) -> Result<Vec<Game>>;
}

/// Write side: the operator's chat.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Resolves once messages sent through `say` will be delivered.
    async fn wait_ready(&self) -> Result<()>;
    async fn say(&self, text: &str) -> Result<()>;
}
