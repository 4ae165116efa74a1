use crate::twitch::types::{ChannelStatus, Game};
use std::collections::HashSet;

/// Category IDs that disqualify an otherwise live channel.
/// Resolved once per run and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    ids: HashSet<String>,
}

impl Blacklist {
    pub fn from_games(games: &[Game]) -> Self {
        Self {
            ids: games.iter().map(|g| g.id.clone()).collect(),
        }
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.ids.contains(category_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<I: Into<String>> FromIterator<I> for Blacklist {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A channel is a raid target iff it is live and its category is not blacklisted.
/// `None` (no search match) is treated as offline.
pub fn is_eligible(status: Option<&ChannelStatus>, blacklist: &Blacklist) -> bool {
    match status {
        Some(status) => status.is_live && !blacklist.contains(&status.game_id),
        None => false,
    }
}
