use super::evaluator::{is_eligible, Blacklist};
use crate::twitch::ChannelDirectory;
use anyhow::{Context, Result};

/// Category label for live channels that have never set one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A live channel that passed the blacklist, with its current category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleStreamer {
    pub name: String,
    pub category: String,
}

/// Resolve blacklisted category names to IDs with a single lookup.
pub async fn resolve_blacklist<D: ChannelDirectory + ?Sized>(
    directory: &D,
    names: &[String],
) -> Result<Blacklist> {
    if names.is_empty() {
        return Ok(Blacklist::default());
    }

    let games = directory
        .games_by_names(names)
        .await
        .context("failed to resolve blacklisted categories")?;

    for name in names {
        if !games.iter().any(|g| g.name.eq_ignore_ascii_case(name)) {
            tracing::warn!(category = %name, "blacklisted category not found on Twitch, ignoring");
        }
    }

    let blacklist = Blacklist::from_games(&games);
    tracing::debug!(count = blacklist.len(), "blacklist resolved");
    Ok(blacklist)
}

/// Walk `names` in order and collect every eligible channel.
///
/// A failed status lookup is logged and the channel skipped. A failed
/// category-name lookup for an eligible channel aborts the whole scan.
pub async fn select_live_candidates<D: ChannelDirectory + ?Sized>(
    directory: &D,
    names: &[String],
    blacklist: &Blacklist,
) -> Result<Vec<EligibleStreamer>> {
    let mut eligible = Vec::new();

    for name in names {
        let status = match directory.search_channel(name).await {
            // Search is fuzzy: a different login is not this channel.
            Ok(status) => status.filter(|s| {
                let exact = s.broadcaster_login.eq_ignore_ascii_case(name);
                if !exact {
                    tracing::debug!(channel = %name, found = %s.broadcaster_login, "search matched another channel");
                }
                exact
            }),
            Err(e) => {
                tracing::warn!(channel = %name, "skipping channel, status lookup failed: {:#}", e);
                continue;
            }
        };

        if !is_eligible(status.as_ref(), blacklist) {
            match &status {
                None => tracing::debug!(channel = %name, "no matching channel"),
                Some(s) if !s.is_live => tracing::debug!(channel = %name, "offline"),
                Some(s) => tracing::debug!(channel = %name, game_id = %s.game_id, "blacklisted category"),
            }
            continue;
        }

        // Eligible implies a match was found.
        let Some(status) = status else { continue };
        let category = category_name(directory, &status.game_id).await?;

        tracing::info!("https://twitch.tv/{} is streaming {}", name, category);
        eligible.push(EligibleStreamer {
            name: name.clone(),
            category,
        });
    }

    Ok(eligible)
}

async fn category_name<D: ChannelDirectory + ?Sized>(directory: &D, game_id: &str) -> Result<String> {
    if game_id.is_empty() {
        return Ok(UNCATEGORIZED.to_string());
    }

    let games = directory
        .games_by_ids(&[game_id.to_string()])
        .await
        .with_context(|| format!("failed to get category for ID {}", game_id))?;

    match games.into_iter().next() {
        Some(game) => Ok(game.name),
        None => anyhow::bail!("could not find name for category with ID {}", game_id),
    }
}
