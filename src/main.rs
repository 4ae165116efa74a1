use anyhow::{Context, Result};
use raid_bot::config::Config;
use raid_bot::raid::{Phase, RaidOrchestrator, RaidOutcome, RaidPlan};
use raid_bot::twitch::chat::{DryRunChat, TwitchChat};
use raid_bot::twitch::helix::HelixClient;
use raid_bot::twitch::ChatSink;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.toml";

struct Args {
    config: PathBuf,
    dry_run: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: PathBuf::from(DEFAULT_CONFIG),
        dry_run: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dry-run" => args.dry_run = true,
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                args.config = PathBuf::from(path);
            }
            other => anyhow::bail!("unknown argument: {}", other),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("raid_bot=info")),
        )
        .init();

    let args = parse_args()?;

    tracing::info!(phase = %Phase::Init, config = %args.config.display(), "loading config");
    // Secrets saved in .env (real env vars take precedence)
    Config::load_env_file();
    let config = Config::load(&args.config).context("Could not read config file")?;

    if args.dry_run {
        tracing::warn!("DRY RUN: chat messages will be logged, not sent");
    }

    // Chat connects in the background while the query side starts up.
    tracing::info!(phase = %Phase::ChatConnecting, channel = %config.twitch_username, "starting chat client");
    let chat: Box<dyn ChatSink> = if args.dry_run {
        Box::new(DryRunChat::new(&config.twitch_username))
    } else {
        Box::new(
            TwitchChat::new(
                &config.chat_ws_url,
                &config.twitch_bot_username,
                &config.twitch_bot_secret,
                &config.twitch_username,
            )
            .spawn(),
        )
    };

    let helix = HelixClient::connect(
        &config.helix_api_base,
        &config.oauth_token_url,
        &config.twitch_client_id,
        &config.twitch_client_secret,
    )
    .await
    .context("Error configuring search client")?;

    let plan = RaidPlan {
        priority: config.priority_streamers.clone(),
        backup: config.backup_streamers.clone(),
        blacklist: config.games_blacklist.clone(),
    };

    let mut orchestrator = RaidOrchestrator::new(&helix, chat.as_ref());
    match orchestrator.run(&plan).await? {
        RaidOutcome::Raided { target, from_backup } => {
            tracing::info!(
                channel = %target.name,
                category = %target.category,
                from_backup,
                "raid triggered"
            );
        }
        RaidOutcome::NoTarget => {
            tracing::warn!("no raid target found");
        }
    }

    Ok(())
}
