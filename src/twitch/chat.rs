use super::irc::{self, IrcMessage};
use super::ChatSink;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_tungstenite::tungstenite::Message;

/// Connection state published by the background chat task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Connecting,
    /// The server echoed our JOIN; PRIVMSGs now reach the channel.
    Joined,
    Closed,
}

struct Outgoing {
    text: String,
    sent: oneshot::Sender<()>,
}

pub struct TwitchChat {
    ws_url: String,
    nick: String,
    secret: String,
    channel: String,
}

impl TwitchChat {
    pub fn new(ws_url: &str, nick: &str, secret: &str, channel: &str) -> Self {
        Self {
            ws_url: ws_url.to_string(),
            nick: nick.to_lowercase(),
            secret: secret.to_string(),
            channel: irc::channel_name(channel),
        }
    }

    /// Start the connection as a detached background task.
    /// The task lives until the connection closes or the process exits.
    pub fn spawn(self) -> ChatHandle {
        let (tx, rx) = mpsc::channel(16);
        let (state_tx, state_rx) = watch::channel(ChatState::Connecting);
        let channel = self.channel.clone();

        tokio::spawn(async move {
            let result = self.run(rx, &state_tx).await;
            state_tx.send_replace(ChatState::Closed);
            match result {
                Ok(()) => tracing::warn!(channel = %self.channel, "chat connection closed"),
                Err(e) => tracing::error!(channel = %self.channel, "chat connection failed: {:#}", e),
            }
        });

        ChatHandle {
            channel,
            tx,
            state: state_rx,
        }
    }

    async fn run(
        &self,
        mut outgoing: mpsc::Receiver<Outgoing>,
        state: &watch::Sender<ChatState>,
    ) -> Result<()> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(self.ws_url.as_str())
            .await
            .context("chat WS connection failed")?;
        let (mut write, mut read) = ws_stream.split();
        tracing::debug!(url = %self.ws_url, "chat WS connected");

        for line in irc::handshake(&self.nick, &self.secret, &self.channel) {
            write
                .send(Message::Text(line))
                .await
                .context("chat handshake failed")?;
        }

        loop {
            tokio::select! {
                frame = read.next() => {
                    let Some(frame) = frame else { break };
                    match frame.context("chat WS read error")? {
                        Message::Text(text) => {
                            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                                if let Some(reply) = self.handle_line(line, state)? {
                                    write.send(Message::Text(reply)).await?;
                                }
                            }
                        }
                        Message::Ping(data) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Message::Close(_) => {
                            tracing::debug!("chat WS received close frame");
                            break;
                        }
                        _ => {}
                    }
                }
                msg = outgoing.recv() => {
                    // All handles dropped: nothing left to send.
                    let Some(msg) = msg else { break };
                    let line = irc::privmsg(&self.channel, &msg.text);
                    tracing::trace!(line = %line, "chat send");
                    write
                        .send(Message::Text(line))
                        .await
                        .context("chat send failed")?;
                    let _ = msg.sent.send(());
                }
            }
        }

        let _ = write.close().await;
        Ok(())
    }

    /// React to one server line. Returns a line to send back, if any.
    fn handle_line(&self, line: &str, state: &watch::Sender<ChatState>) -> Result<Option<String>> {
        let Some(msg) = IrcMessage::parse(line) else {
            return Ok(None);
        };
        tracing::trace!(line = %line, "chat recv");

        if irc::is_login_failure(&msg) {
            anyhow::bail!(
                "chat login rejected for `{}`: {}",
                self.nick,
                msg.trailing().unwrap_or_default()
            );
        }

        match msg.command {
            "PING" => Ok(Some(irc::pong(msg.trailing().unwrap_or("tmi.twitch.tv")))),
            "JOIN" => {
                let ours = msg.nick().is_some_and(|n| n.eq_ignore_ascii_case(&self.nick))
                    && msg.params.first().is_some_and(|c| c.eq_ignore_ascii_case(&self.channel));
                if ours && *state.borrow() != ChatState::Joined {
                    tracing::info!(channel = %self.channel, "joined chat");
                    state.send_replace(ChatState::Joined);
                }
                Ok(None)
            }
            "NOTICE" => {
                // Rejected commands (e.g. `/raid`) only surface here.
                tracing::warn!(
                    channel = %self.channel,
                    msg_id = msg.tag("msg-id").unwrap_or_default(),
                    "chat notice: {}",
                    msg.trailing().unwrap_or_default()
                );
                Ok(None)
            }
            "RECONNECT" => {
                anyhow::bail!("chat server requested a reconnect");
            }
            _ => Ok(None),
        }
    }
}

/// Owned handle to the background chat task.
#[derive(Clone)]
pub struct ChatHandle {
    channel: String,
    tx: mpsc::Sender<Outgoing>,
    state: watch::Receiver<ChatState>,
}

#[async_trait]
impl ChatSink for ChatHandle {
    async fn wait_ready(&self) -> Result<()> {
        let mut state = self.state.clone();
        let reached = state
            .wait_for(|s| *s != ChatState::Connecting)
            .await
            .map(|s| *s)
            .unwrap_or(ChatState::Closed);
        if reached != ChatState::Joined {
            anyhow::bail!("chat connection to {} closed before joining", self.channel);
        }
        Ok(())
    }

    async fn say(&self, text: &str) -> Result<()> {
        let (sent_tx, sent_rx) = oneshot::channel();
        self.tx
            .send(Outgoing {
                text: text.to_string(),
                sent: sent_tx,
            })
            .await
            .map_err(|_| anyhow::anyhow!("chat connection to {} is closed", self.channel))?;
        sent_rx
            .await
            .map_err(|_| anyhow::anyhow!("chat connection to {} closed before sending", self.channel))?;
        tracing::info!(channel = %self.channel, text, "chat message sent");
        Ok(())
    }
}

/// Stand-in for `--dry-run`: always ready, logs instead of sending.
pub struct DryRunChat {
    channel: String,
}

impl DryRunChat {
    pub fn new(channel: &str) -> Self {
        Self {
            channel: irc::channel_name(channel),
        }
    }
}

#[async_trait]
impl ChatSink for DryRunChat {
    async fn wait_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn say(&self, text: &str) -> Result<()> {
        tracing::info!(channel = %self.channel, text, "DRY RUN: would send chat message");
        Ok(())
    }
}
