use super::evaluator::Blacklist;
use super::messages;
use super::selector::{resolve_blacklist, select_live_candidates, EligibleStreamer};
use crate::twitch::{ChannelDirectory, ChatSink};
use anyhow::{Context, Result};
use std::fmt;

/// Stages of a single run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    ChatConnecting,
    BlacklistResolved,
    PriorityScan,
    BackupScan,
    Raiding,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::ChatConnecting => "chat-connecting",
            Phase::BlacklistResolved => "blacklist-resolved",
            Phase::PriorityScan => "priority-scan",
            Phase::BackupScan => "backup-scan",
            Phase::Raiding => "raiding",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaidOutcome {
    Raided {
        target: EligibleStreamer,
        from_backup: bool,
    },
    NoTarget,
}

/// Candidate lists and blacklist, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct RaidPlan {
    pub priority: Vec<String>,
    pub backup: Vec<String>,
    pub blacklist: Vec<String>,
}

pub struct RaidOrchestrator<'a, D: ?Sized, C: ?Sized> {
    directory: &'a D,
    chat: &'a C,
    phase: Phase,
}

impl<'a, D, C> RaidOrchestrator<'a, D, C>
where
    D: ChannelDirectory + ?Sized,
    C: ChatSink + ?Sized,
{
    /// `chat` should already be connecting in the background.
    pub fn new(directory: &'a D, chat: &'a C) -> Self {
        Self {
            directory,
            chat,
            phase: Phase::ChatConnecting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn advance(&mut self, next: Phase) {
        tracing::info!(from = %self.phase, to = %next, "raid phase");
        self.phase = next;
    }

    /// Priority list first, backup only when the priority scan found nobody.
    /// Only the first eligible entry is ever raided.
    pub async fn run(&mut self, plan: &RaidPlan) -> Result<RaidOutcome> {
        let blacklist: Blacklist = resolve_blacklist(self.directory, &plan.blacklist).await?;
        self.advance(Phase::BlacklistResolved);

        self.advance(Phase::PriorityScan);
        let priority = select_live_candidates(self.directory, &plan.priority, &blacklist)
            .await
            .context("priority scan failed")?;
        if !priority.is_empty() {
            self.advance(Phase::Raiding);
            return self.raid(&priority, false).await;
        }

        self.advance(Phase::BackupScan);
        let backup = select_live_candidates(self.directory, &plan.backup, &blacklist)
            .await
            .context("backup scan failed")?;

        self.advance(Phase::Raiding);
        self.raid(&backup, true).await
    }

    async fn raid(&mut self, candidates: &[EligibleStreamer], from_backup: bool) -> Result<RaidOutcome> {
        self.chat
            .wait_ready()
            .await
            .context("chat never became ready")?;

        let outcome = match candidates.first() {
            Some(target) => {
                if candidates.len() > 1 {
                    tracing::debug!(ignored = candidates.len() - 1, "additional eligible channels not raided");
                }
                self.chat.say(&messages::announcement(target)).await?;
                self.chat.say(&messages::raid_command(target)).await?;
                RaidOutcome::Raided {
                    target: target.clone(),
                    from_backup,
                }
            }
            None => {
                self.chat.say(&messages::no_target()).await?;
                RaidOutcome::NoTarget
            }
        };

        self.advance(Phase::Done);
        Ok(outcome)
    }
}
