pub mod evaluator;
pub mod messages;
pub mod orchestrator;
pub mod selector;

pub use evaluator::{is_eligible, Blacklist};
pub use orchestrator::{Phase, RaidOrchestrator, RaidOutcome, RaidPlan};
pub use selector::{resolve_blacklist, select_live_candidates, EligibleStreamer, UNCATEGORIZED};
