use serde::Serialize;

use crate::beacon::BeaconInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Scanning,
}

/// What the presentation layer sees of the current session.
///
/// A fresh snapshot is published after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Incremented on every (re)start. `0` means no session was ever started.
    pub generation: u64,
    pub status: SessionStatus,
    /// Enriched beacons in completion order.
    pub results: Vec<BeaconInfo>,
    /// Admitted URLs whose enrichment has not completed yet.
    pub pending: usize,
}

impl SessionSnapshot {
    /// True once discovery has ended and every admitted URL has a result.
    pub fn is_settled(&self) -> bool {
        self.status == SessionStatus::Idle && self.pending == 0
    }
}
