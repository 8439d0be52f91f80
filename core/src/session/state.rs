use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::{self, JoinSet};
use tracing::{debug, error};

use eddyweb_common::{
    beacon::{BeaconInfo, DecodedUrl},
    session::{SessionSnapshot, SessionStatus},
};

use crate::admission::AdmissionFilter;
use crate::metadata::MetadataFetcher;

/// Everything one scan session owns.
///
/// Enrichment tasks are tracked in the session's own [`JoinSet`], so their
/// results can only ever land in the session that launched them.
pub(super) struct SessionState {
    pub(super) generation: u64,
    pub(super) status: SessionStatus,
    seen: AdmissionFilter,
    results: Vec<BeaconInfo>,
    tasks: JoinSet<BeaconInfo>,
    pending: HashMap<task::Id, DecodedUrl>,
}

impl SessionState {
    pub(super) fn new(generation: u64) -> Self {
        Self {
            generation,
            status: SessionStatus::Idle,
            seen: AdmissionFilter::new(),
            results: Vec::new(),
            tasks: JoinSet::new(),
            pending: HashMap::new(),
        }
    }

    pub(super) fn admit(&mut self, url: &str) -> bool {
        self.seen.admit(url)
    }

    pub(super) fn launch(&mut self, url: DecodedUrl, fetcher: Arc<MetadataFetcher>) {
        let task_url: DecodedUrl = url.clone();
        let handle = self
            .tasks
            .spawn(async move { fetcher.enrich(&task_url).await });
        self.pending.insert(handle.id(), url);
    }

    /// Waits for the next enrichment task of this session to finish.
    ///
    /// Never resolves while nothing is pending. Cancel safe.
    pub(super) async fn next_completion(&mut self) -> BeaconInfo {
        if self.tasks.is_empty() {
            return std::future::pending().await;
        }

        let (id, outcome) = match self.tasks.join_next_with_id().await {
            Some(Ok((id, info))) => (id, Ok(info)),
            Some(Err(e)) => (e.id(), Err(e)),
            None => return std::future::pending().await,
        };
        let url: DecodedUrl = self.pending.remove(&id).unwrap_or_default();

        match outcome {
            Ok(info) => info,
            Err(e) => {
                error!(%url, "enrichment task died: {e}");
                BeaconInfo::fallback(&url)
            }
        }
    }

    pub(super) fn push_result(&mut self, info: BeaconInfo) {
        self.results.push(info);
    }

    pub(super) fn dismiss(&mut self, index: usize) -> Option<BeaconInfo> {
        (index < self.results.len()).then(|| self.results.remove(index))
    }

    /// Lets outstanding tasks run to completion with nowhere to report to.
    pub(super) fn retire(mut self) {
        if !self.pending.is_empty() {
            debug!(
                generation = self.generation,
                "discarding {} pending enrichments",
                self.pending.len()
            );
        }
        self.tasks.detach_all();
    }

    pub(super) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation,
            status: self.status,
            results: self.results.clone(),
            pending: self.pending.len(),
        }
    }
}
