//! The **Session Controller**: one actor task that owns the current scan session.
//!
//! Radio advertisements, enrichment completions and presentation commands all
//! arrive in the actor's `select!` loop, one at a time. That single consumer is
//! what makes decode, admit and launch atomic per advertisement.
//!
//! Lifecycle: `Idle ─start()─► Scanning ─window elapsed / stop()─► Idle`.
//! Only discovery is bounded by the window; admitted URLs keep enriching and
//! keep appending to `results` after the radio stops.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use eddyweb_common::{
    beacon::{BeaconInfo, RawAdvertisement},
    error::ScanError,
    scanning::{PermissionGate, ScanSource},
    session::{SessionSnapshot, SessionStatus},
};
use eddyweb_protocols::eddystone;

use crate::metadata::MetadataFetcher;

mod state;

use state::SessionState;

const COMMAND_BUFFER: usize = 32;

enum Command {
    Start(oneshot::Sender<Result<(), ScanError>>),
    Stop,
    Dismiss {
        index: usize,
        reply: oneshot::Sender<bool>,
    },
    Shutdown,
}

/// The discovery half of a session. Gone once the window closes.
struct Discovery {
    advertisements: Option<mpsc::Receiver<RawAdvertisement>>,
    deadline: Instant,
}

pub struct SessionController {
    scanner: Arc<dyn ScanSource>,
    gate: Arc<dyn PermissionGate>,
    fetcher: Arc<MetadataFetcher>,
    window: Duration,
    commands: mpsc::Receiver<Command>,
    updates: watch::Sender<SessionSnapshot>,
    session: SessionState,
    discovery: Option<Discovery>,
}

impl SessionController {
    /// Spawns the controller on the current tokio runtime.
    ///
    /// The actor stops on [`SessionHandle::shutdown`] or once every handle is dropped.
    pub fn spawn(
        scanner: Arc<dyn ScanSource>,
        gate: Arc<dyn PermissionGate>,
        fetcher: Arc<MetadataFetcher>,
        window: Duration,
    ) -> SessionHandle {
        let (command_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (updates, snapshots) = watch::channel(SessionSnapshot::default());

        let controller = Self {
            scanner,
            gate,
            fetcher,
            window,
            commands,
            updates,
            session: SessionState::new(0),
            discovery: None,
        };
        tokio::spawn(controller.run());

        SessionHandle {
            commands: command_tx,
            snapshots,
        }
    }

    async fn run(mut self) {
        loop {
            let deadline: Option<Instant> = self.discovery.as_ref().map(|d| d.deadline);

            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    if self.handle(command).await.is_break() {
                        break;
                    }
                }
                advertisement = next_advertisement(&mut self.discovery) => match advertisement {
                    Some(advertisement) => self.on_advertisement(advertisement),
                    None => self.on_source_closed(),
                },
                _ = window_elapsed(deadline) => self.end_discovery().await,
                info = self.session.next_completion() => self.on_enriched(info),
            }
        }

        self.end_discovery().await;
        debug!("session controller stopped");
    }

    async fn handle(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Start(reply) => {
                let result = self.start().await;
                let _ = reply.send(result);
            }
            Command::Stop => self.end_discovery().await,
            Command::Dismiss { index, reply } => {
                let removed: Option<BeaconInfo> = self.session.dismiss(index);
                if let Some(info) = &removed {
                    debug!(url = %info.url, "dismissed");
                    self.publish();
                }
                let _ = reply.send(removed.is_some());
            }
            Command::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    async fn start(&mut self) -> Result<(), ScanError> {
        if let Err(e) = self.gate.check().await {
            warn!("scan not started: {e}");
            return Err(e);
        }

        if self.discovery.is_some() {
            info!(generation = self.session.generation, "restarting scan");
            self.stop_radio().await;
        }

        let advertisements = match self.scanner.start_scan(self.window).await {
            Ok(advertisements) => advertisements,
            Err(e) => {
                warn!("scan not started: {e}");
                self.session.status = SessionStatus::Idle;
                self.publish();
                return Err(e);
            }
        };

        let generation: u64 = self.session.generation + 1;
        let previous = std::mem::replace(&mut self.session, SessionState::new(generation));
        previous.retire();

        self.session.status = SessionStatus::Scanning;
        self.discovery = Some(Discovery {
            advertisements: Some(advertisements),
            deadline: Instant::now() + self.window,
        });
        info!(generation, "scanning for {:.1}s", self.window.as_secs_f64());

        self.publish();
        Ok(())
    }

    fn on_advertisement(&mut self, advertisement: RawAdvertisement) {
        let Some(url) = eddystone::decode(&advertisement.service_data) else {
            trace!("ignoring non-URL frame {:02X?}", advertisement.service_data);
            return;
        };

        if !self.session.admit(&url) {
            trace!(%url, "already seen");
            return;
        }

        debug!(%url, "admitted");
        self.session.launch(url, Arc::clone(&self.fetcher));
        self.publish();
    }

    fn on_enriched(&mut self, info: BeaconInfo) {
        self.session.push_result(info);
        self.publish();
    }

    fn on_source_closed(&mut self) {
        debug!("advertisement source closed before the scan window ended");
        if let Some(discovery) = self.discovery.as_mut() {
            discovery.advertisements = None;
        }
    }

    async fn end_discovery(&mut self) {
        if self.discovery.is_none() {
            return;
        }
        self.stop_radio().await;
        self.session.status = SessionStatus::Idle;

        let snapshot: SessionSnapshot = self.session.snapshot();
        info!(
            generation = snapshot.generation,
            "scan finished: {} results, {} pending",
            snapshot.results.len(),
            snapshot.pending
        );
        self.publish();
    }

    async fn stop_radio(&mut self) {
        self.discovery = None;
        if let Err(e) = self.scanner.stop_scan().await {
            warn!("failed to stop scan: {e}");
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.session.snapshot());
    }
}

async fn next_advertisement(discovery: &mut Option<Discovery>) -> Option<RawAdvertisement> {
    match discovery.as_mut().and_then(|d| d.advertisements.as_mut()) {
        Some(advertisements) => advertisements.recv().await,
        None => std::future::pending().await,
    }
}

async fn window_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Cloneable front door to a running [`SessionController`].
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Starts a scan session, or restarts the running one.
    ///
    /// On a permission denial nothing changes, including any previous results.
    pub async fn start(&self) -> Result<(), ScanError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Start(reply)).await?;
        response.await.map_err(|_| ScanError::Closed)?
    }

    /// Closes the discovery window early. Pending enrichments still complete.
    pub async fn stop(&self) -> Result<(), ScanError> {
        self.send(Command::Stop).await
    }

    /// Removes the result at `index`. Its URL stays admitted for the session.
    pub async fn dismiss(&self, index: usize) -> Result<bool, ScanError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Dismiss { index, reply }).await?;
        response.await.map_err(|_| ScanError::Closed)
    }

    pub async fn shutdown(&self) {
        let _ = self.send(Command::Shutdown).await;
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub async fn wait_for<F>(&self, predicate: F) -> Result<SessionSnapshot, ScanError>
    where
        F: FnMut(&SessionSnapshot) -> bool,
    {
        let mut snapshots = self.subscribe();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| ScanError::Closed)?;
        Ok(snapshot.clone())
    }

    /// Resolves once a started session is idle with nothing left to enrich.
    pub async fn wait_until_settled(&self) -> Result<SessionSnapshot, ScanError> {
        self.wait_for(|snapshot| snapshot.generation > 0 && snapshot.is_settled())
            .await
    }

    async fn send(&self, command: Command) -> Result<(), ScanError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ScanError::Closed)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
