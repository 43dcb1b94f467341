//! Heartbeat scheduler -- the agent's main loop.
//!
//! Every tick the scheduler scans the auth log, collects a metrics
//! snapshot, drains the event buffer and the login-attempt accumulator,
//! assembles one aggregate heartbeat payload, and sends it through the
//! transport. A tick is at-most-once per interval (missed ticks are
//! skipped, not replayed).
//!
//! # Failure containment
//!
//! Every per-tick failure (unreadable log source, collection
//! degradation, delivery rejection or transport error) is logged and
//! contained to that tick. A failed delivery discards its batch -- there
//! is no requeue -- and never blocks or skips the next tick. Only
//! construction-time configuration errors are fatal, and those happen
//! before the scheduler exists.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, gauge};
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use hostwatch_core::metrics::{AGENT_TICKS_TOTAL, AGENT_UPTIME_SECONDS};
use hostwatch_core::{Event, EventKind, HeartbeatPayload, Severity};
use hostwatch_collector::MetricsSource;
use hostwatch_delivery::Transport;
use hostwatch_pipeline::{AuthLogTailer, EventBuffer};

use crate::actions;

/// Scheduler runtime settings derived from config.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// Heartbeat interval.
    pub interval: Duration,
    /// Ban the source address of critical intrusion events.
    pub auto_ban: bool,
}

/// The heartbeat scheduler.
///
/// Owns the tailer (and with it the tail cursor and login-attempt
/// accumulator); shares the event buffer with nothing else at drain
/// time -- the tailer only pushes.
pub struct Scheduler<S, T> {
    tailer: AuthLogTailer,
    buffer: Arc<EventBuffer>,
    source: S,
    transport: T,
    settings: SchedulerSettings,
    shutdown_rx: broadcast::Receiver<()>,
    started_at: Instant,
}

impl<S, T> Scheduler<S, T>
where
    S: MetricsSource,
    T: Transport,
{
    /// Create a new scheduler.
    pub fn new(
        tailer: AuthLogTailer,
        buffer: Arc<EventBuffer>,
        source: S,
        transport: T,
        settings: SchedulerSettings,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            tailer,
            buffer,
            source,
            transport,
            settings,
            shutdown_rx,
            started_at: Instant::now(),
        }
    }

    /// Run the scheduler until a shutdown broadcast is received.
    ///
    /// An in-flight tick finishes before the loop observes shutdown;
    /// no payload is sent after shutdown is observed.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.settings.interval.as_secs(),
            auto_ban = self.settings.auto_ban,
            "scheduler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = self.shutdown_rx.recv() => {
                    tracing::info!("shutdown observed, scheduler stopping");
                    break;
                }
            }
        }
    }

    /// Execute one heartbeat tick.
    async fn tick(&mut self) {
        counter!(AGENT_TICKS_TOTAL).increment(1);
        gauge!(AGENT_UPTIME_SECONDS).set(self.started_at.elapsed().as_secs() as f64);

        // Scan failure leaves previously buffered events intact; the
        // heartbeat still goes out with whatever we have.
        if let Err(e) = self.tailer.scan().await {
            tracing::warn!(error = %e, "auth log scan failed");
        }

        let snapshot = self.source.snapshot().await;
        let events = self.buffer.drain_all();
        let attempts = self.tailer.take_attempts();

        if self.settings.auto_ban {
            self.apply_bans(&events).await;
        }

        let event_count = events.len();
        let attempt_count = attempts.len();
        let payload = HeartbeatPayload::assemble(snapshot, attempts, &events);

        match self.transport.send(&payload).await {
            Ok(()) => {
                tracing::info!(
                    events = event_count,
                    login_attempts = attempt_count,
                    cpu = payload.cpu,
                    ram = payload.ram,
                    disk = payload.disk,
                    conns = payload.conns,
                    "heartbeat delivered"
                );
            }
            Err(e) => {
                // Batch is discarded; the next tick is unaffected.
                tracing::warn!(
                    error = %e,
                    events = event_count,
                    login_attempts = attempt_count,
                    "heartbeat delivery failed, batch discarded"
                );
            }
        }
    }

    /// Ban source addresses of drained critical intrusion events.
    async fn apply_bans(&self, events: &[Event]) {
        for ip in ban_targets(events) {
            if let Err(e) = actions::ban_ip(ip).await {
                tracing::warn!(%ip, error = %e, "auto-ban failed");
            }
        }
    }
}

/// Collect the distinct source addresses of critical intrusion events.
fn ban_targets(events: &[Event]) -> Vec<std::net::IpAddr> {
    let mut targets: Vec<_> = events
        .iter()
        .filter(|e| e.kind == EventKind::IntrusionAttempt && e.severity == Severity::Critical)
        .filter_map(|e| e.origin_ip)
        .collect();
    targets.sort();
    targets.dedup();
    targets
}
