use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::collector::SnapshotSource;
use crate::engine::HealthEngine;
use crate::report::TickReport;
use crate::types::{Notification, NotificationId, RiskAlert};

/// Longest tick period the scheduler will run with.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Inactive,
    Active,
}

struct Session {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

/// Periodic driver for a `HealthEngine`.
///
/// The engine sits behind a single async mutex shared by the tick task and
/// the user-action methods, so ticks and events never interleave.
pub struct Scheduler {
    engine: Arc<Mutex<HealthEngine>>,
    source: Arc<dyn SnapshotSource>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    session: Option<Session>,
}

impl Scheduler {
    pub fn new(
        engine: HealthEngine,
        source: Arc<dyn SnapshotSource>,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        let tick_interval = if tick_interval > MAX_TICK_INTERVAL {
            warn!(requested = ?tick_interval, max = ?MAX_TICK_INTERVAL, "tick interval clamped");
            MAX_TICK_INTERVAL
        } else {
            tick_interval
        };
        Self {
            engine: Arc::new(Mutex::new(engine)),
            source,
            clock,
            tick_interval,
            session: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.session.is_some() {
            SchedulerState::Active
        } else {
            SchedulerState::Inactive
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn is_active(&self) -> bool {
        self.state() == SchedulerState::Active
    }

    /// Begin ticking. The first tick fires one full interval from now.
    /// No-op if a session is already running. Must be called from within a
    /// tokio runtime.
    pub fn start_session(&mut self) {
        if self.session.is_some() {
            debug!("session already active");
            return;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_tick_loop(
            Arc::clone(&self.engine),
            Arc::clone(&self.source),
            Arc::clone(&self.clock),
            self.tick_interval,
            shutdown_rx,
        ));

        info!(interval_secs = self.tick_interval.as_secs_f64(), "health session started");
        self.session = Some(Session { handle, shutdown_tx });
    }

    /// Stop ticking. Returns once the tick task has exited, so no tick can
    /// fire afterwards. No-op when inactive.
    pub async fn end_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        let _ = session.shutdown_tx.send(true);
        if let Err(e) = session.handle.await {
            warn!(error = %e, "tick task ended abnormally");
        }
        info!("health session ended");
    }

    /// Run one tick immediately, outside the timer.
    pub async fn tick_now(&self) -> TickReport {
        run_tick(&self.engine, self.source.as_ref(), self.clock.as_ref()).await
    }

    pub async fn on_water_added(&self, before_ml: u32, after_ml: u32, target_ml: u32) -> Option<NotificationId> {
        let now = self.clock.now();
        self.engine.lock().await.on_water_added(now, before_ml, after_ml, target_ml)
    }

    pub async fn on_blood_pressure_recorded(&self, systolic: u32, diastolic: u32) -> Option<NotificationId> {
        let now = self.clock.now();
        self.engine.lock().await.on_blood_pressure_recorded(now, systolic, diastolic)
    }

    pub async fn mark_read(&self, id: NotificationId) -> bool {
        self.engine.lock().await.mark_read(id)
    }

    pub async fn risk_alerts(&self) -> Vec<RiskAlert> {
        self.engine.lock().await.risk_alerts().to_vec()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.engine.lock().await.notifications()
    }

    pub async fn unread_count(&self) -> usize {
        self.engine.lock().await.unread_count()
    }

    pub fn engine(&self) -> Arc<Mutex<HealthEngine>> {
        Arc::clone(&self.engine)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.handle.abort();
        }
    }
}

async fn run_tick_loop(
    engine: Arc<Mutex<HealthEngine>>,
    source: Arc<dyn SnapshotSource>,
    clock: Arc<dyn Clock>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let now = Instant::now();
    let start = now.checked_add(period).unwrap_or(now);
    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                run_tick(&engine, source.as_ref(), clock.as_ref()).await;
            }
        }
    }
}

async fn run_tick(engine: &Mutex<HealthEngine>, source: &dyn SnapshotSource, clock: &dyn Clock) -> TickReport {
    let snapshot = source.snapshot();
    let now = clock.now();
    let report = engine.lock().await.tick(now, snapshot);

    let summary = report.summary();
    if summary.total_emitted() > 0 {
        info!(
            high = summary.high_risk_count,
            medium = summary.medium_risk_count,
            low = summary.low_risk_count,
            health_alerts = summary.health_alerts_emitted,
            water_reminders = summary.water_reminders_emitted,
            ids = ?report.emitted_ids(),
            "tick emitted notifications"
        );
    } else if summary.has_risks() {
        debug!(risks = summary.total_risks(), "tick found risks, nothing to notify");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::EngineResult;
    use crate::types::{BloodPressure, Config, HealthSnapshot, WaterIntake};
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        reads: AtomicUsize,
    }

    impl SnapshotSource for CountingSource {
        fn snapshot(&self) -> EngineResult<HealthSnapshot> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(HealthSnapshot {
                water_intake: WaterIntake { daily_ml: 1800, target_ml: 2000 },
                blood_pressure: BloodPressure::reading(118, 76),
                exercise_minutes: 40,
            })
        }
    }

    fn scheduler() -> (Scheduler, Arc<CountingSource>) {
        let source = Arc::new(CountingSource { reads: AtomicUsize::new(0) });
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()));
        let scheduler = Scheduler::new(
            HealthEngine::new(&Config::default()),
            source.clone(),
            clock,
            Duration::from_secs(60),
        );
        (scheduler, source)
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_while_inactive() {
        let (scheduler, source) = scheduler();
        assert_eq!(scheduler.state(), SchedulerState::Inactive);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(source.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_interval() {
        let (mut scheduler, source) = scheduler();
        scheduler.start_session();
        assert!(scheduler.is_active());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(source.reads.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(3 * 60)).await;
        assert_eq!(source.reads.load(Ordering::SeqCst), 3);

        scheduler.end_session().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_after_end_session() {
        let (mut scheduler, source) = scheduler();
        scheduler.start_session();
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);

        scheduler.end_session().await;
        assert_eq!(scheduler.state(), SchedulerState::Inactive);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);

        // ending twice is harmless
        scheduler.end_session().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_session_twice_is_noop() {
        let (mut scheduler, source) = scheduler();
        scheduler.start_session();
        scheduler.start_session();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);
        scheduler.end_session().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_interval_is_clamped() {
        let source = Arc::new(CountingSource { reads: AtomicUsize::new(0) });
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()));
        let mut scheduler = Scheduler::new(
            HealthEngine::new(&Config::default()),
            source.clone(),
            clock,
            Duration::from_secs(18_000_000_000_000_000_000),
        );
        assert_eq!(scheduler.tick_interval(), MAX_TICK_INTERVAL);

        scheduler.start_session();
        tokio::time::sleep(MAX_TICK_INTERVAL + Duration::from_secs(1)).await;
        assert!(scheduler.is_active());
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);

        scheduler.end_session().await;
        assert_eq!(scheduler.state(), SchedulerState::Inactive);
    }

    #[tokio::test]
    async fn test_tick_now_and_events() {
        let (scheduler, _source) = scheduler();

        let report = scheduler.tick_now().await;
        assert!(!report.skipped);
        assert_eq!(report.summary().water_reminders_emitted, 1);

        let id = scheduler.on_water_added(1900, 2100, 2000).await;
        assert!(id.is_some());
        assert!(scheduler.on_blood_pressure_recorded(160, 100).await.is_some());

        assert_eq!(scheduler.unread_count().await, 3);
        assert!(scheduler.mark_read(id.unwrap()).await);
        assert_eq!(scheduler.unread_count().await, 2);
        assert_eq!(scheduler.notifications().await.len(), 3);
        assert!(scheduler.risk_alerts().await.is_empty());
    }
}
