// Engine state and the handlers that mutate it.
//
// All mutation of pacer state and the inbox goes through `tick` and the
// `on_*` event handlers. Each call runs to completion; callers that share the
// engine across tasks must serialize access (see `scheduler`).

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::EngineResult;
use crate::inbox::{IdGenerator, NotificationInbox};
use crate::pacer::{water_goal_crossed, NotificationPacer, PacerState};
use crate::report::TickReport;
use crate::risk::{self, exceeds_limits};
use crate::types::{
    Config, HealthSnapshot, Notification, NotificationCategory, NotificationId, Priority,
    RiskAlert, RiskThresholds,
};

pub const WATER_REMINDER_MESSAGE: &str = "Time to drink some water";
pub const WATER_GOAL_MESSAGE: &str = "Daily water goal reached!";
pub const HIGH_READING_MESSAGE: &str = "High blood pressure reading detected";

pub struct HealthEngine {
    thresholds: RiskThresholds,
    pacer: NotificationPacer,
    inbox: NotificationInbox,
    risk_alerts: Vec<RiskAlert>,
    ids: IdGenerator,
}

impl HealthEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            pacer: NotificationPacer::new(config.water_reminder_interval),
            inbox: NotificationInbox::with_capacity(config.inbox_capacity),
            risk_alerts: Vec::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Run one evaluation cycle.
    ///
    /// A failed snapshot skips risk evaluation and leaves the previous risk
    /// view in place. The water reminder does not depend on metrics and is
    /// checked either way.
    pub fn tick(&mut self, now: DateTime<Utc>, snapshot: EngineResult<HealthSnapshot>) -> TickReport {
        let mut report = match snapshot {
            Ok(snapshot) => {
                if let Err(e) = snapshot.validate() {
                    warn!(error = %e, "snapshot failed validation, hydration rule disabled this tick");
                }
                let alerts = risk::evaluate(&snapshot, &self.thresholds);
                self.risk_alerts = alerts.clone();

                let mut report = TickReport::evaluated(now, alerts);
                let urgent: Vec<String> = self
                    .pacer
                    .eligible_health_alerts(&self.risk_alerts)
                    .into_iter()
                    .map(|a| a.message.clone())
                    .collect();
                for message in urgent {
                    let id = self.emit(now, NotificationCategory::HealthAlert, message, Priority::Urgent);
                    report.record_emission(id, NotificationCategory::HealthAlert);
                }
                report
            }
            Err(e) => {
                warn!(error = %e, "no metrics available, skipping risk evaluation");
                TickReport::skipped(now)
            }
        };

        if self.pacer.try_claim_water_reminder(now) {
            let id = self.emit(
                now,
                NotificationCategory::WaterReminder,
                WATER_REMINDER_MESSAGE.to_string(),
                Priority::Normal,
            );
            report.record_emission(id, NotificationCategory::WaterReminder);
        }

        let summary = report.summary();
        debug!(
            risks = summary.total_risks(),
            emitted = summary.total_emitted(),
            unread = self.inbox.unread_count(),
            "tick complete"
        );
        report
    }

    /// Handle a water intake update. Must be called by whoever mutates
    /// intake, with the values from just before and after the change.
    pub fn on_water_added(
        &mut self,
        now: DateTime<Utc>,
        before_ml: u32,
        after_ml: u32,
        target_ml: u32,
    ) -> Option<NotificationId> {
        if target_ml == 0 {
            warn!(before_ml, after_ml, "ignoring water update with zero target");
            return None;
        }
        if !water_goal_crossed(before_ml, after_ml, target_ml) {
            return None;
        }

        info!(after_ml, target_ml, "daily water goal reached");
        Some(self.emit(
            now,
            NotificationCategory::Achievement,
            WATER_GOAL_MESSAGE.to_string(),
            Priority::Normal,
        ))
    }

    /// Handle a manually entered blood pressure reading, alerting at once
    /// rather than waiting for the next tick.
    pub fn on_blood_pressure_recorded(
        &mut self,
        now: DateTime<Utc>,
        systolic: u32,
        diastolic: u32,
    ) -> Option<NotificationId> {
        if !exceeds_limits(systolic, diastolic, &self.thresholds) {
            return None;
        }

        info!(systolic, diastolic, "high blood pressure reading recorded");
        Some(self.emit(
            now,
            NotificationCategory::HealthAlert,
            HIGH_READING_MESSAGE.to_string(),
            Priority::Urgent,
        ))
    }

    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        let found = self.inbox.mark_read(id);
        if !found {
            debug!(%id, "mark_read for unknown notification ignored");
        }
        found
    }

    pub fn risk_alerts(&self) -> &[RiskAlert] {
        &self.risk_alerts
    }

    pub fn inbox(&self) -> &NotificationInbox {
        &self.inbox
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inbox.notifications()
    }

    pub fn unread_count(&self) -> usize {
        self.inbox.unread_count()
    }

    pub fn pacer_state(&self) -> &PacerState {
        self.pacer.state()
    }

    fn emit(
        &mut self,
        now: DateTime<Utc>,
        category: NotificationCategory,
        message: String,
        priority: Priority,
    ) -> NotificationId {
        let id = self.ids.next_id(now);
        debug!(%id, ?category, ?priority, "notification created");
        self.inbox.push(Notification {
            id,
            category,
            message,
            priority,
            created_at: now,
            read: false,
        });
        id
    }
}
