// Decides which conditions may produce a notification right now.
//
// Three independent policies:
// - high-severity risk alerts pass through every tick, no deduplication
// - water reminders fire at most once per rolling window
// - the water-goal achievement is edge-triggered on the crossing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::types::{RiskAlert, Severity};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacerState {
    pub last_water_reminder_at: Option<DateTime<Utc>>,
}

pub struct NotificationPacer {
    state: PacerState,
    water_reminder_interval: Duration,
}

impl NotificationPacer {
    pub fn new(water_reminder_interval: Duration) -> Self {
        Self {
            state: PacerState::default(),
            water_reminder_interval,
        }
    }

    pub fn state(&self) -> &PacerState {
        &self.state
    }

    /// Alerts allowed to become urgent notifications this tick
    pub fn eligible_health_alerts<'a>(&self, alerts: &'a [RiskAlert]) -> Vec<&'a RiskAlert> {
        alerts.iter().filter(|a| a.severity == Severity::High).collect()
    }

    /// Whether a water reminder could fire at `now`, without claiming it.
    pub fn water_reminder_due(&self, now: DateTime<Utc>) -> bool {
        match self.state.last_water_reminder_at {
            None => true,
            // A negative elapsed time (clock moved backwards) fails open.
            Some(last) => match now.signed_duration_since(last).to_std() {
                Ok(elapsed) => elapsed >= self.water_reminder_interval,
                Err(_) => true,
            },
        }
    }

    /// Check and claim the water reminder slot in one step.
    ///
    /// Returns true when the caller must emit a reminder; the window is
    /// restarted at `now` before returning.
    pub fn try_claim_water_reminder(&mut self, now: DateTime<Utc>) -> bool {
        if !self.water_reminder_due(now) {
            return false;
        }
        if let Some(last) = self.state.last_water_reminder_at {
            if now < last {
                debug!(%last, %now, "clock moved backwards, resetting water reminder window");
            }
        }
        self.state.last_water_reminder_at = Some(now);
        true
    }
}

/// True only on the update that takes intake from below the target to at or
/// above it.
pub fn water_goal_crossed(before_ml: u32, after_ml: u32, target_ml: u32) -> bool {
    before_ml < target_ml && after_ml >= target_ml
}
