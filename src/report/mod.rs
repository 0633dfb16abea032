use chrono::{DateTime, Utc};

use crate::types::{NotificationCategory, NotificationId, RiskAlert, Severity};

/// Outcome of one scheduler tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub at: DateTime<Utc>,
    /// Snapshot could not be read, so risk evaluation was skipped
    pub skipped: bool,
    pub alerts: Vec<RiskAlert>,
    pub emitted: Vec<(NotificationId, NotificationCategory)>,
}

impl TickReport {
    pub fn skipped(at: DateTime<Utc>) -> Self {
        Self {
            at,
            skipped: true,
            alerts: Vec::new(),
            emitted: Vec::new(),
        }
    }

    pub fn evaluated(at: DateTime<Utc>, alerts: Vec<RiskAlert>) -> Self {
        Self {
            at,
            skipped: false,
            alerts,
            emitted: Vec::new(),
        }
    }

    pub fn record_emission(&mut self, id: NotificationId, category: NotificationCategory) {
        self.emitted.push((id, category));
    }

    pub fn emitted_ids(&self) -> Vec<NotificationId> {
        self.emitted.iter().map(|(id, _)| *id).collect()
    }

    pub fn summary(&self) -> ReportSummary {
        let count_severity = |s: Severity| self.alerts.iter().filter(|a| a.severity == s).count();
        let count_category = |c: NotificationCategory| self.emitted.iter().filter(|(_, cat)| *cat == c).count();

        ReportSummary {
            high_risk_count: count_severity(Severity::High),
            medium_risk_count: count_severity(Severity::Medium),
            low_risk_count: count_severity(Severity::Low),
            health_alerts_emitted: count_category(NotificationCategory::HealthAlert),
            water_reminders_emitted: count_category(NotificationCategory::WaterReminder),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    pub health_alerts_emitted: usize,
    pub water_reminders_emitted: usize,
}

impl ReportSummary {
    pub fn total_risks(&self) -> usize {
        self.high_risk_count + self.medium_risk_count + self.low_risk_count
    }

    pub fn total_emitted(&self) -> usize {
        self.health_alerts_emitted + self.water_reminders_emitted
    }

    pub fn has_risks(&self) -> bool {
        self.total_risks() > 0
    }
}
