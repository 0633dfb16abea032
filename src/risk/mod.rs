// Risk rules, one module per health dimension
pub mod activity;
pub mod blood_pressure;
pub mod hydration;

pub use activity::analyze_activity;
pub use blood_pressure::{analyze_blood_pressure, classify_blood_pressure, exceeds_limits};
pub use hydration::{analyze_hydration, water_progress};

use crate::types::{HealthSnapshot, RiskAlert, RiskThresholds, Severity};

/// Run every rule against the snapshot.
///
/// Rules are independent: all that trigger are returned, in the fixed order
/// blood pressure, hydration, activity. Never fails; a rule that cannot be
/// evaluated (e.g. a zero water target) simply does not trigger.
pub fn evaluate(snapshot: &HealthSnapshot, thresholds: &RiskThresholds) -> Vec<RiskAlert> {
    let mut alerts = Vec::with_capacity(3);

    if let Some(alert) = analyze_blood_pressure(&snapshot.blood_pressure, thresholds) {
        alerts.push(alert);
    }
    if let Ok(Some(alert)) = analyze_hydration(&snapshot.water_intake, thresholds) {
        alerts.push(alert);
    }
    if let Some(alert) = analyze_activity(snapshot.exercise_minutes, thresholds) {
        alerts.push(alert);
    }

    alerts
}

pub fn highest_severity(alerts: &[RiskAlert]) -> Option<Severity> {
    alerts.iter().map(|a| a.severity).max()
}
