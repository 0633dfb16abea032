use crate::types::{RiskAlert, RiskKind, RiskThresholds, Severity};

pub const SEDENTARY_MESSAGE: &str = "You have not exercised today.";
pub const SEDENTARY_ACTION: &str = "Walk for at least 30 minutes.";

pub fn analyze_activity(exercise_minutes: u32, thresholds: &RiskThresholds) -> Option<RiskAlert> {
    if exercise_minutes >= thresholds.min_exercise_minutes {
        return None;
    }

    Some(RiskAlert {
        kind: RiskKind::Sedentary,
        severity: Severity::Low,
        message: SEDENTARY_MESSAGE.to_string(),
        recommended_action: SEDENTARY_ACTION.to_string(),
    })
}
