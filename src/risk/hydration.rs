use crate::error::{EngineError, EngineResult};
use crate::types::{RiskAlert, RiskKind, RiskThresholds, Severity, WaterIntake, WaterProgress};

pub const DEHYDRATION_MESSAGE: &str = "You are not drinking enough water today.";
pub const DEHYDRATION_ACTION: &str = "Drink at least 2 glasses of water now.";

/// Flag low water intake relative to the personal target.
///
/// The cutoff is `target_ml * dehydration_ratio`, so it scales with the
/// user's goal. Intake exactly at the cutoff is not flagged.
pub fn analyze_hydration(water: &WaterIntake, thresholds: &RiskThresholds) -> EngineResult<Option<RiskAlert>> {
    if water.target_ml == 0 {
        return Err(EngineError::InvalidInput(
            "water target must be greater than zero".to_string(),
        ));
    }

    let cutoff = water.target_ml as f64 * thresholds.dehydration_ratio;
    if (water.daily_ml as f64) >= cutoff {
        return Ok(None);
    }

    Ok(Some(RiskAlert {
        kind: RiskKind::Dehydration,
        severity: Severity::Medium,
        message: DEHYDRATION_MESSAGE.to_string(),
        recommended_action: DEHYDRATION_ACTION.to_string(),
    }))
}

/// Progress toward the daily target; `None` for a zero target.
pub fn water_progress(water: &WaterIntake) -> Option<WaterProgress> {
    if water.target_ml == 0 {
        return None;
    }
    let percent = (water.daily_ml as f64 / water.target_ml as f64 * 100.0).min(100.0);
    Some(WaterProgress {
        percent,
        remaining_ml: water.target_ml.saturating_sub(water.daily_ml),
        goal_reached: water.daily_ml >= water.target_ml,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake(daily_ml: u32, target_ml: u32) -> WaterIntake {
        WaterIntake { daily_ml, target_ml }
    }

    #[test]
    fn test_low_intake_triggers_medium() {
        let alert = analyze_hydration(&intake(500, 2000), &RiskThresholds::default())
            .unwrap()
            .expect("500ml of 2000ml should be flagged");
        assert_eq!(alert.kind, RiskKind::Dehydration);
        assert_eq!(alert.severity, Severity::Medium);
    }

    #[test]
    fn test_cutoff_is_strict() {
        let thresholds = RiskThresholds::default();
        assert!(analyze_hydration(&intake(1199, 2000), &thresholds).unwrap().is_some());
        assert!(analyze_hydration(&intake(1200, 2000), &thresholds).unwrap().is_none());
        assert!(analyze_hydration(&intake(600, 1000), &thresholds).unwrap().is_none());
    }

    #[test]
    fn test_cutoff_scales_with_target() {
        let thresholds = RiskThresholds::default();
        assert!(analyze_hydration(&intake(1500, 3000), &thresholds).unwrap().is_some());
        assert!(analyze_hydration(&intake(1500, 2000), &thresholds).unwrap().is_none());
    }

    #[test]
    fn test_zero_target_is_invalid_input() {
        let result = analyze_hydration(&intake(0, 0), &RiskThresholds::default());
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_water_progress() {
        let p = water_progress(&intake(500, 2000)).unwrap();
        assert!((p.percent - 25.0).abs() < f64::EPSILON);
        assert_eq!(p.remaining_ml, 1500);
        assert!(!p.goal_reached);

        let p = water_progress(&intake(2600, 2000)).unwrap();
        assert_eq!(p.percent, 100.0);
        assert_eq!(p.remaining_ml, 0);
        assert!(p.goal_reached);

        assert!(water_progress(&intake(100, 0)).is_none());
    }
}
