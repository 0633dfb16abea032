use crate::types::{BloodPressure, BloodPressureCategory, RiskAlert, RiskKind, RiskThresholds, Severity};

pub const HIGH_BLOOD_PRESSURE_MESSAGE: &str = "Your blood pressure is elevated. Consult your doctor.";
pub const HIGH_BLOOD_PRESSURE_ACTION: &str = "Reduce sodium and increase physical activity.";

/// True when either side of a reading is above its limit
pub fn exceeds_limits(systolic: u32, diastolic: u32, thresholds: &RiskThresholds) -> bool {
    systolic > thresholds.systolic_limit || diastolic > thresholds.diastolic_limit
}

/// Flag high blood pressure. A partial reading is not evidence of risk.
pub fn analyze_blood_pressure(bp: &BloodPressure, thresholds: &RiskThresholds) -> Option<RiskAlert> {
    let (systolic, diastolic) = bp.both()?;
    if !exceeds_limits(systolic, diastolic, thresholds) {
        return None;
    }

    Some(RiskAlert {
        kind: RiskKind::HighBloodPressure,
        severity: Severity::High,
        message: HIGH_BLOOD_PRESSURE_MESSAGE.to_string(),
        recommended_action: HIGH_BLOOD_PRESSURE_ACTION.to_string(),
    })
}

/// Dashboard category for a reading. Zero counts as "no data", as an unset
/// form field does.
pub fn classify_blood_pressure(bp: &BloodPressure) -> BloodPressureCategory {
    let (s, d) = match bp.both() {
        Some((s, d)) if s > 0 && d > 0 => (s, d),
        _ => return BloodPressureCategory::NoData,
    };

    if s < 120 && d < 80 {
        BloodPressureCategory::Normal
    } else if s < 130 && d < 80 {
        BloodPressureCategory::Elevated
    } else if s < 140 || d < 90 {
        BloodPressureCategory::Stage1
    } else {
        BloodPressureCategory::Stage2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_systolic_triggers() {
        let alert = analyze_blood_pressure(&BloodPressure::reading(150, 80), &RiskThresholds::default());
        let alert = alert.expect("systolic above 140 should trigger");
        assert_eq!(alert.kind, RiskKind::HighBloodPressure);
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.message, HIGH_BLOOD_PRESSURE_MESSAGE);
    }

    #[test]
    fn test_high_diastolic_alone_triggers() {
        assert!(analyze_blood_pressure(&BloodPressure::reading(120, 95), &RiskThresholds::default()).is_some());
    }

    #[test]
    fn test_limits_are_strict() {
        let thresholds = RiskThresholds::default();
        assert!(analyze_blood_pressure(&BloodPressure::reading(140, 90), &thresholds).is_none());
        assert!(analyze_blood_pressure(&BloodPressure::reading(141, 90), &thresholds).is_some());
        assert!(analyze_blood_pressure(&BloodPressure::reading(140, 91), &thresholds).is_some());
    }

    #[test]
    fn test_partial_reading_never_triggers() {
        let thresholds = RiskThresholds::default();
        let systolic_only = BloodPressure { systolic: Some(200), diastolic: None };
        let diastolic_only = BloodPressure { systolic: None, diastolic: Some(120) };

        assert!(analyze_blood_pressure(&systolic_only, &thresholds).is_none());
        assert!(analyze_blood_pressure(&diastolic_only, &thresholds).is_none());
        assert!(analyze_blood_pressure(&BloodPressure::default(), &thresholds).is_none());
    }

    #[test]
    fn test_custom_limits() {
        let thresholds = RiskThresholds {
            systolic_limit: 130,
            ..RiskThresholds::default()
        };
        assert!(analyze_blood_pressure(&BloodPressure::reading(135, 80), &thresholds).is_some());
    }

    #[test]
    fn test_classify_blood_pressure() {
        let cases = [
            (BloodPressure::default(), BloodPressureCategory::NoData),
            (BloodPressure::reading(0, 0), BloodPressureCategory::NoData),
            (BloodPressure { systolic: Some(120), diastolic: None }, BloodPressureCategory::NoData),
            (BloodPressure::reading(115, 75), BloodPressureCategory::Normal),
            (BloodPressure::reading(125, 75), BloodPressureCategory::Elevated),
            (BloodPressure::reading(135, 85), BloodPressureCategory::Stage1),
            (BloodPressure::reading(145, 85), BloodPressureCategory::Stage1),
            (BloodPressure::reading(145, 95), BloodPressureCategory::Stage2),
        ];

        for (bp, expected) in cases {
            assert_eq!(classify_blood_pressure(&bp), expected, "reading {:?}", bp);
        }
    }
}
