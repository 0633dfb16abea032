use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_interval: Duration,
    pub water_reminder_interval: Duration,
    pub inbox_capacity: usize,
    pub thresholds: RiskThresholds,
    pub user_name: Option<String>,
    pub session: SessionSeed,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            water_reminder_interval: Duration::from_secs(2 * 60 * 60),
            inbox_capacity: 10,
            thresholds: RiskThresholds::default(),
            user_name: None,
            session: SessionSeed::default(),
        }
    }
}

/// Policy constants for the risk rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskThresholds {
    pub systolic_limit: u32,
    pub diastolic_limit: u32,
    /// Fraction of the personal water target below which dehydration is flagged
    pub dehydration_ratio: f64,
    pub min_exercise_minutes: u32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            systolic_limit: 140,
            diastolic_limit: 90,
            dehydration_ratio: 0.6,
            min_exercise_minutes: 30,
        }
    }
}

/// Initial readings and run length for the simulated session binary
#[derive(Debug, Clone)]
pub struct SessionSeed {
    pub duration: Duration,
    pub water_target_ml: u32,
    pub initial_water_ml: u32,
    pub initial_blood_pressure: Option<(u32, u32)>,
    pub initial_exercise_minutes: u32,
    pub emit_dashboard: bool,
}

impl Default for SessionSeed {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5 * 60),
            water_target_ml: 2000,
            initial_water_ml: 0,
            initial_blood_pressure: None,
            initial_exercise_minutes: 0,
            emit_dashboard: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterIntake {
    pub daily_ml: u32,
    pub target_ml: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: Option<u32>,
    pub diastolic: Option<u32>,
}

impl BloodPressure {
    pub fn reading(systolic: u32, diastolic: u32) -> Self {
        Self {
            systolic: Some(systolic),
            diastolic: Some(diastolic),
        }
    }

    /// Both values, or nothing if either side is missing
    pub fn both(&self) -> Option<(u32, u32)> {
        match (self.systolic, self.diastolic) {
            (Some(s), Some(d)) => Some((s, d)),
            _ => None,
        }
    }
}

/// Read-only view of the current metrics, taken once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub water_intake: WaterIntake,
    pub blood_pressure: BloodPressure,
    pub exercise_minutes: u32,
}

impl HealthSnapshot {
    pub fn validate(&self) -> EngineResult<()> {
        if self.water_intake.target_ml == 0 {
            return Err(EngineError::InvalidInput(
                "water target must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    HighBloodPressure,
    Dehydration,
    Sedentary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub kind: RiskKind,
    pub severity: Severity,
    pub message: String,
    pub recommended_action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    HealthAlert,
    WaterReminder,
    Achievement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Normal,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub category: NotificationCategory,
    pub message: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    NoData,
    Normal,
    Elevated,
    Stage1,
    Stage2,
}

impl BloodPressureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoData => "No data",
            Self::Normal => "Normal",
            Self::Elevated => "Elevated",
            Self::Stage1 => "Stage 1",
            Self::Stage2 => "Stage 2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterProgress {
    /// Share of the target consumed, capped at 100
    pub percent: f64,
    pub remaining_ml: u32,
    pub goal_reached: bool,
}

#[derive(Serialize)]
pub struct DashboardPayload {
    /// One-line summary for renderers that skip blocks
    pub text: String,
    pub blocks: Vec<serde_json::Value>,
}
