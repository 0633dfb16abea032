use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::error::{EngineError, EngineResult};
use crate::types::{BloodPressure, HealthSnapshot, WaterIntake};

pub const BLOOD_PRESSURE_HISTORY_LIMIT: usize = 30;

/// Pull accessor for the current health readings, implemented by whoever
/// owns metric collection.
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self) -> EngineResult<HealthSnapshot>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressureReading {
    pub systolic: u32,
    pub diastolic: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Before/after values of a water update, for edge-triggered goal detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterUpdate {
    pub before_ml: u32,
    pub after_ml: u32,
    pub target_ml: u32,
}

#[derive(Debug)]
struct Readings {
    water: WaterIntake,
    blood_pressure: BloodPressure,
    bp_history: VecDeque<BloodPressureReading>,
    exercise_minutes: u32,
}

/// In-process metrics store
#[derive(Debug)]
pub struct InMemoryMetrics {
    readings: Mutex<Readings>,
}

impl InMemoryMetrics {
    pub fn new(target_ml: u32) -> EngineResult<Self> {
        if target_ml == 0 {
            return Err(EngineError::InvalidInput(
                "water target must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            readings: Mutex::new(Readings {
                water: WaterIntake { daily_ml: 0, target_ml },
                blood_pressure: BloodPressure::default(),
                bp_history: VecDeque::with_capacity(BLOOD_PRESSURE_HISTORY_LIMIT),
                exercise_minutes: 0,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Readings> {
        self.readings.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_water(&self, amount_ml: u32) -> WaterUpdate {
        let mut r = self.lock();
        let before_ml = r.water.daily_ml;
        r.water.daily_ml = before_ml.saturating_add(amount_ml);
        WaterUpdate {
            before_ml,
            after_ml: r.water.daily_ml,
            target_ml: r.water.target_ml,
        }
    }

    pub fn set_water_target(&self, target_ml: u32) -> EngineResult<()> {
        if target_ml == 0 {
            return Err(EngineError::InvalidInput(
                "water target must be greater than zero".to_string(),
            ));
        }
        self.lock().water.target_ml = target_ml;
        Ok(())
    }

    pub fn record_blood_pressure(&self, systolic: u32, diastolic: u32, at: DateTime<Utc>) -> EngineResult<()> {
        if systolic == 0 || diastolic == 0 {
            return Err(EngineError::InvalidInput(format!(
                "blood pressure reading {}/{} must be positive",
                systolic, diastolic
            )));
        }
        let mut r = self.lock();
        r.blood_pressure = BloodPressure::reading(systolic, diastolic);
        r.bp_history.push_back(BloodPressureReading {
            systolic,
            diastolic,
            recorded_at: at,
        });
        while r.bp_history.len() > BLOOD_PRESSURE_HISTORY_LIMIT {
            r.bp_history.pop_front();
        }
        Ok(())
    }

    /// Oldest first
    pub fn blood_pressure_history(&self) -> Vec<BloodPressureReading> {
        self.lock().bp_history.iter().copied().collect()
    }

    pub fn add_exercise(&self, minutes: u32) {
        let mut r = self.lock();
        r.exercise_minutes = r.exercise_minutes.saturating_add(minutes);
    }
}

impl SnapshotSource for InMemoryMetrics {
    fn snapshot(&self) -> EngineResult<HealthSnapshot> {
        let r = self.lock();
        Ok(HealthSnapshot {
            water_intake: r.water,
            blood_pressure: r.blood_pressure,
            exercise_minutes: r.exercise_minutes,
        })
    }
}
