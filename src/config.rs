use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::time::Duration;

use crate::parsing::{parse_blood_pressure, parse_bool, parse_duration, parse_volume_to_ml};
use crate::scheduler::MAX_TICK_INTERVAL;
use crate::types::{Config, RiskThresholds, SessionSeed};

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_with_env(&SystemEnvironment)
}

pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    let defaults = Config::default();

    let tick_interval = duration_var(env, "TICK_INTERVAL", defaults.tick_interval)?;
    if tick_interval.is_zero() {
        return Err(anyhow!("TICK_INTERVAL must be greater than zero"));
    }
    if tick_interval > MAX_TICK_INTERVAL {
        return Err(anyhow!("TICK_INTERVAL must be at most {:?}, got {:?}", MAX_TICK_INTERVAL, tick_interval));
    }
    let water_reminder_interval =
        duration_var(env, "WATER_REMINDER_INTERVAL", defaults.water_reminder_interval)?;

    let inbox_capacity: usize = env.get_var("INBOX_CAPACITY")
        .unwrap_or_else(|| defaults.inbox_capacity.to_string())
        .trim()
        .parse()
        .context("Invalid INBOX_CAPACITY")?;
    if inbox_capacity == 0 {
        return Err(anyhow!("INBOX_CAPACITY must be at least 1"));
    }

    let thresholds = load_thresholds(env, &defaults.thresholds)?;
    let user_name = env.get_var("USER_NAME")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let session = load_session_seed(env, &defaults.session)?;

    Ok(Config {
        tick_interval,
        water_reminder_interval,
        inbox_capacity,
        thresholds,
        user_name,
        session,
    })
}

fn load_thresholds<E: EnvironmentProvider>(env: &E, defaults: &RiskThresholds) -> Result<RiskThresholds> {
    let systolic_limit: u32 = env.get_var("SYSTOLIC_LIMIT")
        .unwrap_or_else(|| defaults.systolic_limit.to_string())
        .trim()
        .parse()
        .context("Invalid SYSTOLIC_LIMIT")?;

    let diastolic_limit: u32 = env.get_var("DIASTOLIC_LIMIT")
        .unwrap_or_else(|| defaults.diastolic_limit.to_string())
        .trim()
        .parse()
        .context("Invalid DIASTOLIC_LIMIT")?;

    let dehydration_ratio: f64 = env.get_var("DEHYDRATION_RATIO")
        .unwrap_or_else(|| defaults.dehydration_ratio.to_string())
        .trim()
        .parse()
        .context("Invalid DEHYDRATION_RATIO")?;
    if !(dehydration_ratio > 0.0 && dehydration_ratio <= 1.0) {
        return Err(anyhow!("DEHYDRATION_RATIO must be in (0, 1], got {}", dehydration_ratio));
    }

    let min_exercise_minutes: u32 = env.get_var("MIN_EXERCISE_MINUTES")
        .unwrap_or_else(|| defaults.min_exercise_minutes.to_string())
        .trim()
        .parse()
        .context("Invalid MIN_EXERCISE_MINUTES")?;

    Ok(RiskThresholds {
        systolic_limit,
        diastolic_limit,
        dehydration_ratio,
        min_exercise_minutes,
    })
}

fn load_session_seed<E: EnvironmentProvider>(env: &E, defaults: &SessionSeed) -> Result<SessionSeed> {
    let duration = duration_var(env, "SESSION_DURATION", defaults.duration)?;

    let water_target_ml = volume_var(env, "WATER_TARGET", defaults.water_target_ml)?;
    if water_target_ml == 0 {
        return Err(anyhow!("WATER_TARGET must be greater than zero"));
    }
    let initial_water_ml = volume_var(env, "INITIAL_WATER", defaults.initial_water_ml)?;

    let initial_blood_pressure = match env.get_var("INITIAL_BLOOD_PRESSURE") {
        Some(v) if !v.trim().is_empty() => Some(
            parse_blood_pressure(&v)
                .ok_or_else(|| anyhow!("Invalid INITIAL_BLOOD_PRESSURE {:?}, expected SYS/DIA", v))?,
        ),
        _ => defaults.initial_blood_pressure,
    };

    let initial_exercise_minutes: u32 = env.get_var("INITIAL_EXERCISE_MINUTES")
        .unwrap_or_else(|| defaults.initial_exercise_minutes.to_string())
        .trim()
        .parse()
        .context("Invalid INITIAL_EXERCISE_MINUTES")?;

    let emit_dashboard = env.get_var("EMIT_DASHBOARD")
        .map(|v| parse_bool(&v))
        .unwrap_or(defaults.emit_dashboard);

    Ok(SessionSeed {
        duration,
        water_target_ml,
        initial_water_ml,
        initial_blood_pressure,
        initial_exercise_minutes,
        emit_dashboard,
    })
}

fn duration_var<E: EnvironmentProvider>(env: &E, key: &str, default: Duration) -> Result<Duration> {
    match env.get_var(key) {
        Some(v) => parse_duration(&v).ok_or_else(|| anyhow!("Invalid {}: {:?}", key, v)),
        None => Ok(default),
    }
}

fn volume_var<E: EnvironmentProvider>(env: &E, key: &str, default: u32) -> Result<u32> {
    match env.get_var(key) {
        Some(v) => parse_volume_to_ml(&v).ok_or_else(|| anyhow!("Invalid {}: {:?}", key, v)),
        None => Ok(default),
    }
}
