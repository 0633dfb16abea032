// Public modules
pub mod types;
pub mod error;
pub mod config;
pub mod parsing;
pub mod clock;
pub mod risk;
pub mod pacer;
pub mod inbox;
pub mod collector;
pub mod report;
pub mod engine;
pub mod scheduler;
pub mod dashboard;

// Re-export commonly used items
pub use types::*;
pub use error::{EngineError, EngineResult};
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use parsing::{parse_duration, parse_volume_to_ml, parse_blood_pressure};
pub use clock::{Clock, SystemClock, ManualClock};
pub use risk::{evaluate, highest_severity, classify_blood_pressure, water_progress};
pub use pacer::{NotificationPacer, PacerState, water_goal_crossed};
pub use inbox::{NotificationInbox, IdGenerator};
pub use collector::{SnapshotSource, InMemoryMetrics, WaterUpdate, BloodPressureReading};
pub use report::{TickReport, ReportSummary};
pub use engine::HealthEngine;
pub use scheduler::{Scheduler, SchedulerState, MAX_TICK_INTERVAL};
pub use dashboard::build_dashboard_payload;
