use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use health_alert_engine::{
    build_dashboard_payload, load_config, Clock, HealthEngine, InMemoryMetrics, Scheduler,
    SnapshotSource, SystemClock,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = load_config()?;
    info!(
        tick_interval = ?cfg.tick_interval,
        water_reminder_interval = ?cfg.water_reminder_interval,
        session = ?cfg.session.duration,
        "configuration loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let metrics = Arc::new(
        InMemoryMetrics::new(cfg.session.water_target_ml).context("Invalid water target")?,
    );
    let mut scheduler = Scheduler::new(
        HealthEngine::new(&cfg),
        metrics.clone(),
        Arc::clone(&clock),
        cfg.tick_interval,
    );

    scheduler.start_session();

    // Seed readings the way the UI would record them
    if let Some((systolic, diastolic)) = cfg.session.initial_blood_pressure {
        metrics
            .record_blood_pressure(systolic, diastolic, clock.now())
            .context("Invalid INITIAL_BLOOD_PRESSURE")?;
        scheduler.on_blood_pressure_recorded(systolic, diastolic).await;
    }
    if cfg.session.initial_water_ml > 0 {
        let update = metrics.add_water(cfg.session.initial_water_ml);
        scheduler
            .on_water_added(update.before_ml, update.after_ml, update.target_ml)
            .await;
    }
    metrics.add_exercise(cfg.session.initial_exercise_minutes);

    info!("running session for {:?}", cfg.session.duration);
    tokio::time::sleep(cfg.session.duration).await;
    scheduler.end_session().await;

    let unread = scheduler.unread_count().await;
    info!("Session finished with {} unread notifications", unread);

    if cfg.session.emit_dashboard {
        let snapshot = metrics.snapshot().ok();
        let engine = scheduler.engine();
        let engine = engine.lock().await;
        let payload = build_dashboard_payload(&cfg, snapshot.as_ref(), engine.risk_alerts(), engine.inbox());
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        info!("Dashboard output disabled");
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
