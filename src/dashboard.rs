use crate::inbox::NotificationInbox;
use crate::risk::{classify_blood_pressure, highest_severity, water_progress};
use crate::types::{
    Config, DashboardPayload, HealthSnapshot, NotificationCategory, Priority, RiskAlert, Severity,
};

/// Build the block document the dashboard renders: header, metrics strip,
/// risk panel and notification list.
pub fn build_dashboard_payload(
    cfg: &Config,
    snapshot: Option<&HealthSnapshot>,
    alerts: &[RiskAlert],
    inbox: &NotificationInbox,
) -> DashboardPayload {
    let mut blocks: Vec<serde_json::Value> = Vec::new();

    let title = match &cfg.user_name {
        Some(name) => format!("Health Dashboard - {}", name),
        None => "Health Dashboard".to_string(),
    };
    let shield = match highest_severity(alerts) {
        Some(Severity::High) => "at_risk",
        _ => "ok",
    };
    blocks.push(serde_json::json!({
        "type": "header",
        "text": {"type": "plain_text", "text": title},
        "status": shield,
        "unread": inbox.unread_count(),
    }));

    // Metrics strip
    let metrics_text = match snapshot {
        Some(s) => {
            let water = water_progress(&s.water_intake)
                .map(|p| format!("{:.0}%", p.percent))
                .unwrap_or_else(|| "-".to_string());
            let bp = match s.blood_pressure.both() {
                Some((sys, dia)) => format!("{}/{}", sys, dia),
                None => "--/--".to_string(),
            };
            format!(
                "Water: {}\nBlood pressure: {} ({})\nExercise: {} min",
                water,
                bp,
                classify_blood_pressure(&s.blood_pressure).label(),
                s.exercise_minutes,
            )
        }
        None => "No metrics available.".to_string(),
    };
    blocks.push(serde_json::json!({
        "type": "section",
        "text": {"type": "mrkdwn", "text": metrics_text}
    }));

    // Risk panel
    let mut risk_lines: Vec<String> = Vec::new();
    for a in alerts {
        risk_lines.push(format!("• [{}] {}", a.severity, a.message));
        risk_lines.push(format!("  {}", a.recommended_action));
    }
    if risk_lines.is_empty() {
        risk_lines.push("No health risks detected.".to_string());
    }
    blocks.push(serde_json::json!({
        "type": "section",
        "text": {"type": "mrkdwn", "text": format!("*Health alerts*\n{}", risk_lines.join("\n"))}
    }));

    // Notifications, newest first
    let mut notification_lines: Vec<String> = Vec::new();
    for n in inbox.iter() {
        let marker = if n.read { " " } else { "*" };
        let icon = match (n.category, n.priority) {
            (_, Priority::Urgent) => "!",
            (NotificationCategory::WaterReminder, _) => "~",
            (NotificationCategory::Achievement, _) => "+",
            (NotificationCategory::HealthAlert, _) => "-",
        };
        notification_lines.push(format!(
            "{}{} {} ({})",
            marker,
            icon,
            n.message,
            n.created_at.format("%H:%M:%S")
        ));
    }
    if notification_lines.is_empty() {
        notification_lines.push("No notifications.".to_string());
    }
    blocks.push(serde_json::json!({
        "type": "section",
        "text": {"type": "mrkdwn", "text": format!("*Notifications*\n{}", notification_lines.join("\n"))}
    }));

    let text = format!(
        "{}: {} risk(s), {} unread notification(s)",
        title,
        alerts.len(),
        inbox.unread_count()
    );
    DashboardPayload { text, blocks }
}
