use std::time::Duration;

/// Parse "90s", "15m", "2h" or bare seconds into a duration.
pub fn parse_duration(q: &str) -> Option<Duration> {
    let q = q.trim();
    if q.is_empty() {
        return None;
    }

    const UNITS: &[(&str, u64)] = &[("s", 1), ("m", 60), ("h", 60 * 60)];

    // "ms" must be tried before "s" and "m"
    if let Some(stripped) = q.strip_suffix("ms") {
        return stripped.trim().parse::<u64>().ok().map(Duration::from_millis);
    }
    for (suf, mul) in UNITS {
        if let Some(stripped) = q.strip_suffix(suf) {
            if let Ok(v) = stripped.trim().parse::<f64>() {
                if v >= 0.0 {
                    return Duration::try_from_secs_f64(v * (*mul as f64)).ok();
                }
            }
            return None;
        }
    }
    // seconds without suffix
    q.parse::<u64>().ok().map(Duration::from_secs)
}

/// Parse "250ml", "1.5L", "2l" or bare millilitres.
pub fn parse_volume_to_ml(q: &str) -> Option<u32> {
    let q = q.trim();
    if q.is_empty() {
        return None;
    }

    let lower = q.to_ascii_lowercase();
    if let Some(stripped) = lower.strip_suffix("ml") {
        return stripped.trim().parse::<u32>().ok();
    }
    if let Some(stripped) = lower.strip_suffix('l') {
        if let Ok(litres) = stripped.trim().parse::<f64>() {
            if litres.is_finite() && litres >= 0.0 {
                let ml = (litres * 1000.0).round();
                if ml <= u32::MAX as f64 {
                    return Some(ml as u32);
                }
            }
        }
        return None;
    }
    lower.parse::<u32>().ok()
}

/// Parse a "SYS/DIA" reading such as "120/80".
pub fn parse_blood_pressure(q: &str) -> Option<(u32, u32)> {
    let (sys, dia) = q.trim().split_once('/')?;
    let sys = sys.trim().parse::<u32>().ok()?;
    let dia = dia.trim().parse::<u32>().ok()?;
    Some((sys, dia))
}

pub fn parse_bool(v: &str) -> bool {
    matches!(v.trim(), "1" | "true" | "TRUE" | "True")
}
