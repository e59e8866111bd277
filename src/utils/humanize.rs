//! Short human-readable rendering of millisecond durations (`+3ms`, `+2s`, `+1h`).

const SECOND: i64 = 1000;
const MINUTE: i64 = SECOND * 60;
const HOUR: i64 = MINUTE * 60;
const DAY: i64 = HOUR * 24;

/// Formats `ms` using the largest unit it reaches, rounded to a whole number.
pub fn humanize_ms(ms: i64) -> String {
    let abs = ms.abs();
    if abs >= DAY {
        return format!("{}d", round_div(ms, DAY));
    }
    if abs >= HOUR {
        return format!("{}h", round_div(ms, HOUR));
    }
    if abs >= MINUTE {
        return format!("{}m", round_div(ms, MINUTE));
    }
    if abs >= SECOND {
        return format!("{}s", round_div(ms, SECOND));
    }
    format!("{}ms", ms)
}

/// Rounds half toward positive infinity, so `-1.5` becomes `-1`.
fn round_div(value: i64, unit: i64) -> i64 {
    (value as f64 / unit as f64 + 0.5).floor() as i64
}
