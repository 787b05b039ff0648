use chrono::{DateTime, Utc};

/// Whole days elapsed from `earlier` to `later`, floored
///
/// Negative when `later` is actually before `earlier`.
pub fn whole_days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    later
        .signed_duration_since(earlier)
        .num_seconds()
        .div_euclid(86_400)
}

/// Formats `target` as human-readable time relative to `from`
///
/// Examples:
/// - Same instant or past: "now"
/// - 30 seconds later: "in 30 seconds"
/// - 1 minute later: "in 1 minute"
/// - 2 hours later: "in 2 hours"
/// - 1 day later: "tomorrow"
/// - 3 days later: "in 3 days"
/// - 30 days or more: "on 2025-12-10"
pub fn format_time_difference(from: DateTime<Utc>, target: DateTime<Utc>) -> String {
    let duration = target.signed_duration_since(from);

    if duration.num_seconds() <= 0 {
        "now".to_string()
    } else if duration.num_seconds() < 60 {
        let secs = duration.num_seconds();
        format!("in {} second{}", secs, plural(secs))
    } else if duration.num_minutes() < 60 {
        let mins = duration.num_minutes();
        format!("in {} minute{}", mins, plural(mins))
    } else if duration.num_hours() < 24 {
        let hours = duration.num_hours();
        format!("in {} hour{}", hours, plural(hours))
    } else if duration.num_days() == 1 {
        "tomorrow".to_string()
    } else if duration.num_days() < 30 {
        format!("in {} days", duration.num_days())
    } else {
        format!("on {}", target.format("%Y-%m-%d"))
    }
}

/// Formats a number of seconds of study as "1h 05m", "12m" or "45s"
pub fn format_study_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", seconds)
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}
