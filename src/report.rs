//! Terminal rendering for the study_coach binary

use crate::analytics::AnalyticsSummary;
use crate::engine::EngineConfig;
use crate::profile::UserProfile;
use crate::recommendations::{Priority, Recommendation};
use crate::spaced_repetition::{ReviewItem, ReviewResult};
use crate::time_format::{format_study_time, format_time_difference};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

fn priority_label(priority: Priority) -> ColoredString {
    let label = format!("[{}]", priority.as_str());
    match priority {
        Priority::High => label.red().bold(),
        Priority::Medium => label.yellow().bold(),
        Priority::Low => label.dimmed(),
    }
}

/// Overall statistics plus the next scheduled review, if any
pub fn render_summary(
    summary: &AnalyticsSummary,
    next_review: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=== Study Progress ===".cyan().bold());
    let _ = writeln!(
        out,
        "{}: {} ({} correct, {} incorrect)",
        "Questions".white().bold(),
        summary.total_questions_answered,
        summary.total_correct,
        summary.total_incorrect
    );
    let _ = writeln!(out, "{}: {}%", "Accuracy".white().bold(), summary.overall_accuracy);
    let _ = writeln!(
        out,
        "{}: {}",
        "Study time".white().bold(),
        format_study_time(summary.total_study_time)
    );
    let _ = writeln!(out, "{}: {}", "Topics".white().bold(), summary.topics_practiced);
    let _ = writeln!(
        out,
        "{}: {} day(s) (longest {})",
        "Streak".white().bold(),
        summary.current_streak,
        summary.longest_streak
    );

    let goal = format!("{}/{}", summary.daily_progress, summary.daily_goal);
    let goal = if summary.daily_goal_reached() {
        goal.green()
    } else {
        goal.yellow()
    };
    let _ = writeln!(out, "{}: {}", "Today".white().bold(), goal);

    let _ = writeln!(
        out,
        "{}: {} due of {} queued",
        "Reviews".white().bold(),
        summary.reviews_due,
        summary.review_queue_size
    );
    if let Some(next) = next_review {
        let _ = writeln!(
            out,
            "{}: {}",
            "Next review".white().bold(),
            format_time_difference(now, next)
        );
    }
    out
}

/// One-line learner profile plus the day boundary the engine uses
pub fn render_profile(profile: &UserProfile, config: EngineConfig) -> String {
    let offset = config.utc_offset_minutes;
    let sign = if offset < 0 { '-' } else { '+' };
    let minutes = offset.unsigned_abs();
    format!(
        "{}: {}, {}, {} explanations, language {} (day boundary UTC{}{:02}:{:02})\n",
        "Profile".white().bold(),
        profile.experience_level.as_str(),
        profile.background.as_str(),
        profile.explanation_style.as_str(),
        profile.preferred_language.as_str(),
        sign,
        minutes / 60,
        minutes % 60
    )
}

pub fn render_recommendations(recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return format!("{}\n", "Nothing to suggest right now. Keep practicing!".dimmed());
    }

    let mut out = String::new();
    for rec in recommendations {
        let _ = writeln!(out, "{} {}", priority_label(rec.priority), rec.title.bold());
        let _ = writeln!(out, "    {}", rec.description);
        let _ = writeln!(
            out,
            "    {} questions, about {} min",
            rec.question_count, rec.estimated_minutes
        );
    }
    out
}

pub fn render_reviews(due: &[ReviewItem], now: DateTime<Utc>) -> String {
    if due.is_empty() {
        return format!("{}\n", "No reviews due.".dimmed());
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", format!("{} review(s) due", due.len()).cyan().bold());
    for item in due {
        let last = match item.last_result {
            Some(ReviewResult::Correct) => "correct".green(),
            Some(ReviewResult::Incorrect) => "incorrect".red(),
            None => "new".normal(),
        };
        let _ = writeln!(
            out,
            "  {} ({}) interval {}d, ease {:.2}, last {}, due {}",
            item.question_id.bold(),
            item.topic,
            item.interval,
            item.ease_factor,
            last,
            format_time_difference(now, item.next_review_date)
        );
    }
    out
}
