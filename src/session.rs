use crate::analytics::LearningAnalytics;
use crate::date_provider::local_date;
use crate::time_format::whole_days_between;
use chrono::{DateTime, Utc};
use log::{debug, info};

/// Streak and daily-goal bookkeeping
pub struct SessionAnalytics;

impl SessionAnalytics {
    /// Updates the consecutive-day streak for a session starting at `now`
    ///
    /// Days are counted as whole 24h periods since the previous session, not
    /// calendar dates: a session 0 days later keeps the streak, 1 day later
    /// extends it, anything else (longer gaps, or a clock that went backwards)
    /// starts over at 1.
    pub fn record_session(analytics: &mut LearningAnalytics, now: DateTime<Utc>) {
        let streak = match analytics.last_session_date {
            None => 1,
            Some(last) => match whole_days_between(last, now) {
                0 => analytics.current_streak,
                1 => analytics.current_streak + 1,
                _ => 1,
            },
        };

        if streak != analytics.current_streak {
            info!("Study streak is now {} day(s)", streak);
        }

        analytics.current_streak = streak;
        analytics.longest_streak = analytics.longest_streak.max(streak);
        analytics.last_session_date = Some(now);
    }

    /// Counts one answered question toward today's goal
    ///
    /// The first question on a new calendar day (in the given UTC offset)
    /// restarts the count at 1.
    pub fn increment_daily_progress(
        analytics: &mut LearningAnalytics,
        now: DateTime<Utc>,
        utc_offset_minutes: i32,
    ) {
        if Self::is_new_day(analytics, now, utc_offset_minutes) {
            analytics.daily_progress = 1;
            analytics.last_daily_reset = Some(now);
        } else {
            analytics.daily_progress += 1;
        }

        if analytics.daily_progress == analytics.daily_goal {
            info!("Daily goal of {} questions reached", analytics.daily_goal);
        }
    }

    /// Zeroes the daily count if the last reset happened on an earlier day
    ///
    /// Returns whether a reset happened.
    pub fn reset_daily_progress_if_needed(
        analytics: &mut LearningAnalytics,
        now: DateTime<Utc>,
        utc_offset_minutes: i32,
    ) -> bool {
        if !Self::is_new_day(analytics, now, utc_offset_minutes) {
            return false;
        }
        debug!(
            "Daily progress reset (was {})",
            analytics.daily_progress
        );
        analytics.daily_progress = 0;
        analytics.last_daily_reset = Some(now);
        true
    }

    /// Sets the questions-per-day target; a goal of 0 is raised to 1
    pub fn set_daily_goal(analytics: &mut LearningAnalytics, goal: u32) {
        analytics.daily_goal = goal.max(1);
    }

    pub fn daily_goal_reached(analytics: &LearningAnalytics) -> bool {
        analytics.daily_progress >= analytics.daily_goal
    }

    fn is_new_day(analytics: &LearningAnalytics, now: DateTime<Utc>, utc_offset_minutes: i32) -> bool {
        match analytics.last_daily_reset {
            None => true,
            Some(last) => {
                local_date(last, utc_offset_minutes) != local_date(now, utc_offset_minutes)
            }
        }
    }
}
