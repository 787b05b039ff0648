use crate::spaced_repetition::{ReviewItem, ReviewScheduler};
use crate::topic_performance::TopicPerformance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Questions per day a fresh profile aims for
pub const DEFAULT_DAILY_GOAL: u32 = 20;

fn default_daily_goal() -> u32 {
    DEFAULT_DAILY_GOAL
}

/// A recurring kind of mistake, kept as persisted data only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakePattern {
    pub id: String,
    pub pattern: String,
    pub occurrences: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    pub last_occurred: DateTime<Utc>,
    #[serde(default)]
    pub example_question_ids: Vec<String>,
}

/// Per-user learning state, owned and mutated by the engine only
///
/// Collection fields added after the first release default to empty so
/// older documents load without defending at every call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningAnalytics {
    #[serde(default)]
    pub user_id: String,

    pub total_questions_answered: u32,
    pub total_correct: u32,
    pub total_incorrect: u32,
    pub overall_accuracy: u32,
    /// Seconds
    pub total_study_time: u64,

    #[serde(default)]
    pub topic_performance: Vec<TopicPerformance>,
    #[serde(default)]
    pub weak_topics: Vec<String>,
    #[serde(default)]
    pub strong_topics: Vec<String>,

    #[serde(default)]
    pub last_session_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub mistake_patterns: Vec<MistakePattern>,
    #[serde(default)]
    pub review_queue: Vec<ReviewItem>,

    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    #[serde(default)]
    pub daily_progress: u32,
    #[serde(default)]
    pub last_daily_reset: Option<DateTime<Utc>>,
}

impl LearningAnalytics {
    pub fn new(user_id: &str, now: DateTime<Utc>) -> Self {
        LearningAnalytics {
            user_id: user_id.to_string(),
            updated_at: now,
            ..Default::default()
        }
    }

    pub fn topic(&self, name: &str) -> Option<&TopicPerformance> {
        self.topic_performance.iter().find(|tp| tp.topic == name)
    }

    pub fn review_item(&self, question_id: &str) -> Option<&ReviewItem> {
        self.review_queue
            .iter()
            .find(|item| item.question_id == question_id)
    }

    /// Headline numbers for dashboards and the CLI
    pub fn summary(&self, now: DateTime<Utc>) -> AnalyticsSummary {
        AnalyticsSummary {
            total_questions_answered: self.total_questions_answered,
            total_correct: self.total_correct,
            total_incorrect: self.total_incorrect,
            overall_accuracy: self.overall_accuracy,
            total_study_time: self.total_study_time,
            topics_practiced: self.topic_performance.len(),
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            daily_goal: self.daily_goal,
            daily_progress: self.daily_progress,
            reviews_due: ReviewScheduler::new()
                .due_reviews(&self.review_queue, now)
                .len(),
            review_queue_size: self.review_queue.len(),
        }
    }
}

impl Default for LearningAnalytics {
    fn default() -> Self {
        LearningAnalytics {
            user_id: String::new(),
            total_questions_answered: 0,
            total_correct: 0,
            total_incorrect: 0,
            overall_accuracy: 0,
            total_study_time: 0,
            topic_performance: Vec::new(),
            weak_topics: Vec::new(),
            strong_topics: Vec::new(),
            last_session_date: None,
            current_streak: 0,
            longest_streak: 0,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            mistake_patterns: Vec::new(),
            review_queue: Vec::new(),
            daily_goal: DEFAULT_DAILY_GOAL,
            daily_progress: 0,
            last_daily_reset: None,
        }
    }
}

/// Read-only snapshot of the aggregate counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_questions_answered: u32,
    pub total_correct: u32,
    pub total_incorrect: u32,
    pub overall_accuracy: u32,
    pub total_study_time: u64,
    pub topics_practiced: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub daily_goal: u32,
    pub daily_progress: u32,
    pub reviews_due: usize,
    pub review_queue_size: usize,
}

impl AnalyticsSummary {
    pub fn daily_goal_reached(&self) -> bool {
        self.daily_progress >= self.daily_goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn fixed_date() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_new_analytics_defaults() {
        let analytics = LearningAnalytics::new("user_1", fixed_date());

        assert_eq!(analytics.user_id, "user_1");
        assert_eq!(analytics.daily_goal, 20);
        assert_eq!(analytics.daily_progress, 0);
        assert_eq!(analytics.current_streak, 0);
        assert!(analytics.review_queue.is_empty());
        assert!(analytics.last_session_date.is_none());
        assert_eq!(analytics.updated_at, fixed_date());
    }

    #[test]
    fn test_summary_counts_due_reviews() {
        let now = fixed_date();
        let mut analytics = LearningAnalytics::new("user_1", now);
        analytics.review_queue = vec![
            ReviewItem::new("q1", "Ethics", None, now - Duration::days(3)),
            ReviewItem::new("q2", "Ethics", None, now),
        ];
        analytics.daily_progress = 20;

        let summary = analytics.summary(now);
        assert_eq!(summary.reviews_due, 1);
        assert_eq!(summary.review_queue_size, 2);
        assert!(summary.daily_goal_reached());
    }

    #[test]
    fn test_lookup_helpers() {
        let now = fixed_date();
        let mut analytics = LearningAnalytics::new("user_1", now);
        analytics
            .review_queue
            .push(ReviewItem::new("q1", "Ethics", None, now));

        assert!(analytics.review_item("q1").is_some());
        assert!(analytics.review_item("q2").is_none());
        assert!(analytics.topic("Ethics").is_none());
    }
}
