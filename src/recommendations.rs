use crate::analytics::LearningAnalytics;
use crate::spaced_repetition::ReviewScheduler;
use crate::time_format::whole_days_between;
use crate::topic_performance::TopicPerformanceTracker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weak topics suggested at most
const MAX_WEAK_TOPIC_SUGGESTIONS: usize = 3;
/// Weak topics below this accuracy are urgent
const URGENT_ACCURACY: u32 = 40;
/// Stale topics suggested at most
const MAX_STALE_TOPIC_SUGGESTIONS: usize = 2;
/// A topic is stale once it has gone unpracticed for more than this many days
const STALE_AFTER_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationKind {
    ReviewDue,
    WeakTopic,
    StaleTopic,
    /// Kept for documents written by clients that tracked mistake patterns
    MistakePattern,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &str {
        match self {
            RecommendationKind::ReviewDue => "review-due",
            RecommendationKind::WeakTopic => "weak-topic",
            RecommendationKind::StaleTopic => "stale-topic",
            RecommendationKind::MistakePattern => "mistake-pattern",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub topic: Option<String>,
    pub question_count: u32,
    pub estimated_minutes: u32,
}

/// Turns due reviews, weak topics and stale topics into a ranked study plan
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn recommendations(analytics: &LearningAnalytics, now: DateTime<Utc>) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if let Some(review) = Self::review_due(analytics, now) {
            recommendations.push(review);
        }
        recommendations.extend(Self::weak_topics(analytics));
        recommendations.extend(Self::stale_topics(analytics, now));

        // sort_by_key is stable, so ties keep generation order
        recommendations.sort_by_key(|r| r.priority.rank());
        recommendations
    }

    fn review_due(analytics: &LearningAnalytics, now: DateTime<Utc>) -> Option<Recommendation> {
        let due = ReviewScheduler::new()
            .due_reviews(&analytics.review_queue, now)
            .len() as u32;
        if due == 0 {
            return None;
        }

        Some(Recommendation {
            id: "reviews-due".to_string(),
            kind: RecommendationKind::ReviewDue,
            title: "Review Due".to_string(),
            description: format!(
                "You have {} question(s) due for review. Reviewing helps long-term retention.",
                due
            ),
            priority: Priority::High,
            topic: None,
            question_count: due,
            // ceil(due × 1.5)
            estimated_minutes: (due * 3).div_ceil(2),
        })
    }

    fn weak_topics(analytics: &LearningAnalytics) -> Vec<Recommendation> {
        TopicPerformanceTracker::weakest(analytics, MAX_WEAK_TOPIC_SUGGESTIONS)
            .into_iter()
            .enumerate()
            .map(|(index, tp)| Recommendation {
                id: format!("weak-topic-{}", index),
                kind: RecommendationKind::WeakTopic,
                title: format!("Focus on {}", tp.topic),
                description: format!(
                    "Your accuracy is {}% ({}/{}). Practice more to improve.",
                    tp.accuracy, tp.correct_answers, tp.total_questions
                ),
                priority: if tp.accuracy < URGENT_ACCURACY {
                    Priority::High
                } else {
                    Priority::Medium
                },
                topic: Some(tp.topic.clone()),
                question_count: 10,
                estimated_minutes: 15,
            })
            .collect()
    }

    fn stale_topics(analytics: &LearningAnalytics, now: DateTime<Utc>) -> Vec<Recommendation> {
        analytics
            .topic_performance
            .iter()
            .filter_map(|tp| {
                let last = tp.last_practiced?;
                let days = whole_days_between(last, now);
                (days > STALE_AFTER_DAYS).then_some((tp, days))
            })
            .take(MAX_STALE_TOPIC_SUGGESTIONS)
            .enumerate()
            .map(|(index, (tp, days))| Recommendation {
                id: format!("stale-topic-{}", index),
                kind: RecommendationKind::StaleTopic,
                title: format!("Refresh {}", tp.topic),
                description: format!(
                    "You haven't practiced this in {} days. Keep your knowledge fresh!",
                    days
                ),
                priority: Priority::Low,
                topic: Some(tp.topic.clone()),
                question_count: 5,
                estimated_minutes: 8,
            })
            .collect()
    }
}
