use crate::analytics::LearningAnalytics;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Accuracy below which a topic counts as weak (percent)
pub const WEAK_TOPIC_ACCURACY: u32 = 60;
/// Accuracy at or above which a topic counts as strong (percent)
pub const STRONG_TOPIC_ACCURACY: u32 = 80;
/// Minimum answered questions before a topic is classified at all
pub const MIN_CLASSIFIED_QUESTIONS: u32 = 3;
/// Accuracy swing (percentage points) needed to call a trend
pub const TREND_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    #[default]
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(&self) -> &str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        }
    }

    /// Classifies the move from `previous` to `current` accuracy
    ///
    /// The threshold is flat regardless of how many questions back the
    /// accuracy, so early answers on a topic swing the trend a lot.
    pub fn classify(previous: u32, current: u32) -> Self {
        if current > previous + TREND_THRESHOLD {
            Trend::Improving
        } else if current + TREND_THRESHOLD < previous {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

/// Rolling statistics for one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicPerformance {
    pub topic: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    /// Integer percentage, always derived from the two counters
    pub accuracy: u32,
    /// Whole seconds
    pub average_time_spent: u32,
    #[serde(default)]
    pub last_practiced: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trend: Trend,
}

impl TopicPerformance {
    fn first_answer(topic: &str, is_correct: bool, time_spent: u32, now: DateTime<Utc>) -> Self {
        TopicPerformance {
            topic: topic.to_string(),
            total_questions: 1,
            correct_answers: u32::from(is_correct),
            incorrect_answers: u32::from(!is_correct),
            accuracy: if is_correct { 100 } else { 0 },
            average_time_spent: time_spent,
            last_practiced: Some(now),
            trend: Trend::Stable,
        }
    }

    fn apply_answer(&mut self, is_correct: bool, time_spent: u32, now: DateTime<Utc>) {
        let previous_total = self.total_questions;
        let previous_accuracy = self.accuracy;

        self.total_questions += 1;
        if is_correct {
            self.correct_answers += 1;
        } else {
            self.incorrect_answers += 1;
        }
        self.accuracy = percentage(self.correct_answers, self.total_questions);
        self.trend = Trend::classify(previous_accuracy, self.accuracy);

        let weighted = u64::from(self.average_time_spent) * u64::from(previous_total)
            + u64::from(time_spent);
        self.average_time_spent = rounded_div(weighted, u64::from(self.total_questions)) as u32;
        self.last_practiced = Some(now);
    }

    pub fn is_weak(&self) -> bool {
        self.accuracy < WEAK_TOPIC_ACCURACY && self.total_questions >= MIN_CLASSIFIED_QUESTIONS
    }

    pub fn is_strong(&self) -> bool {
        self.accuracy >= STRONG_TOPIC_ACCURACY && self.total_questions >= MIN_CLASSIFIED_QUESTIONS
    }
}

/// round(part / whole * 100), 0 when nothing has been answered
pub fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

fn rounded_div(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64).round() as u64
}

/// Maintains per-topic accuracy and timing from individual answers
pub struct TopicPerformanceTracker;

impl TopicPerformanceTracker {
    /// Folds one answer into the topic statistics and the global aggregates
    ///
    /// Negative times are clamped to zero.
    pub fn record_answer(
        analytics: &mut LearningAnalytics,
        topic: &str,
        is_correct: bool,
        time_spent_seconds: i64,
        now: DateTime<Utc>,
    ) {
        let time_spent = clamp_time_spent(time_spent_seconds);

        match analytics
            .topic_performance
            .iter_mut()
            .find(|tp| tp.topic == topic)
        {
            Some(existing) => existing.apply_answer(is_correct, time_spent, now),
            None => analytics.topic_performance.push(TopicPerformance::first_answer(
                topic, is_correct, time_spent, now,
            )),
        }

        analytics.total_questions_answered += 1;
        if is_correct {
            analytics.total_correct += 1;
        } else {
            analytics.total_incorrect += 1;
        }
        analytics.overall_accuracy =
            percentage(analytics.total_correct, analytics.total_questions_answered);
        analytics.total_study_time += u64::from(time_spent);

        Self::refresh_classification(analytics);

        debug!(
            "Recorded {} answer for '{}' ({}s) | overall accuracy {}%",
            if is_correct { "correct" } else { "incorrect" },
            topic,
            time_spent,
            analytics.overall_accuracy
        );
    }

    /// Recomputes weak and strong topic names from the raw topic statistics
    pub fn refresh_classification(analytics: &mut LearningAnalytics) {
        analytics.weak_topics = Self::weak_topics_ranked(analytics);
        analytics.strong_topics = analytics
            .topic_performance
            .iter()
            .filter(|tp| tp.is_strong())
            .map(|tp| tp.topic.clone())
            .collect();
    }

    /// Weak topics, weakest first (ties keep topic order)
    pub fn weak_topics_ranked(analytics: &LearningAnalytics) -> Vec<String> {
        Self::weakest(analytics, usize::MAX)
            .into_iter()
            .map(|tp| tp.topic.clone())
            .collect()
    }

    /// Up to `limit` weak topics, weakest first
    pub fn weakest(analytics: &LearningAnalytics, limit: usize) -> Vec<&TopicPerformance> {
        let mut weak: Vec<&TopicPerformance> = analytics
            .topic_performance
            .iter()
            .filter(|tp| tp.is_weak())
            .collect();
        weak.sort_by_key(|tp| tp.accuracy);
        weak.truncate(limit);
        weak
    }
}

fn clamp_time_spent(time_spent_seconds: i64) -> u32 {
    if time_spent_seconds < 0 {
        warn!(
            "Negative time spent ({}s) clamped to 0",
            time_spent_seconds
        );
        return 0;
    }
    u32::try_from(time_spent_seconds).unwrap_or(u32::MAX)
}
