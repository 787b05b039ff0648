use crate::time_format::format_time_difference;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// Ease factor every new review item starts with
pub const INITIAL_EASE_FACTOR: f64 = 2.5;
/// Lower bound for the ease factor
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Ease gained on every correct review, regardless of how easy the recall was
pub const EASE_BONUS: f64 = 0.1;
/// Ease lost on every incorrect review
pub const EASE_PENALTY: f64 = 0.2;
/// Longest interval a review can be pushed out to (about a century)
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewResult {
    Correct,
    Incorrect,
}

impl ReviewResult {
    pub fn from_correctness(is_correct: bool) -> Self {
        if is_correct {
            ReviewResult::Correct
        } else {
            ReviewResult::Incorrect
        }
    }
}

/// A missed question scheduled for spaced repetition review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub question_id: String,
    pub topic: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub ease_factor: f64,
    /// Days until the next review
    pub interval: u32,
    /// Consecutive correct reviews
    pub repetitions: u32,
    pub next_review_date: DateTime<Utc>,
    #[serde(default)]
    pub last_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_result: Option<ReviewResult>,
}

impl ReviewItem {
    /// Creates a new ReviewItem with initial parameters, first due a day after `now`
    pub fn new(
        question_id: &str,
        topic: &str,
        difficulty: Option<Difficulty>,
        now: DateTime<Utc>,
    ) -> Self {
        ReviewItem {
            question_id: question_id.to_string(),
            topic: topic.to_string(),
            difficulty,
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 1,
            repetitions: 0,
            next_review_date: now + Duration::hours(24),
            last_review_date: None,
            last_result: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }
}

/// Scheduling parameters produced by one review
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleUpdate {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
}

/// Simplified SM-2 step
///
/// A miss resets the item and costs ease. A hit grows the interval
/// (1 day, then 3 days, then interval × ease, capped at [`MAX_INTERVAL_DAYS`])
/// and always adds the same ease bonus; recall quality does not enter into it.
pub fn calculate_next_review(
    ease_factor: f64,
    interval: u32,
    repetitions: u32,
    is_correct: bool,
) -> ScheduleUpdate {
    if !is_correct {
        return ScheduleUpdate {
            ease_factor: (ease_factor - EASE_PENALTY).max(MIN_EASE_FACTOR),
            interval: 1,
            repetitions: 0,
        };
    }

    let next_interval = match repetitions {
        0 => 1,
        1 => 3,
        _ => (f64::from(interval) * ease_factor)
            .round()
            .min(f64::from(MAX_INTERVAL_DAYS)) as u32,
    };

    ScheduleUpdate {
        ease_factor: (ease_factor + EASE_BONUS).max(MIN_EASE_FACTOR),
        interval: next_interval,
        repetitions: repetitions + 1,
    }
}

/// Drives the review queue: enqueueing misses, applying reviews, finding due items
pub struct ReviewScheduler;

impl ReviewScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Adds a question to the queue unless it is already there
    ///
    /// Returns whether a new item was inserted.
    pub fn enqueue(
        &self,
        queue: &mut Vec<ReviewItem>,
        question_id: &str,
        topic: &str,
        difficulty: Option<Difficulty>,
        now: DateTime<Utc>,
    ) -> bool {
        if queue.iter().any(|item| item.question_id == question_id) {
            debug!("Question {} already queued for review", question_id);
            return false;
        }

        let item = ReviewItem::new(question_id, topic, difficulty, now);
        debug!(
            "Queued question {} ({}) for review, next review: {}",
            question_id,
            topic,
            format_time_difference(now, item.next_review_date)
        );
        queue.push(item);
        true
    }

    /// Applies a review outcome to the queued item
    ///
    /// Unknown question ids are ignored; returns whether an item was updated.
    pub fn review(
        &self,
        queue: &mut [ReviewItem],
        question_id: &str,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(item) = queue.iter_mut().find(|item| item.question_id == question_id) else {
            debug!("Review for unqueued question {} ignored", question_id);
            return false;
        };

        let update =
            calculate_next_review(item.ease_factor, item.interval, item.repetitions, is_correct);

        item.ease_factor = update.ease_factor;
        item.interval = update.interval;
        item.repetitions = update.repetitions;
        item.next_review_date = now
            .checked_add_signed(Duration::days(i64::from(update.interval)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        item.last_review_date = Some(now);
        item.last_result = Some(ReviewResult::from_correctness(is_correct));

        debug!(
            "Reviewed {}: reps={}, interval={} days, ease={:.2}, next review: {}",
            question_id,
            item.repetitions,
            item.interval,
            item.ease_factor,
            format_time_difference(now, item.next_review_date)
        );
        true
    }

    /// Items whose next review date has passed, in queue order
    pub fn due_reviews<'a>(&self, queue: &'a [ReviewItem], now: DateTime<Utc>) -> Vec<&'a ReviewItem> {
        queue.iter().filter(|item| item.is_due(now)).collect()
    }
}

impl Default for ReviewScheduler {
    fn default() -> Self {
        Self::new()
    }
}
