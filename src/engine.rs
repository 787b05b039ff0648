use crate::analytics::{AnalyticsSummary, LearningAnalytics};
use crate::date_provider::{DateProvider, SystemDateProvider};
use crate::error::Result;
use crate::profile::{OnboardingAnswers, PersonalizationContext, ProfileUpdate, UserProfile};
use crate::recommendations::{Recommendation, RecommendationEngine};
use crate::session::SessionAnalytics;
use crate::spaced_repetition::{Difficulty, ReviewItem, ReviewScheduler};
use crate::store::{PersistedState, ProfileStore};
use crate::topic_performance::TopicPerformanceTracker;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;

/// Engine-wide settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Offset from UTC used to decide where one calendar day ends
    pub utc_offset_minutes: i32,
}

/// One answered question as reported by the exam session
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerEvent {
    pub question_id: String,
    pub topic: String,
    pub is_correct: bool,
    pub time_spent_seconds: i64,
    pub difficulty: Option<Difficulty>,
}

impl AnswerEvent {
    pub fn new(question_id: &str, topic: &str, is_correct: bool, time_spent_seconds: i64) -> Self {
        AnswerEvent {
            question_id: question_id.to_string(),
            topic: topic.to_string(),
            is_correct,
            time_spent_seconds,
            difficulty: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }
}

/// Service owning one user's profile and learning analytics
///
/// Every mutation works on a copy, saves it through the store and only then
/// replaces the in-memory state, so a failed save leaves everything as it was.
/// Before onboarding there is nothing to mutate: mutators succeed without doing
/// anything and queries return empty values.
pub struct LearningEngine<S: ProfileStore> {
    store: S,
    date_provider: Arc<dyn DateProvider>,
    config: EngineConfig,
    scheduler: ReviewScheduler,
    profile: Option<UserProfile>,
    analytics: Option<LearningAnalytics>,
}

impl<S: ProfileStore> LearningEngine<S> {
    /// Loads whatever the store holds, using system time
    pub fn new(store: S) -> Result<Self> {
        Self::with_date_provider(store, Arc::new(SystemDateProvider), EngineConfig::default())
    }

    /// Loads whatever the store holds, using the given clock and settings
    pub fn with_date_provider(
        store: S,
        date_provider: Arc<dyn DateProvider>,
        config: EngineConfig,
    ) -> Result<Self> {
        let mut engine = LearningEngine {
            store,
            date_provider,
            config,
            scheduler: ReviewScheduler::new(),
            profile: None,
            analytics: None,
        };
        engine.reload()?;
        Ok(engine)
    }

    /// Replaces the in-memory state with the stored document
    pub fn reload(&mut self) -> Result<()> {
        let state = self.store.load()?.unwrap_or_default();
        self.profile = state.profile;
        self.analytics = state.analytics;
        if self.profile.is_some() && self.analytics.is_none() {
            warn!("Stored profile has no analytics; starting fresh analytics");
            let now = self.now();
            self.analytics = self
                .profile
                .as_ref()
                .map(|profile| LearningAnalytics::new(&profile.id, now));
        }
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn analytics(&self) -> Option<&LearningAnalytics> {
        self.analytics.as_ref()
    }

    fn now(&self) -> DateTime<Utc> {
        self.date_provider.get_current_time()
    }

    fn commit(
        &mut self,
        profile: Option<UserProfile>,
        analytics: Option<LearningAnalytics>,
    ) -> Result<()> {
        let state = PersistedState::new(profile, analytics);
        self.store.save(&state)?;
        self.profile = state.profile;
        self.analytics = state.analytics;
        Ok(())
    }

    /// Applies `change` to a copy of the analytics and commits it if it reports a change
    fn update_analytics<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut LearningAnalytics, DateTime<Utc>, &ReviewScheduler) -> bool,
    {
        let Some(current) = self.analytics.as_ref() else {
            return Ok(());
        };
        let now = self.now();
        let mut next = current.clone();
        if !change(&mut next, now, &self.scheduler) {
            return Ok(());
        }
        next.updated_at = now;
        self.commit(self.profile.clone(), Some(next))
    }

    // ===== Profile =====

    /// Creates the profile and fresh analytics from onboarding answers
    ///
    /// Returns the new profile id.
    pub fn create_profile(&mut self, answers: OnboardingAnswers) -> Result<String> {
        let now = self.now();
        let profile = UserProfile::from_onboarding(answers, now);
        let analytics = LearningAnalytics::new(&profile.id, now);
        let id = profile.id.clone();

        self.commit(Some(profile), Some(analytics))?;
        info!("Created profile {}", id);
        Ok(id)
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<()> {
        let Some(current) = self.profile.as_ref() else {
            return Ok(());
        };
        let mut next = current.clone();
        next.apply(update, self.now());
        self.commit(Some(next), self.analytics.clone())
    }

    /// Forgets the profile and all analytics
    pub fn reset_profile(&mut self) -> Result<()> {
        info!("Resetting profile");
        self.commit(None, None)
    }

    pub fn has_completed_onboarding(&self) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|profile| profile.has_completed_onboarding)
    }

    // ===== Input events =====

    /// Folds an answered question into topic statistics and queues misses for review
    pub fn answer_submitted(&mut self, event: &AnswerEvent) -> Result<()> {
        self.update_analytics(|analytics, now, scheduler| {
            TopicPerformanceTracker::record_answer(
                analytics,
                &event.topic,
                event.is_correct,
                event.time_spent_seconds,
                now,
            );
            if !event.is_correct {
                scheduler.enqueue(
                    &mut analytics.review_queue,
                    &event.question_id,
                    &event.topic,
                    event.difficulty,
                    now,
                );
            }
            info!(
                "Answer: {} [{}] {} | topic accuracy {}%",
                event.question_id,
                event.topic,
                if event.is_correct { "correct" } else { "incorrect" },
                analytics.topic(&event.topic).map_or(0, |tp| tp.accuracy)
            );
            true
        })
    }

    /// Applies a review outcome; reviews of questions never queued are ignored
    pub fn review_answered(&mut self, question_id: &str, is_correct: bool) -> Result<()> {
        self.update_analytics(|analytics, now, scheduler| {
            scheduler.review(&mut analytics.review_queue, question_id, is_correct, now)
        })
    }

    /// Counts one answered question toward the daily goal
    pub fn daily_activity(&mut self) -> Result<()> {
        let offset = self.config.utc_offset_minutes;
        self.update_analytics(|analytics, now, _| {
            SessionAnalytics::increment_daily_progress(analytics, now, offset);
            true
        })
    }

    pub fn record_session(&mut self) -> Result<()> {
        self.update_analytics(|analytics, now, _| {
            SessionAnalytics::record_session(analytics, now);
            true
        })
    }

    pub fn set_daily_goal(&mut self, goal: u32) -> Result<()> {
        self.update_analytics(|analytics, _, _| {
            SessionAnalytics::set_daily_goal(analytics, goal);
            true
        })
    }

    pub fn reset_daily_progress_if_needed(&mut self) -> Result<()> {
        let offset = self.config.utc_offset_minutes;
        self.update_analytics(|analytics, now, _| {
            SessionAnalytics::reset_daily_progress_if_needed(analytics, now, offset)
        })
    }

    // ===== Queries =====

    pub fn study_recommendations(&self) -> Vec<Recommendation> {
        self.analytics
            .as_ref()
            .map(|analytics| RecommendationEngine::recommendations(analytics, self.now()))
            .unwrap_or_default()
    }

    pub fn reviews_due(&self) -> Vec<ReviewItem> {
        let Some(analytics) = self.analytics.as_ref() else {
            return Vec::new();
        };
        self.scheduler
            .due_reviews(&analytics.review_queue, self.now())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Weak topics, weakest first
    pub fn weak_topics(&self) -> Vec<String> {
        self.analytics
            .as_ref()
            .map(TopicPerformanceTracker::weak_topics_ranked)
            .unwrap_or_default()
    }

    pub fn strong_topics(&self) -> Vec<String> {
        self.analytics
            .as_ref()
            .map(|analytics| analytics.strong_topics.clone())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> AnalyticsSummary {
        self.analytics
            .as_ref()
            .map(|analytics| analytics.summary(self.now()))
            .unwrap_or_default()
    }

    pub fn daily_goal_reached(&self) -> bool {
        self.analytics
            .as_ref()
            .is_some_and(SessionAnalytics::daily_goal_reached)
    }

    /// Learner context handed to the AI tutor; falls back to defaults before onboarding
    pub fn personalization_context(&self, current_topic: Option<&str>) -> PersonalizationContext {
        let profile = self.profile.as_ref();
        PersonalizationContext {
            experience_level: profile.map(|p| p.experience_level).unwrap_or_default(),
            background: profile.map(|p| p.background).unwrap_or_default(),
            explanation_style: profile.map(|p| p.explanation_style).unwrap_or_default(),
            preferred_language: profile.map(|p| p.preferred_language).unwrap_or_default(),
            weak_topics: self
                .analytics
                .as_ref()
                .map(|a| a.weak_topics.clone())
                .unwrap_or_default(),
            strong_topics: self.strong_topics(),
            current_topic: current_topic.map(str::to_string),
        }
    }

    pub fn experience_level_prompt(&self) -> &'static str {
        self.profile
            .as_ref()
            .map(|p| p.experience_level)
            .unwrap_or_default()
            .prompt()
    }

    pub fn background_prompt(&self) -> &'static str {
        self.profile
            .as_ref()
            .map(|p| p.background)
            .unwrap_or_default()
            .prompt()
    }
}
