use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;
use study_coach::date_provider::FixedDateProvider;
use study_coach::engine::{AnswerEvent, EngineConfig, LearningEngine};
use study_coach::profile::{ExperienceLevel, OnboardingAnswers, UserBackground};
use study_coach::recommendations::{Priority, RecommendationKind};
use study_coach::spaced_repetition::{Difficulty, MAX_INTERVAL_DAYS};
use study_coach::store::MemoryStore;

fn fixed_date() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
}

fn onboarded_engine() -> (LearningEngine<MemoryStore>, Arc<FixedDateProvider>) {
    let clock = Arc::new(FixedDateProvider::new(fixed_date()));
    let mut engine =
        LearningEngine::with_date_provider(MemoryStore::new(), clock.clone(), EngineConfig::default())
            .unwrap();
    engine
        .create_profile(OnboardingAnswers {
            experience_level: Some(ExperienceLevel::Intermediate),
            background: Some(UserBackground::WorkingProfessional),
            ..Default::default()
        })
        .unwrap();
    (engine, clock)
}

fn answer(engine: &mut LearningEngine<MemoryStore>, id: &str, topic: &str, correct: bool) {
    engine
        .answer_submitted(&AnswerEvent::new(id, topic, correct, 30))
        .unwrap();
}

#[test]
fn test_missed_question_follows_review_schedule() {
    let (mut engine, clock) = onboarded_engine();

    engine
        .answer_submitted(
            &AnswerEvent::new("q1", "Derivatives", false, 45).with_difficulty(Difficulty::Hard),
        )
        .unwrap();
    assert!(engine.reviews_due().is_empty());

    let expected_intervals = [1, 3, 8];
    for expected in expected_intervals {
        let item = engine.analytics().unwrap().review_item("q1").unwrap().clone();
        clock.set(item.next_review_date);
        assert_eq!(engine.reviews_due().len(), 1);

        engine.review_answered("q1", true).unwrap();

        let item = engine.analytics().unwrap().review_item("q1").unwrap();
        assert_eq!(item.interval, expected);
        assert_eq!(item.difficulty, Some(Difficulty::Hard));
    }

    let item = engine.analytics().unwrap().review_item("q1").unwrap();
    assert_eq!(item.repetitions, 3);
    assert!((item.ease_factor - 2.8).abs() < 1e-9);

    // A miss starts the item over
    clock.set(item.next_review_date);
    engine.review_answered("q1", false).unwrap();
    let item = engine.analytics().unwrap().review_item("q1").unwrap();
    assert_eq!(item.interval, 1);
    assert_eq!(item.repetitions, 0);
    assert!((item.ease_factor - 2.6).abs() < 1e-9);
}

#[test]
fn test_reviewing_early_many_times_keeps_schedule_bounded() {
    let (mut engine, _clock) = onboarded_engine();
    answer(&mut engine, "q1", "Derivatives", false);

    for _ in 0..40 {
        engine.review_answered("q1", true).unwrap();
    }

    let item = engine.analytics().unwrap().review_item("q1").unwrap();
    assert_eq!(item.interval, MAX_INTERVAL_DAYS);
    assert_eq!(
        item.next_review_date,
        fixed_date() + Duration::days(i64::from(MAX_INTERVAL_DAYS))
    );
}

#[test]
fn test_repeated_miss_does_not_duplicate_review() {
    let (mut engine, _clock) = onboarded_engine();

    answer(&mut engine, "q1", "Ethics", false);
    answer(&mut engine, "q1", "Ethics", false);

    let analytics = engine.analytics().unwrap();
    assert_eq!(analytics.review_queue.len(), 1);
    assert_eq!(analytics.topic("Ethics").unwrap().total_questions, 2);
}

#[test]
fn test_review_of_unknown_question_is_ignored() {
    let (mut engine, _clock) = onboarded_engine();
    let saves = engine.store().save_count();

    engine.review_answered("never-seen", true).unwrap();

    assert_eq!(engine.store().save_count(), saves);
    assert!(engine.analytics().unwrap().review_queue.is_empty());
}

#[test]
fn test_streak_across_days() {
    let (mut engine, clock) = onboarded_engine();

    engine.record_session().unwrap();
    assert_eq!(engine.summary().current_streak, 1);

    clock.advance(Duration::hours(3));
    engine.record_session().unwrap();
    assert_eq!(engine.summary().current_streak, 1);

    clock.advance(Duration::hours(24));
    engine.record_session().unwrap();
    assert_eq!(engine.summary().current_streak, 2);

    clock.advance(Duration::days(3));
    engine.record_session().unwrap();
    let summary = engine.summary();
    assert_eq!(summary.current_streak, 1);
    assert_eq!(summary.longest_streak, 2);
}

#[test]
fn test_daily_progress_resets_on_new_day() {
    let (mut engine, clock) = onboarded_engine();
    engine.set_daily_goal(2).unwrap();

    engine.daily_activity().unwrap();
    assert!(!engine.daily_goal_reached());
    engine.daily_activity().unwrap();
    assert!(engine.daily_goal_reached());

    clock.advance(Duration::days(1));
    engine.reset_daily_progress_if_needed().unwrap();
    assert_eq!(engine.summary().daily_progress, 0);
    assert!(!engine.daily_goal_reached());

    engine.daily_activity().unwrap();
    assert_eq!(engine.summary().daily_progress, 1);
}

#[test]
fn test_recommendations_ranked_by_priority() {
    let (mut engine, clock) = onboarded_engine();

    // Stale but healthy topic
    for i in 0..4 {
        answer(&mut engine, &format!("c{}", i), "Corporate Finance", true);
    }

    clock.advance(Duration::days(10));

    // Weak topic: 1 of 4 correct, misses are queued for review
    answer(&mut engine, "e0", "Ethics", true);
    for i in 1..4 {
        answer(&mut engine, &format!("e{}", i), "Ethics", false);
    }

    clock.advance(Duration::days(2));

    let recommendations = engine.study_recommendations();
    let kinds: Vec<_> = recommendations.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RecommendationKind::ReviewDue,
            RecommendationKind::WeakTopic,
            RecommendationKind::StaleTopic,
        ]
    );

    assert_eq!(recommendations[0].question_count, 3);
    assert_eq!(recommendations[0].estimated_minutes, 5);
    assert_eq!(recommendations[1].title, "Focus on Ethics");
    assert_eq!(recommendations[1].priority, Priority::High);
    assert_eq!(recommendations[2].title, "Refresh Corporate Finance");
    assert_eq!(recommendations[2].priority, Priority::Low);

    assert_eq!(engine.weak_topics(), vec!["Ethics".to_string()]);
    assert_eq!(engine.strong_topics(), vec!["Corporate Finance".to_string()]);
}

#[test]
fn test_state_survives_reload() {
    let (mut engine, clock) = onboarded_engine();
    answer(&mut engine, "q1", "Ethics", false);
    answer(&mut engine, "q2", "Ethics", true);
    engine.record_session().unwrap();

    let document = engine.store().document().unwrap().to_string();
    let reopened = LearningEngine::with_date_provider(
        MemoryStore::with_document(&document),
        clock.clone(),
        EngineConfig::default(),
    )
    .unwrap();

    assert!(reopened.has_completed_onboarding());
    assert_eq!(reopened.profile(), engine.profile());
    assert_eq!(reopened.analytics(), engine.analytics());
    assert_eq!(reopened.summary().total_questions_answered, 2);
}

#[test]
fn test_personalization_context_reflects_analytics() {
    let (mut engine, _clock) = onboarded_engine();
    for i in 0..3 {
        answer(&mut engine, &format!("d{}", i), "Derivatives", false);
    }

    let context = engine.personalization_context(Some("Derivatives"));

    assert_eq!(context.experience_level, ExperienceLevel::Intermediate);
    assert_eq!(context.weak_topics, vec!["Derivatives".to_string()]);
    assert_eq!(context.current_topic.as_deref(), Some("Derivatives"));

    insta::assert_snapshot!(
        serde_json::to_string(&context).unwrap(),
        @r#"{"experienceLevel":"intermediate","background":"working-professional","explanationStyle":"detailed","preferredLanguage":"en","weakTopics":["Derivatives"],"strongTopics":[],"currentTopic":"Derivatives"}"#
    );
}

#[test]
fn test_reset_profile_clears_everything() {
    let (mut engine, _clock) = onboarded_engine();
    answer(&mut engine, "q1", "Ethics", false);

    engine.reset_profile().unwrap();

    assert!(!engine.has_completed_onboarding());
    assert!(engine.analytics().is_none());
    assert!(engine.study_recommendations().is_empty());
    assert_eq!(engine.summary().total_questions_answered, 0);
}
