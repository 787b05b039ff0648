use colored::Colorize;
use log::info;
use std::sync::Arc;
use study_coach::cli::{Args, Command};
use study_coach::date_provider::{DateProvider, OverrideDateProvider, SystemDateProvider};
use study_coach::engine::{AnswerEvent, EngineConfig, LearningEngine};
use study_coach::profile::OnboardingAnswers;
use study_coach::report;
use study_coach::store_factory::{StoreConfig, StoreFactory};
use study_coach::time_format::format_time_difference;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse_args();
    if args.no_color {
        colored::control::set_override(false);
    }

    let override_date = args.validate_override_date()?;
    let date_provider: Arc<dyn DateProvider> = match override_date {
        Some(date) => {
            info!("Using override date: {}", date);
            Arc::new(OverrideDateProvider::new(date))
        }
        None => Arc::new(SystemDateProvider),
    };

    let store_config = StoreConfig {
        is_test_mode: args.test,
        custom_path: args.db_path.clone(),
    };
    info!("Using store at {}", store_config.get_path());
    let store = StoreFactory::create_boxed(&store_config)?;

    let config = EngineConfig {
        utc_offset_minutes: args.utc_offset_minutes,
    };
    let mut engine = LearningEngine::with_date_provider(store, date_provider.clone(), config)?;
    engine.reset_daily_progress_if_needed()?;

    if !engine.has_completed_onboarding() && !matches!(args.command, Command::Onboard { .. }) {
        println!(
            "{}",
            "No profile yet. Run `study_coach onboard` first.".yellow()
        );
        if !matches!(args.command, Command::Context { .. }) {
            return Ok(());
        }
    }

    let now = date_provider.get_current_time();
    match args.command {
        Command::Onboard {
            level,
            background,
            style,
            focus_topics,
        } => {
            let answers = OnboardingAnswers {
                experience_level: level,
                background,
                explanation_style: style,
                focus_topics: Some(focus_topics),
                ..Default::default()
            };
            let id = engine.create_profile(answers)?;
            println!("{} {}", "Profile created:".green().bold(), id);
            println!("{}", engine.experience_level_prompt());
        }
        Command::Answer {
            question_id,
            topic,
            correct,
            time,
            difficulty,
        } => {
            let mut event = AnswerEvent::new(&question_id, &topic, correct, time);
            if let Some(difficulty) = difficulty {
                event = event.with_difficulty(difficulty);
            }
            engine.answer_submitted(&event)?;
            engine.daily_activity()?;

            let verdict = if correct {
                "Correct".green().bold()
            } else {
                "Incorrect".red().bold()
            };
            println!("{} {} ({})", verdict, question_id, topic);
            if let Some(tp) = engine.analytics().and_then(|a| a.topic(&topic)) {
                println!(
                    "  {} accuracy {}% over {} question(s), trend {}",
                    tp.topic,
                    tp.accuracy,
                    tp.total_questions,
                    tp.trend.as_str()
                );
            }
            if !correct {
                println!("  {}", "Queued for review.".dimmed());
            }
            if engine.daily_goal_reached() {
                println!("{}", "Daily goal reached!".green());
            }
        }
        Command::Review {
            question_id,
            correct,
        } => {
            let known = engine
                .analytics()
                .is_some_and(|a| a.review_item(&question_id).is_some());
            engine.review_answered(&question_id, correct)?;
            match engine.analytics().and_then(|a| a.review_item(&question_id)) {
                Some(item) if known => println!(
                    "{} next review {} (interval {}d, ease {:.2})",
                    question_id.bold(),
                    format_time_difference(now, item.next_review_date),
                    item.interval,
                    item.ease_factor
                ),
                _ => println!(
                    "{}",
                    format!("{} is not in the review queue.", question_id).yellow()
                ),
            }
        }
        Command::Session => {
            engine.record_session()?;
            let summary = engine.summary();
            println!(
                "{} current streak {} day(s), longest {}",
                "Session recorded:".green().bold(),
                summary.current_streak,
                summary.longest_streak
            );
        }
        Command::Goal { questions } => {
            engine.set_daily_goal(questions)?;
            println!(
                "{} {} question(s) per day",
                "Daily goal set:".green().bold(),
                engine.summary().daily_goal
            );
        }
        Command::Status => {
            if let Some(profile) = engine.profile() {
                print!("{}", report::render_profile(profile, engine.config()));
            }
            let next_review = engine
                .analytics()
                .and_then(|a| a.review_queue.iter().map(|item| item.next_review_date).min());
            print!("{}", report::render_summary(&engine.summary(), next_review, now));

            let weak = engine.weak_topics();
            if !weak.is_empty() {
                println!("{}: {}", "Weak topics".red().bold(), weak.join(", "));
            }
            let strong = engine.strong_topics();
            if !strong.is_empty() {
                println!("{}: {}", "Strong topics".green().bold(), strong.join(", "));
            }
        }
        Command::Recommend => {
            print!(
                "{}",
                report::render_recommendations(&engine.study_recommendations())
            );
        }
        Command::Reviews => {
            print!("{}", report::render_reviews(&engine.reviews_due(), now));
        }
        Command::Context { topic } => {
            let context = engine.personalization_context(topic.as_deref());
            println!("{}", serde_json::to_string_pretty(&context)?);
            println!();
            println!("{}", engine.experience_level_prompt());
            println!("{}", engine.background_prompt());
        }
    }

    Ok(())
}
