use crate::profile::{ExperienceLevel, ExplanationStyle, UserBackground};
use crate::spaced_repetition::Difficulty;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Adaptive study coach: topic performance, spaced repetition and study recommendations
#[derive(Parser, Debug, Clone)]
#[command(name = "Study Coach")]
#[command(about = "Track exam practice and get study recommendations", long_about = None)]
#[command(version)]
pub struct Args {
    /// Use in-memory database for testing
    #[arg(long, help = "Use in-memory database for testing")]
    pub test: bool,

    /// Custom database file path
    #[arg(long, value_name = "PATH", help = "Use custom database file path")]
    pub db_path: Option<PathBuf>,

    /// Override current date for testing (YYYY-MM-DD format)
    #[arg(
        long,
        value_name = "DATE",
        help = "Override current date (YYYY-MM-DD format)"
    )]
    pub override_date: Option<String>,

    /// Offset from UTC (minutes) that decides where a day ends
    #[arg(long, value_name = "MINUTES", default_value_t = 0, allow_hyphen_values = true)]
    pub utc_offset_minutes: i32,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a profile (replaces any existing one)
    Onboard {
        #[arg(long, value_parser = parse_experience_level)]
        level: Option<ExperienceLevel>,
        #[arg(long, value_parser = parse_background)]
        background: Option<UserBackground>,
        #[arg(long, value_parser = parse_explanation_style)]
        style: Option<ExplanationStyle>,
        /// Topic to focus on (repeatable)
        #[arg(long = "focus")]
        focus_topics: Vec<String>,
    },
    /// Record an answered question
    Answer {
        question_id: String,
        topic: String,
        #[arg(long)]
        correct: bool,
        /// Seconds spent on the question
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        time: i64,
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
    },
    /// Record the outcome of a review
    Review {
        question_id: String,
        #[arg(long)]
        correct: bool,
    },
    /// Mark the start of a study session
    Session,
    /// Set the daily question goal
    Goal { questions: u32 },
    /// Show overall statistics
    Status,
    /// Show study recommendations
    Recommend,
    /// List reviews that are due
    Reviews,
    /// Print the personalization context as JSON
    Context {
        #[arg(long)]
        topic: Option<String>,
    },
}

fn parse_experience_level(s: &str) -> Result<ExperienceLevel, String> {
    ExperienceLevel::from(s).ok_or_else(|| format!("Unknown experience level '{}'", s))
}

fn parse_background(s: &str) -> Result<UserBackground, String> {
    UserBackground::from(s).ok_or_else(|| format!("Unknown background '{}'", s))
}

fn parse_explanation_style(s: &str) -> Result<ExplanationStyle, String> {
    ExplanationStyle::from(s).ok_or_else(|| format!("Unknown explanation style '{}'", s))
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from(s).ok_or_else(|| format!("Unknown difficulty '{}'", s))
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the override_date argument if provided
    pub fn validate_override_date(&self) -> Result<Option<NaiveDate>, String> {
        match &self.override_date {
            Some(date_str) => NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    format!(
                        "Invalid date format for --override-date: '{}'. Expected YYYY-MM-DD",
                        date_str
                    )
                }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("study_coach").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_global_flags() {
        let args = parse(&["--test", "--db-path", "/tmp/test.db", "status"]);
        assert!(args.test);
        assert_eq!(args.db_path, Some(PathBuf::from("/tmp/test.db")));
        assert_eq!(args.utc_offset_minutes, 0);
        assert_eq!(args.command, Command::Status);
    }

    #[test]
    fn test_parse_answer() {
        let args = parse(&[
            "answer",
            "q42",
            "Fixed Income",
            "--time",
            "75",
            "--difficulty",
            "hard",
        ]);
        assert_eq!(
            args.command,
            Command::Answer {
                question_id: "q42".to_string(),
                topic: "Fixed Income".to_string(),
                correct: false,
                time: 75,
                difficulty: Some(Difficulty::Hard),
            }
        );
    }

    #[test]
    fn test_parse_negative_offset() {
        let args = parse(&["--utc-offset-minutes", "-300", "session"]);
        assert_eq!(args.utc_offset_minutes, -300);
    }

    #[test]
    fn test_parse_onboard() {
        let args = parse(&[
            "onboard",
            "--level",
            "advanced",
            "--background",
            "career-changer",
            "--focus",
            "Ethics",
            "--focus",
            "Derivatives",
        ]);
        assert_eq!(
            args.command,
            Command::Onboard {
                level: Some(ExperienceLevel::Advanced),
                background: Some(UserBackground::CareerChanger),
                style: None,
                focus_topics: vec!["Ethics".to_string(), "Derivatives".to_string()],
            }
        );
    }

    #[test]
    fn test_invalid_difficulty_is_rejected() {
        let result = Args::try_parse_from([
            "study_coach",
            "answer",
            "q1",
            "Ethics",
            "--difficulty",
            "brutal",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_override_date_valid() {
        let args = parse(&["--override-date", "2024-01-15", "status"]);
        assert_eq!(
            args.validate_override_date(),
            Ok(Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()))
        );
    }

    #[test]
    fn test_validate_override_date_invalid_format() {
        let args = parse(&["--override-date", "2024/01/15", "status"]);
        let result = args.validate_override_date();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid date format"));
    }

    #[test]
    fn test_validate_override_date_none() {
        let args = parse(&["status"]);
        assert_eq!(args.validate_override_date(), Ok(None));
    }
}
