use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }

    pub fn from(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(ExperienceLevel::Beginner),
            "intermediate" => Some(ExperienceLevel::Intermediate),
            "advanced" => Some(ExperienceLevel::Advanced),
            _ => None,
        }
    }

    /// Tutor instructions matching this level
    pub fn prompt(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => {
                "The user is a BEGINNER. Use simple language, avoid jargon, provide step-by-step explanations with real-world examples. Define technical terms when first used."
            }
            ExperienceLevel::Intermediate => {
                "The user has INTERMEDIATE knowledge. You can use technical terms but still explain complex concepts. Reference CFA curriculum LOS when helpful."
            }
            ExperienceLevel::Advanced => {
                "The user is ADVANCED. Be concise and direct. Reference specific LOS codes, assume familiarity with foundational concepts. Focus on nuances and exam tricks."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserBackground {
    #[default]
    Student,
    WorkingProfessional,
    CareerChanger,
}

impl UserBackground {
    pub fn as_str(&self) -> &str {
        match self {
            UserBackground::Student => "student",
            UserBackground::WorkingProfessional => "working-professional",
            UserBackground::CareerChanger => "career-changer",
        }
    }

    pub fn from(s: &str) -> Option<Self> {
        match s {
            "student" => Some(UserBackground::Student),
            "working-professional" => Some(UserBackground::WorkingProfessional),
            "career-changer" => Some(UserBackground::CareerChanger),
            _ => None,
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            UserBackground::Student => {
                "The user is a STUDENT. They may benefit from academic-style explanations and textbook references."
            }
            UserBackground::WorkingProfessional => {
                "The user is a WORKING PROFESSIONAL. Relate concepts to real-world finance/investment scenarios they might encounter at work."
            }
            UserBackground::CareerChanger => {
                "The user is a CAREER CHANGER. They need context on why concepts matter in practice and how they connect to the broader finance industry."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExplanationStyle {
    #[default]
    Detailed,
    Concise,
    Visual,
}

impl ExplanationStyle {
    pub fn as_str(&self) -> &str {
        match self {
            ExplanationStyle::Detailed => "detailed",
            ExplanationStyle::Concise => "concise",
            ExplanationStyle::Visual => "visual",
        }
    }

    pub fn from(s: &str) -> Option<Self> {
        match s {
            "detailed" => Some(ExplanationStyle::Detailed),
            "concise" => Some(ExplanationStyle::Concise),
            "visual" => Some(ExplanationStyle::Visual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredLanguage {
    #[default]
    En,
    Vi,
}

impl PreferredLanguage {
    pub fn as_str(&self) -> &str {
        match self {
            PreferredLanguage::En => "en",
            PreferredLanguage::Vi => "vi",
        }
    }

    pub fn from(s: &str) -> Option<Self> {
        match s {
            "en" => Some(PreferredLanguage::En),
            "vi" => Some(PreferredLanguage::Vi),
            _ => None,
        }
    }
}

/// Learner preferences captured at onboarding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,

    pub experience_level: ExperienceLevel,
    pub background: UserBackground,
    pub explanation_style: ExplanationStyle,
    #[serde(default)]
    pub preferred_language: PreferredLanguage,

    #[serde(default)]
    pub target_exam_date: Option<NaiveDate>,
    #[serde(default)]
    pub study_hours_per_week: Option<u32>,

    #[serde(default)]
    pub focus_topics: Vec<String>,

    #[serde(default)]
    pub has_completed_onboarding: bool,
    #[serde(default)]
    pub onboarding_completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Answers collected by the onboarding flow; anything left out gets a default
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingAnswers {
    pub name: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub background: Option<UserBackground>,
    pub explanation_style: Option<ExplanationStyle>,
    pub preferred_language: Option<PreferredLanguage>,
    pub target_exam_date: Option<NaiveDate>,
    pub study_hours_per_week: Option<u32>,
    pub focus_topics: Option<Vec<String>>,
}

/// Partial profile edit; `None` leaves the field as it is
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub background: Option<UserBackground>,
    pub explanation_style: Option<ExplanationStyle>,
    pub preferred_language: Option<PreferredLanguage>,
    pub target_exam_date: Option<NaiveDate>,
    pub study_hours_per_week: Option<u32>,
    pub focus_topics: Option<Vec<String>>,
}

impl UserProfile {
    pub fn from_onboarding(answers: OnboardingAnswers, now: DateTime<Utc>) -> Self {
        UserProfile {
            id: generate_user_id(now),
            name: answers.name,
            experience_level: answers.experience_level.unwrap_or_default(),
            background: answers.background.unwrap_or_default(),
            explanation_style: answers.explanation_style.unwrap_or_default(),
            preferred_language: answers.preferred_language.unwrap_or_default(),
            target_exam_date: answers.target_exam_date,
            study_hours_per_week: answers.study_hours_per_week,
            focus_topics: answers.focus_topics.unwrap_or_default(),
            has_completed_onboarding: true,
            onboarding_completed_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = Some(name);
        }
        if let Some(level) = update.experience_level {
            self.experience_level = level;
        }
        if let Some(background) = update.background {
            self.background = background;
        }
        if let Some(style) = update.explanation_style {
            self.explanation_style = style;
        }
        if let Some(language) = update.preferred_language {
            self.preferred_language = language;
        }
        if let Some(date) = update.target_exam_date {
            self.target_exam_date = Some(date);
        }
        if let Some(hours) = update.study_hours_per_week {
            self.study_hours_per_week = Some(hours);
        }
        if let Some(topics) = update.focus_topics {
            self.focus_topics = topics;
        }
        self.updated_at = now;
    }
}

/// `user_<unix millis>_<9 lowercase alphanumerics>`
pub fn generate_user_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("user_{}_{}", now.timestamp_millis(), suffix)
}

/// What an AI tutor needs to tailor its explanations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationContext {
    pub experience_level: ExperienceLevel,
    pub background: UserBackground,
    pub explanation_style: ExplanationStyle,
    pub preferred_language: PreferredLanguage,
    pub weak_topics: Vec<String>,
    pub strong_topics: Vec<String>,
    pub current_topic: Option<String>,
}
