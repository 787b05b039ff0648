use crate::analytics::LearningAnalytics;
use crate::error::{Result, StoreError};
use crate::profile::UserProfile;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Everything persisted for one user, saved and loaded wholesale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub schema_version: u32,
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub analytics: Option<LearningAnalytics>,
}

impl Default for PersistedState {
    fn default() -> Self {
        PersistedState {
            schema_version: CURRENT_SCHEMA_VERSION,
            profile: None,
            analytics: None,
        }
    }
}

impl PersistedState {
    pub fn new(profile: Option<UserProfile>, analytics: Option<LearningAnalytics>) -> Self {
        PersistedState {
            schema_version: CURRENT_SCHEMA_VERSION,
            profile,
            analytics,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a stored document, upgrading older layouts to the current schema
    pub fn from_json(json: &str) -> Result<Self> {
        let mut document: Value = serde_json::from_str(json)?;

        // Browser-era documents wrap the payload as {"state": {...}, "version": n}
        if let Some(inner) = document.get_mut("state").map(Value::take) {
            document = inner;
        }

        let version = match document.get("schemaVersion") {
            None => 0,
            Some(value) => match value.as_u64() {
                Some(version) => version,
                // Negative, fractional or non-numeric: let serde report it
                None => u64::from(serde_json::from_value::<u32>(value.clone())?),
            },
        };

        if version > u64::from(CURRENT_SCHEMA_VERSION) {
            return Err(StoreError::UnsupportedSchema {
                found: version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        if version == 0 {
            migrate_v0(&mut document);
        }

        Ok(serde_json::from_value(document)?)
    }
}

/// Unversioned documents: missing collections are filled by serde defaults,
/// exam dates were stored as full timestamps.
fn migrate_v0(document: &mut Value) {
    debug!("Migrating unversioned document to schema {}", CURRENT_SCHEMA_VERSION);

    if let Some(object) = document.as_object_mut() {
        object.insert("schemaVersion".to_string(), Value::from(CURRENT_SCHEMA_VERSION));
    }

    let exam_date = document
        .get_mut("profile")
        .and_then(|profile| profile.get_mut("targetExamDate"));
    if let Some(Value::String(date)) = exam_date {
        if date.len() > 10 {
            date.truncate(10);
        }
    }
}
