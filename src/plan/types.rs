use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RelayError;

/// Subjects arrive either as a JSON array or as one comma-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subjects {
    List(Vec<String>),
    Joined(String),
}

impl Subjects {
    /// Trimmed, non-empty subject names in caller order.
    pub fn names(&self) -> Vec<&str> {
        let raw: Vec<&str> = match self {
            Subjects::List(items) => items.iter().map(String::as_str).collect(),
            Subjects::Joined(joined) => joined.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Display form used in the prompt, e.g. `Math, Physics`.
    pub fn display(&self) -> String {
        self.names().join(", ")
    }
}

impl Default for Subjects {
    fn default() -> Self {
        Subjects::List(Vec::new())
    }
}

/// Inbound study-plan request as the caller sends it.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as an invalid request rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanRequest {
    #[serde(default)]
    pub subjects: Subjects,
    #[serde(default)]
    pub exam_date: Option<String>,
    #[serde(default, deserialize_with = "hours_from_number_or_text")]
    pub study_hours: Option<f64>,
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub weaknesses: Option<String>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default, alias = "geminiApiKey", skip_serializing)]
    pub api_key: Option<String>,
}

/// HTML number inputs often reach us as strings.
fn hours_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hours {
        Number(f64),
        Text(String),
    }

    match Option::<Hours>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Hours::Number(value)) => Ok(Some(value)),
        Some(Hours::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Hours::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("studyHours '{text}' is not a number"))),
    }
}

/// A request that passed validation; all text is trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub subjects: String,
    pub exam_date: String,
    pub study_hours: f64,
    pub learning_style: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub goals: String,
}

pub const MIN_STUDY_HOURS: f64 = 1.0;
pub const MAX_STUDY_HOURS: f64 = 24.0;

impl StudyPlanRequest {
    pub fn validate(&self) -> Result<ValidatedRequest, RelayError> {
        let subjects = self.subjects.display();
        if subjects.is_empty() {
            return Err(RelayError::invalid("at least one subject is required"));
        }

        let exam_date = required_text(&self.exam_date, "examDate")?;
        let goals = required_text(&self.goals, "goals")?;

        let study_hours = self
            .study_hours
            .ok_or_else(|| RelayError::invalid("studyHours is required"))?;
        if !study_hours.is_finite() || !(MIN_STUDY_HOURS..=MAX_STUDY_HOURS).contains(&study_hours)
        {
            return Err(RelayError::invalid(format!(
                "studyHours must be between {MIN_STUDY_HOURS} and {MAX_STUDY_HOURS}, got {study_hours}"
            )));
        }

        Ok(ValidatedRequest {
            subjects,
            exam_date,
            study_hours,
            learning_style: optional_text(&self.learning_style),
            strengths: optional_text(&self.strengths),
            weaknesses: optional_text(&self.weaknesses),
            goals,
        })
    }
}

fn required_text(value: &Option<String>, field: &str) -> Result<String, RelayError> {
    optional_text(value).ok_or_else(|| RelayError::invalid(format!("{field} is required")))
}

fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Successful relay output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPlan {
    #[serde(rename = "plan")]
    pub plan_text: String,
}
