use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` the same way as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Cancelled,
    Completed,
    #[serde(other)]
    Unknown,
}

/// Link from an interview to a job: a directory id or free text typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LinkedJobRef {
    Id(i64),
    Text(String),
}

impl LinkedJobRef {
    /// Numeric job id, including numeric strings such as `"42"`.
    pub fn job_id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn raw_text(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interview {
    pub id: String,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub linked_job: Option<LinkedJobRef>,
    pub status: InterviewStatus,
}

impl Interview {
    pub fn linked_job_id(&self) -> Option<i64> {
        self.linked_job.as_ref().and_then(LinkedJobRef::job_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JobRecord {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparationActivity {
    pub job_id: Option<i64>,
    pub activity_type: String,
    pub description: String,
    pub notes: String,
    pub time_spent_minutes: f64,
    pub activity_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeAttempt {
    pub job_id: Option<i64>,
    pub text: String,
    pub question: String,
    pub origin: String,
    pub code: String,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChecklistItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
}
