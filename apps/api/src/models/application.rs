use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kanban column of a tracked application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offered,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "Saved",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offered => "Offered",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `status` is stored as TEXT and constrained by a CHECK in the migration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub status: String,
    pub date_applied: DateTime<Utc>,
    pub notes: Option<String>,
    pub job_url: Option<String>,
    pub match_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub date_applied: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub job_url: Option<String>,
    pub match_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}
