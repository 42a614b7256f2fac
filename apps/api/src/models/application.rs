use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Where a tracked job application stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    /// Stored form, also used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One entry in the job-application tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Uuid,
    pub company_name: String,
    pub job_title: String,
    pub date_applied: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub notes: String,
}

/// Request body for tracking a new application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewApplication {
    pub company_name: String,
    pub job_title: String,
    pub status: ApplicationStatus,
    pub notes: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub company_name: String,
    pub job_title: String,
    pub date_applied: DateTime<Utc>,
    pub status: String,
    pub notes: String,
}

impl TryFrom<ApplicationRow> for JobApplication {
    type Error = UnknownStatus;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(JobApplication {
            id: row.id,
            company_name: row.company_name,
            job_title: row.job_title,
            date_applied: row.date_applied,
            status: row.status.parse()?,
            notes: row.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_any_case() {
        assert_eq!(
            "INTERVIEWING".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Interviewing
        );
        assert_eq!(
            " offer ".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Offer
        );
        assert!("ghosted".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_new_application_defaults_to_applied() {
        let body: NewApplication =
            serde_json::from_value(serde_json::json!({"company_name": "Ferrous Systems"})).unwrap();
        assert_eq!(body.status, ApplicationStatus::Applied);
        assert!(body.job_title.is_empty());
        assert!(body.notes.is_empty());
    }

    #[test]
    fn test_row_with_unknown_status_is_rejected() {
        let row = ApplicationRow {
            id: Uuid::new_v4(),
            company_name: "Oxide".to_string(),
            job_title: "Engineer".to_string(),
            date_applied: Utc::now(),
            status: "pending".to_string(),
            notes: String::new(),
        };
        assert!(JobApplication::try_from(row).is_err());
    }
}
