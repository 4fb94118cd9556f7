//! Domain models stored in the database

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    /// Parse a status string. Unrecognized values yield `None`; list
    /// filtering drops such terms instead of erroring.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Decision an instructor can apply to a suggestion. `pending` is not
/// representable here: status updates can only approve or reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Rejected,
}

impl From<ReviewStatus> for SuggestionStatus {
    fn from(review: ReviewStatus) -> Self {
        match review {
            ReviewStatus::Approved => SuggestionStatus::Approved,
            ReviewStatus::Rejected => SuggestionStatus::Rejected,
        }
    }
}

/// A song suggestion as stored in the `suggestions` table.
///
/// Created once with status `pending`; mutated only by the status-update
/// operation; never deleted by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SuggestionRecord {
    pub id: String,
    pub participant_id: String,
    pub instructor_id: String,
    pub class_id: String,
    pub spotify_uri: String,
    pub song_name: String,
    pub artist_name: String,
    pub album_cover_url: Option<String>,
    pub suggestion_date: DateTime<Utc>,
    pub status: SuggestionStatus,
}

/// Monthly suggestion allowance for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuotaRecord {
    pub user_id: String,
    pub month_year: String,
    pub total_quota: i64,
    pub remaining_quota: i64,
}

impl QuotaRecord {
    /// Construct a validated record: both counts non-negative and
    /// remaining never above total. The invariant is enforced here at
    /// construction; decrements afterwards only decrease `remaining`.
    pub fn new(
        user_id: impl Into<String>,
        month_year: impl Into<String>,
        total_quota: i64,
        remaining_quota: i64,
    ) -> Result<Self> {
        if total_quota < 0 || remaining_quota < 0 {
            return Err(Error::InvalidInput(
                "quota counts must be non-negative".to_string(),
            ));
        }
        if remaining_quota > total_quota {
            return Err(Error::InvalidInput(format!(
                "remaining_quota {} cannot exceed total_quota {}",
                remaining_quota, total_quota
            )));
        }
        Ok(Self {
            user_id: user_id.into(),
            month_year: month_year.into(),
            total_quota,
            remaining_quota,
        })
    }

    /// Zero-valued record returned when no allowance has been provisioned
    /// for (user, period). "No record" means "no allowance", not an error.
    pub fn empty(user_id: impl Into<String>, month_year: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            month_year: month_year.into(),
            total_quota: 0,
            remaining_quota: 0,
        }
    }
}
