//! Leaderboard Error Types
//!
//! This module provides leaderboard-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Leaderboard-specific result type alias
pub type LeaderboardResult<T> = Result<T, LeaderboardError>;

/// Leaderboard-specific error variants
///
/// Upstream rating failures are NOT represented here: they degrade to
/// Absent fields on the output. Only the local roster and the refresh
/// cycle can produce an error visible to a caller.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Roster file missing or unreadable
    #[error("Roster unavailable: {0}")]
    RosterUnavailable(String),

    /// Roster file exists but does not parse as a player array
    #[error("Roster malformed: {0}")]
    RosterMalformed(String),

    /// Posted roster payload rejected by validation
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    /// A refresh cycle is already running
    #[error("A refresh cycle is already in progress")]
    RefreshInProgress,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LeaderboardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LeaderboardError::RosterUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            LeaderboardError::RosterMalformed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LeaderboardError::InvalidRoster(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LeaderboardError::RefreshInProgress => StatusCode::CONFLICT,
            LeaderboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LeaderboardError::RosterUnavailable(_) => ErrorKind::ServiceUnavailable,
            LeaderboardError::RosterMalformed(_) => ErrorKind::InternalServerError,
            LeaderboardError::InvalidRoster(_) => ErrorKind::UnprocessableEntity,
            LeaderboardError::RefreshInProgress => ErrorKind::Conflict,
            LeaderboardError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            LeaderboardError::RosterMalformed(msg) => {
                tracing::error!(message = %msg, "roster file malformed");
            }
            LeaderboardError::Internal(msg) => {
                tracing::error!(message = %msg, "leaderboard internal error");
            }
            LeaderboardError::RosterUnavailable(msg) => {
                tracing::warn!(message = %msg, "roster file unavailable");
            }
            LeaderboardError::RefreshInProgress => {
                tracing::warn!("refresh requested while a cycle is in flight");
            }
            _ => {
                tracing::debug!(error = %self, "leaderboard error");
            }
        }
    }
}

impl From<LeaderboardError> for AppError {
    fn from(err: LeaderboardError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for LeaderboardError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
