use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::model::leave::LeaveStatus;

/// Malformed input caught before anything is stored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("toDate cannot be before fromDate")]
    InvalidDateRange,

    #[error("contact details must be a 10-digit number")]
    InvalidContact,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("you can enter only up to 2 CC recipients")]
    TooManyRecipients,

    #[error("numberOfDays does not match the requested date range")]
    InvalidDayCount,

    #[error("please enter a remark")]
    EmptyRemark,
}

/// Illegal state change on an existing record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cancelled leaves cannot be updated")]
    AlreadyTerminal,

    #[error("status cannot be set to CANCELLED here; only the owner may withdraw the request")]
    UnauthorizedCancellation,

    #[error("a {from} request cannot move to {to}")]
    InvalidTransition { from: LeaveStatus, to: LeaveStatus },
}

/// Top-level error for every lifecycle operation. Each variant keeps its
/// own message so the caller never has to present a bare "failed".
#[derive(Debug, Error)]
pub enum LeaveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("leave request #{0} not found")]
    NotFound(u64),

    #[error("you are not authorized to perform this action")]
    Unauthorized,

    #[error("storage failure")]
    Store(#[from] anyhow::Error),
}

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::Validation(_) => StatusCode::BAD_REQUEST,
            LeaveError::Transition(TransitionError::UnauthorizedCancellation) => {
                StatusCode::FORBIDDEN
            }
            LeaveError::Transition(_) => StatusCode::CONFLICT,
            LeaveError::NotFound(_) => StatusCode::NOT_FOUND,
            LeaveError::Unauthorized => StatusCode::FORBIDDEN,
            LeaveError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let LeaveError::Store(e) = self {
            tracing::error!(error = %e, "Leave store failure");
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
