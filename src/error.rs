//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::Date;

use crate::{billing_period::BillingPeriodId, category::CategoryId};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more required fields were missing from the request.
    ///
    /// The string describes which fields are required.
    #[error("{0}")]
    MissingFields(&'static str),

    /// The request could not be parsed, e.g. malformed JSON or a query
    /// parameter with the wrong type.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A date range where the start date comes after the end date.
    #[error("the start date {start} is after the end date {end}")]
    InvalidDateRange {
        /// The requested start date.
        start: Date,
        /// The requested end date.
        end: Date,
    },

    /// A month number outside of 1 to 12.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// The amount is too large to be stored.
    #[error("the amount is out of range")]
    AmountOutOfRange,

    /// The category ID used to create an expense did not match a valid category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The billing period ID used to create an expense or fixed expense did
    /// not match a valid billing period.
    #[error("the billing period ID {0} does not refer to a valid billing period")]
    InvalidBillingPeriod(BillingPeriodId),

    /// The specified category name already exists in the database.
    #[error("Category already exists")]
    DuplicateCategoryName(String),

    /// There already is a salary for the given year and month.
    #[error("a salary for {month:02}/{year} already exists")]
    DuplicateSalary {
        /// The year of the conflicting salary.
        year: i32,
        /// The month of the conflicting salary.
        month: u8,
    },

    /// The requested resource was not found.
    ///
    /// The string names the missing resource, e.g. "Expense".
    ///
    /// Internally, this error may occur when a query returns no rows, in
    /// which case the resource is named "Resource".
    #[error("{0} not found")]
    NotFound(&'static str),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Resource"),
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code that is sent to the client for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields(_)
            | Error::InvalidRequest(_)
            | Error::EmptyCategoryName
            | Error::InvalidDateRange { .. }
            | Error::InvalidMonth(_)
            | Error::AmountOutOfRange
            | Error::InvalidCategory(_)
            | Error::InvalidBillingPeriod(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::DuplicateCategoryName(_) | Error::DuplicateSalary { .. } => StatusCode::CONFLICT,
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            // The details of server errors are only meant for the server logs.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use serde_json::{Value, json};

    use crate::Error;

    async fn into_json(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("could not read response body");

        (
            status,
            serde_json::from_slice(&body).expect("response body is not JSON"),
        )
    }

    #[tokio::test]
    async fn missing_fields_is_bad_request() {
        let (status, body) = into_json(Error::MissingFields("Missing required fields")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required fields" }));
    }

    #[tokio::test]
    async fn duplicate_category_is_conflict() {
        let (status, body) = into_json(Error::DuplicateCategoryName("Luz".to_owned())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "Category already exists" }));
    }

    #[tokio::test]
    async fn not_found_names_resource() {
        let (status, body) = into_json(Error::NotFound("Expense")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Expense not found" }));
    }

    #[tokio::test]
    async fn sql_error_details_are_hidden() {
        let (status, body) =
            into_json(Error::SqlError(rusqlite::Error::InvalidQuery)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "An unexpected error occurred, check the server logs for more details." })
        );
    }
}
