//! Validation error vocabulary
//!
//! Every variant is client-caused and maps to a "bad request" at the HTTP
//! boundary; the variant itself names the precise cause.

use thiserror::Error;

/// Classified rejection of untrusted input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `service_name`, `user_id`, `start_date` (or a total range bound) is blank
    #[error("missing required fields")]
    MissingRequiredFields,

    /// Service name is blank or carries surrounding whitespace
    #[error("invalid service name")]
    InvalidServiceName,

    /// Price is zero or negative
    #[error("invalid price")]
    InvalidPrice,

    /// User id is not a UUID
    #[error("invalid user id")]
    InvalidUserID,

    /// Subscription id is not a UUID
    #[error("invalid id")]
    InvalidID,

    /// Start date is not a `MM-YYYY` value
    #[error("invalid start date")]
    InvalidStartDate,

    /// End date is blank, padded or not a `MM-YYYY` value
    #[error("invalid end date")]
    InvalidEndDate,

    /// Lower bound of a total query is not a `MM-YYYY` value
    #[error("invalid from date")]
    InvalidFromDate,

    /// Upper bound of a total query is not a `MM-YYYY` value
    #[error("invalid to date")]
    InvalidToDate,

    /// Period ends before it starts
    #[error("invalid period")]
    InvalidPeriod,
}
