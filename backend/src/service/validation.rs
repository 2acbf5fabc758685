//! Input validation and normalization
//!
//! Pure functions turning untrusted input into canonical domain values.
//! Whitespace is never trimmed away silently: a value that differs from its
//! trimmed form is rejected.

use crate::domain::{
    ListFilter, MonthYear, Period, RawListFilter, RawTotalFilter, Subscription,
    SubscriptionInput, TotalFilter, ValidationError,
};
use uuid::Uuid;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_trim_stable(value: &str) -> bool {
    value.trim() == value
}

fn parse_uuid(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}

/// Validate a create or update payload
///
/// # Returns
/// * `Ok(Subscription)` - normalized value with `id` unset
/// * `Err(ValidationError)` - the first rule the input breaks
pub fn validate_create_or_update(
    input: &SubscriptionInput,
) -> Result<Subscription, ValidationError> {
    if is_blank(&input.service_name) || is_blank(&input.user_id) || is_blank(&input.start_date) {
        return Err(ValidationError::MissingRequiredFields);
    }

    if !is_trim_stable(&input.service_name) {
        return Err(ValidationError::InvalidServiceName);
    }

    if input.price <= 0 {
        return Err(ValidationError::InvalidPrice);
    }

    let user_id = parse_uuid(&input.user_id).ok_or(ValidationError::InvalidUserID)?;

    let start_date: MonthYear = input
        .start_date
        .parse()
        .map_err(|_| ValidationError::InvalidStartDate)?;

    let end_date = match input.end_date.as_deref() {
        None => None,
        Some(raw) => {
            if is_blank(raw) || !is_trim_stable(raw) {
                return Err(ValidationError::InvalidEndDate);
            }
            let end_date: MonthYear = raw.parse().map_err(|_| ValidationError::InvalidEndDate)?;
            if end_date < start_date {
                return Err(ValidationError::InvalidPeriod);
            }
            Some(end_date)
        }
    };

    Ok(Subscription {
        id: None,
        service_name: input.service_name.clone(),
        price: input.price,
        user_id,
        start_date,
        end_date,
    })
}

/// Validate a subscription identifier
pub fn validate_id(id: &str) -> Result<Uuid, ValidationError> {
    parse_uuid(id).ok_or(ValidationError::InvalidID)
}

fn validate_user_id_filter(user_id: &str) -> Result<Option<Uuid>, ValidationError> {
    if user_id.is_empty() {
        return Ok(None);
    }
    if !is_trim_stable(user_id) {
        return Err(ValidationError::InvalidUserID);
    }
    parse_uuid(user_id)
        .map(Some)
        .ok_or(ValidationError::InvalidUserID)
}

fn validate_service_name_filter(service_name: &str) -> Result<Option<String>, ValidationError> {
    if service_name.is_empty() {
        return Ok(None);
    }
    if is_blank(service_name) || !is_trim_stable(service_name) {
        return Err(ValidationError::InvalidServiceName);
    }
    Ok(Some(service_name.to_string()))
}

/// Validate the optional filters of a list query
pub fn validate_list_filter(raw: &RawListFilter) -> Result<ListFilter, ValidationError> {
    Ok(ListFilter {
        user_id: validate_user_id_filter(&raw.user_id)?,
        service_name: validate_service_name_filter(&raw.service_name)?,
    })
}

/// Validate a total-cost query
///
/// Both range bounds are mandatory. The upper bound here is the query's own
/// `to`, unrelated to a subscription's optional `end_date`.
pub fn validate_total_filter(raw: &RawTotalFilter) -> Result<TotalFilter, ValidationError> {
    let (from, to) = match (raw.from.as_deref(), raw.to.as_deref()) {
        (Some(from), Some(to)) if !is_blank(from) && !is_blank(to) => (from, to),
        _ => return Err(ValidationError::MissingRequiredFields),
    };

    if !is_trim_stable(from) {
        return Err(ValidationError::InvalidFromDate);
    }
    let from: MonthYear = from.parse().map_err(|_| ValidationError::InvalidFromDate)?;

    if !is_trim_stable(to) {
        return Err(ValidationError::InvalidToDate);
    }
    let to: MonthYear = to.parse().map_err(|_| ValidationError::InvalidToDate)?;

    if to < from {
        return Err(ValidationError::InvalidPeriod);
    }

    Ok(TotalFilter {
        period: Period { from, to },
        scope: ListFilter {
            user_id: validate_user_id_filter(&raw.user_id)?,
            service_name: validate_service_name_filter(&raw.service_name)?,
        },
    })
}
