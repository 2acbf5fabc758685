//! Subscription records and query filters

use super::MonthYear;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Untrusted subscription fields as received from a client
///
/// Missing JSON fields default to empty strings and a zero price so that
/// validation, not deserialization, decides what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubscriptionInput {
    /// Name of the subscribed service
    pub service_name: String,
    /// Monthly price in minor currency units
    pub price: i64,
    /// Owner of the subscription
    pub user_id: String,
    /// First billed month, `MM-YYYY`
    pub start_date: String,
    /// Last billed month, `MM-YYYY`; absent while still active
    pub end_date: Option<String>,
}

/// A validated, normalized subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    /// Storage-assigned identifier, `None` until persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Name of the subscribed service, never padded with whitespace
    pub service_name: String,
    /// Monthly price in minor currency units, always positive
    pub price: i64,
    /// Owner of the subscription
    pub user_id: Uuid,
    /// First billed month
    pub start_date: MonthYear,
    /// Last billed month, never before `start_date`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthYear>,
}

impl Subscription {
    /// Copy of this subscription carrying the given identifier
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }
}

impl From<&Subscription> for SubscriptionInput {
    fn from(sub: &Subscription) -> Self {
        Self {
            service_name: sub.service_name.clone(),
            price: sub.price,
            user_id: sub.user_id.to_string(),
            start_date: sub.start_date.to_string(),
            end_date: sub.end_date.map(|d| d.to_string()),
        }
    }
}

/// First value of `key` among raw query pairs
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// Untrusted list filter; empty strings mean "no filter"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListFilter {
    /// Restrict to one user
    pub user_id: String,
    /// Restrict to one service
    pub service_name: String,
}

impl RawListFilter {
    /// Build from decoded query pairs; a repeated key keeps its first value
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            user_id: first_value(pairs, "user_id").unwrap_or_default().to_string(),
            service_name: first_value(pairs, "service_name")
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Validated list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Restrict to one user
    pub user_id: Option<Uuid>,
    /// Restrict to one service, matched exactly
    pub service_name: Option<String>,
}

impl ListFilter {
    /// Whether a subscription passes this filter
    pub fn matches(&self, sub: &Subscription) -> bool {
        self.user_id.map_or(true, |id| id == sub.user_id)
            && self
                .service_name
                .as_deref()
                .map_or(true, |name| name == sub.service_name)
    }
}

/// Untrusted total-cost query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTotalFilter {
    /// Lower bound, `MM-YYYY`
    pub from: Option<String>,
    /// Upper bound, `MM-YYYY`
    pub to: Option<String>,
    /// Restrict to one user
    pub user_id: String,
    /// Restrict to one service
    pub service_name: String,
}

impl RawTotalFilter {
    /// Build from decoded query pairs; a repeated key keeps its first value
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let scope = RawListFilter::from_query_pairs(pairs);
        Self {
            from: first_value(pairs, "from").map(str::to_string),
            to: first_value(pairs, "to").map(str::to_string),
            user_id: scope.user_id,
            service_name: scope.service_name,
        }
    }
}

/// Inclusive month range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// First month of the range
    pub from: MonthYear,
    /// Last month of the range, never before `from`
    pub to: MonthYear,
}

/// Validated total-cost query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalFilter {
    /// Months to bill
    pub period: Period,
    /// Optional user and service restriction
    pub scope: ListFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_list_filter_first_value_wins() {
        let filter = RawListFilter::from_query_pairs(&pairs(&[
            ("user_id", "first"),
            ("service_name", "Netflix"),
            ("user_id", "second"),
        ]));
        assert_eq!(filter.user_id, "first");
        assert_eq!(filter.service_name, "Netflix");
    }

    #[test]
    fn test_list_filter_ignores_unknown_keys() {
        let filter = RawListFilter::from_query_pairs(&pairs(&[("page", "2")]));
        assert_eq!(filter, RawListFilter::default());
    }

    #[test]
    fn test_total_filter_keeps_absent_bounds_absent() {
        let filter = RawTotalFilter::from_query_pairs(&pairs(&[
            ("to", "09-2025"),
            ("to", "10-2025"),
            ("user_id", "u"),
        ]));
        assert_eq!(filter.from, None);
        assert_eq!(filter.to.as_deref(), Some("09-2025"));
        assert_eq!(filter.user_id, "u");
        assert_eq!(filter.service_name, "");
    }

    #[test]
    fn test_total_filter_empty_bound_is_present() {
        let filter = RawTotalFilter::from_query_pairs(&pairs(&[("from", "")]));
        assert_eq!(filter.from.as_deref(), Some(""));
    }
}
