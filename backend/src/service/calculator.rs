//! Prorated total calculation
//!
//! A subscription contributes `price * months`, where `months` counts the
//! whole months its active interval shares with the queried period. Both ends
//! are inclusive. A subscription without an end date is active through `to`.

use crate::domain::{Period, Subscription, TotalFilter};

/// Number of billed months a subscription overlaps with `period`
///
/// Returns `None` when the subscription lies entirely outside the period;
/// otherwise the count is at least one.
pub fn billed_months(sub: &Subscription, period: &Period) -> Option<i64> {
    let end = sub.end_date.unwrap_or(period.to);
    if sub.start_date > period.to || end < period.from {
        return None;
    }

    let effective_end = end.min(period.to);
    let effective_start = sub.start_date.max(period.from);
    Some(effective_end.ordinal() - effective_start.ordinal() + 1)
}

/// Total cost of the subscriptions matching `filter`
///
/// Returns `None` if the sum does not fit in an `i64`.
pub fn prorated_total<'a, I>(subscriptions: I, filter: &TotalFilter) -> Option<i64>
where
    I: IntoIterator<Item = &'a Subscription>,
{
    subscriptions
        .into_iter()
        .filter(|sub| filter.scope.matches(sub))
        .filter_map(|sub| billed_months(sub, &filter.period).map(|months| (sub.price, months)))
        .try_fold(0i64, |total, (price, months)| {
            total.checked_add(price.checked_mul(months)?)
        })
}
