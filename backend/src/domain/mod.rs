//! Domain types
//!
//! Subscription records, month-year values, query filters and the
//! validation error vocabulary shared by every layer.

pub mod errors;
pub mod month_year;
pub mod subscription;

pub use errors::ValidationError;
pub use month_year::{MonthYear, ParseMonthYearError};
pub use subscription::{
    ListFilter, Period, RawListFilter, RawTotalFilter, Subscription, SubscriptionInput,
    TotalFilter,
};
