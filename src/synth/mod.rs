//! Deterministic dataset synthesis.
//!
//! Each family is a single-pass generator: observation rows are produced in
//! a fixed loop order, summary tables are accumulated in the same pass or in
//! one grouped pass over the finished rows, and every random draw happens in
//! a documented order. Reordering draws changes the reproducible sequence
//! and is a breaking change to the generated fixtures.

pub mod ecommerce;
pub mod sales_customer;

use chrono::NaiveDate;

/// First day of the given calendar month; months outside 1-12 are a
/// programmer error, the callers loop over fixed ranges
pub(crate) fn month_start(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid calendar month")
}
