//! Descriptive statistics over cleaned catalog rows.
//!
//! Frequency tables give each distinct value's share of a column, grouped
//! averages give the mean of a numeric column per category, and
//! [`analyzer`] combines both into a per-platform report.

pub mod analyzer;
pub mod frequency;
pub mod grouped;
pub mod types;
pub mod utility;
