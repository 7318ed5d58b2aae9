//! Data types produced by the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cleaner::CleaningReport;
use crate::schema::{Platform, Role};

/// Mean of a numeric field within one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub stddev: f64,
}

/// One row of a sorted frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub percentage: f64,
}

impl From<(String, f64)> for FrequencyEntry {
    fn from((value, percentage): (String, f64)) -> Self {
        Self { value, percentage }
    }
}

/// A frequency table for one column, sorted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencySection {
    pub role: Role,
    pub entries: Vec<FrequencyEntry>,
}

/// Grouped averages of one numeric column, in first-seen group order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageSection {
    pub group_role: Role,
    pub value_role: Role,
    pub groups: Vec<GroupAverage>,
    pub top: Option<GroupAverage>,
}

/// Everything computed for one platform's cleaned dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformReport {
    pub platform: Platform,
    pub cleaning: CleaningReport,
    pub frequencies: Vec<FrequencySection>,
    pub averages: Vec<AverageSection>,
}

/// Top-level report covering both platforms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub platforms: Vec<PlatformReport>,
}
