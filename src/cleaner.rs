//! Cleaning stages for catalog exports.
//!
//! Every stage reads a slice of records and returns a new vector together
//! with the number of rows it removed. [`clean`] runs them in the order
//! integrity, dedup, language, price.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::utility::{NumericFormat, parse_number};
use crate::error::{AnalysisError, ParseError};
use crate::record::{Dataset, Record};
use crate::schema::{DatasetProfile, Platform, Role, Schema};

/// Names with more than this many characters above code point 127 are
/// treated as non-English.
pub const NON_ASCII_THRESHOLD: usize = 3;

/// Result of one cleaning stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub records: Vec<Record>,
    pub dropped: usize,
}

impl StageOutcome {
    fn from_filtered(input_len: usize, records: Vec<Record>) -> Self {
        let dropped = input_len - records.len();
        Self { records, dropped }
    }
}

/// Drops rows with the wrong field count or a rating outside `[min, max]`.
///
/// A rating of `NaN` means "not rated yet" and is kept. Anything else that
/// does not parse as a number is dropped.
pub fn integrity_filter(
    records: &[Record],
    width: usize,
    rating_index: usize,
    min: f64,
    max: f64,
) -> StageOutcome {
    let kept: Vec<Record> = records
        .iter()
        .filter(|record| {
            if record.len() != width {
                return false;
            }
            match record.get(rating_index).map(|v| v.trim().parse::<f64>()) {
                Some(Ok(rating)) if rating.is_nan() => true,
                Some(Ok(rating)) => (min..=max).contains(&rating),
                _ => false,
            }
        })
        .cloned()
        .collect();

    StageOutcome::from_filtered(records.len(), kept)
}

/// Builds the name -> highest review count index over all records.
pub fn review_max_index(
    records: &[Record],
    name_index: usize,
    count_index: usize,
) -> Result<HashMap<String, f64>, ParseError> {
    let column = count_index.to_string();
    let mut reviews_max: HashMap<String, f64> = HashMap::new();

    for record in records {
        let name = record.get(name_index).unwrap_or_default();
        let reviews = parse_number(
            record.get(count_index).unwrap_or_default(),
            NumericFormat::Plain,
            &column,
        )?;

        reviews_max
            .entry(name.to_string())
            .and_modify(|max| {
                if *max < reviews {
                    *max = reviews;
                }
            })
            .or_insert(reviews);
    }

    Ok(reviews_max)
}

/// Keeps one record per name: the earliest one whose review count equals
/// the highest count seen for that name.
///
/// # Errors
///
/// Returns a [`ParseError`] if a review count is not numeric.
pub fn deduplicate(
    records: &[Record],
    name_index: usize,
    count_index: usize,
) -> Result<StageOutcome, ParseError> {
    let reviews_max = review_max_index(records, name_index, count_index)?;
    let column = count_index.to_string();

    let mut already_added: HashSet<&str> = HashSet::with_capacity(reviews_max.len());
    let mut kept = Vec::with_capacity(reviews_max.len());

    for record in records {
        let name = record.get(name_index).unwrap_or_default();
        let reviews = parse_number(
            record.get(count_index).unwrap_or_default(),
            NumericFormat::Plain,
            &column,
        )?;

        if reviews_max.get(name) == Some(&reviews) && already_added.insert(name) {
            kept.push(record.clone());
        }
    }

    Ok(StageOutcome::from_filtered(records.len(), kept))
}

/// Counts characters whose code point is above 127.
pub fn count_non_ascii(name: &str) -> usize {
    name.chars().filter(|c| u32::from(*c) > 127).count()
}

/// Heuristic for an English app name: at most `threshold` non-ASCII characters.
pub fn is_english(name: &str, threshold: usize) -> bool {
    count_non_ascii(name) <= threshold
}

/// Drops records whose name looks non-English.
pub fn language_filter(records: &[Record], name_index: usize, threshold: usize) -> StageOutcome {
    let kept: Vec<Record> = records
        .iter()
        .filter(|record| is_english(record.get(name_index).unwrap_or_default(), threshold))
        .cloned()
        .collect();

    StageOutcome::from_filtered(records.len(), kept)
}

/// Keeps records whose price text is exactly `free_literal`.
pub fn free_filter(records: &[Record], price_index: usize, free_literal: &str) -> StageOutcome {
    let kept: Vec<Record> = records
        .iter()
        .filter(|record| record.get(price_index) == Some(free_literal))
        .cloned()
        .collect();

    StageOutcome::from_filtered(records.len(), kept)
}

/// Names that occur more than once, for inspection before deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSummary {
    /// Occurrences beyond the first, summed over all names.
    pub duplicate_count: usize,
    /// One entry per repeated occurrence, in input order.
    pub names: Vec<String>,
}

pub fn duplicate_names(records: &[Record], name_index: usize) -> DuplicateSummary {
    let mut unique: HashSet<&str> = HashSet::new();
    let mut names = Vec::new();

    for record in records {
        let name = record.get(name_index).unwrap_or_default();
        if !unique.insert(name) {
            names.push(name.to_string());
        }
    }

    DuplicateSummary {
        duplicate_count: names.len(),
        names,
    }
}

/// Row counts for each stage of one platform's cleaning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub platform: Platform,
    pub rows_in: usize,
    pub corrupt_dropped: usize,
    pub duplicates_dropped: usize,
    pub non_english_dropped: usize,
    pub paid_dropped: usize,
    pub rows_out: usize,
}

/// A dataset after the full cleaning pipeline.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub header: Record,
    pub schema: Schema,
    pub rows: Vec<Record>,
    pub report: CleaningReport,
}

/// Runs integrity, dedup, language and price stages for one platform.
///
/// Stages that the profile does not enable are skipped with zero drops.
#[tracing::instrument(skip_all, fields(platform = %profile.platform, rows = dataset.rows.len()))]
pub fn clean(
    dataset: &Dataset,
    profile: &DatasetProfile,
    non_ascii_threshold: usize,
) -> Result<CleanedDataset, AnalysisError> {
    let schema = Schema::bind(&dataset.header, profile)?;
    let mut rows = dataset.rows.clone();

    let mut corrupt_dropped = 0;
    if let Some(rule) = profile.integrity {
        let rating_index = schema.index(rule.role)?;
        let outcome = integrity_filter(&rows, schema.width(), rating_index, rule.min, rule.max);
        debug!(dropped = outcome.dropped, "Integrity filter applied");
        corrupt_dropped = outcome.dropped;
        rows = outcome.records;
    }

    let mut duplicates_dropped = 0;
    if let Some(rule) = profile.dedup {
        let outcome = deduplicate(
            &rows,
            schema.index(rule.name)?,
            schema.index(rule.review_count)?,
        )?;
        debug!(dropped = outcome.dropped, "Deduplication applied");
        duplicates_dropped = outcome.dropped;
        rows = outcome.records;
    }

    let name_index = schema.index(Role::Name)?;
    let outcome = language_filter(&rows, name_index, non_ascii_threshold);
    debug!(dropped = outcome.dropped, threshold = non_ascii_threshold, "Language filter applied");
    let non_english_dropped = outcome.dropped;
    rows = outcome.records;

    let price_index = schema.index(Role::Price)?;
    let outcome = free_filter(&rows, price_index, profile.free_price);
    debug!(dropped = outcome.dropped, free_price = profile.free_price, "Free-app filter applied");
    let paid_dropped = outcome.dropped;
    rows = outcome.records;

    let report = CleaningReport {
        platform: profile.platform,
        rows_in: dataset.rows.len(),
        corrupt_dropped,
        duplicates_dropped,
        non_english_dropped,
        paid_dropped,
        rows_out: rows.len(),
    };

    info!(
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        corrupt = corrupt_dropped,
        duplicates = duplicates_dropped,
        non_english = non_english_dropped,
        paid = paid_dropped,
        "Cleaning complete"
    );

    Ok(CleanedDataset {
        header: dataset.header.clone(),
        schema,
        rows,
        report,
    })
}
