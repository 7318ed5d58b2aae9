use std::collections::HashMap;

use crate::analyzers::utility::pct;
use crate::record::Record;

/// Distinct field value -> share of records holding it, in percent.
pub type FrequencyTable = HashMap<String, f64>;

/// Counts every distinct value at `index` and converts the counts to
/// percentages of the record total.
///
/// Empty strings count as one more distinct value. A short row contributes
/// an empty string. Returns an empty table for no records.
pub fn frequency_table(records: &[Record], index: usize) -> FrequencyTable {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in records {
        *counts
            .entry(record.get(index).unwrap_or_default())
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), pct(count, records.len())))
        .collect()
}

/// Orders a frequency table for display.
///
/// - **Primary:** percentage, descending.
/// - **Secondary:** value, ascending, so equal shares list deterministically.
pub fn display_descending(table: &FrequencyTable) -> Vec<(String, f64)> {
    let mut sorted: Vec<(String, f64)> = table
        .iter()
        .map(|(value, share)| (value.clone(), *share))
        .collect();

    sorted.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    sorted
}
