//! Ad-hoc inspection helpers for looking at raw and cleaned rows.

use std::collections::HashSet;

use crate::analyzers::utility::{NumericFormat, mean, parse_number};
use crate::error::ParseError;
use crate::record::Record;

/// A window of rows plus the shape of the whole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exploration<'a> {
    pub rows: &'a [Record],
    pub row_count: usize,
    /// Width of the first row, or 0 for an empty table.
    pub column_count: usize,
}

/// Returns rows `start..end`, clamped to the table.
pub fn explore(records: &[Record], start: usize, end: usize) -> Exploration<'_> {
    let end = end.min(records.len());
    let start = start.min(end);

    Exploration {
        rows: &records[start..end],
        row_count: records.len(),
        column_count: records.first().map_or(0, Record::len),
    }
}

/// `(name, value)` pairs for records in `group` whose value is one of `values`.
///
/// An empty `values` slice selects every record in the group.
pub fn select_in_group(
    records: &[Record],
    name_index: usize,
    group_index: usize,
    group: &str,
    value_index: usize,
    values: &[&str],
) -> Vec<(String, String)> {
    let wanted: HashSet<&str> = values.iter().copied().collect();

    records
        .iter()
        .filter(|record| record.get(group_index) == Some(group))
        .filter_map(|record| {
            let value = record.get(value_index).unwrap_or_default();
            if wanted.is_empty() || wanted.contains(value) {
                let name = record.get(name_index).unwrap_or_default();
                Some((name.to_string(), value.to_string()))
            } else {
                None
            }
        })
        .collect()
}

/// Mean of the numeric field within `group`, counting only values below
/// `ceiling`. Returns `None` when nothing qualifies.
pub fn mean_below(
    records: &[Record],
    group_index: usize,
    group: &str,
    value_index: usize,
    format: NumericFormat,
    ceiling: f64,
) -> Result<Option<f64>, ParseError> {
    let column = value_index.to_string();
    let mut values = Vec::new();

    for record in records.iter().filter(|r| r.get(group_index) == Some(group)) {
        let value = parse_number(record.get(value_index).unwrap_or_default(), format, &column)?;
        if value < ceiling {
            values.push(value);
        }
    }

    if values.is_empty() {
        Ok(None)
    } else {
        Ok(Some(mean(&values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(name: &str, category: &str, installs: &str) -> Record {
        [name, category, installs].into_iter().collect()
    }

    fn catalog() -> Vec<Record> {
        vec![
            app("WhatsApp Messenger", "COMMUNICATION", "1,000,000,000+"),
            app("Skype", "COMMUNICATION", "1,000,000,000+"),
            app("Viber", "COMMUNICATION", "500,000,000+"),
            app("Textra SMS", "COMMUNICATION", "10,000,000+"),
            app("Telegram X", "COMMUNICATION", "5,000,000+"),
            app("Wattpad", "BOOKS_AND_REFERENCE", "100,000,000+"),
        ]
    }

    #[test]
    fn test_explore_shape() {
        let records = catalog();
        let view = explore(&records, 0, 3);

        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.row_count, 6);
        assert_eq!(view.column_count, 3);
    }

    #[test]
    fn test_explore_clamps_range() {
        let records = catalog();
        assert_eq!(explore(&records, 4, 100).rows.len(), 2);
        assert!(explore(&records, 10, 20).rows.is_empty());
        assert_eq!(explore(&[], 0, 3).column_count, 0);
    }

    #[test]
    fn test_select_in_group() {
        let records = catalog();
        let picked = select_in_group(
            &records,
            0,
            1,
            "COMMUNICATION",
            2,
            &["1,000,000,000+", "500,000,000+", "100,000,000+"],
        );

        let names: Vec<&str> = picked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["WhatsApp Messenger", "Skype", "Viber"]);
    }

    #[test]
    fn test_select_in_group_without_values() {
        let records = catalog();
        let picked = select_in_group(&records, 0, 1, "BOOKS_AND_REFERENCE", 2, &[]);
        assert_eq!(
            picked,
            vec![("Wattpad".to_string(), "100,000,000+".to_string())]
        );
    }

    #[test]
    fn test_mean_below() {
        let records = catalog();
        let avg = mean_below(
            &records,
            1,
            "COMMUNICATION",
            2,
            NumericFormat::Installs,
            100_000_000.0,
        )
        .unwrap();

        assert_eq!(avg, Some(7_500_000.0));
    }

    #[test]
    fn test_mean_below_nothing_qualifies() {
        let records = catalog();
        let avg = mean_below(&records, 1, "WEATHER", 2, NumericFormat::Installs, 1.0).unwrap();
        assert_eq!(avg, None);
    }
}
