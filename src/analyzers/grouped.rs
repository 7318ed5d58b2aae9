use std::collections::HashMap;

use crate::analyzers::types::GroupAverage;
use crate::analyzers::utility::{NumericFormat, mean, parse_number, stddev};
use crate::error::ParseError;
use crate::record::Record;

/// Mean of the numeric field at `value_index` for each distinct value of the
/// field at `group_index`.
///
/// Groups are returned in the order their value first appears. Install-style
/// values (`"1,000,000+"`) must be requested with [`NumericFormat::Installs`].
/// No outliers are removed, so a few very large apps can dominate a group.
///
/// # Errors
///
/// Returns a [`ParseError`] for the first value that is not numeric after
/// normalization.
pub fn grouped_average(
    records: &[Record],
    group_index: usize,
    value_index: usize,
    format: NumericFormat,
) -> Result<Vec<GroupAverage>, ParseError> {
    let column = value_index.to_string();
    let mut order: Vec<&str> = Vec::new();
    let mut series: HashMap<&str, Vec<f64>> = HashMap::new();

    for record in records {
        let group = record.get(group_index).unwrap_or_default();
        let value = parse_number(record.get(value_index).unwrap_or_default(), format, &column)?;

        series
            .entry(group)
            .or_insert_with(|| {
                order.push(group);
                Vec::new()
            })
            .push(value);
    }

    Ok(order
        .into_iter()
        .map(|group| {
            let values = &series[group];
            let avg = mean(values);
            GroupAverage {
                group: group.to_string(),
                count: values.len(),
                mean: avg,
                stddev: stddev(values, avg),
            }
        })
        .collect())
}

/// Sorts group averages from highest mean to lowest, ties by group name.
pub fn sort_by_mean(mut averages: Vec<GroupAverage>) -> Vec<GroupAverage> {
    averages.sort_by(|a, b| {
        b.mean
            .partial_cmp(&a.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.group.cmp(&b.group))
    });
    averages
}

/// The group with the highest mean, if any.
pub fn top_group(averages: &[GroupAverage]) -> Option<&GroupAverage> {
    averages.iter().max_by(|a, b| {
        a.mean
            .partial_cmp(&b.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.group.cmp(&a.group))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(category: &str, installs: &str) -> Record {
        [category, installs].into_iter().collect()
    }

    #[test]
    fn test_grouped_average_installs() {
        let records = vec![
            app("GAME", "1,000,000+"),
            app("BOOKS", "100+"),
            app("GAME", "500+"),
        ];
        let averages = grouped_average(&records, 0, 1, NumericFormat::Installs).unwrap();

        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].group, "GAME");
        assert_eq!(averages[0].mean, 500_250.0);
        assert_eq!(averages[0].count, 2);
        assert_eq!(averages[1].group, "BOOKS");
        assert_eq!(averages[1].mean, 100.0);
    }

    #[test]
    fn test_grouped_average_plain_counts() {
        let records = vec![app("Navigation", "345046"), app("Navigation", "12")];
        let averages = grouped_average(&records, 0, 1, NumericFormat::Plain).unwrap();
        assert_eq!(averages[0].mean, 172_529.0);
    }

    #[test]
    fn test_grouped_average_plain_rejects_installs_format() {
        let records = vec![app("GAME", "1,000+")];
        assert!(grouped_average(&records, 0, 1, NumericFormat::Plain).is_err());
    }

    #[test]
    fn test_sort_and_top_group() {
        let records = vec![
            app("BOOKS", "100+"),
            app("GAME", "1,000+"),
            app("TOOLS", "10+"),
        ];
        let averages = grouped_average(&records, 0, 1, NumericFormat::Installs).unwrap();

        assert_eq!(top_group(&averages).unwrap().group, "GAME");

        let sorted = sort_by_mean(averages);
        let names: Vec<&str> = sorted.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(names, vec!["GAME", "BOOKS", "TOOLS"]);
    }

    #[test]
    fn test_top_group_empty() {
        assert!(top_group(&[]).is_none());
    }
}
