use crate::error::ParseError;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Share of `part` in `total` as a percentage. Returns 0.0 when `total` is zero.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// How a numeric column is written in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericFormat {
    /// A bare number such as `"21292"` or `"4.5"`.
    #[default]
    Plain,
    /// An install bucket such as `"1,000,000+"`: separators and `+` are stripped.
    Installs,
}

/// Removes thousands separators and open-ended range markers.
pub fn normalize_installs(raw: &str) -> String {
    raw.chars().filter(|c| *c != ',' && *c != '+').collect()
}

/// Parses a numeric field, stripping install formatting when asked to.
pub fn parse_number(raw: &str, format: NumericFormat, column: &str) -> Result<f64, ParseError> {
    let cleaned = match format {
        NumericFormat::Plain => raw.trim().to_string(),
        NumericFormat::Installs => normalize_installs(raw.trim()),
    };

    cleaned.parse::<f64>().map_err(|_| ParseError {
        column: column.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_and_stddev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert_eq!(stddev(&values, m), 2.0);
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(10, 0), 0.0);
        assert_eq!(pct(1, 4), 25.0);
    }

    #[test]
    fn test_normalize_installs() {
        assert_eq!(normalize_installs("1,000,000+"), "1000000");
        assert_eq!(normalize_installs("500+"), "500");
        assert_eq!(normalize_installs("0"), "0");
    }

    #[test]
    fn test_parse_number_installs() {
        assert_eq!(
            parse_number("100,000+", NumericFormat::Installs, "Installs").unwrap(),
            100_000.0
        );
    }

    #[test]
    fn test_parse_number_plain_rejects_install_format() {
        let err = parse_number("1,000+", NumericFormat::Plain, "Reviews").unwrap_err();
        assert_eq!(err.column, "Reviews");
        assert_eq!(err.value, "1,000+");
    }

    #[test]
    fn test_parse_number_rejects_suffix() {
        assert!(parse_number("3.0M", NumericFormat::Plain, "Reviews").is_err());
    }
}
