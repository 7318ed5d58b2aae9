use std::path::Path;

use serde::Deserialize;

use crate::cleaner::NON_ASCII_THRESHOLD;
use crate::error::AnalysisError;
use crate::schema::{DatasetProfile, Platform};

/// Tunable cleaning parameters.
///
/// Stored as a JSON object on disk; every key is optional:
/// ```json
/// {
///   "non_ascii_threshold": 3,
///   "rating_min": 0.0,
///   "rating_max": 5.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub non_ascii_threshold: usize,
    pub rating_min: f64,
    pub rating_max: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            non_ascii_threshold: NON_ASCII_THRESHOLD,
            rating_min: 0.0,
            rating_max: 5.0,
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Settings(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AnalysisError> {
        let settings: Settings =
            serde_json::from_str(content).map_err(|e| AnalysisError::Settings(e.to_string()))?;

        if settings.rating_min > settings.rating_max {
            return Err(AnalysisError::Settings(format!(
                "rating_min {} is greater than rating_max {}",
                settings.rating_min, settings.rating_max
            )));
        }

        Ok(settings)
    }

    /// The cleaning profile for `platform` with these settings applied.
    pub fn profile(&self, platform: Platform) -> DatasetProfile {
        platform
            .profile()
            .with_rating_range(self.rating_min, self.rating_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.non_ascii_threshold, 3);
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_json(r#"{"non_ascii_threshold": 0}"#).unwrap();
        assert_eq!(settings.non_ascii_threshold, 0);
        assert_eq!(settings.rating_max, 5.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::from_json(r#"{"threshold": 2}"#).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = Settings::from_json(r#"{"rating_min": 5.0, "rating_max": 1.0}"#);
        assert!(matches!(result, Err(AnalysisError::Settings(_))));
    }

    #[test]
    fn test_profile_applies_rating_range() {
        let settings = Settings::from_json(r#"{"rating_max": 10.0}"#).unwrap();
        let profile = settings.profile(Platform::GooglePlay);
        assert_eq!(profile.integrity.unwrap().max, 10.0);
        assert!(settings.profile(Platform::AppStore).integrity.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Settings::load(Path::new("/nonexistent/settings.json"));
        assert!(matches!(result, Err(AnalysisError::Settings(_))));
    }
}
