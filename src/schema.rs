//! Platform profiles and header-bound column access.
//!
//! Each platform export has a fixed column layout. A [`DatasetProfile`]
//! records the position and expected header text of every column the
//! pipeline reads, and [`Schema::bind`] checks those positions against a
//! loaded header once so later stages can look fields up by [`Role`].

use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::record::Record;

/// The two supported catalog exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    GooglePlay,
    AppStore,
}

impl Platform {
    pub fn profile(self) -> DatasetProfile {
        match self {
            Platform::GooglePlay => DatasetProfile::google_play(),
            Platform::AppStore => DatasetProfile::app_store(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::GooglePlay => write!(f, "google_play"),
            Platform::AppStore => write!(f, "app_store"),
        }
    }
}

/// What a column means to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Name,
    Category,
    Rating,
    ReviewCount,
    RatingCount,
    Installs,
    Price,
    Genre,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Name => "name",
            Role::Category => "category",
            Role::Rating => "rating",
            Role::ReviewCount => "review_count",
            Role::RatingCount => "rating_count",
            Role::Installs => "installs",
            Role::Price => "price",
            Role::Genre => "genre",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column the pipeline reads. Negative positions count from the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub role: Role,
    pub header: &'static str,
    pub position: isize,
}

const fn col(role: Role, header: &'static str, position: isize) -> ColumnSpec {
    ColumnSpec {
        role,
        header,
        position,
    }
}

static GOOGLE_PLAY_COLUMNS: &[ColumnSpec] = &[
    col(Role::Name, "App", 0),
    col(Role::Category, "Category", 1),
    col(Role::Rating, "Rating", 2),
    col(Role::ReviewCount, "Reviews", 3),
    col(Role::Installs, "Installs", 5),
    col(Role::Price, "Price", 7),
    col(Role::Genre, "Genres", -4),
];

static APP_STORE_COLUMNS: &[ColumnSpec] = &[
    col(Role::Name, "track_name", 1),
    col(Role::Price, "price", 4),
    col(Role::RatingCount, "rating_count_tot", 5),
    col(Role::Genre, "prime_genre", -5),
];

/// Rows whose rating lies outside `[min, max]` are treated as corrupt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrityRule {
    pub role: Role,
    pub min: f64,
    pub max: f64,
}

/// Columns used to pick one surviving row per app name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupRule {
    pub name: Role,
    pub review_count: Role,
}

/// Everything the cleaner needs to know about one platform's export.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetProfile {
    pub platform: Platform,
    pub columns: &'static [ColumnSpec],
    /// Price text that marks a free app. Compared literally.
    pub free_price: &'static str,
    pub integrity: Option<IntegrityRule>,
    pub dedup: Option<DedupRule>,
}

impl DatasetProfile {
    pub fn google_play() -> Self {
        Self {
            platform: Platform::GooglePlay,
            columns: GOOGLE_PLAY_COLUMNS,
            free_price: "0",
            integrity: Some(IntegrityRule {
                role: Role::Rating,
                min: 0.0,
                max: 5.0,
            }),
            dedup: Some(DedupRule {
                name: Role::Name,
                review_count: Role::ReviewCount,
            }),
        }
    }

    pub fn app_store() -> Self {
        Self {
            platform: Platform::AppStore,
            columns: APP_STORE_COLUMNS,
            free_price: "0.0",
            integrity: None,
            dedup: None,
        }
    }

    /// Overrides the valid rating range, if this profile checks ratings.
    pub fn with_rating_range(mut self, min: f64, max: f64) -> Self {
        if let Some(rule) = self.integrity.as_mut() {
            rule.min = min;
            rule.max = max;
        }
        self
    }
}

/// Column indices resolved against a concrete header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    width: usize,
    indices: HashMap<Role, usize>,
}

impl Schema {
    /// Resolves every column in `profile` against `header`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::PositionOutOfRange`] when a position does not
    /// fit the header, and [`SchemaError::ColumnMismatch`] when the header
    /// text at a position is not the expected column name.
    pub fn bind(header: &Record, profile: &DatasetProfile) -> Result<Self, SchemaError> {
        let width = header.len();
        let mut indices = HashMap::with_capacity(profile.columns.len());

        for spec in profile.columns {
            let index = resolve_position(spec.position, width)?;
            let found = header.get(index).unwrap_or_default();
            if found.trim() != spec.header {
                return Err(SchemaError::ColumnMismatch {
                    index,
                    expected: spec.header.to_string(),
                    found: found.to_string(),
                });
            }
            indices.insert(spec.role, index);
        }

        Ok(Self { width, indices })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn index(&self, role: Role) -> Result<usize, SchemaError> {
        self.indices
            .get(&role)
            .copied()
            .ok_or_else(|| SchemaError::UnboundRole(role.to_string()))
    }

    /// Returns the field for `role`, or an empty string for a short row.
    pub fn field<'r>(&self, record: &'r Record, role: Role) -> Result<&'r str, SchemaError> {
        let index = self.index(role)?;
        Ok(record.get(index).unwrap_or_default())
    }
}

fn resolve_position(position: isize, width: usize) -> Result<usize, SchemaError> {
    let out_of_range = || SchemaError::PositionOutOfRange { position, width };

    if position >= 0 {
        let index = position as usize;
        if index < width { Ok(index) } else { Err(out_of_range()) }
    } else {
        width
            .checked_sub(position.unsigned_abs())
            .ok_or_else(out_of_range)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn google_play_header() -> Record {
        [
            "App",
            "Category",
            "Rating",
            "Reviews",
            "Size",
            "Installs",
            "Type",
            "Price",
            "Content Rating",
            "Genres",
            "Last Updated",
            "Current Ver",
            "Android Ver",
        ]
        .into_iter()
        .collect()
    }

    pub(crate) fn app_store_header() -> Record {
        [
            "id",
            "track_name",
            "size_bytes",
            "currency",
            "price",
            "rating_count_tot",
            "rating_count_ver",
            "user_rating",
            "user_rating_ver",
            "ver",
            "cont_rating",
            "prime_genre",
            "sup_devices.num",
            "ipadSc_urls.num",
            "lang.num",
            "vpp_lic",
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_bind_google_play_resolves_negative_genre() {
        let schema = Schema::bind(&google_play_header(), &DatasetProfile::google_play()).unwrap();
        assert_eq!(schema.index(Role::Genre).unwrap(), 9);
        assert_eq!(schema.index(Role::Price).unwrap(), 7);
        assert_eq!(schema.width(), 13);
    }

    #[test]
    fn test_bind_app_store() {
        let schema = Schema::bind(&app_store_header(), &DatasetProfile::app_store()).unwrap();
        assert_eq!(schema.index(Role::Name).unwrap(), 1);
        assert_eq!(schema.index(Role::Genre).unwrap(), 11);
        assert!(schema.index(Role::Installs).is_err());
    }

    #[test]
    fn test_bind_rejects_reordered_header() {
        let header: Record = ["Category", "App", "Rating", "Reviews", "Size", "Installs"]
            .into_iter()
            .collect();
        let err = Schema::bind(&header, &DatasetProfile::google_play()).unwrap_err();
        assert!(matches!(err, SchemaError::ColumnMismatch { index: 0, .. }));
    }

    #[test]
    fn test_bind_rejects_narrow_header() {
        let header: Record = ["App", "Category"].into_iter().collect();
        let err = Schema::bind(&header, &DatasetProfile::google_play()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::ColumnMismatch { .. } | SchemaError::PositionOutOfRange { .. }
        ));
    }

    #[test]
    fn test_resolve_position() {
        assert_eq!(resolve_position(-1, 3).unwrap(), 2);
        assert_eq!(resolve_position(0, 3).unwrap(), 0);
        assert!(resolve_position(3, 3).is_err());
        assert!(resolve_position(-4, 3).is_err());
    }

    #[test]
    fn test_field_short_row_is_empty() {
        let schema = Schema::bind(&app_store_header(), &DatasetProfile::app_store()).unwrap();
        let record: Record = ["1", "Waze"].into_iter().collect();
        assert_eq!(schema.field(&record, Role::Name).unwrap(), "Waze");
        assert_eq!(schema.field(&record, Role::Price).unwrap(), "");
    }
}
