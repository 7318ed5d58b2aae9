//! Delimited-file loader for app catalog exports.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::record::{Dataset, Record};

/// Loads a comma-delimited file into a header and its rows.
///
/// Paths ending in `.gz` are decompressed on the fly. Rows whose field count
/// differs from the header are kept as-is; the cleaner decides what to do
/// with them.
///
/// # Errors
///
/// Returns [`LoadError::Decode`] if the file is not valid UTF-8,
/// [`LoadError::Empty`] if there is no header row, and [`LoadError::Io`] if
/// the file cannot be opened.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path)?;

    let is_gzip = path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(is_gzip, "Opening dataset");

    let dataset = if is_gzip {
        read_dataset(GzDecoder::new(file))?
    } else {
        read_dataset(file)?
    };

    info!(
        rows = dataset.rows.len(),
        columns = dataset.width(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Reads a dataset from any byte source. The first row becomes the header.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records();

    let header = match records.next() {
        Some(result) => Record::from(&result?),
        None => return Err(LoadError::Empty),
    };

    let mut rows = Vec::new();
    for result in records {
        rows.push(Record::from(&result?));
    }

    Ok(Dataset::new(header, rows))
}
