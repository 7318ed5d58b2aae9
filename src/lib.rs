pub mod analyzers;
pub mod cleaner;
pub mod error;
pub mod explore;
pub mod loader;
pub mod output;
pub mod record;
pub mod schema;
pub mod settings;

pub use error::{AnalysisError, LoadError, ParseError, SchemaError};
pub use record::{Dataset, Record};
pub use schema::{DatasetProfile, Platform, Role, Schema};
