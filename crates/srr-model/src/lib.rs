pub mod error;
pub mod mapping;
pub mod record;
pub mod schema;
pub mod summary;

pub use error::{MAX_REPORTED_HEADERS, RefineError, Result};
pub use mapping::{ColumnMapping, FallbackColumns, SchemaMapping};
pub use record::{CanonicalRecord, format_numeric};
pub use schema::CanonicalField;
pub use summary::RefineSummary;
