//! Data models for notices and their extraction records.

mod dialect;
mod document;
mod extraction;
mod field;
mod impact;

pub use dialect::{Dialect, DialectError};
pub use document::Document;
pub use extraction::{ExtractionResult, SpecialNotice, TextExtractionStatus};
pub use field::{Failure, FieldStatus, FieldValue};
pub use impact::{ImpactCondition, ImpactDuration, ImpactEvent, ImpactUnit};
pub use field::UNKNOWN;
