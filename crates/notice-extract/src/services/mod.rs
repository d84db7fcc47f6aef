pub mod assembler;
pub mod batch;
pub mod chain;
pub mod fields;
pub mod geo;
pub mod impact;
pub mod normalize;
pub mod rules;
pub mod schema;

#[allow(unused_imports)]
pub use assembler::{extract_from_text, ExtractOptions, RecordAssembler};
#[allow(unused_imports)]
pub use batch::{BatchEvent, BatchRecord, BatchRunner, BatchSummary};
#[allow(unused_imports)]
pub use geo::{parse_coordinates, Coordinates};
#[allow(unused_imports)]
pub use impact::decompose_impacts;
pub use normalize::NormalizedText;
#[allow(unused_imports)]
pub use rules::{rules_for, DialectRules};
#[allow(unused_imports)]
pub use schema::{split_records, split_records_from, NoticeTables};
