//! Field extraction, impact decomposition and record assembly for public
//! notices.

#![allow(clippy::should_implement_trait)]

pub mod services;

pub use services::{
    extract_from_text, split_records, split_records_from, BatchEvent, BatchRecord, BatchRunner,
    BatchSummary, ExtractOptions, NormalizedText, NoticeTables, RecordAssembler,
};
