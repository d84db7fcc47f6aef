//! Text collaborators for the record assembler.
//!
//! PDF text comes from `pdftotext`, scanned notices go through `pdftoppm`
//! and `tesseract`, and the webpage fallback reads the article body of the
//! notice page.

pub mod http;
pub mod ocr;
pub mod pdf;
pub mod tools;
pub mod web;

pub use ocr::TesseractOcr;
pub use pdf::PdfTextSource;
pub use tools::{check_tools, ToolStatus};
pub use web::WebpageTextSource;
