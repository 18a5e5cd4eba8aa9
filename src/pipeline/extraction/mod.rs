pub mod types;
pub mod pdf;

pub use types::*;
pub use pdf::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Uploaded document is empty")]
    EmptyInput,

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),
}
