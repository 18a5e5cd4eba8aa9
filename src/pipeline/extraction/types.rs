use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExtractionError;

/// A decoded upload. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    /// Size of the uploaded file in bytes.
    pub byte_len: usize,
    pub page_count: usize,
    /// Per-page text joined with `\n`, trimmed. Empty when the file has no text layer.
    pub text: String,
}

impl Document {
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Per-page extraction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageExtraction {
    pub page_number: usize,
    pub text: String,
}

/// PDF text extraction abstraction (allows mocking)
pub trait PdfExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError>;
}

/// Join pages in source order and trim the result.
pub fn join_pages(pages: &[PageExtraction]) -> String {
    pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Decode an uploaded document. Only a malformed container is an error;
/// a document without extractable text decodes to an empty string.
pub fn decode_document(
    extractor: &dyn PdfExtractor,
    bytes: &[u8],
) -> Result<Document, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyInput);
    }

    let pages = extractor.extract_pages(bytes)?;
    let text = join_pages(&pages);

    let document = Document {
        id: Uuid::new_v4(),
        byte_len: bytes.len(),
        page_count: pages.len(),
        text,
    };

    tracing::info!(
        doc_id = %document.id,
        pages = document.page_count,
        chars = document.text.chars().count(),
        "Document decoded"
    );
    if !document.has_text() {
        tracing::warn!(doc_id = %document.id, "Document has no extractable text layer");
    }

    Ok(document)
}
