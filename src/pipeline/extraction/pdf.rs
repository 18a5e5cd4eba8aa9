use std::panic::{catch_unwind, AssertUnwindSafe};

use super::types::{PageExtraction, PdfExtractor};
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Reads the embedded text layer of digital PDFs; scanned pages come back empty.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
        // pdf-extract (and its font parsers) can panic on malformed glyph data.
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        }));

        let page_texts = match outcome {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "PDF extraction failed");
                return Err(ExtractionError::PdfParsing(e.to_string()));
            }
            Err(_) => {
                tracing::error!("PDF extraction panicked, likely malformed fonts");
                return Err(ExtractionError::PdfParsing(
                    "decoder panicked on malformed content".into(),
                ));
            }
        };

        Ok(page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageExtraction {
                page_number: i + 1,
                text,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::decode_document;

    /// Build a PDF with one page per entry using lopdf (the library pdf-extract reads with).
    fn make_test_pdf(page_texts: &[&str]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = if text.is_empty() {
                String::new()
            } else {
                format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET")
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extract_text_from_digital_pdf() {
        let pdf_bytes = make_test_pdf(&["Senior Rust Engineer"]);
        let pages = PdfTextExtractor.extract_pages(&pdf_bytes).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        let full_text: String = pages.iter().map(|p| p.text.clone()).collect();
        assert!(
            full_text.contains("Rust") || full_text.contains("Engineer"),
            "Expected resume text, got: {full_text}"
        );
    }

    #[test]
    fn pages_keep_source_order() {
        let pdf_bytes = make_test_pdf(&["Alpha", "Omega"]);
        let doc = decode_document(&PdfTextExtractor, &pdf_bytes).unwrap();

        assert_eq!(doc.page_count, 2);
        let alpha = doc.text.find("Alpha").expect("first page text");
        let omega = doc.text.find("Omega").expect("second page text");
        assert!(alpha < omega);
    }

    #[test]
    fn well_formed_empty_pdf_decodes_to_empty_text() {
        let pdf_bytes = make_test_pdf(&[""]);
        let doc = decode_document(&PdfTextExtractor, &pdf_bytes).unwrap();
        assert_eq!(doc.text, "");
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let result = PdfTextExtractor.extract_pages(b"not a pdf");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }

    #[test]
    fn corrupt_body_never_yields_partial_text() {
        let result = decode_document(&PdfTextExtractor, b"%PDF-1.4\n1 0 obj << /Type /Cat");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }
}
