//! crates/study_hub_core/src/extract.rs
//!
//! Plain-text extraction for the document formats the chat can read.

use crate::filename::extension;

/// The formats the context builder knows how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Txt,
    Pdf,
}

impl TextFormat {
    /// Picks the format from the file's extension, `None` for anything unreadable.
    pub fn from_filename(filename: &str) -> Option<Self> {
        match extension(filename)?.as_str() {
            "txt" => Some(Self::Txt),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid UTF-8 text: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("PDF extraction failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Extracts the text of `bytes` in the given format.
pub fn extract_text(bytes: Vec<u8>, format: TextFormat) -> Result<String, ExtractError> {
    match format {
        TextFormat::Txt => Ok(String::from_utf8(bytes)?),
        TextFormat::Pdf => extract_pdf(&bytes),
    }
}

/// Concatenates the text of every page, in page order.
fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = lopdf::Document::load_mem(bytes)?;
    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        text.push_str(&document.extract_text(&[*page_number])?);
    }
    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a PDF with one page per entry of `pages`, each showing that text.
    pub(crate) fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
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
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn format_follows_extension_case_insensitively() {
        assert_eq!(TextFormat::from_filename("a.txt"), Some(TextFormat::Txt));
        assert_eq!(TextFormat::from_filename("B.PDF"), Some(TextFormat::Pdf));
        assert_eq!(TextFormat::from_filename("essay.docx"), None);
        assert_eq!(TextFormat::from_filename("README"), None);
    }

    #[test]
    fn txt_is_decoded_verbatim() {
        let text = extract_text("line one\nline two ✓".as_bytes().to_vec(), TextFormat::Txt)
            .unwrap();
        assert_eq!(text, "line one\nline two ✓");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let err = extract_text(vec![0xff, 0xfe, 0x00], TextFormat::Txt).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidUtf8(_)));
    }

    #[test]
    fn pdf_pages_are_extracted_in_order() {
        let bytes = pdf_with_pages(&["First page", "Second page"]);
        let text = extract_text(bytes, TextFormat::Pdf).unwrap();
        let first = text.find("First page").expect("first page text");
        let second = text.find("Second page").expect("second page text");
        assert!(first < second);
    }

    #[test]
    fn garbage_pdf_is_an_error() {
        let err = extract_text(b"not a pdf".to_vec(), TextFormat::Pdf).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
