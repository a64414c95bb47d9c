// src/document/pdf.rs
use std::collections::BTreeMap;

use crate::document::PageSource;
use crate::utils::error::DocumentError;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

// TJ offsets below this (in thousandths of text space) read as a word gap.
const TJ_WORD_GAP: i64 = -100;

/// A decoded PDF transcript.
pub struct PdfDocument {
    inner: Document,
    page_ids: Vec<ObjectId>, // in ascending page-number order
}

impl PdfDocument {
    /// Decodes a PDF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let inner = Document::load_mem(bytes)?;
        // get_pages() is a BTreeMap keyed by page number, so order is stable.
        let page_ids: Vec<ObjectId> = inner.get_pages().into_values().collect();

        if page_ids.is_empty() {
            return Err(DocumentError::Empty("PDF page tree is empty".to_string()));
        }

        tracing::debug!("Loaded PDF with {} pages", page_ids.len());
        Ok(Self { inner, page_ids })
    }

    /// Every string shown on the page, one entry per text-showing operator.
    pub fn page_items(&self, index: usize) -> Result<Vec<String>, DocumentError> {
        let page_id = *self
            .page_ids
            .get(index)
            .ok_or(DocumentError::PageNotFound(index))?;

        let encodings: BTreeMap<Vec<u8>, &str> = self
            .inner
            .get_page_fonts(page_id)
            .into_iter()
            .map(|(name, font)| (name, font.get_font_encoding()))
            .collect();

        let content = Content::decode(&self.inner.get_page_content(page_id)?)?;

        let mut items = Vec::new();
        let mut encoding: Option<&str> = None;
        for operation in &content.operations {
            let shown = match operation.operator.as_str() {
                "Tf" => {
                    encoding = operation
                        .operands
                        .first()
                        .and_then(|font| font.as_name().ok())
                        .and_then(|name| encodings.get(name).copied());
                    continue;
                }
                "Tj" | "TJ" | "'" => operation.operands.first(),
                "\"" => operation.operands.get(2),
                _ => continue,
            };

            let item = match shown {
                Some(Object::String(bytes, _)) => Document::decode_text(encoding, bytes),
                Some(Object::Array(parts)) => decode_tj_array(encoding, parts),
                _ => continue,
            };
            if !item.is_empty() {
                items.push(item);
            }
        }

        tracing::trace!("Page {}: {} text items", index + 1, items.len());
        Ok(items)
    }
}

/// Joins the strings of a TJ array, inserting a space for wide negative offsets.
fn decode_tj_array(encoding: Option<&str>, parts: &[Object]) -> String {
    let mut text = String::new();
    for part in parts {
        match part {
            Object::String(bytes, _) => text.push_str(&Document::decode_text(encoding, bytes)),
            Object::Integer(offset) if *offset < TJ_WORD_GAP => text.push(' '),
            Object::Real(offset) if (*offset as f64) < TJ_WORD_GAP as f64 => text.push(' '),
            _ => {}
        }
    }
    text
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_text(&self, index: usize) -> Result<String, DocumentError> {
        Ok(self.page_items(index)?.join(" "))
    }
}
