// src/document/mod.rs
//! Turns a transcript file into the single text string the extractor scans.
pub mod pdf;

pub use pdf::PdfDocument;

use std::path::{Path, PathBuf};

use crate::extractors::{extract_courses, CourseSet};
use crate::utils::error::DocumentError;

/// Anything that can hand out per-page text in reading order.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Text of the page at `index` (zero-based), items joined by single spaces.
    fn page_text(&self, index: usize) -> Result<String, DocumentError>;
}

/// Pages that are already text, e.g. from a `.txt` export or a test.
#[derive(Debug, Clone, Default)]
pub struct TextPages {
    pages: Vec<String>,
}

impl TextPages {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }
}

impl PageSource for TextPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, DocumentError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(DocumentError::PageNotFound(index))
    }
}

/// Joins all pages, in order, with a single space between pages.
pub fn concatenate_pages<S: PageSource + ?Sized>(source: &S) -> Result<String, DocumentError> {
    let mut pages = Vec::with_capacity(source.page_count());
    for index in 0..source.page_count() {
        pages.push(source.page_text(index)?);
    }
    Ok(pages.join(" "))
}

/// Reads a transcript from disk and returns its full text.
///
/// Files ending in `.txt` are taken as already decoded; everything else is
/// decoded as PDF on the blocking pool.
pub async fn load_transcript_text<P: AsRef<Path>>(path: P) -> Result<String, DocumentError> {
    let path: PathBuf = path.as_ref().to_path_buf();
    tracing::info!("Reading transcript from: {}", path.display());

    let bytes = tokio::fs::read(&path).await?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    let is_text = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    let text = if is_text {
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        tokio::task::spawn_blocking(move || {
            let document = PdfDocument::from_bytes(&bytes)?;
            concatenate_pages(&document)
        })
        .await
        .map_err(|e| DocumentError::Task(e.to_string()))??
    };

    tracing::info!("Transcript text ready ({} chars)", text.chars().count());
    Ok(text)
}

/// Loads a transcript and extracts its course records.
pub async fn parse_transcript<P: AsRef<Path>>(path: P) -> Result<CourseSet, DocumentError> {
    let text = load_transcript_text(path).await?;
    Ok(extract_courses(&text))
}
