//! Page-level text extraction from a PDF with `lopdf`.
use std::path::Path;

use lopdf::Document;
use tracing::{debug, info};

use crate::error::{RagError, Result};
use crate::indexer::normalize::normalize;
use crate::models::Page;

/// Extracts normalized text for every page, numbered from 1.
///
/// Pages whose text is empty after normalization are skipped.
pub fn extract_pages(path: &Path) -> Result<Vec<Page>> {
    if !path.exists() {
        return Err(RagError::NotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)
        .map_err(|e| RagError::Pdf(format!("failed to load {}: {e}", path.display())))?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut pages = Vec::with_capacity(page_numbers.len());

    for number in &page_numbers {
        let raw = doc
            .extract_text(&[*number])
            .map_err(|e| RagError::Pdf(format!("page {number}: {e}")))?;
        let text = normalize(&raw);
        if text.is_empty() {
            debug!("Skipping empty page {number}");
            continue;
        }
        pages.push(Page {
            number: *number,
            text,
        });
    }

    info!(
        "Extracted {} non-empty pages of {} from {}",
        pages.len(),
        page_numbers.len(),
        path.display()
    );
    Ok(pages)
}
