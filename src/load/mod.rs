//! Document loading
//!
//! Discovers PDF manuals in a directory and extracts their text page by
//! page. Loading is read-only; a file that fails to parse is reported to
//! the caller, which decides whether to skip it.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// One source file with its extracted pages
#[derive(Debug, Clone)]
pub struct Document {
    /// Basename of the originating file (what retrieval attributes to)
    pub file_name: String,

    /// Pages in document order
    pub pages: Vec<Page>,
}

/// One page of extracted text
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number
    pub number: u32,

    /// Raw extracted text
    pub text: String,
}

/// Discover all PDF files directly under `dir`, sorted by file name.
///
/// Returns `Error::NoDocuments` when nothing matches, so an ingestion run
/// aborts before the index is touched.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_pdf(p))
        .collect();

    // Stable input order keeps ingestion runs deterministic
    files.sort();

    if files.is_empty() {
        return Err(Error::NoDocuments(dir.display().to_string()));
    }

    info!("Found {} PDF manual(s) in {}", files.len(), dir.display());
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Load a single PDF into pages with 1-based numbering.
pub fn load_document(path: &Path) -> Result<Document> {
    let file_name = basename(path);
    debug!("Extracting text from {}", path.display());

    let raw_pages = pdf_extract::extract_text_by_pages(path).map_err(|e| Error::PdfLoad {
        file: file_name.clone(),
        reason: e.to_string(),
    })?;

    let pages: Vec<Page> = raw_pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| Page {
            number: (i + 1) as u32,
            text,
        })
        .collect();

    debug!("{}: {} page(s)", file_name, pages.len());

    Ok(Document { file_name, pages })
}

/// Basename of a path, used as the `source_file` attribution key.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
