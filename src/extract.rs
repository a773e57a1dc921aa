use std::panic::{self, UnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use lopdf::Document;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to load {path:?}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("failed to extract text from page {page}: {message}")]
    Page { page: u32, message: String },

    #[error("pdf-extract failed: {0}")]
    PdfExtract(String),

    #[error("PDF extraction failed: {}", .attempts.join("; "))]
    Exhausted { attempts: Vec<String> },
}

/// A way of turning a document on disk into plain text.
pub trait TextExtractor {
    fn name(&self) -> &'static str;
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Page-by-page extraction through lopdf; pages are joined with a newline.
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let doc = Document::load(path).map_err(|e| ExtractError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let pages = doc.get_pages();
        let pb = ProgressBar::new(pages.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut texts = Vec::with_capacity(pages.len());
        for &page in pages.keys() {
            let text = doc.extract_text(&[page]).map_err(|e| ExtractError::Page {
                page,
                message: e.to_string(),
            })?;
            texts.push(text);
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(texts.join("\n"))
    }
}

/// Whole-document extraction through pdf-extract.
pub struct PdfExtractExtractor;

impl TextExtractor for PdfExtractExtractor {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        // pdf-extract panics on some malformed fonts instead of returning an error
        match catch_quietly(|| pdf_extract::extract_text(path)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractError::PdfExtract(e.to_string())),
            Err(message) => Err(ExtractError::PdfExtract(format!("extractor panicked: {message}"))),
        }
    }
}

static PANIC_HOOK: Mutex<()> = Mutex::new(());

/// Run `f`, turning a panic into its message without the default hook
/// printing it to stderr.
fn catch_quietly<R>(f: impl FnOnce() -> R + UnwindSafe) -> Result<R, String> {
    let _guard = PANIC_HOOK.lock().unwrap_or_else(|e| e.into_inner());
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(f);
    panic::set_hook(hook);

    result.map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string())
    })
}

/// Extract text with the default strategy chain: lopdf, then pdf-extract.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    extract_with_fallback(path, &[&LopdfExtractor, &PdfExtractExtractor])
}

/// Try each strategy in order and return the first success.
pub fn extract_with_fallback(
    path: &Path,
    strategies: &[&dyn TextExtractor],
) -> Result<String, ExtractError> {
    let mut attempts = Vec::new();

    for strategy in strategies {
        match strategy.extract(path) {
            Ok(text) => {
                if text.trim().is_empty() {
                    warn!(
                        "No text extracted from {:?} by {}. It might be a scanned document.",
                        path,
                        strategy.name()
                    );
                }
                info!(strategy = strategy.name(), chars = text.len(), "extracted text");
                return Ok(text);
            }
            Err(e) => {
                warn!("{} failed ({}); trying next extractor", strategy.name(), e);
                attempts.push(format!("{}: {}", strategy.name(), e));
            }
        }
    }

    Err(ExtractError::Exhausted { attempts })
}
