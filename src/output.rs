use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

pub const REGULATIONS_FILE: &str = "regulations.json";
pub const ARTICLES_FILE: &str = "articles.json";

/// Where one run's artifacts go.
pub struct OutputPaths {
    pub regulations: PathBuf,
    pub articles: PathBuf,
    pub database: PathBuf,
}

impl OutputPaths {
    pub fn new(outdir: &Path, db_name: &str) -> Self {
        OutputPaths {
            regulations: outdir.join(REGULATIONS_FILE),
            articles: outdir.join(ARTICLES_FILE),
            database: outdir.join(db_name),
        }
    }
}

/// Write `value` as two-space indented UTF-8 JSON. Non-ASCII text is kept as is.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {:?}", path))?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
