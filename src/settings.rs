use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "POJK";
const DEFAULT_OUTDIR: &str = "out";
const DEFAULT_DB_NAME: &str = "ojk.db";

/// Defaults overridable through `POJK_OUTDIR` / `POJK_DB_NAME`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub outdir: PathBuf,
    pub db_name: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("outdir", DEFAULT_OUTDIR)?
            .set_default("db_name", DEFAULT_DB_NAME)?
            .add_source(env)
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
