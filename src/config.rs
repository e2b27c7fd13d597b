//! Centralized configuration for the extractor.
//!
//! Goals:
//! - Single place for tunables instead of scattering env lookups.
//! - ExtractConfig::from_env() reads EUMEL_HG_* variables on top of defaults.
//!
//! Env:
//! - EUMEL_HG_PAGE_SIZE — page size in bytes (default 512, legacy 1.8 layout)
//! - EUMEL_HG_OUT_DIR   — directory for .ds artifacts (default ".")
//! - EUMEL_HG_JSON      — print the run report as one JSON line (default off)

use std::path::PathBuf;

use crate::consts::{BLOCKREF_SIZE, DEFAULT_PAGE_SIZE};
use crate::error::{HgError, HgResult};

#[derive(Clone, Debug)]
pub struct ExtractConfig {
    /// Page size in bytes. Shared by the layout decoder and the copiers.
    pub page_size: u32,

    /// Where artifacts are written. Files are truncated on rerun.
    pub out_dir: PathBuf,

    /// Emit the run report as JSON after traversal.
    pub json: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            out_dir: PathBuf::from("."),
            json: false,
        }
    }
}

#[inline]
fn env_flag(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "yes" || s == "on"
}

impl ExtractConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("EUMEL_HG_PAGE_SIZE") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.page_size = n;
            }
        }

        if let Ok(v) = std::env::var("EUMEL_HG_OUT_DIR") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.out_dir = PathBuf::from(s);
            }
        }

        if let Ok(v) = std::env::var("EUMEL_HG_JSON") {
            cfg.json = env_flag(&v);
        }

        cfg
    }

    /// Builder-style override, handy in tests.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Проверка: степень двойки в [64 .. 65536], кратна размеру blockref.
    pub fn validate(&self) -> HgResult<()> {
        validate_page_size(self.page_size)
    }
}

pub fn validate_page_size(page_size: u32) -> HgResult<()> {
    const MIN: u32 = 64;
    const MAX: u32 = 1 << 16;
    if page_size < MIN
        || page_size > MAX
        || !page_size.is_power_of_two()
        || page_size as usize % BLOCKREF_SIZE != 0
    {
        return Err(HgError::InvalidConfig(format!(
            "page_size must be a power of two in [{} .. {}], got {}",
            MIN, MAX, page_size
        )));
    }
    Ok(())
}
