//! error — таксономия ошибок ядра извлечения.
//!
//! - MalformedLayout        — константное поле записи не совпало с литералом (фатально).
//! - TruncatedSource        — в образе меньше байт, чем требует запись/страница.
//! - SizeInvariantViolation — размер артефакта не равен расчётному (баг декодера/обхода).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HgError {
    #[error("malformed {record} at offset 0x{offset:x}: {detail}")]
    MalformedLayout {
        record: &'static str,
        offset: u64,
        detail: String,
    },

    #[error("truncated source at offset 0x{offset:x}: wanted {wanted} bytes, got {got}")]
    TruncatedSource { offset: u64, wanted: usize, got: usize },

    #[error(
        "size invariant violated for task {task} dsid {dsid}: expected {expected} bytes, wrote {actual}"
    )]
    SizeInvariantViolation {
        task: u32,
        dsid: u32,
        expected: u64,
        actual: u64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HgResult<T> = std::result::Result<T, HgError>;

impl HgError {
    /// Хелпер для проверок констант в декодерах.
    pub(crate) fn malformed(record: &'static str, offset: u64, detail: impl Into<String>) -> Self {
        HgError::MalformedLayout {
            record,
            offset,
            detail: detail.into(),
        }
    }
}
