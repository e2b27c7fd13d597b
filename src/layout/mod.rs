//! layout — декодеры фиксированных записей Hintergrund 1.8.
//!
//! Разделение по подмодулям:
//! - common.rs   — размеры записей и offset'ы полей.
//! - blockref.rs — ссылка на блок и её разрешение (Absent | PageOffset).
//! - ident.rs    — identification block (offset 0).
//! - urlader.rs  — Urlader Linkleiste (offset 0x1400).
//! - anchor.rs   — system anchor block (page 1).
//! - table.rs    — block table и segment table.
//! - drinfo.rs   — дескриптор dataspace'а.
//! - pcb.rs      — Leitblock задачи.
//!
//! Каждая запись умеет `parse(buf, at)` (из среза; `at` нужен только для сообщений
//! об ошибках) и `read_from(r)` (ровно SIZE байт с текущей позиции). Seek делает
//! вызывающий.

use std::io::{Read, Seek};

use crate::error::{HgError, HgResult};
use crate::image::read_exact_here;

pub mod common;
pub mod blockref;
pub mod ident;
pub mod urlader;
pub mod anchor;
pub mod table;
pub mod drinfo;
pub mod pcb;

pub use blockref::{BlockRef, Resolved};
pub use ident::HgIdent;
pub use urlader::{CpuType, UrladerLink};
pub use anchor::Anchor;
pub use table::{BlockTable, SegmentTable};
pub use drinfo::Drinfo;
pub use pcb::{Pcb, PcbFlags, PcbHeap};

/// Прочитать `len` байт записи с текущей позиции: (offset, bytes).
pub(crate) fn read_record<R: Read + Seek>(r: &mut R, len: usize) -> HgResult<(u64, Vec<u8>)> {
    let mut buf = vec![0u8; len];
    let at = read_exact_here(r, &mut buf)?;
    Ok((at, buf))
}

/// Проверить, что в срезе хватает байт на запись.
#[inline]
pub(crate) fn ensure_len(buf: &[u8], need: usize, at: u64) -> HgResult<()> {
    if buf.len() < need {
        return Err(HgError::TruncatedSource {
            offset: at,
            wanted: need,
            got: buf.len(),
        });
    }
    Ok(())
}

/// Проверить константное поле: `buf[start..end]` заполнено `byte`.
pub(crate) fn expect_fill(
    buf: &[u8],
    start: usize,
    end: usize,
    byte: u8,
    record: &'static str,
    at: u64,
) -> HgResult<()> {
    if let Some(pos) = buf[start..end].iter().position(|&b| b != byte) {
        let i = start + pos;
        return Err(HgError::malformed(
            record,
            at,
            format!(
                "byte +0x{:x} must be 0x{:02x}, got 0x{:02x}",
                i, byte, buf[i]
            ),
        ));
    }
    Ok(())
}

/// Проверить сигнатуру-литерал.
pub(crate) fn expect_literal(
    buf: &[u8],
    off: usize,
    lit: &[u8],
    record: &'static str,
    at: u64,
) -> HgResult<()> {
    let got = &buf[off..off + lit.len()];
    if got != lit {
        return Err(HgError::malformed(
            record,
            at,
            format!(
                "signature mismatch (expected {:?}, got {:?})",
                String::from_utf8_lossy(lit),
                String::from_utf8_lossy(got)
            ),
        ));
    }
    Ok(())
}
