//! extract — извлечение dataspace'ов из образа Hintergrund.
//!
//! Подмодули:
//! - engine.rs — обход anchor → task root → банки → drinfo и запись артефактов.
//! - sink.rs   — ArtifactStore (каталог / память) и CountingWriter.
//! - report.rs — сериализуемый отчёт прогона.

pub mod engine;
pub mod report;
pub mod sink;

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use log::{info, warn};

use crate::config::ExtractConfig;
use crate::consts::URLADER_LINK_OFFSET;
use crate::error::HgResult;
use crate::image::HgImage;
use crate::layout::{CpuType, HgIdent, UrladerLink};

pub use engine::{extract_all, extract_dataspace};
pub use report::{BankReport, DataspaceReport, ExtractReport, ImageReport, PcbSummary, TaskReport};
pub use sink::{ArtifactStore, CountingWriter, DataspaceId, DirStore, MemStore};

/// Прочитать identification block (offset 0) и Urlader-линк (0x1400).
///
/// Любое несовпадение сигнатуры — MalformedLayout до начала обхода.
/// Неизвестный тип CPU не ошибка, только предупреждение.
pub fn read_headers<R: Read + Seek>(img: &mut HgImage<R>) -> HgResult<(HgIdent, UrladerLink)> {
    img.seek(SeekFrom::Start(0))?;
    let ident = HgIdent::read_from(img)?;
    img.seek(SeekFrom::Start(URLADER_LINK_OFFSET))?;
    let urlader = UrladerLink::read_from(img)?;
    if let CpuType::Unknown(n) = urlader.cpu_type {
        warn!("urlader: unknown cpu type {}", n);
    }
    Ok((ident, urlader))
}

/// Полный прогон по файлу образа: заголовки, затем обход с записью в cfg.out_dir.
///
/// `on_headers` вызывается после успешного разбора заголовков и до создания
/// первого артефакта.
pub fn extract_image<F>(path: &Path, cfg: &ExtractConfig, on_headers: F) -> HgResult<ImageReport>
where
    F: FnOnce(&HgIdent, &UrladerLink),
{
    cfg.validate()?;
    let mut img = HgImage::open(path, cfg.page_size)?;

    let (ident, urlader) = read_headers(&mut img)?;
    info!(
        "image {}: EUMEL {} ({} blocks, plus={})",
        path.display(),
        ident.version,
        ident.blocks(),
        ident.is_plus()
    );
    on_headers(&ident, &urlader);

    let mut store = DirStore::new(&cfg.out_dir)?;
    let extract = extract_all(&mut img, &mut store)?;

    Ok(ImageReport {
        ident,
        urlader,
        extract,
    })
}
