//! image — read-only обёртка над образом Hintergrund.
//!
//! - Каждое чтение делается после явного абсолютного seek; последовательный доступ
//!   между вызовами не предполагается (уровни дерева читаются вперемешку).
//! - Нехватка байт → HgError::TruncatedSource с offset/wanted/got.
//! - mark()/restore() — явное сохранение курсора вокруг спуска в подструктуры.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::config::validate_page_size;
use crate::consts::table_capacity;
use crate::error::{HgError, HgResult};

/// Прочитать сколько получится в `buf` (до EOF), вернуть число байт.
pub(crate) fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut got = 0;
    while got < buf.len() {
        match r.read(&mut buf[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(got)
}

/// Заполнить `buf` целиком с текущей позиции. Возвращает offset начала чтения.
pub(crate) fn read_exact_here<R: Read + Seek>(r: &mut R, buf: &mut [u8]) -> HgResult<u64> {
    let at = r.stream_position()?;
    let got = read_full(r, buf)?;
    if got < buf.len() {
        return Err(HgError::TruncatedSource {
            offset: at,
            wanted: buf.len(),
            got,
        });
    }
    Ok(at)
}

/// Source image with a fixed page size.
pub struct HgImage<R> {
    inner: R,
    page_size: u32,
}

impl HgImage<File> {
    /// Открыть файл образа только на чтение.
    pub fn open(path: &Path, page_size: u32) -> HgResult<Self> {
        let f = OpenOptions::new().read(true).open(path)?;
        debug!("image: opened {} (page_size={})", path.display(), page_size);
        Self::new(f, page_size)
    }
}

impl<R: Read + Seek> HgImage<R> {
    pub fn new(inner: R, page_size: u32) -> HgResult<Self> {
        validate_page_size(page_size)?;
        Ok(Self { inner, page_size })
    }

    #[inline]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Ёмкость block table (ссылок на страницу).
    #[inline]
    pub fn table_capacity(&self) -> usize {
        table_capacity(self.page_size)
    }

    /// Текущая позиция курсора.
    pub fn mark(&mut self) -> HgResult<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Вернуть курсор в сохранённую позицию.
    pub fn restore(&mut self, pos: u64) -> HgResult<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Абсолютный seek на начало страницы `block`. Возвращает байтовое смещение.
    pub fn seek_page(&mut self, block: u32) -> HgResult<u64> {
        let off = block as u64 * self.page_size as u64;
        self.inner.seek(SeekFrom::Start(off))?;
        Ok(off)
    }

    /// Seek на `offset` и чтение ровно `buf.len()` байт.
    pub fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> HgResult<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        read_exact_here(&mut self.inner, buf)?;
        Ok(())
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

// Декодеры layout работают с любым Read + Seek, в том числе с HgImage.
impl<R: Read> Read for HgImage<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Seek> Seek for HgImage<R> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_exact_at_reports_truncation() {
        let mut img = HgImage::new(Cursor::new(vec![7u8; 700]), 512).unwrap();
        let mut page = vec![0u8; 512];
        img.read_exact_at(0, &mut page).unwrap();
        assert!(page.iter().all(|&b| b == 7));

        let err = img.read_exact_at(512, &mut page).unwrap_err();
        match err {
            HgError::TruncatedSource { offset, wanted, got } => {
                assert_eq!(offset, 512);
                assert_eq!(wanted, 512);
                assert_eq!(got, 188);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mark_restore_roundtrip() {
        let mut img = HgImage::new(Cursor::new(vec![0u8; 2048]), 512).unwrap();
        img.seek_page(2).unwrap();
        let pos = img.mark().unwrap();
        assert_eq!(pos, 1024);
        img.seek_page(0).unwrap();
        img.restore(pos).unwrap();
        assert_eq!(img.mark().unwrap(), 1024);
    }

    #[test]
    fn rejects_bad_page_size() {
        assert!(HgImage::new(Cursor::new(Vec::<u8>::new()), 100).is_err());
    }
}
