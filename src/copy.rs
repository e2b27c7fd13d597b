//! copy — копирование страниц и block tables из образа в поток артефакта.
//!
//! - copy_page:  одна страница; для дыры — страница 0xFF.
//! - copy_table: все страницы таблицы начиная со slot `skip`; для дыры —
//!   (capacity - skip) страниц 0xFF, так что размер вывода не зависит от раскладки.
//!
//! Каждое чтение источника делает явный seek. Позиция источника после вызова
//! не определена: вызывающий сам сохраняет/восстанавливает курсор.

use std::io::{Read, Seek, Write};

use log::trace;

use crate::consts::FILL_BYTE;
use crate::error::HgResult;
use crate::image::HgImage;
use crate::layout::{BlockRef, BlockTable, Resolved};

/// Записать `pages` страниц-заполнителей. Возвращает число байт.
pub fn write_fill_pages<W: Write>(dst: &mut W, pages: usize, page_size: u32) -> HgResult<u64> {
    let fill = vec![FILL_BYTE; page_size as usize];
    for _ in 0..pages {
        dst.write_all(&fill)?;
    }
    Ok(pages as u64 * page_size as u64)
}

/// Скопировать одну страницу. Ровно page_size байт в `dst`.
pub fn copy_page<R: Read + Seek, W: Write>(
    r: BlockRef,
    src: &mut HgImage<R>,
    dst: &mut W,
) -> HgResult<u64> {
    let ps = src.page_size();
    match r.resolve(ps) {
        Resolved::Absent => write_fill_pages(dst, 1, ps),
        Resolved::PageOffset(off) => {
            let mut page = vec![0u8; ps as usize];
            src.read_exact_at(off, &mut page)?;
            dst.write_all(&page)?;
            Ok(ps as u64)
        }
    }
}

/// Скопировать страницы, на которые ссылается block table `r`, начиная со слота `skip`.
pub fn copy_table<R: Read + Seek, W: Write>(
    r: BlockRef,
    src: &mut HgImage<R>,
    dst: &mut W,
    skip: usize,
) -> HgResult<u64> {
    let ps = src.page_size();
    let cap = src.table_capacity();
    match r.resolve(ps) {
        Resolved::Absent => {
            trace!("copy_table: hole, {} fill page(s)", cap.saturating_sub(skip));
            write_fill_pages(dst, cap.saturating_sub(skip), ps)
        }
        Resolved::PageOffset(_) => {
            src.seek_page(r.block)?;
            let table = BlockTable::read_from(src, ps)?;
            let mut written = 0u64;
            for entry in table.entries.iter().skip(skip) {
                written += copy_page(*entry, src, dst)?;
            }
            Ok(written)
        }
    }
}
