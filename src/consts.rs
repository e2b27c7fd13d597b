//! Общие константы формата Hintergrund (EUMEL 1.8).

// -------- Pages --------
/// Размер страницы по умолчанию (байт). Переопределяется через ExtractConfig.
pub const DEFAULT_PAGE_SIZE: u32 = 512;

/// Страница, на которой лежит anchor block.
pub const ANCHOR_PAGE: u64 = 1;

/// Абсолютное смещение Urlader-линка в образе.
pub const URLADER_LINK_OFFSET: u64 = 0x1400;

// -------- Block references --------
/// [block u24 LE][control u8]
pub const BLOCKREF_SIZE: usize = 4;

/// 24-битный номер блока "не выделено" (дыра).
pub const NO_BLOCK: u32 = 0x00FF_FFFF;

/// Заполнитель для отсутствующих страниц и констант-паддингов.
pub const FILL_BYTE: u8 = 0xFF;

// -------- Dataspaces --------
/// Слотов drinfo в одном банке таблицы dataspace'ов.
pub const DS_BANK_SLOTS: usize = 16;

/// Прямых ссылок на страницы в drinfo (страницы 1..3).
pub const DS_DIRECT_BLOCKS: usize = 3;

/// Косвенных ссылок на block table в drinfo.
pub const DS_BLOCK_TABLES: usize = 2;

/// Ссылок на segment table в drinfo.
pub const DS_SEGMENT_TABLES: usize = 2;

/// Ссылок на block table внутри одной segment table.
pub const SEGMENT_FANOUT: usize = 14;

/// Сколько слотов drinfo занимает pcb в банке 0.
pub const PCB_DRINFO_SLOTS: usize = 4;

// -------- Output --------
pub const DS_FILE_EXT: &str = "ds";

/// Ёмкость block table для данного размера страницы.
#[inline]
pub fn table_capacity(page_size: u32) -> usize {
    page_size as usize / BLOCKREF_SIZE
}

/// Фиксированный размер любого восстановленного dataspace'а (байт).
///
/// 3 прямые страницы + (T - 3) + T через block tables, плюс 2 * 14 * T через
/// segment tables, т.е. ровно (2T + 28T) страниц.
#[inline]
pub fn dataspace_size(page_size: u32) -> u64 {
    let t = table_capacity(page_size) as u64;
    (DS_BLOCK_TABLES as u64 * t + DS_SEGMENT_TABLES as u64 * SEGMENT_FANOUT as u64 * t)
        * page_size as u64
}

/// Имя артефакта: `<task:04>_<dsid:04>.ds`.
#[inline]
pub fn dataspace_file_name(task_id: u32, dsid: u32) -> String {
    format!("{:04}_{:04}.{}", task_id, dsid, DS_FILE_EXT)
}
