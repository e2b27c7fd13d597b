//! layout/common — размеры записей и offset'ы полей (все целые LE).

// ---------- Identification block (offset 0) ----------
/// Сигнатура "EUMEL-" (6 байт).
pub const IDENT_SIGNATURE: &[u8; 6] = b"EUMEL-";
pub const IDENT_OFF_SIGNATURE: usize = 0;
/// version: 6 байт ASCII, дополнено NUL/пробелами.
pub const IDENT_OFF_VERSION: usize = 6;
pub const IDENT_VERSION_LEN: usize = 6;
// 1 байт паддинга на 12
/// shutup (u8). Считается "выключено корректно", если 0 (не проверено).
pub const IDENT_OFF_SHUTUP: usize = 13;
pub const IDENT_OFF_BOOT_COUNT: usize = 14;
// 0x24 недокументированных байт на 16
pub const IDENT_OFF_HGBLOCKS2: usize = 0x34;
// 0x50 неизвестных байт на 0x36
pub const IDENT_OFF_HGBLOCKS: usize = 0x86;
pub const IDENT_OFF_PLUSIDENT: usize = 0x88;
pub const IDENT_SIZE: usize = 0x8A;

// ---------- Urlader Linkleiste (offset 0x1400) ----------
/// "EUMEL" + 11 пробелов.
pub const URLADER_SIGNATURE: &[u8; 16] = b"EUMEL           ";
pub const URL_OFF_SIGNATURE: usize = 0;
pub const URL_OFF_BLOCKS: usize = 16;
pub const URL_OFF_HG_VERSION: usize = 18;
pub const URL_OFF_CPU_TYPE: usize = 20;
pub const URL_OFF_URLADER_VERSION: usize = 22;
// 2 байта паддинга на 24
pub const URL_OFF_SHARD_MIN: usize = 26;
pub const URL_OFF_SHARD_MAX: usize = 28;
pub const URLADER_SIZE: usize = 30;

// ---------- Anchor block (page 1) ----------
// [ff*4][akttab][clorX][ff*12][taskRoot][ff*4]
pub const ANCHOR_OFF_AKTTAB: usize = 4;
pub const ANCHOR_OFF_CLORX: usize = 8;
pub const ANCHOR_OFF_TASK_ROOT: usize = 24;
/// Диапазоны, обязанные быть заполнены 0xFF.
pub const ANCHOR_FF_RANGES: [(usize, usize); 3] = [(0, 4), (12, 24), (28, 32)];
pub const ANCHOR_SIZE: usize = 32;

// ---------- Segment table ----------
// [ff*8][14 x blockref]
pub const SEGTAB_PREFIX_LEN: usize = 8;
pub const SEGTAB_OFF_ENTRIES: usize = SEGTAB_PREFIX_LEN;
pub const SEGTAB_SIZE: usize = SEGTAB_PREFIX_LEN + crate::consts::SEGMENT_FANOUT * 4;

// ---------- Dataspace descriptor (drinfo) ----------
pub const DRINFO_OFF_COUNT: usize = 0;
pub const DRINFO_OFF_BLOCKS: usize = 4;
pub const DRINFO_OFF_BLOCK_TABLES: usize = 16;
pub const DRINFO_OFF_SEGMENT_TABLES: usize = 24;
pub const DRINFO_SIZE: usize = 32;

// ---------- Leitblock (pcb) ----------
pub const PCB_OFF_WSTATE: usize = 0;
pub const PCB_OFF_MILLIS: usize = 4;
/// bit 7 unused, bit 0 comflag.
pub const PCB_OFF_UNKNOWN_BITS: usize = 5;
pub const PCB_OFF_STATUS: usize = 6;
pub const PCB_OFF_STATUS_FLAGS: usize = 7;
pub const PCB_OFF_PRICNT: usize = 8;
pub const PCB_OFF_ICOUNT: usize = 9;
/// bit 7 iserror, bit 6 disablestop, bit 4 arith, bits 1..0 codesegment.
pub const PCB_OFF_FLAGS: usize = 11;
/// EUMEL pcb(23) → 0x0c.
pub const PCB_OFF_MODULE: usize = 0x0c;
pub const PCB_OFF_PBASE: usize = 14;
pub const PCB_OFF_C8K: usize = 15;
pub const PCB_OFF_LBASE: usize = 16;
pub const PCB_OFF_LTOP: usize = 18;
pub const PCB_OFF_LS_TOP: usize = 20;
/// 16 бит, читаются MSB-first: top(12) | segment(4).
pub const PCB_OFF_HEAP: usize = 22;
// 4 байта паддинга на 24
pub const PCB_OFF_PRICLK: usize = 28;
pub const PCB_OFF_PRIV: usize = 29;
// 2 байта паддинга на 30
pub const PCB_OFF_LINENR: usize = 32;
pub const PCB_OFF_ERRORLINE: usize = 34;
pub const PCB_OFF_ERRORCODE: usize = 36;
pub const PCB_OFF_CHANNEL: usize = 38;
// 2 байта паддинга на 40 (размер не подтверждён)
pub const PCB_OFF_PRIO: usize = 42;
pub const PCB_OFF_MSGCODE: usize = 44;
pub const PCB_OFF_MSGDS: usize = 46;
pub const PCB_OFF_TASKID: usize = 48;
pub const PCB_OFF_VERSION: usize = 50;
pub const PCB_OFF_FROMID: usize = 52;
// 8 неизвестных байт на 56, затем 64 байта (обычно 0xFF)
pub const PCB_SIZE: usize = 128;
