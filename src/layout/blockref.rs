//! layout/blockref — ссылка на блок [block u24 LE][control u8] и её разрешение.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::consts::{BLOCKREF_SIZE, NO_BLOCK};

/// Ссылка на блок образа.
///
/// `control` пока не интерпретируется, но сохраняется для отладки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlockRef {
    pub block: u32,
    pub control: u8,
}

/// Результат разрешения ссылки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// Дыра: блок не выделен.
    Absent,
    /// Байтовое смещение страницы в образе.
    PageOffset(u64),
}

impl BlockRef {
    /// Дыра в том виде, в каком она лежит на диске (ff ff ff ff).
    pub const HOLE: BlockRef = BlockRef {
        block: NO_BLOCK,
        control: 0xFF,
    };

    pub fn new(block: u32, control: u8) -> Self {
        Self {
            block: block & NO_BLOCK,
            control,
        }
    }

    /// Разобрать ссылку из первых 4 байт `buf`. Вызывающий гарантирует длину.
    #[inline]
    pub fn parse(buf: &[u8]) -> Self {
        Self {
            block: LittleEndian::read_u24(&buf[0..3]),
            control: buf[3],
        }
    }

    /// Записать ссылку в первые 4 байта `out`.
    #[inline]
    pub fn write(&self, out: &mut [u8]) {
        LittleEndian::write_u24(&mut out[0..3], self.block & NO_BLOCK);
        out[3] = self.control;
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        self.block == NO_BLOCK
    }

    /// Absent iff block == 0xFFFFFF, иначе block * page_size.
    #[inline]
    pub fn resolve(&self, page_size: u32) -> Resolved {
        if self.is_absent() {
            Resolved::Absent
        } else {
            Resolved::PageOffset(self.block as u64 * page_size as u64)
        }
    }
}

/// Разобрать `n` подряд лежащих ссылок.
pub(crate) fn parse_refs(buf: &[u8], n: usize) -> Vec<BlockRef> {
    buf.chunks_exact(BLOCKREF_SIZE)
        .take(n)
        .map(BlockRef::parse)
        .collect()
}

/// Разобрать ровно N ссылок в массив.
pub(crate) fn parse_ref_array<const N: usize>(buf: &[u8]) -> [BlockRef; N] {
    let mut out = [BlockRef::HOLE; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = BlockRef::parse(&buf[i * BLOCKREF_SIZE..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_little_endian_24bit() {
        let r = BlockRef::parse(&[0x0a, 0x00, 0x01, 0x7e]);
        assert_eq!(r.block, 0x01000a);
        assert_eq!(r.control, 0x7e);
    }

    #[test]
    fn hole_resolves_absent() {
        let r = BlockRef::parse(&[0xff, 0xff, 0xff, 0x00]);
        assert!(r.is_absent());
        assert_eq!(r.resolve(512), Resolved::Absent);
    }

    #[test]
    fn edge_values_resolve_to_offsets() {
        assert_eq!(BlockRef::new(0, 0).resolve(512), Resolved::PageOffset(0));
        assert_eq!(
            BlockRef::new(0xFF_FFFE, 0).resolve(512),
            Resolved::PageOffset(0xFF_FFFE * 512)
        );
    }

    #[test]
    fn write_then_parse_keeps_control() {
        let mut buf = [0u8; 4];
        BlockRef::new(10, 0x42).write(&mut buf);
        assert_eq!(buf, [10, 0, 0, 0x42]);
        assert_eq!(BlockRef::parse(&buf), BlockRef::new(10, 0x42));
    }
}
