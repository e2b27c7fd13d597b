//! layout/table — block table (страница ссылок) и segment table (14 ссылок на block tables).

use std::io::{Read, Seek};

use serde::Serialize;

use super::blockref::{parse_ref_array, parse_refs, BlockRef};
use super::common::{SEGTAB_OFF_ENTRIES, SEGTAB_PREFIX_LEN, SEGTAB_SIZE};
use super::{ensure_len, expect_fill, read_record};
use crate::consts::{table_capacity, FILL_BYTE, SEGMENT_FANOUT};
use crate::error::HgResult;

/// Одна страница ссылок. Используется на уровнях task root, dataspace table
/// и косвенных таблиц страниц.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockTable {
    pub entries: Vec<BlockRef>,
}

impl BlockTable {
    pub fn parse(buf: &[u8], at: u64, page_size: u32) -> HgResult<Self> {
        ensure_len(buf, page_size as usize, at)?;
        Ok(Self {
            entries: parse_refs(buf, table_capacity(page_size)),
        })
    }

    pub fn read_from<R: Read + Seek>(r: &mut R, page_size: u32) -> HgResult<Self> {
        let (at, buf) = read_record(r, page_size as usize)?;
        Self::parse(&buf, at, page_size)
    }

    /// (slot, ref) для всех выделенных слотов.
    pub fn present(&self) -> impl Iterator<Item = (usize, BlockRef)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_absent())
            .map(|(i, r)| (i, *r))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentTable {
    pub entries: [BlockRef; SEGMENT_FANOUT],
}

impl SegmentTable {
    /// Префикс из 8 байт 0xFF проверяется, но не интерпретируется.
    pub fn parse(buf: &[u8], at: u64) -> HgResult<Self> {
        ensure_len(buf, SEGTAB_SIZE, at)?;
        expect_fill(buf, 0, SEGTAB_PREFIX_LEN, FILL_BYTE, "segment table", at)?;
        Ok(Self {
            entries: parse_ref_array(&buf[SEGTAB_OFF_ENTRIES..]),
        })
    }

    pub fn read_from<R: Read + Seek>(r: &mut R) -> HgResult<Self> {
        let (at, buf) = read_record(r, SEGTAB_SIZE)?;
        Self::parse(&buf, at)
    }

    pub fn write(&self, out: &mut [u8]) {
        out[..SEGTAB_PREFIX_LEN].fill(FILL_BYTE);
        for (i, r) in self.entries.iter().enumerate() {
            r.write(&mut out[SEGTAB_OFF_ENTRIES + i * 4..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HgError;

    #[test]
    fn block_table_capacity_follows_page_size() {
        let mut page = vec![0xFFu8; 256];
        BlockRef::new(9, 0).write(&mut page[8..]);
        let t = BlockTable::parse(&page, 0, 256).unwrap();
        assert_eq!(t.entries.len(), 64);
        let present: Vec<_> = t.present().collect();
        assert_eq!(present, vec![(2, BlockRef::new(9, 0))]);
    }

    #[test]
    fn segment_table_prefix_checked() {
        let mut entries = [BlockRef::HOLE; SEGMENT_FANOUT];
        entries[13] = BlockRef::new(77, 1);
        let st = SegmentTable { entries };
        let mut buf = vec![0u8; SEGTAB_SIZE];
        st.write(&mut buf);
        assert_eq!(SegmentTable::parse(&buf, 0).unwrap(), st);

        buf[3] = 0x00;
        let err = SegmentTable::parse(&buf, 4096).unwrap_err();
        assert!(matches!(err, HgError::MalformedLayout { record: "segment table", .. }));
    }
}
