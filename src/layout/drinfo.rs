//! layout/drinfo — дескриптор dataspace'а (32 байта).
//!
//! [count][3 x direct][2 x block table][2 x segment table], все — blockref.

use std::io::{Read, Seek};

use serde::Serialize;

use super::blockref::{parse_ref_array, BlockRef};
use super::common::{
    DRINFO_OFF_BLOCKS, DRINFO_OFF_BLOCK_TABLES, DRINFO_OFF_COUNT, DRINFO_OFF_SEGMENT_TABLES,
    DRINFO_SIZE,
};
use super::{ensure_len, read_record};
use crate::consts::{DS_BLOCK_TABLES, DS_DIRECT_BLOCKS, DS_SEGMENT_TABLES, NO_BLOCK};
use crate::error::HgResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drinfo {
    /// Число выделенных страниц (в форме blockref).
    pub count: BlockRef,
    /// Прямые ссылки на страницы 1..3.
    pub blocks: [BlockRef; DS_DIRECT_BLOCKS],
    pub block_tables: [BlockRef; DS_BLOCK_TABLES],
    pub segment_tables: [BlockRef; DS_SEGMENT_TABLES],
}

impl Drinfo {
    pub fn parse(buf: &[u8], at: u64) -> HgResult<Self> {
        ensure_len(buf, DRINFO_SIZE, at)?;
        Ok(Self {
            count: BlockRef::parse(&buf[DRINFO_OFF_COUNT..]),
            blocks: parse_ref_array(&buf[DRINFO_OFF_BLOCKS..]),
            block_tables: parse_ref_array(&buf[DRINFO_OFF_BLOCK_TABLES..]),
            segment_tables: parse_ref_array(&buf[DRINFO_OFF_SEGMENT_TABLES..]),
        })
    }

    pub fn read_from<R: Read + Seek>(r: &mut R) -> HgResult<Self> {
        let (at, buf) = read_record(r, DRINFO_SIZE)?;
        Self::parse(&buf, at)
    }

    /// Пустой слот: count == 0 или дыра. Такой dataspace не извлекается.
    pub fn is_live(&self) -> bool {
        self.count.block != 0 && self.count.block != NO_BLOCK
    }

    /// Незанятый слот, как его видит система.
    pub fn empty() -> Self {
        Self {
            count: BlockRef::HOLE,
            blocks: [BlockRef::HOLE; DS_DIRECT_BLOCKS],
            block_tables: [BlockRef::HOLE; DS_BLOCK_TABLES],
            segment_tables: [BlockRef::HOLE; DS_SEGMENT_TABLES],
        }
    }

    pub fn write(&self, out: &mut [u8]) {
        self.count.write(&mut out[DRINFO_OFF_COUNT..]);
        let groups: [(usize, &[BlockRef]); 3] = [
            (DRINFO_OFF_BLOCKS, &self.blocks),
            (DRINFO_OFF_BLOCK_TABLES, &self.block_tables),
            (DRINFO_OFF_SEGMENT_TABLES, &self.segment_tables),
        ];
        for (base, refs) in groups {
            for (i, r) in refs.iter().enumerate() {
                r.write(&mut out[base + i * 4..]);
            }
        }
    }
}
