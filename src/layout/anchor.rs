//! layout/anchor — system anchor block на странице 1.

use std::io::{Read, Seek};

use serde::Serialize;

use super::blockref::BlockRef;
use super::common::{
    ANCHOR_FF_RANGES, ANCHOR_OFF_AKTTAB, ANCHOR_OFF_CLORX, ANCHOR_OFF_TASK_ROOT, ANCHOR_SIZE,
};
use super::{ensure_len, expect_fill, read_record};
use crate::consts::FILL_BYTE;
use crate::error::HgResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub akttab: BlockRef,
    pub clor_x: BlockRef,
    /// Корень дерева задач. Единственное поле, нужное обходу.
    pub task_root: BlockRef,
}

impl Anchor {
    pub fn parse(buf: &[u8], at: u64) -> HgResult<Self> {
        ensure_len(buf, ANCHOR_SIZE, at)?;
        for (start, end) in ANCHOR_FF_RANGES {
            expect_fill(buf, start, end, FILL_BYTE, "anchor", at)?;
        }
        Ok(Self {
            akttab: BlockRef::parse(&buf[ANCHOR_OFF_AKTTAB..]),
            clor_x: BlockRef::parse(&buf[ANCHOR_OFF_CLORX..]),
            task_root: BlockRef::parse(&buf[ANCHOR_OFF_TASK_ROOT..]),
        })
    }

    pub fn read_from<R: Read + Seek>(r: &mut R) -> HgResult<Self> {
        let (at, buf) = read_record(r, ANCHOR_SIZE)?;
        Self::parse(&buf, at)
    }

    /// Сериализовать в 32 байта (для синтетических образов).
    pub fn write(&self, out: &mut [u8]) {
        for (start, end) in ANCHOR_FF_RANGES {
            out[start..end].fill(FILL_BYTE);
        }
        self.akttab.write(&mut out[ANCHOR_OFF_AKTTAB..]);
        self.clor_x.write(&mut out[ANCHOR_OFF_CLORX..]);
        self.task_root.write(&mut out[ANCHOR_OFF_TASK_ROOT..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HgError;

    #[test]
    fn write_then_parse() {
        let a = Anchor {
            akttab: BlockRef::new(5, 0),
            clor_x: BlockRef::HOLE,
            task_root: BlockRef::new(2, 0x10),
        };
        let mut buf = [0u8; ANCHOR_SIZE];
        a.write(&mut buf);
        assert_eq!(Anchor::parse(&buf, 512).unwrap(), a);
    }

    #[test]
    fn reserved_bytes_must_be_ff() {
        let a = Anchor {
            akttab: BlockRef::HOLE,
            clor_x: BlockRef::HOLE,
            task_root: BlockRef::new(2, 0),
        };
        let mut buf = [0u8; ANCHOR_SIZE];
        a.write(&mut buf);
        buf[14] = 0;
        let err = Anchor::parse(&buf, 512).unwrap_err();
        assert!(matches!(err, HgError::MalformedLayout { record: "anchor", offset: 512, .. }));
    }
}
