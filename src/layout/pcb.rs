//! layout/pcb — Leitblock (process control block) задачи, 128 байт.
//!
//! Лежит только в банке 0 таблицы dataspace'ов и занимает место ровно 4 drinfo.
//!
//! Битовые поля (номера бит — внутри байта, бит 7 = старший):
//! - +5  : bit 7 `unused`, bit 0 `comflag`, биты 6..1 — паддинг.
//! - +11 : bit 7 `iserror`, bit 6 `disablestop`, bit 4 `arith`, bits 1..0 codesegment.
//! - +22 : два байта как 16-битная строка MSB-first (сначала байт +22):
//!         старшие 12 бит `heap.top`, младшие 4 бита `heap.segment`.
//!
//! Best-effort (обратная разработка не завершена):
//! - icount: codesegment считается старшими битами 18-битного счётчика;
//! - heap: порядок байт top/segment не подтверждён;
//! - паддинг перед prio (+40, 2 байта) — размер не подтверждён.

use std::io::{Read, Seek};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::Serialize;
use static_assertions::const_assert_eq;

use super::common::*;
use super::{ensure_len, read_record};
use crate::consts::PCB_DRINFO_SLOTS;
use crate::error::HgResult;

const_assert_eq!(PCB_SIZE, PCB_DRINFO_SLOTS * DRINFO_SIZE);

// Байт +5
const UNKNOWN_BIT_UNUSED: u8 = 1 << 7;
const UNKNOWN_BIT_COMFLAG: u8 = 1 << 0;

// Байт +11
const FLAG_ISERROR: u8 = 1 << 7;
const FLAG_DISABLESTOP: u8 = 1 << 6;
const FLAG_ARITH: u8 = 1 << 4;
const FLAG_CODESEGMENT_MASK: u8 = 0b11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PcbFlags {
    pub iserror: bool,
    pub disablestop: bool,
    pub arith: bool,
    /// 2 бита, bits 1..0.
    pub codesegment: u8,
}

impl PcbFlags {
    pub fn from_byte(b: u8) -> Self {
        Self {
            iserror: b & FLAG_ISERROR != 0,
            disablestop: b & FLAG_DISABLESTOP != 0,
            arith: b & FLAG_ARITH != 0,
            codesegment: b & FLAG_CODESEGMENT_MASK,
        }
    }
}

/// Best-effort: может оказаться обычным 16-битным указателем.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PcbHeap {
    /// 12 бит.
    pub top: u16,
    /// 4 бита.
    pub segment: u8,
}

impl PcbHeap {
    pub fn from_bytes(b: &[u8]) -> Self {
        let raw = BigEndian::read_u16(b);
        Self {
            top: raw >> 4,
            segment: (raw & 0x0F) as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pcb {
    pub wstate: u32,
    pub millis: u8,
    pub unused: bool,
    pub comflag: bool,
    pub status: u8,
    /// Неизвестные флаги статуса.
    pub status_flags: u8,
    pub pricnt: u8,
    /// Младшие 16 бит icount как лежат на диске.
    pub raw_icount: u16,
    pub flags: PcbFlags,
    pub module: u16,
    pub pbase: u8,
    pub c8k: u8,
    pub lbase: u16,
    pub ltop: u16,
    pub ls_top: u16,
    pub heap: PcbHeap,
    pub priclk: u8,
    pub privilege: u8,
    pub linenr: u16,
    pub errorline: u16,
    pub errorcode: u16,
    pub channel: u16,
    pub prio: u16,
    pub msgcode: u16,
    pub msgds: u16,
    pub taskid: u16,
    pub version: u16,
    pub fromid: u32,
}

impl Pcb {
    pub fn parse(buf: &[u8], at: u64) -> HgResult<Self> {
        ensure_len(buf, PCB_SIZE, at)?;
        let u16_at = |off: usize| LittleEndian::read_u16(&buf[off..off + 2]);
        let bits = buf[PCB_OFF_UNKNOWN_BITS];

        Ok(Self {
            wstate: LittleEndian::read_u32(&buf[PCB_OFF_WSTATE..]),
            millis: buf[PCB_OFF_MILLIS],
            unused: bits & UNKNOWN_BIT_UNUSED != 0,
            comflag: bits & UNKNOWN_BIT_COMFLAG != 0,
            status: buf[PCB_OFF_STATUS],
            status_flags: buf[PCB_OFF_STATUS_FLAGS],
            pricnt: buf[PCB_OFF_PRICNT],
            raw_icount: u16_at(PCB_OFF_ICOUNT),
            flags: PcbFlags::from_byte(buf[PCB_OFF_FLAGS]),
            module: u16_at(PCB_OFF_MODULE),
            pbase: buf[PCB_OFF_PBASE],
            c8k: buf[PCB_OFF_C8K],
            lbase: u16_at(PCB_OFF_LBASE),
            ltop: u16_at(PCB_OFF_LTOP),
            ls_top: u16_at(PCB_OFF_LS_TOP),
            heap: PcbHeap::from_bytes(&buf[PCB_OFF_HEAP..PCB_OFF_HEAP + 2]),
            priclk: buf[PCB_OFF_PRICLK],
            privilege: buf[PCB_OFF_PRIV],
            linenr: u16_at(PCB_OFF_LINENR),
            errorline: u16_at(PCB_OFF_ERRORLINE),
            errorcode: u16_at(PCB_OFF_ERRORCODE),
            channel: u16_at(PCB_OFF_CHANNEL),
            prio: u16_at(PCB_OFF_PRIO),
            msgcode: u16_at(PCB_OFF_MSGCODE),
            msgds: u16_at(PCB_OFF_MSGDS),
            taskid: u16_at(PCB_OFF_TASKID),
            version: u16_at(PCB_OFF_VERSION),
            fromid: LittleEndian::read_u32(&buf[PCB_OFF_FROMID..]),
        })
    }

    pub fn read_from<R: Read + Seek>(r: &mut R) -> HgResult<Self> {
        let (at, buf) = read_record(r, PCB_SIZE)?;
        Self::parse(&buf, at)
    }

    /// 18-битный счётчик команд: raw_icount | codesegment << 16 (best-effort).
    pub fn icount(&self) -> u32 {
        self.raw_icount as u32 | (self.flags.codesegment as u32) << 16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcb_occupies_four_descriptors() {
        assert_eq!(PCB_SIZE, 4 * DRINFO_SIZE);
        assert_eq!(PCB_OFF_FROMID + 4 + 8 + 64, PCB_SIZE);
    }

    #[test]
    fn flags_bit_order() {
        let f = PcbFlags::from_byte(0b1101_0010);
        assert!(f.iserror);
        assert!(f.disablestop);
        assert!(f.arith);
        assert_eq!(f.codesegment, 0b10);

        let f = PcbFlags::from_byte(0b0010_1101);
        assert!(!f.iserror);
        assert!(!f.disablestop);
        assert!(!f.arith);
        assert_eq!(f.codesegment, 0b01);
    }

    #[test]
    fn icount_uses_codesegment_as_high_bits() {
        let mut buf = vec![0xFFu8; PCB_SIZE];
        LittleEndian::write_u16(&mut buf[PCB_OFF_ICOUNT..], 0x1234);
        buf[PCB_OFF_FLAGS] = 0b0000_0011;
        let p = Pcb::parse(&buf, 0).unwrap();
        assert_eq!(p.raw_icount, 0x1234);
        assert_eq!(p.icount(), 0x3_1234);
    }

    #[test]
    fn heap_is_msb_first() {
        let h = PcbHeap::from_bytes(&[0xAB, 0xCD]);
        assert_eq!(h.top, 0xABC);
        assert_eq!(h.segment, 0xD);
    }

    #[test]
    fn named_fields_at_their_offsets() {
        let mut buf = vec![0u8; PCB_SIZE];
        buf[PCB_OFF_UNKNOWN_BITS] = 0b1000_0001;
        LittleEndian::write_u16(&mut buf[PCB_OFF_MODULE..], 1500);
        LittleEndian::write_u16(&mut buf[PCB_OFF_TASKID..], 3);
        LittleEndian::write_u16(&mut buf[PCB_OFF_VERSION..], 9);
        LittleEndian::write_u32(&mut buf[PCB_OFF_FROMID..], 0xDEAD_BEEF);
        let p = Pcb::parse(&buf, 0).unwrap();
        assert!(p.unused);
        assert!(p.comflag);
        assert_eq!(p.module, 1500);
        assert_eq!(p.taskid, 3);
        assert_eq!(p.version, 9);
        assert_eq!(p.fromid, 0xDEAD_BEEF);
    }
}
