//! layout/ident — первый блок Hintergrund (identification block).
//!
//! Формат (LE, 138 байт):
//! [sig "EUMEL-"][version 6 ascii][pad 1][shutup u8][boot_count u16]
//! [0x24 undocumented][hgblocks2 u16][0x50 unknown][hgblocks u16][plusident u16]

use std::io::{Read, Seek};

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use super::common::{
    IDENT_OFF_BOOT_COUNT, IDENT_OFF_HGBLOCKS, IDENT_OFF_HGBLOCKS2, IDENT_OFF_PLUSIDENT,
    IDENT_OFF_SHUTUP, IDENT_OFF_SIGNATURE, IDENT_OFF_VERSION, IDENT_SIGNATURE, IDENT_SIZE,
    IDENT_VERSION_LEN,
};
use super::{ensure_len, expect_literal, read_record};
use crate::error::HgResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HgIdent {
    /// Версия формата, например "1.8".
    pub version: String,
    /// Сырой байт shutup.
    pub shutup: u8,
    pub boot_count: u16,
    pub hgblocks2: u16,
    pub hgblocks: u16,
    pub plusident: u16,
}

impl HgIdent {
    pub fn parse(buf: &[u8], at: u64) -> HgResult<Self> {
        ensure_len(buf, IDENT_SIZE, at)?;
        expect_literal(buf, IDENT_OFF_SIGNATURE, IDENT_SIGNATURE, "ident", at)?;

        let raw = &buf[IDENT_OFF_VERSION..IDENT_OFF_VERSION + IDENT_VERSION_LEN];
        let version = String::from_utf8_lossy(raw)
            .trim_end_matches(|c| c == '\0' || c == ' ')
            .to_string();

        Ok(Self {
            version,
            shutup: buf[IDENT_OFF_SHUTUP],
            boot_count: LittleEndian::read_u16(&buf[IDENT_OFF_BOOT_COUNT..]),
            hgblocks2: LittleEndian::read_u16(&buf[IDENT_OFF_HGBLOCKS2..]),
            hgblocks: LittleEndian::read_u16(&buf[IDENT_OFF_HGBLOCKS..]),
            plusident: LittleEndian::read_u16(&buf[IDENT_OFF_PLUSIDENT..]),
        })
    }

    pub fn read_from<R: Read + Seek>(r: &mut R) -> HgResult<Self> {
        let (at, buf) = read_record(r, IDENT_SIZE)?;
        Self::parse(&buf, at)
    }

    /// Best-effort: система остановлена штатно, если байт равен 0 (не проверено).
    pub fn is_shutup(&self) -> bool {
        self.shutup == 0
    }

    /// Образ новой "plus"-версии.
    pub fn is_plus(&self) -> bool {
        self.hgblocks == 1 && self.plusident == 0
    }

    /// Best-effort размер Hintergrund в блоках.
    ///
    /// Для не-plus образов берётся hgblocks2; корректность этого fallback не
    /// подтверждена.
    pub fn blocks(&self) -> u16 {
        if self.is_plus() {
            self.hgblocks
        } else {
            self.hgblocks2
        }
    }
}
