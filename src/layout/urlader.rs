//! layout/urlader — Urlader Linkleiste (offset 0x1400): версии и тип CPU загрузчика.

use std::io::{Read, Seek};

use byteorder::{ByteOrder, LittleEndian};
use num_enum::FromPrimitive;
use serde::Serialize;

use super::common::{
    URLADER_SIGNATURE, URLADER_SIZE, URL_OFF_BLOCKS, URL_OFF_CPU_TYPE, URL_OFF_HG_VERSION,
    URL_OFF_SHARD_MAX, URL_OFF_SHARD_MIN, URL_OFF_SIGNATURE, URL_OFF_URLADER_VERSION,
};
use super::{ensure_len, expect_literal, read_record};
use crate::error::HgResult;

/// Тип CPU. Поле информационное, поэтому неизвестные значения не ошибка.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, Serialize)]
#[repr(u16)]
pub enum CpuType {
    Z80 = 1,
    Intel8088 = 3,
    M68k = 1024,
    #[num_enum(catch_all)]
    Unknown(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrladerLink {
    pub blocks: u16,
    pub hg_version: u16,
    pub cpu_type: CpuType,
    pub urlader_version: u16,
    pub shard_version_min: u16,
    pub shard_version_max: u16,
}

impl UrladerLink {
    pub fn parse(buf: &[u8], at: u64) -> HgResult<Self> {
        ensure_len(buf, URLADER_SIZE, at)?;
        expect_literal(buf, URL_OFF_SIGNATURE, URLADER_SIGNATURE, "urlader link", at)?;

        Ok(Self {
            blocks: LittleEndian::read_u16(&buf[URL_OFF_BLOCKS..]),
            hg_version: LittleEndian::read_u16(&buf[URL_OFF_HG_VERSION..]),
            cpu_type: CpuType::from_primitive(LittleEndian::read_u16(&buf[URL_OFF_CPU_TYPE..])),
            urlader_version: LittleEndian::read_u16(&buf[URL_OFF_URLADER_VERSION..]),
            shard_version_min: LittleEndian::read_u16(&buf[URL_OFF_SHARD_MIN..]),
            shard_version_max: LittleEndian::read_u16(&buf[URL_OFF_SHARD_MAX..]),
        })
    }

    pub fn read_from<R: Read + Seek>(r: &mut R) -> HgResult<Self> {
        let (at, buf) = read_record(r, URLADER_SIZE)?;
        Self::parse(&buf, at)
    }
}
