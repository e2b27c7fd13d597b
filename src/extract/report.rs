//! extract/report — итог прогона: какие задачи/таблицы/dataspace'ы найдены и что записано.

use serde::Serialize;

use crate::layout::{Drinfo, HgIdent, Pcb, UrladerLink};

#[derive(Debug, Clone, Serialize)]
pub struct PcbSummary {
    pub taskid: u16,
    pub version: u16,
    pub icount: u32,
    pub arith: bool,
    pub disablestop: bool,
    pub iserror: bool,
    pub pbase: u8,
    pub module: u16,
}

impl From<&Pcb> for PcbSummary {
    fn from(p: &Pcb) -> Self {
        Self {
            taskid: p.taskid,
            version: p.version,
            icount: p.icount(),
            arith: p.flags.arith,
            disablestop: p.flags.disablestop,
            iserror: p.flags.iserror,
            pbase: p.pbase,
            module: p.module,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DataspaceReport {
    pub dsid: u32,
    pub count: u32,
    pub direct: Vec<u32>,
    pub block_tables: Vec<u32>,
    pub segment_tables: Vec<u32>,
    pub file: String,
    pub bytes: u64,
}

impl DataspaceReport {
    pub fn new(dsid: u32, d: &Drinfo, file: String, bytes: u64) -> Self {
        Self {
            dsid,
            count: d.count.block,
            direct: d.blocks.iter().map(|r| r.block).collect(),
            block_tables: d.block_tables.iter().map(|r| r.block).collect(),
            segment_tables: d.segment_tables.iter().map(|r| r.block).collect(),
            file,
            bytes,
        }
    }
}

/// Одна страница таблицы dataspace'ов задачи (банк из 16 слотов).
#[derive(Debug, Clone, Serialize)]
pub struct BankReport {
    /// Старший полубайт dsid.
    pub high: u32,
    pub block: u32,
    pub pcb: Option<PcbSummary>,
    pub dataspaces: Vec<DataspaceReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub task_id: u32,
    pub block: u32,
    pub banks: Vec<BankReport>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractReport {
    pub page_size: u32,
    pub tasks: Vec<TaskReport>,
    pub dataspaces_written: u64,
    pub bytes_written: u64,
}

/// Полный отчёт по образу: заголовки + обход.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub ident: HgIdent,
    pub urlader: UrladerLink,
    pub extract: ExtractReport,
}
