//! extract/engine — обход дерева Hintergrund и восстановление dataspace'ов.
//!
//! Уровни:
//! 1. anchor (page 1) → taskRoot;
//! 2. task root table: слот = task id → таблица dataspace'ов задачи;
//! 3. таблица dataspace'ов: слот = старший полубайт dsid → банк из 16 drinfo
//!    (в банке 0 первые 4 слота заняты pcb);
//! 4. drinfo → 3 прямые страницы, 2 block tables, 2 segment tables (по 14 block tables).
//!
//! Порядок записи артефакта строго фиксирован (см. extract_dataspace). Курсор
//! источника после каждого drinfo явно возвращается за дескриптор, т.к. копировщики
//! сами делают seek.

use std::io::{Read, Seek, Write};

use log::{debug, info};

use super::report::{BankReport, DataspaceReport, ExtractReport, PcbSummary, TaskReport};
use super::sink::{ArtifactStore, CountingWriter, DataspaceId};
use crate::consts::{
    dataspace_size, ANCHOR_PAGE, DS_BANK_SLOTS, DS_DIRECT_BLOCKS, PCB_DRINFO_SLOTS,
    SEGMENT_FANOUT,
};
use crate::copy::{copy_page, copy_table, write_fill_pages};
use crate::error::{HgError, HgResult};
use crate::image::HgImage;
use crate::layout::{Anchor, BlockTable, Drinfo, Pcb, SegmentTable};

/// Обойти все задачи образа и записать каждый живой dataspace в `store`.
pub fn extract_all<R, S>(img: &mut HgImage<R>, store: &mut S) -> HgResult<ExtractReport>
where
    R: Read + Seek,
    S: ArtifactStore,
{
    let ps = img.page_size();
    let mut report = ExtractReport {
        page_size: ps,
        ..ExtractReport::default()
    };

    img.seek_page(ANCHOR_PAGE as u32)?;
    let anchor = Anchor::read_from(img)?;
    if anchor.task_root.is_absent() {
        info!("anchor: task root is a hole, nothing to extract");
        return Ok(report);
    }

    // level 1
    img.seek_page(anchor.task_root.block)?;
    let task_root = BlockTable::read_from(img, ps)?;

    // level 2
    for (task_id, task_ref) in task_root.present() {
        let task_id = task_id as u32;
        info!(
            "task {} is at {} 0x{:x}",
            task_id,
            task_ref.block,
            task_ref.block as u64 * ps as u64
        );
        img.seek_page(task_ref.block)?;
        let banks = BlockTable::read_from(img, ps)?;

        let mut task = TaskReport {
            task_id,
            block: task_ref.block,
            banks: Vec::new(),
        };
        for (high, bank_ref) in banks.present() {
            let bank = extract_bank(img, store, task_id, high as u32, bank_ref.block)?;
            report.dataspaces_written += bank.dataspaces.len() as u64;
            report.bytes_written += bank.dataspaces.iter().map(|d| d.bytes).sum::<u64>();
            task.banks.push(bank);
        }
        report.tasks.push(task);
    }

    info!(
        "extracted {} dataspace(s), {} bytes",
        report.dataspaces_written, report.bytes_written
    );
    Ok(report)
}

/// Level 3: один банк из 16 слотов (pcb + drinfo или только drinfo).
fn extract_bank<R, S>(
    img: &mut HgImage<R>,
    store: &mut S,
    task_id: u32,
    high: u32,
    block: u32,
) -> HgResult<BankReport>
where
    R: Read + Seek,
    S: ArtifactStore,
{
    info!(
        "\ttaskid {} dsid {} is at {} 0x{:x}",
        task_id,
        high << 4,
        block,
        block as u64 * img.page_size() as u64
    );
    img.seek_page(block)?;

    let mut bank = BankReport {
        high,
        block,
        pcb: None,
        dataspaces: Vec::new(),
    };

    let mut drinfo_start = 0;
    if high == 0 {
        let p = Pcb::read_from(img)?;
        let summary = PcbSummary::from(&p);
        info!(
            "\t+pcb taskid {} version {} icount {:x} arith {} disablestop {} iserror {} pbase {:x} module {}",
            summary.taskid,
            summary.version,
            summary.icount,
            summary.arith,
            summary.disablestop,
            summary.iserror,
            summary.pbase,
            summary.module
        );
        bank.pcb = Some(summary);
        drinfo_start = PCB_DRINFO_SLOTS;
    }
    debug!("\t\tdrinfo starting at {:x}", img.mark()?);

    for low in drinfo_start..DS_BANK_SLOTS {
        let d = Drinfo::read_from(img)?;
        let pos = img.mark()?;
        let dsid = low as u32 | high << 4;

        if d.is_live() {
            info!(
                "\t\tdrinfo {} #{} @ {:?}, ind {:?}, ind2 {:?}",
                dsid,
                d.count.block,
                d.blocks.map(|r| r.block),
                d.block_tables.map(|r| r.block),
                d.segment_tables.map(|r| r.block)
            );
            let id = DataspaceId::new(task_id, dsid);
            let bytes = extract_dataspace(img, store, id, &d)?;
            bank.dataspaces
                .push(DataspaceReport::new(dsid, &d, id.file_name(), bytes));
        } else {
            debug!("\t\tdrinfo {} empty (count={:#x})", dsid, d.count.block);
        }

        img.restore(pos)?;
    }

    Ok(bank)
}

/// Level 4: восстановить один dataspace. Возвращает число записанных байт.
///
/// Порядок: 3 прямые страницы; block table 0 без первых 3 слотов; block table 1;
/// для каждой segment table 14 block tables (или 14 * T страниц-заполнителей).
pub fn extract_dataspace<R, S>(
    img: &mut HgImage<R>,
    store: &mut S,
    id: DataspaceId,
    d: &Drinfo,
) -> HgResult<u64>
where
    R: Read + Seek,
    S: ArtifactStore,
{
    let ps = img.page_size();
    let cap = img.table_capacity();
    let mut out = CountingWriter::new(store.create(id)?);

    for r in &d.blocks {
        copy_page(*r, img, &mut out)?;
    }

    // Первые слоты block table 0 уже покрыты прямыми ссылками.
    copy_table(d.block_tables[0], img, &mut out, DS_DIRECT_BLOCKS)?;
    copy_table(d.block_tables[1], img, &mut out, 0)?;

    for seg in &d.segment_tables {
        if seg.is_absent() {
            write_fill_pages(&mut out, SEGMENT_FANOUT * cap, ps)?;
        } else {
            img.seek_page(seg.block)?;
            let table = SegmentTable::read_from(img)?;
            for r in &table.entries {
                copy_table(*r, img, &mut out, 0)?;
            }
        }
    }

    out.flush()?;
    let actual = out.count();
    store.finish(id, out.into_inner())?;

    let expected = dataspace_size(ps);
    if actual != expected {
        return Err(HgError::SizeInvariantViolation {
            task: id.task,
            dsid: id.dsid,
            expected,
            actual,
        });
    }
    Ok(actual)
}
