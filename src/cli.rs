use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::ExtractConfig;
use crate::extract::{extract_image, ExtractReport, ImageReport};
use crate::layout::{HgIdent, UrladerLink};

/// Extract every dataspace of an EUMEL 1.8 Hintergrund image into
/// `<task>_<dsid>.ds` files.
///
/// Env: EUMEL_HG_PAGE_SIZE, EUMEL_HG_OUT_DIR, EUMEL_HG_JSON, RUST_LOG.
#[derive(Parser, Debug)]
#[command(
    name = "extract_hintergrund",
    version,
    about = "Extract dataspaces from an EUMEL Hintergrund image",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Hintergrund image file
    pub image: PathBuf,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = ExtractConfig::from_env();
    run_with(&cli.image, &cfg)
}

/// Печать заголовков, полный обход, итог (текстом или одной строкой JSON).
pub fn run_with(image: &Path, cfg: &ExtractConfig) -> Result<()> {
    let report = extract_image(image, cfg, |ident, urlader| {
        print_ident(ident);
        print_urlader(urlader);
    })
    .with_context(|| format!("extract {}", image.display()))?;

    if cfg.json {
        println!("{}", report_json(&report)?);
    } else {
        print_summary(&report.extract, &cfg.out_dir);
    }
    Ok(())
}

/// Отчёт прогона одной строкой JSON (EUMEL_HG_JSON=1).
pub fn report_json(report: &ImageReport) -> Result<String> {
    serde_json::to_string(report).context("serialize run report")
}

fn print_ident(id: &HgIdent) {
    println!("Hintergrund ident:");
    println!("  version    = {}", id.version);
    println!("  shutup     = {} (raw 0x{:02x}, best-effort)", id.is_shutup(), id.shutup);
    println!("  boot_count = {}", id.boot_count);
    println!("  is_plus    = {}", id.is_plus());
    println!("  blocks     = {} (best-effort)", id.blocks());
    println!("    hgblocks2 = {}", id.hgblocks2);
    println!("    hgblocks  = {}", id.hgblocks);
    println!("    plusident = {}", id.plusident);
}

fn print_urlader(u: &UrladerLink) {
    println!("Urlader link:");
    println!("  blocks     = {}", u.blocks);
    println!("  hg_version = {}", u.hg_version);
    println!("  cpu_type   = {:?}", u.cpu_type);
    println!("  urlader    = {}", u.urlader_version);
    println!(
        "  shard      = {}..={}",
        u.shard_version_min, u.shard_version_max
    );
}

fn print_summary(r: &ExtractReport, out_dir: &Path) {
    println!("Extracted into {}:", out_dir.display());
    for t in &r.tasks {
        println!("  task {} @ block {}", t.task_id, t.block);
        for b in &t.banks {
            if let Some(p) = &b.pcb {
                println!(
                    "    pcb taskid {} version {} icount {:x} module {}",
                    p.taskid, p.version, p.icount, p.module
                );
            }
            for d in &b.dataspaces {
                println!("    dsid {:4} #{:<5} -> {}", d.dsid, d.count, d.file);
            }
        }
    }
    println!("  dataspaces = {}", r.dataspaces_written);
    println!("  bytes      = {}", r.bytes_written);
}
