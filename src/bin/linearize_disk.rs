use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info};

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::PathBuf;

use hintergrund::linearize::linearize;

#[derive(Parser, Debug)]
#[command(
    name = "linearize_disk",
    version,
    about = "Reorder EUMEL archive disk's blocks"
)]
struct Opt {
    /// Enable debugging messages
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
    /// Input file
    input: PathBuf,
    /// Output file
    output: PathBuf,
}

fn main() {
    let opt = Opt::parse();

    let level = if opt.verbose { "debug" } else { "warn" };
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run(&opt) {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run(opt: &Opt) -> Result<()> {
    let mut input = OpenOptions::new()
        .read(true)
        .open(&opt.input)
        .with_context(|| format!("open input {}", opt.input.display()))?;
    let out = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&opt.output)
        .with_context(|| format!("open output {}", opt.output.display()))?;
    let mut out = BufWriter::new(out);

    let stats = linearize(&mut input, &mut out)
        .with_context(|| format!("linearize {}", opt.input.display()))?;
    info!(
        "linearized {} chunk(s), {} bytes written (dropped tail {} bytes)",
        stats.chunks, stats.bytes_written, stats.dropped_tail
    );
    Ok(())
}
