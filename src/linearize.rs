//! linearize — восстановление линейного порядка блоков в архивных образах дискет.
//!
//! В некоторых образах (bitsavers) блоки по 512 байт лежат не по порядку, а
//! переставлены чанками. Выход: все чётные чанки по порядку, затем все нечётные.
//!
//! Размер чанка зависит от формата дискеты:
//! - 1 228 800 (1.2M)         → 15 блоков
//! - 368 640 / 737 280 (360k/720k) → 9 блоков
//! - 819 200 (800k)           → 10 блоков
//! - иначе                    → 15 блоков с предупреждением
//!
//! Хвост, не кратный размеру чанка, отбрасывается (с предупреждением).

use std::io::{Read, Seek, SeekFrom, Write};

use log::{debug, warn};

use crate::error::HgResult;
use crate::image::read_exact_here;

pub const LINEAR_BLOCK_SIZE: u64 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkGeometry {
    pub blocks_per_chunk: u64,
    /// false — размер образа не распознан, взято значение по умолчанию.
    pub known: bool,
}

impl ChunkGeometry {
    pub fn for_image_size(size: u64) -> Self {
        let (blocks_per_chunk, known) = match size {
            1_228_800 => (15, true),
            368_640 | 737_280 => (9, true),
            819_200 => (10, true),
            _ => (15, false),
        };
        Self {
            blocks_per_chunk,
            known,
        }
    }

    #[inline]
    pub fn chunk_size(&self) -> u64 {
        LINEAR_BLOCK_SIZE * self.blocks_per_chunk
    }

    /// Порядок чтения чанков: чётные, затем нечётные.
    pub fn chunk_order(&self, chunks: u64) -> impl Iterator<Item = u64> {
        (0..chunks).step_by(2).chain((1..chunks).step_by(2))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LinearizeStats {
    pub input_size: u64,
    pub chunks: u64,
    pub bytes_written: u64,
    pub dropped_tail: u64,
}

/// Переставить чанки `input` в линейный порядок и записать в `output`.
pub fn linearize<R, W>(input: &mut R, output: &mut W) -> HgResult<LinearizeStats>
where
    R: Read + Seek,
    W: Write,
{
    let size = input.seek(SeekFrom::End(0))?;
    debug!("File size is {} bytes", size);

    let geo = ChunkGeometry::for_image_size(size);
    if !geo.known {
        warn!("Cannot determine blocks per chunk from filesize {}", size);
    }
    let chunk_size = geo.chunk_size();
    let chunks = size / chunk_size;
    let dropped_tail = size % chunk_size;
    if dropped_tail != 0 {
        warn!(
            "File size {} is not multiple of chunk size {}",
            size, chunk_size
        );
    }

    let mut block = vec![0u8; LINEAR_BLOCK_SIZE as usize];
    let mut bytes_written = 0u64;
    for j in geo.chunk_order(chunks) {
        let pos = j * chunk_size;
        debug!(
            "Seeking to {} for chunk {} and reading {} blocks @ {} bytes",
            pos, j, geo.blocks_per_chunk, LINEAR_BLOCK_SIZE
        );
        input.seek(SeekFrom::Start(pos))?;
        for _ in 0..geo.blocks_per_chunk {
            read_exact_here(input, &mut block)?;
            output.write_all(&block)?;
            bytes_written += LINEAR_BLOCK_SIZE;
        }
    }
    output.flush()?;

    Ok(LinearizeStats {
        input_size: size,
        chunks,
        bytes_written,
        dropped_tail,
    })
}
