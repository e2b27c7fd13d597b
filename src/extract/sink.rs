//! extract/sink — куда пишутся восстановленные dataspace'ы.
//!
//! Артефакт открывается (с усечением), пишется строго последовательно и
//! закрывается до начала следующего; одновременно открыт максимум один.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::consts::dataspace_file_name;
use crate::error::HgResult;

/// (task id, dataspace id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DataspaceId {
    pub task: u32,
    pub dsid: u32,
}

impl DataspaceId {
    pub fn new(task: u32, dsid: u32) -> Self {
        Self { task, dsid }
    }

    pub fn file_name(&self) -> String {
        dataspace_file_name(self.task, self.dsid)
    }
}

pub trait ArtifactStore {
    type Writer: Write;

    /// Открыть (и усечь) артефакт.
    fn create(&mut self, id: DataspaceId) -> HgResult<Self::Writer>;

    /// Закрыть артефакт после записи.
    fn finish(&mut self, id: DataspaceId, w: Self::Writer) -> HgResult<()>;
}

/// Файлы `<task:04>_<dsid:04>.ds` в каталоге.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Каталог создаётся при необходимости.
    pub fn new(dir: &Path) -> HgResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, id: DataspaceId) -> PathBuf {
        self.dir.join(id.file_name())
    }
}

impl ArtifactStore for DirStore {
    type Writer = BufWriter<File>;

    fn create(&mut self, id: DataspaceId) -> HgResult<Self::Writer> {
        let path = self.path_for(id);
        let f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        debug!("sink: created {}", path.display());
        Ok(BufWriter::new(f))
    }

    fn finish(&mut self, _id: DataspaceId, mut w: Self::Writer) -> HgResult<()> {
        w.flush()?;
        Ok(())
    }
}

/// Артефакты в памяти (dry-run, тесты).
#[derive(Debug, Default)]
pub struct MemStore {
    pub artifacts: BTreeMap<DataspaceId, Vec<u8>>,
}

impl ArtifactStore for MemStore {
    type Writer = Vec<u8>;

    fn create(&mut self, _id: DataspaceId) -> HgResult<Self::Writer> {
        Ok(Vec::new())
    }

    fn finish(&mut self, id: DataspaceId, w: Self::Writer) -> HgResult<()> {
        self.artifacts.insert(id, w);
        Ok(())
    }
}

/// Writer, считающий прошедшие через него байты.
pub struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_writer_counts() {
        let mut w = CountingWriter::new(Vec::new());
        w.write_all(&[1, 2, 3]).unwrap();
        w.write_all(&[4]).unwrap();
        assert_eq!(w.count(), 4);
        assert_eq!(w.into_inner(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn artifact_names() {
        assert_eq!(DataspaceId::new(3, 0).file_name(), "0003_0000.ds");
        let store = DirStore {
            dir: PathBuf::from("/tmp/x"),
        };
        assert_eq!(
            store.path_for(DataspaceId::new(1, 17)),
            PathBuf::from("/tmp/x/0001_0017.ds")
        );
    }
}
