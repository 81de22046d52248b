// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Append-only result sinks
//!
//! Every record is flushed immediately so an interrupted run still leaves a
//! consistent partial result set on disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub trait ResultSink: Send {
    fn append(&mut self, name: &str) -> std::io::Result<()>;
}

/// Line-per-name text file, truncated on creation
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = BufWriter::new(File::create(&path)?);
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileSink {
    fn append(&mut self, name: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{}", name)?;
        self.writer.flush()
    }
}

/// In-memory sink; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<String> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl ResultSink for MemorySink {
    fn append(&mut self, name: &str) -> std::io::Result<()> {
        self.records
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "sink lock poisoned"))?
            .push(name.to_string());
        Ok(())
    }
}

/// The three outputs of a run
pub struct ResultSinks {
    pub discovered: Box<dyn ResultSink>,
    pub allowed: Box<dyn ResultSink>,
    pub denied: Box<dyn ResultSink>,
}

impl ResultSinks {
    /// `allMutations.txt`-style files inside `directory`
    pub fn files<P: AsRef<Path>>(
        directory: P,
        discovered: &str,
        allowed: &str,
        denied: &str,
    ) -> std::io::Result<Self> {
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory)?;

        Ok(Self {
            discovered: Box::new(FileSink::create(directory.join(discovered))?),
            allowed: Box::new(FileSink::create(directory.join(allowed))?),
            denied: Box::new(FileSink::create(directory.join(denied))?),
        })
    }

    pub fn memory(discovered: &MemorySink, allowed: &MemorySink, denied: &MemorySink) -> Self {
        Self {
            discovered: Box::new(discovered.clone()),
            allowed: Box::new(allowed.clone()),
            denied: Box::new(denied.clone()),
        }
    }
}
