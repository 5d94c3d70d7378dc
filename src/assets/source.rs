use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::foundation::{
    core::FrameIndex,
    error::{PlayerError, PlayerResult},
};

/// Retrieves the encoded bytes of one frame.
///
/// Implementations are called concurrently from preload workers.
pub trait FrameSource: Send + Sync {
    fn fetch(&self, index: FrameIndex, path: &Path) -> PlayerResult<Vec<u8>>;
}

/// Reads frames from the local filesystem, resolving relative paths against `root`.
#[derive(Clone, Debug, Default)]
pub struct FsFrameSource {
    root: PathBuf,
}

impl FsFrameSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FrameSource for FsFrameSource {
    fn fetch(&self, _index: FrameIndex, path: &Path) -> PlayerResult<Vec<u8>> {
        let full = self.root.join(path);
        let bytes =
            std::fs::read(&full).with_context(|| format!("read frame '{}'", full.display()))?;
        Ok(bytes)
    }
}

/// Serves frames embedded in memory, keyed by path.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrameSource {
    frames: HashMap<PathBuf, Arc<Vec<u8>>>,
}

impl MemoryFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.frames.insert(path.into(), Arc::new(bytes));
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for MemoryFrameSource {
    fn fetch(&self, _index: FrameIndex, path: &Path) -> PlayerResult<Vec<u8>> {
        self.frames
            .get(path)
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| PlayerError::asset(format!("no frame at '{}'", path.display())))
    }
}
