use std::sync::{Arc, mpsc};

use crate::{
    assets::decode::decode_frame,
    assets::source::FrameSource,
    assets::store::{Frame, FrameStore, LoadProgress},
    config::SequenceConfig,
    foundation::core::FrameIndex,
    foundation::error::{PlayerError, PlayerResult},
};

/// Terminal outcome of one frame request.
struct Settlement {
    index: FrameIndex,
    result: PlayerResult<Frame>,
}

/// Where a [`FrameLoader`] stands after draining its pending settlements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Some requests are still in flight.
    Pending(LoadProgress),
    /// Every request has settled; the store can be taken with [`FrameLoader::finish`].
    Complete(LoadProgress),
}

/// In-flight preload of a frame sequence.
///
/// [`FrameLoader::start`] issues one fetch+decode task per frame on a worker pool without
/// waiting for any of them. Results come back over a channel and are applied by whichever thread
/// owns the loader, either incrementally through [`FrameLoader::poll`] or all at once through
/// [`FrameLoader::wait`]. Dropping the loader abandons outstanding results but does not cancel
/// the tasks.
pub struct FrameLoader {
    frames: Vec<Frame>,
    settled: Vec<bool>,
    progress: LoadProgress,
    rx: mpsc::Receiver<Settlement>,
    _pool: rayon::ThreadPool,
}

impl std::fmt::Debug for FrameLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoader")
            .field("progress", &self.progress)
            .finish()
    }
}

impl FrameLoader {
    pub fn start(
        config: &SequenceConfig,
        source: Arc<dyn FrameSource>,
        threads: Option<usize>,
    ) -> PlayerResult<Self> {
        config.validate()?;
        let pool = build_thread_pool(threads)?;
        let total = config.frame_count;
        let (tx, rx) = mpsc::channel();

        for i in 0..total {
            let index = FrameIndex(i);
            let path = config.frame_path(index);
            let source = Arc::clone(&source);
            let tx = tx.clone();
            pool.spawn(move || {
                let result = source
                    .fetch(index, &path)
                    .and_then(|bytes| decode_frame(&bytes));
                // The loader may already be gone; its results are no longer wanted.
                let _ = tx.send(Settlement { index, result });
            });
        }
        drop(tx);

        tracing::debug!(frames = total, "frame preload started");
        Ok(Self {
            frames: vec![Frame::placeholder(); total as usize],
            settled: vec![false; total as usize],
            progress: LoadProgress::new(total),
            rx,
            _pool: pool,
        })
    }

    pub fn progress(&self) -> LoadProgress {
        self.progress
    }

    pub fn status(&self) -> LoadStatus {
        if self.progress.is_complete() {
            LoadStatus::Complete(self.progress)
        } else {
            LoadStatus::Pending(self.progress)
        }
    }

    /// Apply every settlement that has already arrived, without blocking.
    pub fn poll(&mut self, mut on_progress: impl FnMut(LoadProgress)) -> LoadStatus {
        loop {
            match self.rx.try_recv() {
                Ok(s) => {
                    if self.apply(s) {
                        on_progress(self.progress);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if self.settle_abandoned() > 0 {
                        on_progress(self.progress);
                    }
                    break;
                }
            }
        }
        self.status()
    }

    /// Block until every request has settled and return the finished store.
    pub fn wait(mut self, mut on_progress: impl FnMut(LoadProgress)) -> FrameStore {
        while !self.progress.is_complete() {
            match self.rx.recv() {
                Ok(s) => {
                    if self.apply(s) {
                        on_progress(self.progress);
                    }
                }
                Err(mpsc::RecvError) => {
                    if self.settle_abandoned() > 0 {
                        on_progress(self.progress);
                    }
                }
            }
        }
        self.into_store()
    }

    /// Take the finished store, or get the loader back if requests are still in flight.
    pub fn finish(self) -> Result<FrameStore, Self> {
        if self.progress.is_complete() {
            Ok(self.into_store())
        } else {
            Err(self)
        }
    }

    fn apply(&mut self, s: Settlement) -> bool {
        let i = s.index.as_usize();
        match self.settled.get(i).copied() {
            Some(false) => self.settled[i] = true,
            _ => return false,
        }
        self.progress.settled += 1;

        match s.result {
            Ok(frame) => {
                tracing::debug!(
                    index = s.index.0,
                    width = frame.width(),
                    height = frame.height(),
                    "frame loaded"
                );
                self.frames[i] = frame;
                self.progress.loaded += 1;
            }
            Err(err) => {
                tracing::warn!(index = s.index.0, error = %err, "failed to load frame");
                self.progress.failed += 1;
            }
        }
        true
    }

    /// Every sender is gone: tasks that never reported (a panicking source) count as failed.
    fn settle_abandoned(&mut self) -> u32 {
        let mut n = 0;
        for (i, settled) in self.settled.iter_mut().enumerate() {
            if !*settled {
                *settled = true;
                n += 1;
                tracing::warn!(index = i, "frame task ended without reporting");
            }
        }
        self.progress.settled += n;
        self.progress.failed += n;
        n
    }

    fn into_store(self) -> FrameStore {
        tracing::info!(
            loaded = self.progress.loaded,
            failed = self.progress.failed,
            total = self.progress.total,
            "frame store ready"
        );
        FrameStore::from_parts(self.frames, self.progress)
    }
}

fn build_thread_pool(threads: Option<usize>) -> PlayerResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PlayerError::validation(
            "preload threads must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new()
        .thread_name(|i| format!("brewscroll-preload-{i}"))
        .panic_handler(|_| tracing::error!("frame preload task panicked"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PlayerError::asset(format!("failed to build preload thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
