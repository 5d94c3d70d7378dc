use std::sync::Arc;

use crate::{
    assets::loader::{FrameLoader, LoadStatus},
    assets::source::FrameSource,
    assets::store::{FrameStore, LoadProgress},
    config::PlayerConfig,
    foundation::core::{FrameIndex, Rgba8Premul, Viewport},
    foundation::error::PlayerResult,
    player::select::select_frame,
    render::canvas::{Canvas, CanvasRenderer, RenderOutcome},
    scroll::progress::ScrollProgress,
    scroll::signal::{Signal, Subscription},
};

/// Lifecycle phase of a [`PlayerController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// Frames are still being fetched; nothing is drawn.
    Loading,
    /// Every frame has settled; scroll changes redraw the canvas.
    Ready,
}

/// Counters describing what the controller has drawn so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub renders_drawn: u64,
    pub renders_skipped: u64,
    pub resizes: u64,
}

/// Owns the frame store and the canvas and keeps the canvas in sync with scroll progress.
///
/// All notifications are handled on the thread that calls [`PlayerController::pump`]; the canvas
/// is only written from there.
#[derive(Debug)]
pub struct PlayerController {
    frame_count: u32,
    loader: Option<FrameLoader>,
    store: Option<FrameStore>,
    progress: LoadProgress,
    canvas: Canvas,
    renderer: CanvasRenderer,
    current: Option<FrameIndex>,
    resize_sub: Subscription<Viewport>,
    scroll_sub: Option<Subscription<f64>>,
    stats: PlayerStats,
}

impl PlayerController {
    /// Start preloading and size the canvas to the current viewport.
    ///
    /// Resize notifications are observed from here on, in both states.
    #[tracing::instrument(skip_all, fields(frames = config.sequence.frame_count))]
    pub fn mount(
        config: &PlayerConfig,
        source: Arc<dyn FrameSource>,
        viewport: &mut Signal<Viewport>,
    ) -> PlayerResult<Self> {
        config.validate()?;
        let [r, g, b, a] = config.clear_rgba;
        let canvas = Canvas::new(viewport.get(), Rgba8Premul::from_straight_rgba(r, g, b, a))?;
        let loader =
            FrameLoader::start(&config.sequence, source, config.effective_preload_threads())?;

        Ok(Self {
            frame_count: config.sequence.frame_count,
            progress: loader.progress(),
            loader: Some(loader),
            store: None,
            canvas,
            renderer: CanvasRenderer::new(),
            current: None,
            resize_sub: viewport.subscribe(),
            scroll_sub: None,
            stats: PlayerStats::default(),
        })
    }

    pub fn state(&self) -> PlayerState {
        if self.store.is_some() {
            PlayerState::Ready
        } else {
            PlayerState::Loading
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state() == PlayerState::Loading
    }

    /// Preload progress for a loading indicator.
    pub fn load_progress(&self) -> LoadProgress {
        self.progress
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn store(&self) -> Option<&FrameStore> {
        self.store.as_ref()
    }

    /// Frame most recently selected by scroll progress.
    pub fn current_frame(&self) -> Option<FrameIndex> {
        self.current
    }

    pub fn stats(&self) -> PlayerStats {
        self.stats
    }

    /// Handle everything that happened since the last call: preload settlements, resizes and
    /// smoothed scroll changes, in that order.
    pub fn pump(&mut self, scroll: &mut ScrollProgress) -> PlayerResult<PlayerState> {
        if let Some(mut loader) = self.loader.take() {
            let status = loader.poll(|p| {
                tracing::trace!(percent = p.percent(), "preload progress");
            });
            self.progress = loader.progress();
            match status {
                LoadStatus::Complete(_) => match loader.finish() {
                    Ok(store) => self.enter_ready(store, scroll),
                    Err(loader) => self.loader = Some(loader),
                },
                LoadStatus::Pending(_) => self.loader = Some(loader),
            }
        }

        let resizes: Vec<Viewport> = self.resize_sub.drain().collect();
        for viewport in resizes {
            self.handle_resize(viewport)?;
        }

        if let Some(sub) = &self.scroll_sub {
            let changes: Vec<f64> = sub.drain().collect();
            for progress in changes {
                self.render_progress(progress);
            }
        }

        Ok(self.state())
    }

    /// Block until every frame has settled, then enter [`PlayerState::Ready`].
    ///
    /// `on_progress` observes each settlement. Does nothing once ready.
    pub fn wait_ready(
        &mut self,
        scroll: &mut ScrollProgress,
        mut on_progress: impl FnMut(LoadProgress),
    ) -> PlayerResult<()> {
        if let Some(loader) = self.loader.take() {
            let store = loader.wait(|p| on_progress(p));
            self.progress = store.progress();
            self.enter_ready(store, scroll);
        }
        self.pump(scroll)?;
        Ok(())
    }

    /// Detach from scroll and resize notifications. In-flight fetches are left to finish on
    /// their own and their results are dropped.
    pub fn unmount(self, scroll: &mut ScrollProgress, viewport: &mut Signal<Viewport>) {
        if let Some(sub) = self.scroll_sub {
            scroll.unsubscribe_smoothed(sub);
        }
        viewport.unsubscribe(self.resize_sub);
        tracing::debug!("player unmounted");
    }

    fn enter_ready(&mut self, store: FrameStore, scroll: &mut ScrollProgress) {
        tracing::debug!(
            loaded = store.loaded_count(),
            failed = store.failed_count(),
            "player ready"
        );
        self.progress = store.progress();
        self.store = Some(store);
        self.render_progress(scroll.smoothed());
        self.scroll_sub = Some(scroll.subscribe_smoothed());
    }

    fn handle_resize(&mut self, viewport: Viewport) -> PlayerResult<()> {
        self.canvas.resize(viewport)?;
        self.stats.resizes += 1;
        tracing::debug!(width = viewport.width, height = viewport.height, "canvas resized");
        if let Some(index) = self.current {
            self.render_index(index);
        }
        Ok(())
    }

    fn render_progress(&mut self, progress: f64) {
        let index = select_frame(progress, self.frame_count);
        self.render_index(index);
    }

    fn render_index(&mut self, index: FrameIndex) {
        let Some(store) = &self.store else {
            return;
        };
        self.current = Some(index);
        let outcome = match store.get(index) {
            Some(frame) => self.renderer.render(&mut self.canvas, index, frame),
            None => RenderOutcome::Skipped,
        };
        match outcome {
            RenderOutcome::Drawn(_) => self.stats.renders_drawn += 1,
            RenderOutcome::Skipped => self.stats.renders_skipped += 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/controller.rs"]
mod tests;
