//! Scroll-driven image sequence player.
//!
//! A fixed sequence of still frames is preloaded into a [`FrameStore`]; normalized scroll
//! progress, optionally smoothed by a [`Spring`], selects which frame a [`PlayerController`] draws
//! cover-fitted onto a viewport-sized [`Canvas`].
#![forbid(unsafe_code)]

mod assets;
mod config;
pub mod fade;
mod foundation;
mod player;
mod prepare;
mod render;
mod scroll;

pub use assets::decode::decode_frame;
pub use assets::loader::{FrameLoader, LoadStatus};
pub use assets::source::{FrameSource, FsFrameSource, MemoryFrameSource};
pub use assets::store::{Frame, FrameStore, LoadProgress};
pub use config::{PRELOAD_THREADS_ENV, PlayerConfig, SequenceConfig};
pub use fade::{FadeSample, TextFade, hint_opacity};
pub use foundation::core::{Affine, FrameIndex, Rect, Rgba8Premul, Vec2, Viewport};
pub use foundation::error::{PlayerError, PlayerResult};
pub use player::controller::{PlayerController, PlayerState, PlayerStats};
pub use player::select::select_frame;
pub use prepare::{PrepareOpts, PreparedCopy, prepare_sequence};
pub use render::canvas::{Canvas, CanvasRenderer, FrameRGBA, RenderOutcome};
pub use render::cover::{CoverFit, cover_fit};
pub use scroll::progress::ScrollProgress;
pub use scroll::signal::{Signal, Subscription, SubscriptionId};
pub use scroll::spring::{Spring, SpringConfig};
