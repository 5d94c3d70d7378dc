use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::core::FrameIndex,
    foundation::error::{PlayerError, PlayerResult},
    scroll::spring::SpringConfig,
};

/// Environment variable overriding [`PlayerConfig::preload_threads`].
pub const PRELOAD_THREADS_ENV: &str = "BREWSCROLL_PRELOAD_THREADS";

/// Where the frames of a sequence live and how they are named.
///
/// Frame `i` resolves to `{base}/{prefix}{i}{extension}`, without zero padding.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Directory (or URL-like root) holding the frames.
    pub base: PathBuf,
    /// File name prefix, e.g. `frame_`.
    pub prefix: String,
    /// File extension including the dot, e.g. `.jpg`.
    pub extension: String,
    /// Number of frames; fixed for the lifetime of a player.
    pub frame_count: u32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            base: PathBuf::from("coffee-sequence"),
            prefix: "frame_".to_string(),
            extension: ".jpg".to_string(),
            frame_count: 81,
        }
    }
}

impl SequenceConfig {
    pub fn validate(&self) -> PlayerResult<()> {
        if self.frame_count == 0 {
            return Err(PlayerError::validation("sequence frame_count must be >= 1"));
        }
        Ok(())
    }

    pub fn frame_name(&self, index: FrameIndex) -> String {
        format!("{}{}{}", self.prefix, index.0, self.extension)
    }

    pub fn frame_path(&self, index: FrameIndex) -> PathBuf {
        self.base.join(self.frame_name(index))
    }

    pub fn last_index(&self) -> FrameIndex {
        FrameIndex(self.frame_count.saturating_sub(1))
    }
}

/// Complete player configuration, usually read from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub sequence: SequenceConfig,
    pub spring: SpringConfig,
    /// Canvas clear color, straight-alpha RGBA8.
    pub clear_rgba: [u8; 4],
    /// Worker threads used to fetch and decode frames; `None` lets rayon decide.
    pub preload_threads: Option<usize>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sequence: SequenceConfig::default(),
            spring: SpringConfig::default(),
            clear_rgba: [0, 0, 0, 0],
            preload_threads: None,
        }
    }
}

impl PlayerConfig {
    /// Read a JSON config file. A relative `sequence.base` is resolved against the file's
    /// directory.
    pub fn from_json_path(path: &Path) -> PlayerResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let mut cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| PlayerError::config(format!("parse '{}': {e}", path.display())))?;

        if cfg.sequence.base.is_relative() {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            cfg.sequence.base = dir.join(&cfg.sequence.base);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(json: &str) -> PlayerResult<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| PlayerError::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> PlayerResult<()> {
        self.sequence.validate()?;
        self.spring.validate()?;
        if self.preload_threads == Some(0) {
            return Err(PlayerError::validation(
                "preload_threads must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Thread count for the preload pool, honoring [`PRELOAD_THREADS_ENV`].
    pub fn effective_preload_threads(&self) -> Option<usize> {
        std::env::var(PRELOAD_THREADS_ENV)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .or(self.preload_threads)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
