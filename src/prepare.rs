//! One-time preparation of a raw image export into the sequential frame layout.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    config::SequenceConfig,
    foundation::core::FrameIndex,
    foundation::error::{PlayerError, PlayerResult},
};

/// Which raw files are picked up and how they are renamed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrepareOpts {
    /// Only file names ending with this extension are copied; also used for the output names.
    pub extension: String,
    /// Only file names containing this marker are copied.
    pub marker: String,
    /// Output file name prefix.
    pub prefix: String,
}

impl Default for PrepareOpts {
    fn default() -> Self {
        Self {
            extension: ".jpg".to_string(),
            marker: "frame".to_string(),
            prefix: "frame_".to_string(),
        }
    }
}

impl PrepareOpts {
    /// Sequence description matching the files written to `dest`.
    pub fn sequence_for(&self, dest: &Path, frame_count: u32) -> SequenceConfig {
        SequenceConfig {
            base: dest.to_path_buf(),
            prefix: self.prefix.clone(),
            extension: self.extension.clone(),
            frame_count,
        }
    }
}

/// One copied file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedCopy {
    pub index: FrameIndex,
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// Copy matching files from `src` into `dest` as `{prefix}{i}{extension}`.
///
/// Files are ordered by name, so `ezgif-frame-001.jpg` becomes `frame_0.jpg`. `dest` is created
/// when missing; existing files with the same names are overwritten.
#[tracing::instrument(skip(opts))]
pub fn prepare_sequence(
    src: &Path,
    dest: &Path,
    opts: &PrepareOpts,
) -> PlayerResult<Vec<PreparedCopy>> {
    if opts.extension.is_empty() {
        return Err(PlayerError::validation("prepare extension must not be empty"));
    }

    std::fs::create_dir_all(dest)
        .with_context(|| format!("create output dir '{}'", dest.display()))?;

    let entries = std::fs::read_dir(src)
        .with_context(|| format!("list raw image dir '{}'", src.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", src.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(path = %entry.path().display(), "skip non-UTF-8 file name");
            continue;
        };
        if name.ends_with(&opts.extension) && name.contains(&opts.marker) {
            names.push(name);
        }
    }
    names.sort();
    tracing::info!(count = names.len(), "found raw frames");

    let mut out = Vec::with_capacity(names.len());
    for (i, name) in names.into_iter().enumerate() {
        let index = FrameIndex(
            i.try_into()
                .map_err(|_| PlayerError::validation("too many frames"))?,
        );
        let source = src.join(&name);
        let dest_path = dest.join(format!("{}{}{}", opts.prefix, index.0, opts.extension));
        std::fs::copy(&source, &dest_path).with_context(|| {
            format!(
                "copy '{}' -> '{}'",
                source.display(),
                dest_path.display()
            )
        })?;
        tracing::debug!(from = %name, to = %dest_path.display(), "copied frame");
        out.push(PreparedCopy {
            index,
            source,
            dest: dest_path,
        });
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/prepare.rs"]
mod tests;
