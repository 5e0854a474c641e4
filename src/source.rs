use anyhow::{Context, Result};
use image::RgbImage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::info;

/// Ordered supply of frames. `Ok(None)` marks the end of the stream.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

const FRAME_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tif"];

/// Still frames read from a directory in file-name order
pub struct ImageSequence {
    paths: VecDeque<PathBuf>,
}

impl ImageSequence {
    pub fn open(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();

        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read frame directory {}", dir.display()))?
        {
            let path = entry?.path();
            let is_frame = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if path.is_file() && is_frame {
                paths.push(path);
            }
        }

        paths.sort();
        info!("Found {} frames in {}", paths.len(), dir.display());

        Ok(Self {
            paths: paths.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };

        let img = image::ImageReader::open(&path)
            .with_context(|| format!("Failed to open frame {}", path.display()))?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode frame {}: {}", path.display(), e))?;

        Ok(Some(img.to_rgb8()))
    }
}

/// Frames already held in memory
#[derive(Default)]
pub struct InMemoryFrames {
    frames: VecDeque<RgbImage>,
}

impl InMemoryFrames {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl FrameSource for InMemoryFrames {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(self.frames.pop_front())
    }
}
