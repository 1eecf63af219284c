//! Video sources: sequential frame cursors the driver renders from.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use postura_common::error::{PosturaError, PosturaResult};

/// A sequential cursor over the frames of one video.
///
/// The driver renders the frame at the current position, then advances.
/// Rendering overwrites the caller's buffer so a run holds a single frame
/// surface no matter how long the video is.
pub trait VideoSource: Send {
    /// Source name for logging and result records.
    fn name(&self) -> &str;

    /// Total number of frames, when known up front.
    fn frame_count(&self) -> Option<u64>;

    /// Frame dimensions in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Zero-based index of the frame at the current position.
    fn position(&self) -> u64;

    /// Whether playback has moved past the last frame.
    fn ended(&self) -> bool;

    /// Render the frame at the current position into `buffer`.
    fn render_into(&mut self, buffer: &mut RgbImage) -> PosturaResult<()>;

    /// Move to the next frame.
    fn advance(&mut self) -> PosturaResult<()>;
}

/// A fixed number of blank frames, each shaded by its index.
///
/// Used when the detector output is replayed from a log and the pixels
/// themselves do not matter.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    name: String,
    width: u32,
    height: u32,
    frames: u64,
    position: u64,
}

impl SyntheticSource {
    pub fn new(frames: u64, width: u32, height: u32) -> Self {
        Self {
            name: format!("synthetic:{frames}x{width}x{height}"),
            width: width.max(1),
            height: height.max(1),
            frames,
            position: 0,
        }
    }
}

impl VideoSource for SyntheticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn frame_count(&self) -> Option<u64> {
        Some(self.frames)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn ended(&self) -> bool {
        self.position >= self.frames
    }

    fn render_into(&mut self, buffer: &mut RgbImage) -> PosturaResult<()> {
        if self.ended() {
            return Err(PosturaError::source(format!(
                "no frame at position {}",
                self.position
            )));
        }
        if buffer.dimensions() != (self.width, self.height) {
            *buffer = RgbImage::new(self.width, self.height);
        }
        let shade = (self.position % 256) as u8;
        for pixel in buffer.pixels_mut() {
            *pixel = Rgb([shade, shade, shade]);
        }
        Ok(())
    }

    fn advance(&mut self) -> PosturaResult<()> {
        if !self.ended() {
            self.position += 1;
        }
        Ok(())
    }
}

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Frames decoded from a directory of still images, ordered by file name.
///
/// This is the shape an uploaded video takes once it has been split into
/// numbered frames (`frame_0001.png`, `frame_0002.png`, ...).
#[derive(Debug, Clone)]
pub struct ImageSequenceSource {
    name: String,
    files: Vec<PathBuf>,
    dimensions: (u32, u32),
    position: usize,
}

impl ImageSequenceSource {
    /// Scan `dir` for frame images. Fails if the directory holds none.
    pub fn open(dir: &Path) -> PosturaResult<Self> {
        if !dir.is_dir() {
            return Err(PosturaError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_frame = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    FRAME_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                })
                .unwrap_or(false);
            if is_frame && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let first = files.first().ok_or_else(|| {
            PosturaError::source(format!("no frame images found in {}", dir.display()))
        })?;
        let dimensions = image::image_dimensions(first)?;

        tracing::debug!(
            dir = %dir.display(),
            frames = files.len(),
            width = dimensions.0,
            height = dimensions.1,
            "Opened image sequence"
        );

        Ok(Self {
            name: dir.display().to_string(),
            files,
            dimensions,
            position: 0,
        })
    }
}

impl VideoSource for ImageSequenceSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn frame_count(&self) -> Option<u64> {
        Some(self.files.len() as u64)
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn position(&self) -> u64 {
        self.position as u64
    }

    fn ended(&self) -> bool {
        self.position >= self.files.len()
    }

    fn render_into(&mut self, buffer: &mut RgbImage) -> PosturaResult<()> {
        let path = self.files.get(self.position).ok_or_else(|| {
            PosturaError::source(format!("no frame at position {}", self.position))
        })?;

        let decoded = image::open(path)?.to_rgb8();
        if decoded.dimensions() != self.dimensions {
            tracing::warn!(
                frame = self.position,
                path = %path.display(),
                expected = ?self.dimensions,
                actual = ?decoded.dimensions(),
                "Frame size differs from the first frame"
            );
        }

        if decoded.dimensions() == buffer.dimensions() {
            buffer.copy_from_slice(decoded.as_raw());
        } else {
            *buffer = decoded;
        }
        Ok(())
    }

    fn advance(&mut self) -> PosturaResult<()> {
        if !self.ended() {
            self.position += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_source_walks_every_frame_once() {
        let mut source = SyntheticSource::new(3, 8, 4);
        let mut buffer = RgbImage::new(1, 1);
        let mut rendered = Vec::new();

        while !source.ended() {
            source.render_into(&mut buffer).unwrap();
            assert_eq!(buffer.dimensions(), (8, 4));
            rendered.push(buffer.get_pixel(0, 0)[0]);
            source.advance().unwrap();
        }

        assert_eq!(rendered, vec![0, 1, 2]);
        assert!(source.render_into(&mut buffer).is_err());
    }

    #[test]
    fn image_sequence_orders_frames_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for (name, shade) in [("frame_002.png", 20u8), ("frame_001.png", 10), ("notes.txt", 0)] {
            let path = dir.path().join(name);
            if name.ends_with(".png") {
                RgbImage::from_pixel(4, 3, Rgb([shade, shade, shade]))
                    .save(&path)
                    .unwrap();
            } else {
                std::fs::write(&path, "not a frame").unwrap();
            }
        }

        let mut source = ImageSequenceSource::open(dir.path()).unwrap();
        assert_eq!(source.frame_count(), Some(2));
        assert_eq!(source.dimensions(), (4, 3));

        let mut buffer = RgbImage::new(4, 3);
        source.render_into(&mut buffer).unwrap();
        assert_eq!(buffer.get_pixel(0, 0)[0], 10);
        source.advance().unwrap();
        source.render_into(&mut buffer).unwrap();
        assert_eq!(buffer.get_pixel(0, 0)[0], 20);
        source.advance().unwrap();
        assert!(source.ended());
    }

    #[test]
    fn empty_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImageSequenceSource::open(dir.path()),
            Err(PosturaError::Source { .. })
        ));
    }
}
