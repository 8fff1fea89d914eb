//! Character-art images and the on-disk asset set.
//!
//! An image is a grid of optional glyphs; a space in the source file is a
//! transparent cell.  Loading never fails: a missing or unreadable file is
//! logged and replaced by a blank placeholder so the game keeps running.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::entities::EXPLOSION_FRAMES;

/// Size used for a placeholder when the caller asked for no particular size.
pub const PLACEHOLDER_SIZE: (usize, usize) = (10, 5);

pub const PLAYER_FILE: &str = "player.txt";
pub const ENEMY_FILE: &str = "enemy.txt";
pub const BULLET_FILE: &str = "bullet.txt";
pub const EXPLOSION_FILE: &str = "explosion.txt";
pub const BACKGROUND_FILE: &str = "background.txt";

// ── Image ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Option<char>>,
}

impl Image {
    /// Fully transparent image.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width * height],
        }
    }

    /// Parse character art.  Short rows are padded with transparent cells;
    /// trailing blank lines are dropped.
    pub fn from_text(text: &str) -> Self {
        let mut rows: Vec<&str> = text.lines().collect();
        while rows.last().is_some_and(|r| r.trim().is_empty()) {
            rows.pop();
        }
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut pixels = Vec::with_capacity(width * rows.len());
        for row in &rows {
            let mut n = 0;
            for ch in row.chars() {
                pixels.push((ch != ' ').then_some(ch));
                n += 1;
            }
            pixels.extend(std::iter::repeat(None).take(width - n));
        }
        Self {
            width,
            height: rows.len(),
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(Option::is_none)
    }

    /// Glyph at `(x, y)`; `None` when transparent or out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[y * self.width + x]
    }

    /// Nearest-neighbour resample to `width` x `height`.
    pub fn scaled(&self, width: usize, height: usize) -> Image {
        if self.width == 0 || self.height == 0 {
            return Image::blank(width, height);
        }
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            let sy = y * self.height / height;
            for x in 0..width {
                let sx = x * self.width / width;
                pixels.push(self.pixels[sy * self.width + sx]);
            }
        }
        Image {
            width,
            height,
            pixels,
        }
    }

    /// Copy out the `w` x `h` region at `(x, y)`, or `None` if it does not
    /// fit inside the image.
    pub fn subimage(&self, x: usize, y: usize, w: usize, h: usize) -> Option<Image> {
        if x + w > self.width || y + h > self.height {
            return None;
        }
        let mut pixels = Vec::with_capacity(w * h);
        for row in y..y + h {
            let start = row * self.width + x;
            pixels.extend_from_slice(&self.pixels[start..start + w]);
        }
        Some(Image {
            width: w,
            height: h,
            pixels,
        })
    }

    /// Split a horizontal strip into `count` equally wide frames.
    pub fn split_frames(&self, count: usize) -> Option<Vec<Image>> {
        if count == 0 {
            return None;
        }
        let frame_width = self.width / count;
        if frame_width == 0 || self.height == 0 {
            return None;
        }
        (0..count)
            .map(|i| self.subimage(i * frame_width, 0, frame_width, self.height))
            .collect()
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

fn read_image(path: &Path) -> io::Result<Image> {
    let text = fs::read_to_string(path)?;
    let image = Image::from_text(&text);
    if image.width == 0 || image.height == 0 {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "image is empty"));
    }
    Ok(image)
}

/// Load an image, optionally resampled to `scale_to`.  On failure the error
/// is logged and a blank image of `scale_to` (or `PLACEHOLDER_SIZE`) is
/// returned instead.
pub fn load_image(path: &Path, scale_to: Option<(usize, usize)>) -> Image {
    match read_image(path) {
        Ok(image) => match scale_to {
            Some((w, h)) => image.scaled(w, h),
            None => image,
        },
        Err(e) => {
            warn!("Error loading {}: {e}", path.display());
            let (w, h) = scale_to.unwrap_or(PLACEHOLDER_SIZE);
            Image::blank(w, h)
        }
    }
}

/// Load an animation strip of `frames` frames.  A strip that cannot be read
/// or split yields the same number of blank frames.
pub fn load_sheet(path: &Path, frames: usize) -> Vec<Image> {
    let sheet = load_image(path, None);
    match sheet.split_frames(frames) {
        Some(split) => split,
        None => {
            warn!(
                "Error processing frames of {}: {}x{} strip cannot hold {frames} frames",
                path.display(),
                sheet.width(),
                sheet.height()
            );
            vec![Image::blank(PLACEHOLDER_SIZE.0, PLACEHOLDER_SIZE.1); frames]
        }
    }
}

// ── Asset set ─────────────────────────────────────────────────────────────────

/// Every image the game draws, loaded once at startup.
#[derive(Clone, Debug)]
pub struct AssetSet {
    pub player: Image,
    pub enemy: Image,
    pub bullet: Image,
    pub explosion: Vec<Image>,
    pub background: Image,
}

impl AssetSet {
    pub fn load(dir: &Path) -> Self {
        let path = |name: &str| -> PathBuf { dir.join(name) };
        let set = Self {
            player: load_image(&path(PLAYER_FILE), None),
            enemy: load_image(&path(ENEMY_FILE), None),
            bullet: load_image(&path(BULLET_FILE), None),
            explosion: load_sheet(&path(EXPLOSION_FILE), EXPLOSION_FRAMES),
            background: load_image(&path(BACKGROUND_FILE), None),
        };
        info!("Assets loaded from {}", dir.display());
        set
    }

    /// All-blank set, for headless rendering.
    pub fn placeholder() -> Self {
        let (w, h) = PLACEHOLDER_SIZE;
        Self {
            player: Image::blank(w, h),
            enemy: Image::blank(w, h),
            bullet: Image::blank(w, h),
            explosion: vec![Image::blank(w, h); EXPLOSION_FRAMES],
            background: Image::blank(w, h),
        }
    }
}
