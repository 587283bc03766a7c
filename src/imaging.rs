//! Image transforms for task artifacts.
//!
//! Session frames are acquired at 1280×720 and published at 1920×1080.
//! Every canonical task slot gets exactly one output frame: a cropped
//! and resized copy of the source when one exists, an all-white
//! placeholder when it does not.

use std::fs;
use std::path::Path;

use image::imageops::FilterType;
use image::{GenericImageView, Rgb, RgbImage};
use tracing::error;

use crate::error::{ReconcileError, Result};

/// Acquisition rectangle, anchored at the top-left of the source frame.
pub const ACQUIRED_WIDTH: u32 = 1280;
pub const ACQUIRED_HEIGHT: u32 = 720;

/// Canonical output frame.
pub const FRAME_WIDTH: u32 = 1920;
pub const FRAME_HEIGHT: u32 = 1080;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Crop `source` to the acquisition rectangle (clamped to the actual
/// image bounds), resize to the canonical frame, and write it to `dest`,
/// creating destination directories as needed.
///
/// A missing or undecodable source is logged and swallowed: the batch
/// must continue to the next task, and the inventory step has already
/// decided whether this slot counts as missing.
pub fn crop_and_resize(source: &Path, dest: &Path) -> Result<()> {
    let img = match image::open(source) {
        Ok(img) => img,
        Err(e) => {
            error!(source = %source.display(), error = %e, "failed to read source image");
            return Ok(());
        }
    };

    let crop_width = img.width().min(ACQUIRED_WIDTH);
    let crop_height = img.height().min(ACQUIRED_HEIGHT);
    let resized = img
        .crop_imm(0, 0, crop_width, crop_height)
        .resize_exact(FRAME_WIDTH, FRAME_HEIGHT, FilterType::Triangle);

    ensure_parent(dest)?;
    resized.save(dest).map_err(|source| ReconcileError::Image {
        path: dest.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// All-white canonical frame used as the placeholder for missing tasks.
pub fn blank_frame() -> RgbImage {
    RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Rgb([255, 255, 255]))
}

/// Write a placeholder frame to `dest`, creating directories as needed.
pub fn write_blank(dest: &Path) -> Result<()> {
    ensure_parent(dest)?;
    blank_frame().save(dest).map_err(|source| ReconcileError::Image {
        path: dest.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_is_white_at_canonical_size() {
        let frame = blank_frame();
        assert_eq!(frame.dimensions(), (FRAME_WIDTH, FRAME_HEIGHT));
        assert_eq!(frame.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(
            frame.get_pixel(FRAME_WIDTH - 1, FRAME_HEIGHT - 1),
            &Rgb([255, 255, 255])
        );
    }

    #[test]
    fn test_crop_handles_sources_smaller_than_the_acquisition_rect() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("small.png");
        let dest = dir.path().join("out").join("small.png");
        RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]))
            .save(&source)
            .unwrap();

        crop_and_resize(&source, &dest).unwrap();

        let out = image::open(&dest).unwrap();
        assert_eq!(out.width(), FRAME_WIDTH);
        assert_eq!(out.height(), FRAME_HEIGHT);
    }

    #[test]
    fn test_missing_source_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.png");
        crop_and_resize(&dir.path().join("no_such.png"), &dest).unwrap();
        assert!(!dest.exists());
    }
}
