//! Image loading, output naming and all-or-nothing writes.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use spray_card_core::{RasterImage, RasterView};

use crate::error::SprayCardError;
use crate::staging::{stage_bytes, StagedFile};

const OUTPUT_SUFFIX: &str = "_analyzed";
const FALLBACK_EXTENSION: &str = "png";

/// Decode an image file into a 1-channel (no color) or 3-channel raster.
///
/// Alpha is dropped and 16-bit / float samples are reduced to 8 bits.
pub fn load_raster(path: impl AsRef<Path>) -> Result<RasterImage, SprayCardError> {
    let path = path.as_ref();
    let invalid = |source| SprayCardError::InvalidImage {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(|e| invalid(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| invalid(image::ImageError::IoError(e)))?
        .decode()
        .map_err(invalid)?;
    log::debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(raster_from_dynamic(&img))
}

pub fn raster_from_dynamic(img: &DynamicImage) -> RasterImage {
    let (width, height) = (img.width() as usize, img.height() as usize);
    if img.color().has_color() {
        RasterImage {
            width,
            height,
            channels: 3,
            data: img.to_rgb8().into_raw(),
        }
    } else {
        RasterImage {
            width,
            height,
            channels: 1,
            data: img.to_luma8().into_raw(),
        }
    }
}

/// Expand a 1- or 3-channel raster into an RGB image for drawing.
///
/// Returns `None` for other channel counts or inconsistent buffers.
pub fn rgb_from_raster(src: &RasterView<'_>) -> Option<RgbImage> {
    let (w, h) = (u32::try_from(src.width).ok()?, u32::try_from(src.height).ok()?);
    let data = match src.channels {
        3 => src.data.to_vec(),
        1 => src.data.iter().flat_map(|&v| [v, v, v]).collect(),
        _ => return None,
    };
    RgbImage::from_raw(w, h, data)
}

fn writable_format(path: &Path) -> Option<ImageFormat> {
    ImageFormat::from_path(path)
        .ok()
        .filter(|f| f.writing_enabled())
}

/// `<dir>/<stem>_analyzed.<ext>` next to `input`.
///
/// The input extension is kept when it names a format that can be encoded,
/// otherwise `.png` is used.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "spray_card".to_string());
    let ext = input
        .extension()
        .filter(|_| writable_format(input).is_some())
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{ext}"))
}

/// Resolve the output path for `input`.
///
/// A bare file name override lands next to the input; an override that
/// carries a directory is used as given.
pub fn resolve_output_path(input: &Path, output_filename: Option<&str>) -> PathBuf {
    match output_filename {
        None => default_output_path(input),
        Some(name) => {
            let name = Path::new(name);
            let has_dir = name
                .parent()
                .is_some_and(|p| !p.as_os_str().is_empty());
            if has_dir || name.is_absolute() {
                name.to_path_buf()
            } else {
                input.with_file_name(name)
            }
        }
    }
}

/// Encode `img` in the format implied by `path` into a staged temp file.
///
/// Nothing appears at `path` until the returned file is persisted.
pub(crate) fn stage_image(img: &RgbImage, path: &Path) -> Result<StagedFile, SprayCardError> {
    let format = writable_format(path).ok_or_else(|| SprayCardError::UnsupportedOutputFormat {
        path: path.to_path_buf(),
    })?;

    let mut encoded = Cursor::new(Vec::new());
    img.write_to(&mut encoded, format)
        .map_err(|source| SprayCardError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

    let staged = stage_bytes(encoded.get_ref(), path).map_err(|source| SprayCardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "staged {} bytes for {}",
        encoded.get_ref().len(),
        path.display()
    );
    Ok(staged)
}

/// Encode `img` in the format implied by `path` and write it atomically.
///
/// The bytes go to a temp file in the destination directory, which is then
/// renamed over `path`. On any failure nothing is left at `path`. The
/// destination directory must exist.
pub fn write_image_atomic(img: &RgbImage, path: &Path) -> Result<(), SprayCardError> {
    stage_image(img, path)?
        .persist()
        .map_err(|source| SprayCardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_keeps_encodable_extension() {
        assert_eq!(
            default_output_path(Path::new("/cards/_BN187 Full Res.jpeg")),
            PathBuf::from("/cards/_BN187 Full Res_analyzed.jpeg")
        );
        assert_eq!(
            default_output_path(Path::new("card.PNG")),
            PathBuf::from("card_analyzed.PNG")
        );
    }

    #[test]
    fn default_name_falls_back_to_png() {
        assert_eq!(
            default_output_path(Path::new("scans/card.xyz")),
            PathBuf::from("scans/card_analyzed.png")
        );
        assert_eq!(
            default_output_path(Path::new("scans/card")),
            PathBuf::from("scans/card_analyzed.png")
        );
    }

    #[test]
    fn override_name_is_placed_next_to_input() {
        let input = Path::new("scans/card.jpg");
        assert_eq!(
            resolve_output_path(input, Some("result.png")),
            PathBuf::from("scans/result.png")
        );
        assert_eq!(
            resolve_output_path(input, Some("out/result.png")),
            PathBuf::from("out/result.png")
        );
        assert_eq!(
            resolve_output_path(input, None),
            PathBuf::from("scans/card_analyzed.jpg")
        );
    }

    #[test]
    fn gray_raster_expands_to_rgb() {
        let data = [10u8, 20, 30, 40];
        let view = RasterView {
            width: 2,
            height: 2,
            channels: 1,
            data: &data,
        };
        let rgb = rgb_from_raster(&view).expect("rgb");
        assert_eq!(rgb.get_pixel(1, 0).0, [20, 20, 20]);
        assert_eq!(rgb.get_pixel(0, 1).0, [30, 30, 30]);
    }

    #[test]
    fn dynamic_image_channel_mapping() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::new(3, 2));
        assert_eq!(raster_from_dynamic(&gray).channels, 1);
        let rgba = DynamicImage::ImageRgba8(image::RgbaImage::new(3, 2));
        let raster = raster_from_dynamic(&rgba);
        assert_eq!(raster.channels, 3);
        assert_eq!(raster.data.len(), 3 * 2 * 3);
    }

    #[test]
    fn atomic_write_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("missing").join("out.png");
        let err = write_image_atomic(&RgbImage::new(4, 4), &target).unwrap_err();
        assert!(matches!(err, SprayCardError::Io { .. }), "{err}");
        assert!(!target.exists());
    }

    #[test]
    fn atomic_write_leaves_only_the_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("out.png");
        write_image_atomic(&RgbImage::new(4, 3), &target).expect("write");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read_dir")
            .map(|e| e.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.png")]);
        let back = image::open(&target).expect("decode");
        assert_eq!((back.width(), back.height()), (4, 3));
    }

    #[test]
    fn unknown_output_extension_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("out.xyz");
        let err = write_image_atomic(&RgbImage::new(2, 2), &target).unwrap_err();
        assert!(matches!(err, SprayCardError::UnsupportedOutputFormat { .. }));
    }
}
