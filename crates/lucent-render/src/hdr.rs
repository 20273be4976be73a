//! Radiance HDR output for float image readbacks.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::hdr::HdrEncoder;
use image::Rgb;
use tracing::info;

use crate::{RenderError, Result};

/// Save linear RGB float pixels to a Radiance HDR file.
///
/// # Arguments
/// * `data` - Tightly packed float RGB pixel data (3 floats per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `path` - Output file path
pub fn save_hdr(data: &[f32], width: u32, height: u32, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    let expected = width as usize * height as usize * 3;
    if data.len() != expected {
        return Err(RenderError::InvalidImageData {
            expected,
            actual: data.len(),
        });
    }

    let pixels: Vec<Rgb<f32>> = data
        .chunks_exact(3)
        .map(|c| Rgb([c[0], c[1], c[2]]))
        .collect();

    let writer = BufWriter::new(File::create(path)?);
    HdrEncoder::new(writer).encode(&pixels, width as usize, height as usize)?;

    info!("Image saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_dimensions() {
        let data = vec![0.0f32; 5];
        let err = save_hdr(&data, 2, 2, "unused.hdr").unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidImageData {
                expected: 12,
                actual: 5
            }
        ));
    }

    #[test]
    fn writes_a_small_image() {
        let path =
            std::env::temp_dir().join(format!("lucent_hdr_test_{}.hdr", std::process::id()));

        let data = vec![0.25f32; 2 * 2 * 3];
        save_hdr(&data, 2, 2, &path).unwrap();

        let written = std::fs::metadata(&path).unwrap().len();
        assert!(written > 0);

        let _ = std::fs::remove_file(&path);
    }
}
