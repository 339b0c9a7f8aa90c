use std::path::Path;

use image::imageops::{self, FilterType};

use crate::error::TextureError;

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Read and decode an image file (format guessed from its contents).
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Load `path`, or a single white texel if that fails.
    pub fn load_or_white(path: &Path) -> Self {
        match Self::load(path) {
            Ok(image) => {
                tracing::info!(
                    "loaded texture {} ({}x{})",
                    path.display(),
                    image.width,
                    image.height
                );
                image
            }
            Err(e) => {
                tracing::error!("texture {} unavailable, using white: {e}", path.display());
                Self::white()
            }
        }
    }

    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255, 255, 255, 255],
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        4 * self.width
    }

    /// Full mip chain, this image first, each level half the previous
    /// (rounded down, at least 1) until 1x1.
    pub fn mip_chain(&self) -> Vec<TextureImage> {
        let mut levels = vec![self.clone()];
        let Some(mut current) =
            image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
        else {
            tracing::warn!("texel buffer does not match {}x{}, skipping mips", self.width, self.height);
            return levels;
        };
        while current.width() > 1 || current.height() > 1 {
            let width = (current.width() / 2).max(1);
            let height = (current.height() / 2).max(1);
            current = imageops::resize(&current, width, height, FilterType::Triangle);
            levels.push(TextureImage {
                width,
                height,
                pixels: current.as_raw().clone(),
            });
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 40) as u8, (y * 40) as u8, 7])
        });
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_rgb_png_into_rgba() {
        let tex = TextureImage::from_bytes(&png_bytes(3, 2)).unwrap();
        assert_eq!((tex.width, tex.height), (3, 2));
        assert_eq!(tex.pixels.len(), 3 * 2 * 4);
        assert_eq!(tex.bytes_per_row(), 12);
        // Second pixel of the first row, alpha filled in.
        assert_eq!(&tex.pixels[4..8], &[40, 0, 7, 255]);
    }

    #[test]
    fn mip_chain_halves_down_to_one_texel() {
        let tex = TextureImage::from_bytes(&png_bytes(5, 2)).unwrap();
        let sizes: Vec<(u32, u32)> = tex.mip_chain().iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(sizes, vec![(5, 2), (2, 1), (1, 1)]);
        for level in tex.mip_chain() {
            assert_eq!(level.pixels.len() as u32, level.bytes_per_row() * level.height);
        }
    }

    #[test]
    fn mip_chain_of_uniform_image_stays_uniform() {
        let tex = TextureImage {
            width: 4,
            height: 4,
            pixels: [200, 100, 50, 255].repeat(16),
        };
        let levels = tex.mip_chain();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[2].pixels, vec![200, 100, 50, 255]);
        assert_eq!(TextureImage::white().mip_chain(), vec![TextureImage::white()]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = TextureImage::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, TextureError::Decode(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("does/not/exist/wood.jpg");
        let err = TextureImage::load(path).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
        assert!(err.to_string().contains("wood.jpg"));
    }

    #[test]
    fn missing_file_falls_back_to_white() {
        let tex = TextureImage::load_or_white(Path::new("does/not/exist/grid.png"));
        assert_eq!(tex, TextureImage::white());
    }
}
