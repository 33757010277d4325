//! Image pipeline: decode whatever the operator uploads, store lossy WebP.

/// Errors raised while converting an uploaded image for storage.
#[derive(Debug, Clone)]
pub enum ImageError {
    /// Input bytes did not decode as a supported raster format
    Decode(String),
    /// WebP encoder rejected the frame
    Encode(String),
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageError::Decode(msg) => write!(f, "Image decode error: {msg}"),
            ImageError::Encode(msg) => write!(f, "Image encode error: {msg}"),
        }
    }
}

impl std::error::Error for ImageError {}

/// Encoding quality used for all stored assets.
pub const DEFAULT_QUALITY: f32 = 80.0;

/// Re-encodes an uploaded image as lossy WebP at the given quality. Alpha
/// channels and palettes are flattened to opaque truecolor first, so
/// transparency does not survive the conversion.
pub fn optimize_image(bytes: &[u8], quality: f32) -> Result<Vec<u8>, ImageError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let rgb = decoded.into_rgb8();
    let (width, height) = rgb.dimensions();

    let mut config = webp::WebPConfig::new()
        .map_err(|_| ImageError::Encode("encoder configuration rejected".to_string()))?;
    config.quality = quality;
    config.method = 6; // slowest, smallest output

    let encoder = webp::Encoder::from_rgb(rgb.as_raw(), width, height);
    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| ImageError::Encode(format!("{e:?}")))?;
    Ok(encoded.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn rgba_png() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(32, 24, |x, y| {
            image::Rgba([(x * 8) as u8, (y * 10) as u8, 40, 128])
        });
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .unwrap();
        png
    }

    #[test]
    fn test_rgba_png_becomes_opaque_webp() {
        let out = optimize_image(&rgba_png(), DEFAULT_QUALITY).unwrap();
        assert!(!out.is_empty());
        // RIFF container with a plain lossy VP8 frame: no alpha chunk.
        assert_eq!(&out[0..4], b"RIFF");
        assert_eq!(&out[8..12], b"WEBP");
        assert_eq!(&out[12..16], b"VP8 ");
    }

    #[test]
    fn test_grayscale_input_is_accepted() {
        let img = image::GrayImage::from_pixel(16, 16, image::Luma([90]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .unwrap();
        let out = optimize_image(&png, DEFAULT_QUALITY).unwrap();
        assert_eq!(&out[8..12], b"WEBP");
    }

    #[test]
    fn test_garbage_input_is_a_decode_error() {
        let err = optimize_image(b"not an image at all", DEFAULT_QUALITY).unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
        assert!(err.to_string().starts_with("Image decode error"));
    }

    #[test]
    fn test_quality_changes_output() {
        let png = rgba_png();
        let high = optimize_image(&png, 95.0).unwrap();
        let low = optimize_image(&png, 10.0).unwrap();
        assert!(!high.is_empty() && !low.is_empty());
        assert_ne!(high, low);
    }
}
