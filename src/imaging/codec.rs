//! Raster codec backing the image optimizer.

use crate::models::embedded_image::{MEDIA_TYPE_JPEG, MEDIA_TYPE_PNG, PayloadError};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageEncoder, ImageFormat, Rgb, RgbImage};
use thiserror::Error;

/// Raster formats the optimizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RasterFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
}

impl RasterFormat {
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(RasterFormat::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(RasterFormat::Jpeg),
            "image/gif" => Some(RasterFormat::Gif),
            "image/webp" => Some(RasterFormat::Webp),
            "image/bmp" => Some(RasterFormat::Bmp),
            _ => None,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            RasterFormat::Png => MEDIA_TYPE_PNG,
            RasterFormat::Jpeg => MEDIA_TYPE_JPEG,
            RasterFormat::Gif => "image/gif",
            RasterFormat::Webp => "image/webp",
            RasterFormat::Bmp => "image/bmp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
            RasterFormat::Gif => ImageFormat::Gif,
            RasterFormat::Webp => ImageFormat::WebP,
            RasterFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

/// Image processing errors. The optimizer logs these and keeps the original payload.
#[derive(Error, Debug)]
pub enum ImageOptimizationError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("failed to read payload: {0}")]
    Payload(#[from] PayloadError),
    #[error("failed to decode {format:?} image: {message}")]
    Decode {
        format: RasterFormat,
        message: String,
    },
    #[error("failed to encode {format:?} image: {message}")]
    Encode {
        format: RasterFormat,
        message: String,
    },
}

/// Decode/encode collaborator of the optimizer.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8], format: RasterFormat)
    -> Result<DynamicImage, ImageOptimizationError>;

    /// Whether [`ImageCodec::encode`] can write this format.
    fn can_encode(&self, format: RasterFormat) -> bool;

    /// Encode at the original dimensions. `quality` is 1-100 and only affects lossy formats.
    fn encode(
        &self,
        image: &DynamicImage,
        format: RasterFormat,
        quality: u8,
    ) -> Result<Vec<u8>, ImageOptimizationError>;
}

/// Codec backed by the `image` crate. Writes PNG and JPEG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn decode(
        &self,
        bytes: &[u8],
        format: RasterFormat,
    ) -> Result<DynamicImage, ImageOptimizationError> {
        image::load_from_memory_with_format(bytes, format.image_format()).map_err(|e| {
            ImageOptimizationError::Decode {
                format,
                message: e.to_string(),
            }
        })
    }

    fn can_encode(&self, format: RasterFormat) -> bool {
        matches!(format, RasterFormat::Png | RasterFormat::Jpeg)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: RasterFormat,
        quality: u8,
    ) -> Result<Vec<u8>, ImageOptimizationError> {
        let (width, height) = (image.width(), image.height());
        let mut buffer = Vec::new();
        let result = match format {
            RasterFormat::Jpeg => {
                let rgb = flatten_onto_white(image);
                JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).write_image(
                    rgb.as_raw(),
                    width,
                    height,
                    ColorType::Rgb8,
                )
            }
            RasterFormat::Png => {
                let encoder = PngEncoder::new_with_quality(
                    &mut buffer,
                    CompressionType::Best,
                    FilterType::Adaptive,
                );
                if image.color().has_alpha() {
                    let rgba = image.to_rgba8();
                    encoder.write_image(rgba.as_raw(), width, height, ColorType::Rgba8)
                } else {
                    let rgb = image.to_rgb8();
                    encoder.write_image(rgb.as_raw(), width, height, ColorType::Rgb8)
                }
            }
            other => {
                return Err(ImageOptimizationError::Encode {
                    format: other,
                    message: "encoding not supported".to_string(),
                });
            }
        };
        result.map_err(|e| ImageOptimizationError::Encode {
            format,
            message: e.to_string(),
        })?;
        Ok(buffer)
    }
}

/// Drop the alpha channel by compositing onto a white background.
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut flattened = RgbImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        flattened.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    flattened
}
