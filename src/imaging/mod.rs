//! Image recompression for embedded product and service images.

pub mod codec;
pub mod optimizer;

pub use codec::{ImageCodec, ImageOptimizationError, RasterCodec, RasterFormat};
pub use optimizer::ImageOptimizer;
