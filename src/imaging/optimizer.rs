//! Image optimizer.
//!
//! Shrinks embedded raster images before they are written to a snapshot or a
//! bundle. Images under the size threshold, vector images and images this
//! optimizer already wrote are never touched, so repeated save cycles do not
//! degrade them.

use super::codec::{ImageCodec, ImageOptimizationError, RasterCodec, RasterFormat};
use crate::config::ImageOptimizerConfig;
use crate::models::{EmbeddedImage, ImageRole, ProjectData};
use futures_util::future::join_all;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct ImageOptimizer {
    config: ImageOptimizerConfig,
    codec: Arc<dyn ImageCodec>,
}

impl ImageOptimizer {
    pub fn new(config: ImageOptimizerConfig) -> Self {
        Self::with_codec(config, Arc::new(RasterCodec))
    }

    pub fn with_codec(config: ImageOptimizerConfig, codec: Arc<dyn ImageCodec>) -> Self {
        Self { config, codec }
    }

    pub fn config(&self) -> &ImageOptimizerConfig {
        &self.config
    }

    /// True when the image must pass through unchanged: external references,
    /// vector images, earlier optimizer output and raster payloads under the
    /// threshold.
    pub fn is_already_optimized(&self, image: &EmbeddedImage) -> bool {
        if !image.is_inline() || image.is_vector() || image.is_optimized() {
            return true;
        }
        match image.decoded_len() {
            Some(len) => len < self.config.threshold_for(image.is_png()),
            None => true,
        }
    }

    /// Optimize one image. Returns the input itself when nothing is gained or
    /// anything fails.
    pub fn optimize<'a>(&self, image: &'a EmbeddedImage, role: ImageRole) -> Cow<'a, EmbeddedImage> {
        if self.is_already_optimized(image) {
            return Cow::Borrowed(image);
        }
        match self.recompress(image, role) {
            Ok(Some(optimized)) => Cow::Owned(optimized),
            Ok(None) => Cow::Borrowed(image),
            Err(e) => {
                warn!("Image optimization failed, keeping original: {}", e);
                Cow::Borrowed(image)
            }
        }
    }

    fn recompress(
        &self,
        image: &EmbeddedImage,
        role: ImageRole,
    ) -> Result<Option<EmbeddedImage>, ImageOptimizationError> {
        let media_type = image.media_type().unwrap_or_default();
        let format = RasterFormat::from_media_type(media_type)
            .ok_or_else(|| ImageOptimizationError::UnsupportedMediaType(media_type.to_string()))?;
        let bytes = image.decode()?;
        let decoded = self.codec.decode(&bytes, format)?;
        let quality = self.config.quality_for(role, format == RasterFormat::Png);

        // Native format first, lossy fallback second; the smallest encoding wins.
        let mut candidates = Vec::with_capacity(2);
        if format != RasterFormat::Jpeg && self.codec.can_encode(format) {
            candidates.push(format);
        }
        candidates.push(RasterFormat::Jpeg);

        let mut best: Option<(RasterFormat, Vec<u8>)> = None;
        let mut last_error = None;
        for candidate in candidates {
            match self.codec.encode(&decoded, candidate, quality) {
                Ok(encoded) => {
                    debug!(
                        "{:?} candidate for {:?} image: {} bytes",
                        candidate,
                        role,
                        encoded.len()
                    );
                    if best
                        .as_ref()
                        .is_none_or(|(_, current)| encoded.len() < current.len())
                    {
                        best = Some((candidate, encoded));
                    }
                }
                Err(e) => last_error = Some(e),
            }
        }

        let Some((output_format, encoded)) = best else {
            return Err(last_error.unwrap_or(ImageOptimizationError::Encode {
                format,
                message: "no encoder available".to_string(),
            }));
        };
        if encoded.len() >= bytes.len() {
            debug!(
                "Re-encoding {:?} image did not shrink it ({} >= {} bytes)",
                role,
                encoded.len(),
                bytes.len()
            );
            return Ok(None);
        }

        info!(
            "Optimized {:?} image: {} -> {} bytes ({:?} -> {:?}, quality {})",
            role,
            bytes.len(),
            encoded.len(),
            format,
            output_format,
            quality
        );
        Ok(Some(EmbeddedImage::optimized_from_bytes(
            output_format.media_type(),
            &encoded,
        )))
    }

    /// Optimize one image on the blocking pool.
    pub async fn optimize_owned(&self, image: EmbeddedImage, role: ImageRole) -> EmbeddedImage {
        if self.is_already_optimized(&image) {
            return image;
        }
        let optimizer = self.clone();
        let fallback = image.clone();
        let task = tokio::task::spawn_blocking(move || {
            let optimized = match optimizer.optimize(&image, role) {
                Cow::Owned(optimized) => Some(optimized),
                Cow::Borrowed(_) => None,
            };
            optimized.unwrap_or(image)
        });
        match task.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Image optimization task failed, keeping original: {}", e);
                fallback
            }
        }
    }

    pub async fn optimize_slot(
        &self,
        image: Option<EmbeddedImage>,
        role: ImageRole,
    ) -> Option<EmbeddedImage> {
        match image {
            Some(image) => Some(self.optimize_owned(image, role).await),
            None => None,
        }
    }

    /// Optimize a batch concurrently. Results keep the input order.
    pub async fn optimize_batch(
        &self,
        images: Vec<EmbeddedImage>,
        role: ImageRole,
    ) -> Vec<EmbeddedImage> {
        join_all(
            images
                .into_iter()
                .map(|image| self.optimize_owned(image, role)),
        )
        .await
    }

    async fn optimize_slots(
        &self,
        images: Vec<Option<EmbeddedImage>>,
        role: ImageRole,
    ) -> Vec<Option<EmbeddedImage>> {
        join_all(images.into_iter().map(|image| self.optimize_slot(image, role))).await
    }

    /// Optimized copy of every image in the project. The input is not modified.
    pub async fn optimize_project(&self, project: &ProjectData) -> ProjectData {
        let mut optimized = project.clone();

        for product in optimized.products.iter_mut() {
            let icon = product.icon.take();
            let hero = product.hero_image.take();
            let gallery = std::mem::take(&mut product.gallery_images);
            let card_images: Vec<Option<EmbeddedImage>> = product
                .info_cards
                .iter_mut()
                .map(|card| card.image.take())
                .collect();

            let (icon, hero, gallery, card_images) = tokio::join!(
                self.optimize_slot(icon, ImageRole::Icon),
                self.optimize_slot(hero, ImageRole::Hero),
                self.optimize_batch(gallery, ImageRole::Gallery),
                self.optimize_slots(card_images, ImageRole::Gallery),
            );
            product.icon = icon;
            product.hero_image = hero;
            product.gallery_images = gallery;
            for (card, image) in product.info_cards.iter_mut().zip(card_images) {
                card.image = image;
            }

            tokio::task::yield_now().await;
        }

        for services in optimized.services.values_mut() {
            let icons: Vec<Option<EmbeddedImage>> =
                services.iter_mut().map(|service| service.icon.take()).collect();
            let icons = self.optimize_slots(icons, ImageRole::Icon).await;
            for (service, icon) in services.iter_mut().zip(icons) {
                service.icon = icon;
            }
        }

        let card_images: Vec<Option<EmbeddedImage>> = optimized
            .info_cards
            .iter_mut()
            .map(|card| card.image.take())
            .collect();
        let card_images = self.optimize_slots(card_images, ImageRole::Gallery).await;
        for (card, image) in optimized.info_cards.iter_mut().zip(card_images) {
            card.image = image;
        }

        optimized
    }
}
