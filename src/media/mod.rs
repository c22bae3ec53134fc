//! Upload pipeline: validate -> derive variants -> store.

pub mod probe;
pub mod store;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::image::{self, ImageWithVariants, NewVariant, VariantKind};
use probe::ImageInfo;
use store::MediaStore;

/// One derived rendition of an upload, ready to persist.
pub struct ProcessedVariant {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Seam for the resizing codec. The service itself never decodes pixels;
/// deployments plug in a real resizer here.
pub trait ImageProcessor: Send + Sync {
    fn derive(
        &self,
        data: &[u8],
        info: &ImageInfo,
        kind: VariantKind,
    ) -> Result<ProcessedVariant, AppError>;
}

/// Default processor: stores the original payload for every variant and
/// records the bounded nominal dimensions the variant is served at.
pub struct PassthroughProcessor;

impl ImageProcessor for PassthroughProcessor {
    fn derive(
        &self,
        data: &[u8],
        info: &ImageInfo,
        kind: VariantKind,
    ) -> Result<ProcessedVariant, AppError> {
        let (width, height) = match kind.max_dimensions() {
            Some(bounds) => fit_within(info.width, info.height, bounds),
            None => (info.width, info.height),
        };
        Ok(ProcessedVariant {
            data: data.to_vec(),
            width,
            height,
        })
    }
}

/// Scale (w, h) down proportionally to fit inside the bounding box; never
/// upscales.
pub fn fit_within(width: u32, height: u32, (max_w, max_h): (u32, u32)) -> (u32, u32) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }
    if width == 0 || height == 0 {
        return (width, height);
    }
    let scale = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Run an upload through the pipeline and persist the image with its three
/// variants. Fails with a validation error before any write when the payload
/// is empty, oversized, or not a supported image.
pub async fn process_upload(
    pool: &SqlitePool,
    media: &MediaStore,
    processor: &dyn ImageProcessor,
    data: &[u8],
    original_filename: &str,
    max_bytes: usize,
) -> Result<ImageWithVariants, AppError> {
    if data.is_empty() {
        return Err(AppError::validation("file", "Empty upload"));
    }
    if data.len() > max_bytes {
        return Err(AppError::validation(
            "file",
            format!("Upload exceeds the {max_bytes} byte limit"),
        ));
    }
    let info = probe::probe(data).ok_or_else(|| {
        AppError::validation("file", "Unsupported file type (expected PNG, JPEG, GIF, or WebP)")
    })?;

    let mut variants = Vec::with_capacity(VariantKind::ALL.len());
    for kind in VariantKind::ALL {
        let processed = processor.derive(data, &info, kind)?;
        let storage_path = media.save(&processed.data, info.format.extension())?;
        variants.push(NewVariant {
            kind,
            storage_path,
            width: processed.width as i64,
            height: processed.height as i64,
            size: processed.data.len() as i64,
        });
    }

    let image_id = image::queries::create_with_variants(
        pool,
        original_filename,
        info.format.content_type(),
        Utc::now(),
        &variants,
    )
    .await?;

    let stored = image::queries::find_by_id(pool, image_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let stored_variants = image::queries::find_variants(pool, image_id).await?;
    Ok(ImageWithVariants {
        image: stored,
        variants: stored_variants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_within_preserves_aspect() {
        assert_eq!(fit_within(1600, 800, (800, 800)), (800, 400));
        assert_eq!(fit_within(100, 100, (200, 200)), (100, 100));
        assert_eq!(fit_within(801, 800, (800, 800)), (800, 799));
    }
}
