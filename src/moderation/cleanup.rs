//! Retention sweep for unowned uploads. Images that were uploaded but never
//! ended up attached to a submission or idea (or were orphaned by a
//! rejection) are deleted after the retention window. Storage failures are
//! logged and skipped; the sweep never aborts the batch.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::image;

/// One pass over unowned images older than the retention window.
/// Returns the number of image rows deleted.
pub async fn sweep_orphaned_images(
    pool: &SqlitePool,
    upload_dir: &str,
    retention: Duration,
) -> Result<u64, sqlx::Error> {
    let cutoff = Utc::now()
        - chrono::Duration::from_std(retention).unwrap_or_else(|_| chrono::Duration::hours(24));

    let orphans = match image::queries::find_unowned_older_than(pool, cutoff).await {
        Ok(list) => list,
        Err(e) => {
            log::error!("Orphan sweep: listing failed: {e}");
            return Ok(0);
        }
    };

    let mut deleted = 0u64;
    for orphan in orphans {
        let variants = match image::queries::find_variants(pool, orphan.id).await {
            Ok(v) => v,
            Err(e) => {
                log::error!("Orphan sweep: variants of image {} unavailable: {e}", orphan.id);
                continue;
            }
        };

        // Stored files go first; a failed unlink is logged but does not keep
        // the row alive.
        for variant in &variants {
            let path = Path::new(upload_dir).join(&variant.storage_path);
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Orphan sweep: failed to remove {}: {e}", path.display());
                }
            }
        }

        match image::queries::delete(pool, orphan.id).await {
            Ok(()) => {
                deleted += 1;
                log::info!("Orphan sweep: removed image {} ({})", orphan.id, orphan.original_filename);
            }
            Err(e) => log::error!("Orphan sweep: failed to delete image {}: {e}", orphan.id),
        }
    }

    Ok(deleted)
}

/// Spawn the periodic sweep on the actix runtime.
pub fn spawn_scheduler(pool: SqlitePool, upload_dir: String, retention: Duration) {
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            log::info!("Running orphan image sweep");
            match sweep_orphaned_images(&pool, &upload_dir, retention).await {
                Ok(0) => {}
                Ok(n) => log::info!("Orphan sweep removed {n} images"),
                Err(e) => log::error!("Orphan sweep failed: {e}"),
            }
        }
    });
}
