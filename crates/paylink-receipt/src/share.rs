//! Receipt Delivery
//!
//! Hands the rasterized receipt to a platform share surface when one is
//! available, falling back to a plain file download under a fixed name.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{ReceiptError, Result};
use crate::raster::RasterImage;

/// Fixed filename for the downloaded receipt
pub const RECEIPT_FILENAME: &str = "guto-receipt.png";

/// Short title attached to a native share
pub const SHARE_TITLE: &str = "Payment receipt";

/// A platform surface that can share a named PNG
#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn share_png(&self, filename: &str, title: &str, bytes: &[u8]) -> Result<()>;
}

/// How the receipt reached the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the platform share surface
    Shared,

    /// Written to disk at this path
    Saved(PathBuf),
}

/// Deliver the rasterized receipt.
///
/// Tries the share target first when one is present; a share failure
/// degrades to the file fallback rather than surfacing an error.
pub async fn deliver(
    raster: &RasterImage,
    target: Option<&dyn ShareTarget>,
    fallback_dir: &Path,
) -> Result<Delivery> {
    if let Some(target) = target {
        match target
            .share_png(RECEIPT_FILENAME, SHARE_TITLE, raster.bytes())
            .await
        {
            Ok(()) => return Ok(Delivery::Shared),
            Err(e) => {
                tracing::warn!(error = %e, "Native share failed, falling back to download");
            }
        }
    }

    let path = fallback_dir.join(RECEIPT_FILENAME);
    tokio::fs::write(&path, raster.bytes()).await?;
    Ok(Delivery::Saved(path))
}
