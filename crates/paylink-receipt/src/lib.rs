//! # paylink-receipt
//!
//! Receipt image synthesis for confirmed payments: a 1080×1080 SVG
//! composition available immediately as a preview, and a best-effort
//! PNG raster produced asynchronously for the share/download
//! affordances. Exactly one rasterization runs at a time per renderer.

pub mod error;
pub mod format;
pub mod raster;
pub mod share;
pub mod svg;

pub use error::{ReceiptError, Result};
pub use raster::{RasterImage, Rasterizer};
pub use share::{deliver, Delivery, ShareTarget, RECEIPT_FILENAME};
pub use svg::{render_svg, svg_data_url, BrandTheme, RECEIPT_SIZE};

use paylink_core::{PaidReceipt, UserProfile};

/// The receipt's render output: the vector preview right away, the
/// raster once a build completes.
#[derive(Debug)]
pub struct ReceiptArtifacts {
    /// Composed SVG source
    pub svg: String,

    /// Base64 `data:` URL of the SVG, usable as a preview immediately
    pub preview_url: String,

    raster: Option<RasterImage>,
}

impl ReceiptArtifacts {
    pub fn raster(&self) -> Option<&RasterImage> {
        self.raster.as_ref()
    }

    /// Whether the share/download affordances may be enabled
    pub fn can_share(&self) -> bool {
        self.raster.is_some()
    }

    /// Install a raster, dropping any previous handle
    pub fn set_raster(&mut self, image: RasterImage) {
        self.raster = Some(image);
    }

    /// Release the raster handle (e.g. on unmount)
    pub fn clear_raster(&mut self) {
        self.raster = None;
    }
}

/// Composes and rasterizes receipts for one page
pub struct Renderer {
    theme: BrandTheme,
    rasterizer: Rasterizer,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(BrandTheme::default())
    }
}

impl Renderer {
    pub fn new(theme: BrandTheme) -> Self {
        Self {
            theme,
            rasterizer: Rasterizer::new(),
        }
    }

    /// Compose the vector form. Synchronous; the preview is usable as
    /// soon as this returns.
    pub fn compose(
        &self,
        receipt: &PaidReceipt,
        profile: &UserProfile,
        paylink: &str,
    ) -> ReceiptArtifacts {
        let svg = render_svg(receipt, profile, paylink, &self.theme);
        let preview_url = svg_data_url(&svg);

        ReceiptArtifacts {
            svg,
            preview_url,
            raster: None,
        }
    }

    /// Rasterize the composed SVG into the artifacts.
    ///
    /// Best-effort: a failure leaves the preview untouched and the
    /// share/download affordances disabled. Re-entrant calls while a
    /// build is running are refused by the rasterizer's guard.
    pub async fn rasterize_into(&self, artifacts: &mut ReceiptArtifacts) -> Result<()> {
        let image = self.rasterizer.rasterize(&artifacts.svg).await?;
        artifacts.set_raster(image);
        Ok(())
    }
}
