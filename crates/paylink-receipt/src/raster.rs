//! Rasterization
//!
//! Best-effort SVG → PNG conversion on a blocking task. A failed
//! rasterization never invalidates the vector preview; it only keeps
//! the share/download affordances disabled.

use std::sync::atomic::{AtomicBool, Ordering};

use resvg::{tiny_skia, usvg};

use crate::error::{ReceiptError, Result};
use crate::svg::RECEIPT_SIZE;

/// An encoded PNG owned by the current render output.
///
/// Dropping the image releases the bytes; superseding a raster through
/// [`crate::ReceiptArtifacts::set_raster`] drops the previous handle
/// exactly once.
#[derive(Clone, Debug)]
pub struct RasterImage {
    bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RasterImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Single-flight SVG rasterizer.
///
/// The guard admits one build at a time per rasterizer; a request that
/// arrives while a build is in flight is refused without starting a
/// competing one. The guard is cleared unconditionally when the build
/// finishes or fails.
#[derive(Debug, Default)]
pub struct Rasterizer {
    in_flight: AtomicBool,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a build is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Rasterize the SVG to a 1080×1080 PNG.
    pub async fn rasterize(&self, svg: &str) -> Result<RasterImage> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ReceiptError::RasterInFlight);
        }

        let svg = svg.to_owned();
        let joined = tokio::task::spawn_blocking(move || rasterize_blocking(&svg)).await;

        self.in_flight.store(false, Ordering::SeqCst);

        match joined {
            Ok(result) => result,
            Err(e) => Err(ReceiptError::Raster(e.to_string())),
        }
    }
}

fn rasterize_blocking(svg: &str) -> Result<RasterImage> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| ReceiptError::Svg(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(RECEIPT_SIZE, RECEIPT_SIZE)
        .ok_or_else(|| ReceiptError::Raster("could not allocate pixmap".into()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let bytes = pixmap
        .encode_png()
        .map_err(|e| ReceiptError::Raster(e.to_string()))?;

    Ok(RasterImage {
        bytes,
        width: RECEIPT_SIZE,
        height: RECEIPT_SIZE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1080" height="1080"><rect width="1080" height="1080" fill="#0f172a"/></svg>"##;

    #[tokio::test]
    async fn test_rasterize_minimal_svg() {
        let rasterizer = Rasterizer::new();
        let image = rasterizer.rasterize(MINIMAL_SVG).await.unwrap();

        assert_eq!(image.width, 1080);
        assert_eq!(image.height, 1080);
        // PNG signature
        assert_eq!(&image.bytes()[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[tokio::test]
    async fn test_invalid_svg_clears_guard() {
        let rasterizer = Rasterizer::new();

        assert!(rasterizer.rasterize("not svg at all").await.is_err());
        assert!(!rasterizer.is_busy());

        // A later build still goes through.
        assert!(rasterizer.rasterize(MINIMAL_SVG).await.is_ok());
    }

    #[tokio::test]
    async fn test_guard_refuses_concurrent_build() {
        let rasterizer = std::sync::Arc::new(Rasterizer::new());

        // Hold the guard as a concurrent build would.
        rasterizer.in_flight.store(true, Ordering::SeqCst);
        match rasterizer.rasterize(MINIMAL_SVG).await {
            Err(ReceiptError::RasterInFlight) => {}
            other => panic!("expected in-flight refusal, got {:?}", other.map(|_| ())),
        }

        rasterizer.in_flight.store(false, Ordering::SeqCst);
        assert!(rasterizer.rasterize(MINIMAL_SVG).await.is_ok());
    }
}
