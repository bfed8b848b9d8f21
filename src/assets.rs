// ============================================================================
// assets.rs — ArcadeKit
// Memoizing image cache keyed by asset name, with fit-to-cover scaling.
// ============================================================================

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError};

use crate::error::AssetError;

/// Target box for scaling, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Largest scaled image `get_scaled_image` will allocate: 64 Mpx, 256 MiB as RGBA8.
pub const MAX_SCALED_PIXELS: u64 = 64 * 1024 * 1024;

/// Uniformly scale `image` (width, height) until it covers `bounds`.
///
/// The ratio is the larger of the two axis ratios and both results are
/// truncated to whole pixels. `None` when the image has a zero dimension.
///
/// Truncation happens after the floating-point product, so a result that should
/// be whole can land one pixel short, e.g. `49 * (1 / 49)` truncates to 0.
/// Oversized results saturate at `u32::MAX`.
pub fn scaled_dimensions(image: (u32, u32), bounds: Bounds) -> Option<(u32, u32)> {
    let (width, height) = image;
    if width == 0 || height == 0 {
        return None;
    }
    let width_ratio = bounds.width as f64 / width as f64;
    let height_ratio = bounds.height as f64 / height as f64;
    let ratio = width_ratio.max(height_ratio);
    Some(((width as f64 * ratio) as u32, (height as f64 * ratio) as u32))
}

// ======================== Cache ========================

type CachedImage = Result<Arc<DynamicImage>, AssetError>;

/// Images loaded from `root`, remembered by name. Failed loads are remembered
/// too and are not retried until [`AssetCache::evict`] is called.
pub struct AssetCache {
    root: PathBuf,
    images: HashMap<String, CachedImage>,
}

impl AssetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    pub fn get_image(&mut self, name: &str) -> Result<Arc<DynamicImage>, AssetError> {
        if let Some(cached) = self.images.get(name) {
            return cached.clone();
        }
        let loaded = self.load(name).map(Arc::new);
        match &loaded {
            Ok(img) => log::debug!("Loaded asset {} ({}x{})", name, img.width(), img.height()),
            Err(e) => log::warn!("{}", e),
        }
        self.images.insert(name.to_string(), loaded.clone());
        loaded
    }

    /// Load `name` and scale it to cover `bounds`.
    pub fn get_scaled_image(&mut self, name: &str, bounds: Bounds) -> Result<DynamicImage, AssetError> {
        let image = self.get_image(name)?;
        let (width, height) = scaled_dimensions(image.dimensions(), bounds).ok_or_else(|| {
            AssetError::Empty {
                name: name.to_string(),
            }
        })?;
        if width == 0 || height == 0 {
            return Err(AssetError::DegenerateScale {
                name: name.to_string(),
                width,
                height,
            });
        }
        if width as u64 * height as u64 > MAX_SCALED_PIXELS {
            return Err(AssetError::ScaleTooLarge {
                name: name.to_string(),
                width,
                height,
            });
        }
        Ok(image.resize_exact(width, height, FilterType::Lanczos3))
    }

    /// Warm the cache. Returns how many assets failed to load.
    pub fn preload<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> usize {
        let mut loaded = 0;
        let mut failed = 0;
        for name in names {
            match self.get_image(name) {
                Ok(_) => loaded += 1,
                Err(_) => failed += 1,
            }
        }
        log::info!("Preloaded {} assets ({} failed)", loaded, failed);
        failed
    }

    /// Drop the cached entry for `name` so the next lookup reloads it.
    pub fn evict(&mut self, name: &str) -> bool {
        self.images.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn load(&self, name: &str) -> Result<DynamicImage, AssetError> {
        let path = self.root.join(name);
        let img = image::open(&path).map_err(|e| match e {
            ImageError::IoError(err) if err.kind() == io::ErrorKind::NotFound => AssetError::NotFound {
                name: name.to_string(),
            },
            ImageError::IoError(err) => AssetError::Unreadable {
                name: name.to_string(),
                reason: err.to_string(),
            },
            other => AssetError::Decode {
                name: name.to_string(),
                reason: other.to_string(),
            },
        })?;
        if img.width() == 0 || img.height() == 0 {
            return Err(AssetError::Empty {
                name: name.to_string(),
            });
        }
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::tempdir;

    fn write_png(dir: &std::path::Path, name: &str, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_scaled_dimensions_cover_law() {
        assert_eq!(scaled_dimensions((100, 50), Bounds::new(50, 50)), Some((100, 50)));
        assert_eq!(scaled_dimensions((100, 50), Bounds::new(200, 50)), Some((200, 100)));
    }

    #[test]
    fn test_scaled_dimensions_truncates() {
        // ratio = max(10/3, 10/7) = 3.333.. -> (10, 23.33..)
        assert_eq!(scaled_dimensions((3, 7), Bounds::new(10, 10)), Some((10, 23)));
    }

    #[test]
    fn test_scaled_dimensions_float_truncation() {
        // 49 * (1/49) evaluates just below 1.0.
        assert_eq!(scaled_dimensions((49, 1000), Bounds::new(1, 1)), Some((0, 20)));
    }

    #[test]
    fn test_scaled_dimensions_saturate() {
        assert_eq!(
            scaled_dimensions((1, 1), Bounds::new(u32::MAX, 1)),
            Some((u32::MAX, u32::MAX))
        );
    }

    #[test]
    fn test_scaled_dimensions_zero_image() {
        assert_eq!(scaled_dimensions((0, 10), Bounds::new(10, 10)), None);
        assert_eq!(scaled_dimensions((0, 0), Bounds::new(10, 10)), None);
    }

    #[test]
    fn test_get_image_memoizes() {
        let dir = tempdir().unwrap();
        write_png(dir.path(), "hero.png", 4, 2);

        let mut cache = AssetCache::new(dir.path());
        let first = cache.get_image("hero.png").unwrap();
        let second = cache.get_image("hero.png").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.dimensions(), (4, 2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_asset_failure_is_memoized() {
        let dir = tempdir().unwrap();
        let mut cache = AssetCache::new(dir.path());

        let err = cache.get_image("ghost.png").unwrap_err();
        assert_eq!(
            err,
            AssetError::NotFound {
                name: "ghost.png".to_string()
            }
        );

        // The file appearing later does not change the cached result.
        write_png(dir.path(), "ghost.png", 2, 2);
        assert_eq!(cache.get_image("ghost.png").unwrap_err(), err);

        assert!(cache.evict("ghost.png"));
        assert_eq!(cache.get_image("ghost.png").unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn test_undecodable_asset() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("junk.png"), b"definitely not a png").unwrap();

        let mut cache = AssetCache::new(dir.path());
        let err = cache.get_image("junk.png").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert_eq!(err.asset_name(), "junk.png");
    }

    #[test]
    fn test_get_scaled_image() {
        let dir = tempdir().unwrap();
        write_png(dir.path(), "banner.png", 100, 50);

        let mut cache = AssetCache::new(dir.path());
        let same = cache.get_scaled_image("banner.png", Bounds::new(50, 50)).unwrap();
        assert_eq!(same.dimensions(), (100, 50));

        let doubled = cache.get_scaled_image("banner.png", Bounds::new(200, 50)).unwrap();
        assert_eq!(doubled.dimensions(), (200, 100));

        // Scaling never replaces the cached original.
        assert_eq!(cache.get_image("banner.png").unwrap().dimensions(), (100, 50));
    }

    #[test]
    fn test_scaled_missing_asset_propagates_error() {
        let dir = tempdir().unwrap();
        let mut cache = AssetCache::new(dir.path());

        let err = cache.get_scaled_image("nope.png", Bounds::new(10, 10)).unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
    }

    #[test]
    fn test_degenerate_scale() {
        let dir = tempdir().unwrap();
        write_png(dir.path(), "tile.png", 8, 8);

        let mut cache = AssetCache::new(dir.path());
        let err = cache.get_scaled_image("tile.png", Bounds::new(0, 0)).unwrap_err();
        assert_eq!(
            err,
            AssetError::DegenerateScale {
                name: "tile.png".to_string(),
                width: 0,
                height: 0
            }
        );
    }

    #[test]
    fn test_oversized_scale_is_rejected() {
        let dir = tempdir().unwrap();
        write_png(dir.path(), "dot.png", 1, 1);

        let mut cache = AssetCache::new(dir.path());
        let err = cache.get_scaled_image("dot.png", Bounds::new(u32::MAX, 1)).unwrap_err();
        assert_eq!(
            err,
            AssetError::ScaleTooLarge {
                name: "dot.png".to_string(),
                width: u32::MAX,
                height: u32::MAX
            }
        );

        // 8193^2 is just past 64 Mpx.
        let err = cache.get_scaled_image("dot.png", Bounds::new(8193, 8193)).unwrap_err();
        assert!(matches!(err, AssetError::ScaleTooLarge { .. }));
        assert_eq!(cache.get_scaled_image("dot.png", Bounds::new(16, 16)).unwrap().dimensions(), (16, 16));
    }

    #[test]
    fn test_float_truncation_surfaces_as_degenerate_scale() {
        let dir = tempdir().unwrap();
        write_png(dir.path(), "strip.png", 49, 1000);

        let mut cache = AssetCache::new(dir.path());
        let err = cache.get_scaled_image("strip.png", Bounds::new(1, 1)).unwrap_err();
        assert_eq!(
            err,
            AssetError::DegenerateScale {
                name: "strip.png".to_string(),
                width: 0,
                height: 20
            }
        );
    }

    #[test]
    fn test_preload_counts_failures() {
        let dir = tempdir().unwrap();
        write_png(dir.path(), "a.png", 1, 1);
        write_png(dir.path(), "b.png", 1, 1);

        let mut cache = AssetCache::new(dir.path());
        let failed = cache.preload(["a.png", "b.png", "missing.png"]);

        assert_eq!(failed, 1);
        assert_eq!(cache.len(), 3);
        assert!(!cache.evict("unknown.png"));
    }
}
