//! Decoded sticker images.

use crate::renderer::{RenderResult, RendererError};
use artfolio_core::StickerAsset;
use image::RgbaImage;
use std::collections::HashMap;
use std::path::Path;

/// Decoded sticker images keyed by catalog name.
#[derive(Debug, Default, Clone)]
pub struct StickerAssets {
    images: HashMap<String, RgbaImage>,
}

impl StickerAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every catalog entry found under `assets_dir`.
    ///
    /// Entries whose file is missing or unreadable are skipped with a
    /// warning; rendering a sticker that uses one fails later with
    /// [`RendererError::MissingAsset`].
    pub fn load_catalog(catalog: &[StickerAsset], assets_dir: &Path) -> Self {
        let mut assets = Self::new();
        for entry in catalog {
            let path = assets_dir.join(&entry.path);
            match image::open(&path) {
                Ok(img) => {
                    assets.insert(&entry.name, img.to_rgba8());
                }
                Err(e) => {
                    log::warn!("Could not load sticker {:?} from {}: {}", entry.name, path.display(), e);
                }
            }
        }
        log::debug!("Loaded {}/{} sticker assets", assets.len(), catalog.len());
        assets
    }

    /// Decode an encoded image (PNG, JPEG or WebP) and register it.
    pub fn insert_encoded(&mut self, name: &str, data: &[u8]) -> RenderResult<()> {
        let img = image::load_from_memory(data).map_err(|e| RendererError::Decode(format!("{}: {}", name, e)))?;
        self.insert(name, img.to_rgba8());
        Ok(())
    }

    pub fn insert(&mut self, name: &str, image: RgbaImage) {
        self.images.insert(name.to_string(), image);
    }

    pub fn get(&self, name: &str) -> Option<&RgbaImage> {
        self.images.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_load_catalog_skips_missing() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("stickers")).unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([255, 200, 0, 255]))
            .save(dir.path().join("stickers/sun.png"))
            .unwrap();

        let catalog = vec![
            StickerAsset { name: "sun".into(), path: "stickers/sun.png".into() },
            StickerAsset { name: "moon".into(), path: "stickers/moon.png".into() },
        ];
        let assets = StickerAssets::load_catalog(&catalog, dir.path());

        assert_eq!(assets.len(), 1);
        assert_eq!(assets.get("sun").unwrap().get_pixel(0, 0), &Rgba([255, 200, 0, 255]));
        assert!(!assets.contains("moon"));
    }

    #[test]
    fn test_insert_encoded_rejects_garbage() {
        let mut assets = StickerAssets::new();
        assert!(matches!(assets.insert_encoded("bad", b"not an image"), Err(RendererError::Decode(_))));
        assert!(assets.is_empty());
    }
}
