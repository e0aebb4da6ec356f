use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::image::{self, ImageDataError};

/// Caches GPU textures for image sources, keyed by a hash of the source string.
///
/// Sources that fail to decode are remembered so they are not retried every
/// frame.
pub struct TextureManager {
    texture_cache: HashMap<u64, TextureHandle>,
    failed: HashMap<u64, String>,
    /// Tracks when each texture was last used
    last_used: HashMap<u64, u64>,
    current_frame: u64,
    max_cache_size: usize,
}

fn source_key(src: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    src.hash(&mut hasher);
    hasher.finish()
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            failed: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size,
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture for an image source, decoding data URLs on first use.
    ///
    /// Returns `None` for remote URLs and undecodable data.
    pub fn texture_for_source(&mut self, src: &str, ctx: &Context) -> Option<TextureId> {
        if !image::is_data_url(src) {
            return None;
        }
        self.get_or_create_texture(src, || image::decode_data_url_image(src), ctx).ok()
    }

    pub fn get_or_create_texture<F>(&mut self, src: &str, generator: F, ctx: &Context) -> Result<TextureId, ImageDataError>
    where
        F: FnOnce() -> Result<ColorImage, ImageDataError>,
    {
        let key = source_key(src);

        if let Some(handle) = self.texture_cache.get(&key) {
            self.last_used.insert(key, self.current_frame);
            return Ok(handle.id());
        }
        if let Some(reason) = self.failed.get(&key) {
            return Err(ImageDataError::Unavailable(reason.clone()));
        }

        let image = match generator() {
            Ok(image) => image,
            Err(err) => {
                log::error!("Failed to load image texture: {err}");
                self.failed.insert(key, err.to_string());
                return Err(err);
            }
        };

        let handle = ctx.load_texture(format!("image_{key:016x}"), image, TextureOptions::LINEAR);
        self.texture_cache.insert(key, handle.clone());
        self.last_used.insert(key, self.current_frame);
        self.prune_cache_if_needed();

        Ok(handle.id())
    }

    /// Prunes the least recently used textures beyond the cache size
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(u64, u64)> = self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len().saturating_sub(self.max_cache_size);
        for (key, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(key);
            self.last_used.remove(key);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.failed.clear();
        self.last_used.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn is_cached(&self, src: &str) -> bool {
        self.texture_cache.contains_key(&source_key(src))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_texture_generator() -> Result<ColorImage, ImageDataError> {
        Ok(ColorImage::new([10, 10], egui::Color32::WHITE))
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);

        let texture_id1 = manager.get_or_create_texture("data:a", mock_texture_generator, &ctx).unwrap();
        let texture_id2 = manager.get_or_create_texture("data:a", mock_texture_generator, &ctx).unwrap();

        assert_eq!(texture_id1, texture_id2);
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);

        manager.get_or_create_texture("data:1", mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture("data:2", mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture("data:3", mock_texture_generator, &ctx).unwrap();

        assert_eq!(manager.cache_size(), 2);
        assert!(!manager.is_cached("data:1"));
        assert!(manager.is_cached("data:2"));
        assert!(manager.is_cached("data:3"));
    }

    #[test]
    fn test_failed_source_not_retried() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);

        assert!(manager.texture_for_source("data:image/png;base64,AAAA", &ctx).is_none());
        let mut called = false;
        let result = manager.get_or_create_texture(
            "data:image/png;base64,AAAA",
            || {
                called = true;
                mock_texture_generator()
            },
            &ctx,
        );
        assert!(result.is_err());
        assert!(!called);
    }

    #[test]
    fn test_remote_source_has_no_texture() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        assert!(manager.texture_for_source("https://example.com/a.png", &ctx).is_none());
        assert_eq!(manager.cache_size(), 0);
    }
}
