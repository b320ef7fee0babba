//! Reference-counted texture cache.
//!
//! Textures are keyed by their resource key (a file path, or a caller-chosen
//! name for solid rectangles). The first [`TextureManager::acquire`] of a key
//! creates the native texture through the [`TextureLoader`]; later acquires
//! only bump the reference count. [`TextureManager::release`] unloads the
//! native texture when the count drops to zero.

use std::rc::Rc;

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::backend::{LoadedTexture, TextureLoader};
use crate::components::color::Color;
use crate::components::texture::Texture;
use crate::error::{Result, SpriteError};

struct Entry {
    texture: Rc<Texture>,
    refs: usize,
}

#[derive(Default)]
pub struct TextureManager {
    entries: FxHashMap<String, Entry>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the texture at `key` or take another reference to the cached one.
    pub fn acquire(&mut self, key: &str, loader: &mut dyn TextureLoader) -> Result<Rc<Texture>> {
        self.acquire_with(key, |loader| loader.load_file(key), loader)
    }

    /// Like [`acquire`](Self::acquire) for a solid `width` x `height`
    /// rectangle filled with `color`. A cached texture is reused as is.
    pub fn acquire_solid(
        &mut self,
        key: &str,
        width: i32,
        height: i32,
        color: Color,
        loader: &mut dyn TextureLoader,
    ) -> Result<Rc<Texture>> {
        self.acquire_with(
            key,
            |loader| loader.create_solid(width, height, color),
            loader,
        )
    }

    fn acquire_with<F>(
        &mut self,
        key: &str,
        create: F,
        loader: &mut dyn TextureLoader,
    ) -> Result<Rc<Texture>>
    where
        F: FnOnce(&mut dyn TextureLoader) -> std::result::Result<LoadedTexture, String>,
    {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.refs += 1;
            debug!("texture {} now has {} references", key, entry.refs);
            return Ok(entry.texture.clone());
        }
        let loaded = create(loader).map_err(|reason| SpriteError::TextureLoad {
            key: key.to_string(),
            reason,
        })?;
        let texture = Rc::new(Texture::new(
            key,
            loaded.handle,
            loaded.width,
            loaded.height,
        ));
        info!(
            "loaded texture {} ({}x{}, handle {})",
            key, loaded.width, loaded.height, loaded.handle.0
        );
        self.entries.insert(
            key.to_string(),
            Entry {
                texture: texture.clone(),
                refs: 1,
            },
        );
        Ok(texture)
    }

    /// Drop one reference. Returns `true` if the texture was unloaded.
    pub fn release(&mut self, key: &str, loader: &mut dyn TextureLoader) -> Result<bool> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| SpriteError::UnknownTexture(key.to_string()))?;
        entry.refs -= 1;
        if entry.refs > 0 {
            debug!("texture {} now has {} references", key, entry.refs);
            return Ok(false);
        }
        if let Some(entry) = self.entries.remove(key) {
            loader.unload(entry.texture.handle());
            info!("unloaded texture {}", key);
        }
        Ok(true)
    }

    /// Current reference count, 0 for unknown keys.
    pub fn refcount(&self, key: &str) -> usize {
        self.entries.get(key).map_or(0, |e| e.refs)
    }

    pub fn get(&self, key: &str) -> Option<Rc<Texture>> {
        self.entries.get(key).map(|e| e.texture.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unload every cached texture regardless of its reference count.
    pub fn clear(&mut self, loader: &mut dyn TextureLoader) {
        for (key, entry) in self.entries.drain() {
            loader.unload(entry.texture.handle());
            debug!("unloaded texture {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingBackend;

    #[test]
    fn test_acquire_twice_release_twice() {
        let mut loader = RecordingBackend::new().with_file("a.png", 8, 8);
        let mut textures = TextureManager::new();

        let first = textures.acquire("a.png", &mut loader).unwrap();
        let second = textures.acquire("a.png", &mut loader).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(textures.refcount("a.png"), 2);
        assert_eq!(loader.loads(), 1);

        assert!(!textures.release("a.png", &mut loader).unwrap());
        assert_eq!(textures.refcount("a.png"), 1);
        assert!(textures.get("a.png").is_some());

        assert!(textures.release("a.png", &mut loader).unwrap());
        assert_eq!(textures.refcount("a.png"), 0);
        assert!(textures.get("a.png").is_none());
        assert_eq!(loader.unloads(), 1);
    }

    #[test]
    fn test_load_failure_is_not_cached() {
        let mut loader = RecordingBackend::new();
        let mut textures = TextureManager::new();
        let err = textures.acquire("nope.png", &mut loader).unwrap_err();
        assert!(matches!(err, SpriteError::TextureLoad { ref key, .. } if key == "nope.png"));
        assert!(textures.is_empty());
    }

    #[test]
    fn test_release_unknown() {
        let mut loader = RecordingBackend::new();
        let mut textures = TextureManager::new();
        assert_eq!(
            textures.release("x", &mut loader).unwrap_err(),
            SpriteError::UnknownTexture("x".into())
        );
    }

    #[test]
    fn test_solid_texture_dimensions() {
        let mut loader = RecordingBackend::new();
        let mut textures = TextureManager::new();
        let tex = textures
            .acquire_solid("bar", 30, 5, Color::WHITE, &mut loader)
            .unwrap();
        assert_eq!((tex.width(), tex.height()), (30, 5));
        assert_eq!(tex.key(), "bar");
        assert!(textures
            .acquire_solid("bad", 0, 5, Color::WHITE, &mut loader)
            .is_err());
    }

    #[test]
    fn test_clear_unloads_everything() {
        let mut loader = RecordingBackend::new();
        let mut textures = TextureManager::new();
        textures.acquire_solid("a", 1, 1, Color::WHITE, &mut loader).unwrap();
        textures.acquire_solid("a", 1, 1, Color::WHITE, &mut loader).unwrap();
        textures.acquire_solid("b", 1, 1, Color::WHITE, &mut loader).unwrap();
        textures.clear(&mut loader);
        assert!(textures.is_empty());
        assert_eq!(loader.live_textures(), 0);
    }
}
