//! Loaded texture descriptor.
//!
//! A [`Texture`] pairs a resource key with the opaque handle the backend gave
//! back when the texture was loaded. It is never mutated after creation and is
//! shared (`Rc<Texture>`) by every sprite that draws from it.

use serde::{Deserialize, Serialize};

/// Backend-issued identifier of a native texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Immutable description of a texture living in the backend.
#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    key: String,
    handle: TextureHandle,
    width: i32,
    height: i32,
}

impl Texture {
    pub fn new(key: impl Into<String>, handle: TextureHandle, width: i32, height: i32) -> Self {
        Self {
            key: key.into(),
            handle,
            width,
            height,
        }
    }

    /// Resource key the texture is cached under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}
