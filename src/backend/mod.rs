//! Graphics backend seam.
//!
//! The core never talks to a graphics library directly. Drawing goes through
//! [`RenderBackend`], texture creation and destruction through
//! [`TextureLoader`].
//!
//! Submodules overview:
//! - [`recording`] – headless backend that records every frame
//! - `raylib` – window backend on top of raylib (feature `raylib`)

use serde::Serialize;

use crate::components::color::Color;
use crate::components::rect::Rect;
use crate::components::renderoptions::RenderOptions;
use crate::components::texture::TextureHandle;

#[cfg(feature = "raylib")]
pub mod raylib;
pub mod recording;

/// Everything the backend needs to draw one render item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DrawCall {
    pub sprite: String,
    pub texture: TextureHandle,
    pub source: Rect,
    pub destination: Rect,
    pub color: Color,
    pub options: RenderOptions,
}

/// A texture freshly created by a [`TextureLoader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadedTexture {
    pub handle: TextureHandle,
    pub width: i32,
    pub height: i32,
}

pub trait RenderBackend {
    fn begin_frame(&mut self);
    /// Draw one item. Calls arrive in queue order, back to front.
    fn draw(&mut self, call: &DrawCall) -> Result<(), String>;
    fn end_frame(&mut self);
}

pub trait TextureLoader {
    /// Load the texture stored at `path`.
    fn load_file(&mut self, path: &str) -> Result<LoadedTexture, String>;
    /// Create a `width` x `height` texture filled with `color`.
    fn create_solid(&mut self, width: i32, height: i32, color: Color)
    -> Result<LoadedTexture, String>;
    fn unload(&mut self, handle: TextureHandle);
}
