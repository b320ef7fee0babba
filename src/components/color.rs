//! RGBA color used for destination tinting.
//!
//! The color of a destination only affects rendering when its
//! [`RenderOptions`](crate::components::renderoptions::RenderOptions) request
//! `colormod` (RGB) or `alphamod` (A). It is also the fill color of solid
//! rectangle textures.

use serde::{Deserialize, Serialize};

/// 8-bit per channel RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00, 0xFF);

    /// Create a new color with the specified RGBA values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Opaque black, the initial color of every destination.
impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
