//! Sprite and render queue data types.
//!
//! Submodules overview:
//! - [`color`] – RGBA tint color for destinations and solid textures
//! - [`rect`] – integer rectangle for source and destination areas
//! - [`renderitem`] – one render queue entry (shared sprite + destination index)
//! - [`renderoptions`] – `bitflags` set of flip/rotation/blend/modulation flags
//! - [`sprite`] – drawable part of a texture with one or more destinations
//! - [`texture`] – immutable descriptor of a backend texture

pub mod color;
pub mod rect;
pub mod renderitem;
pub mod renderoptions;
pub mod sprite;
pub mod texture;
