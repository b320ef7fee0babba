//! Screen size resource.
//!
//! Stores the current framebuffer dimensions in pixels. The [`Manager`] owns
//! the authoritative copy; the ECS resource is what the host updates on a
//! window resize, and
//! [`sync_screen_size`](crate::systems::screensize::sync_screen_size)
//! propagates it into the manager and its value parser.
//!
//! [`Manager`]: crate::resources::manager::Manager

use bevy_ecs::prelude::Resource;

/// Current screen size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl ScreenSize {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}
