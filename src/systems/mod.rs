//! ECS systems and passes.
//!
//! Submodules overview
//! - [`render`] – draw the render queue through a backend once per frame
//! - [`screensize`] – propagate [`crate::resources::screensize::ScreenSize`] into the manager

pub mod render;
pub mod screensize;
