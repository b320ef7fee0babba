//! Long-lived state: the sprite manager and what it owns, plus the ECS
//! resources the host inserts into the world.
//!
//! Overview
//! - `displayconfig` – window title, screen size and frame rate from an INI file
//! - `manager` – root object owning sprites, textures and the render queue
//! - `screensize` – current framebuffer dimensions in pixels
//! - `spritemanager` – sprite registry and fail-fast batch setters
//! - `texturemanager` – reference-counted texture cache
pub mod displayconfig;
pub mod manager;
pub mod screensize;
pub mod spritemanager;
pub mod texturemanager;
