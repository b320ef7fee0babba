//! spritequeue library.
//!
//! A 2D sprite toolkit core: an ordered render queue of sprite instances,
//! reference-counted textures, and a string-directive interpreter that
//! repositions and restyles sprites (`"centerIn 0 0 100%w 100%h"`).
//!
//! - [`backend`] – drawing and texture loading traits, headless and raylib backends
//! - [`components`] – sprites, textures, render items and their value types
//! - [`directives`] – value parser and directive interpreters
//! - [`error`] – the crate error type
//! - [`resources`] – the sprite manager, its registries and ECS resources
//! - [`systems`] – ECS systems and the frame render pass

pub mod backend;
pub mod components;
pub mod directives;
pub mod error;
pub mod resources;
pub mod systems;
