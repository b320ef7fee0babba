//! String directive interpreters.
//!
//! Submodules overview:
//! - [`manipulation`] – sprite manipulators and their keyword dispatch table
//! - [`queuemanipulation`] – render queue edits by name (`insertAfter`, `swap`, ...)
//! - [`spritemanipulation`] – sprite directive entry point (`apply(name, directive)`)
//! - [`valueparser`] – numeric, screen-relative and render option tokens

pub mod manipulation;
pub mod queuemanipulation;
pub mod spritemanipulation;
pub mod valueparser;
