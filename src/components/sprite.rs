//! Sprite: a drawable part of a texture.
//!
//! A [`Sprite`] selects a source rectangle of a shared [`Texture`] and carries
//! one or more destinations ([`RenderSettings`]) describing where, how large
//! and with which color/options the sprite is drawn. The same sprite can be
//! drawn several times per frame by queuing different destination indices.
//!
//! Destinations can be added but never removed, so an index that was valid
//! when a render item was queued stays valid.

use std::rc::Rc;

use log::debug;

use crate::components::color::Color;
use crate::components::rect::Rect;
use crate::components::renderoptions::RenderOptions;
use crate::components::texture::Texture;
use crate::directives::valueparser::round_to_i32;
use crate::error::{Result, SpriteError};

/// Where and how one copy of a sprite is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RenderSettings {
    pub destination: Rect,
    pub color: Color,
    pub options: RenderOptions,
}

#[derive(Debug)]
pub struct Sprite {
    name: String,
    texture: Rc<Texture>,
    source: Rect,
    destinations: Vec<RenderSettings>,
}

impl Sprite {
    /// Create a sprite from `source` inside `texture`.
    ///
    /// A zero source width or height selects the texture's full width or
    /// height. The sprite starts with one destination at the origin with the
    /// source size.
    pub fn new(name: impl Into<String>, texture: Rc<Texture>, source: Rect) -> Self {
        let mut source = source;
        if source.w == 0 {
            source.w = texture.width();
        }
        if source.h == 0 {
            source.h = texture.height();
        }
        let name = name.into();
        debug!(
            "new sprite {} from texture {} ({}x{})",
            name,
            texture.key(),
            source.w,
            source.h
        );
        Self {
            name,
            texture,
            source,
            destinations: vec![RenderSettings {
                destination: Rect::new(0, 0, source.w, source.h),
                ..Default::default()
            }],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    pub fn source(&self) -> Rect {
        self.source
    }

    /// Number of defined destinations (always at least one).
    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    pub fn destinations(&self) -> &[RenderSettings] {
        &self.destinations
    }

    /// Fails with [`SpriteError::InvalidDestination`] if `index` is out of range.
    pub fn check_destination(&self, index: usize) -> Result<()> {
        if index < self.destinations.len() {
            Ok(())
        } else {
            Err(SpriteError::InvalidDestination {
                sprite: self.name.clone(),
                index,
                count: self.destinations.len(),
            })
        }
    }

    pub fn settings(&self, index: usize) -> Result<&RenderSettings> {
        self.check_destination(index)?;
        Ok(&self.destinations[index])
    }

    pub fn settings_mut(&mut self, index: usize) -> Result<&mut RenderSettings> {
        self.check_destination(index)?;
        Ok(&mut self.destinations[index])
    }

    pub fn destination(&self, index: usize) -> Result<Rect> {
        Ok(self.settings(index)?.destination)
    }

    /// Append a destination at (x, y) with the source size and default
    /// settings. Returns its index.
    pub fn add_destination(&mut self, x: i32, y: i32) -> usize {
        self.destinations.push(RenderSettings {
            destination: Rect::new(x, y, self.source.w, self.source.h),
            ..Default::default()
        });
        self.destinations.len() - 1
    }

    pub fn set_destination(&mut self, rect: Rect, index: usize) -> Result<()> {
        self.settings_mut(index)?.destination = rect;
        Ok(())
    }

    /// Move a destination, keeping its size.
    pub fn set_destination_origin(&mut self, x: i32, y: i32, index: usize) -> Result<()> {
        let dest = &mut self.settings_mut(index)?.destination;
        dest.x = x;
        dest.y = y;
        Ok(())
    }

    /// Resize a destination, keeping its origin.
    pub fn set_destination_size(&mut self, w: i32, h: i32, index: usize) -> Result<()> {
        let dest = &mut self.settings_mut(index)?.destination;
        dest.w = w;
        dest.h = h;
        Ok(())
    }

    pub fn set_color(&mut self, color: Color, index: usize) -> Result<()> {
        self.settings_mut(index)?.color = color;
        Ok(())
    }

    /// Replace the render options of a destination.
    pub fn set_render_options(&mut self, options: RenderOptions, index: usize) -> Result<()> {
        self.settings_mut(index)?.options = options;
        Ok(())
    }

    /// Center destination `index` inside `area`, keeping its size.
    ///
    /// Half pixels are rounded away from zero. If the destination size
    /// changes later the sprite is no longer centered.
    pub fn center_in(&mut self, area: Rect, index: usize) -> Result<()> {
        let dest = self.destination(index)?;
        let (cx, cy) = area.center();
        let x = round_to_i32(cx - dest.w as f64 / 2.0, &self.name)?;
        let y = round_to_i32(cy - dest.h as f64 / 2.0, &self.name)?;
        self.set_destination_origin(x, y, index)
    }

    /// Returns `true` if (x, y) lies inside destination `index`.
    pub fn is_inside(&self, x: i32, y: i32, index: usize) -> bool {
        self.destinations
            .get(index)
            .is_some_and(|s| s.destination.contains(x, y))
    }
}
