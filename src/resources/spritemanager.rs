//! Sprite registry.
//!
//! [`SpriteManager`] owns the name → sprite map and offers batch setters that
//! apply one mutation to a [`Selection`] of sprites. Batches are fail-fast:
//! the first failure aborts the rest and is reported as
//! [`SpriteError::Batch`] naming the sprite and its position in the batch.
//! Sprites earlier in the batch keep their new values.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use rustc_hash::FxHashMap;

use crate::components::color::Color;
use crate::components::rect::Rect;
use crate::components::renderitem::SpriteRef;
use crate::components::renderoptions::RenderOptions;
use crate::components::sprite::Sprite;
use crate::components::texture::Texture;
use crate::error::{Result, SpriteError};

/// Which sprites a batch operation touches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Every registered sprite, in registration order.
    All,
    /// The named sprites, in the given order.
    Names(Vec<String>),
}

impl Selection {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Names(names.into_iter().map(Into::into).collect())
    }
}

#[derive(Default)]
pub struct SpriteManager {
    sprites: FxHashMap<String, SpriteRef>,
    order: Vec<String>,
}

impl SpriteManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sprite under its own name.
    pub fn insert(&mut self, sprite: Sprite) -> Result<SpriteRef> {
        let name = sprite.name().to_string();
        if self.sprites.contains_key(&name) {
            return Err(SpriteError::DuplicateSprite(name));
        }
        let sprite = Rc::new(RefCell::new(sprite));
        self.sprites.insert(name.clone(), sprite.clone());
        self.order.push(name);
        Ok(sprite)
    }

    /// Build a sprite from `source` inside `texture` and register it.
    pub fn create_sprite(
        &mut self,
        name: impl Into<String>,
        texture: Rc<Texture>,
        source: Rect,
    ) -> Result<SpriteRef> {
        let name = name.into();
        if self.sprites.contains_key(&name) {
            return Err(SpriteError::DuplicateSprite(name));
        }
        self.insert(Sprite::new(name, texture, source))
    }

    pub fn find(&self, name: impl AsRef<str>) -> Option<SpriteRef> {
        self.sprites.get(name.as_ref()).cloned()
    }

    /// Like [`find`](Self::find) but fails with [`SpriteError::UnknownSprite`].
    pub fn get(&self, name: impl AsRef<str>) -> Result<SpriteRef> {
        let name = name.as_ref();
        self.find(name)
            .ok_or_else(|| SpriteError::UnknownSprite(name.to_string()))
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.sprites.contains_key(name.as_ref())
    }

    /// Unregister a sprite. Render items that still reference it keep it alive.
    pub fn remove(&mut self, name: impl AsRef<str>) -> Result<SpriteRef> {
        let name = name.as_ref();
        let sprite = self
            .sprites
            .remove(name)
            .ok_or_else(|| SpriteError::UnknownSprite(name.to_string()))?;
        self.order.retain(|n| n != name);
        debug!("removed sprite {} from registry", name);
        Ok(sprite)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Unregister all sprites.
    pub fn clear(&mut self) -> Vec<SpriteRef> {
        self.order.clear();
        self.sprites.drain().map(|(_, s)| s).collect()
    }

    /// Run `f` on every selected sprite, stopping at the first failure.
    ///
    /// Returns the number of sprites processed.
    pub fn for_each_selected<F>(&self, selection: &Selection, mut f: F) -> Result<usize>
    where
        F: FnMut(&mut Sprite) -> Result<()>,
    {
        let names: &[String] = match selection {
            Selection::All => &self.order,
            Selection::Names(names) => names,
        };
        for (position, name) in names.iter().enumerate() {
            let outcome = self
                .get(name)
                .and_then(|sprite| f(&mut sprite.borrow_mut()));
            if let Err(e) = outcome {
                return Err(SpriteError::Batch {
                    name: name.clone(),
                    position,
                    source: Box::new(e),
                });
            }
        }
        Ok(names.len())
    }

    pub fn set_color(&self, selection: &Selection, color: Color, destination: usize) -> Result<usize> {
        self.for_each_selected(selection, |s| s.set_color(color, destination))
    }

    pub fn set_origin(
        &self,
        selection: &Selection,
        x: i32,
        y: i32,
        destination: usize,
    ) -> Result<usize> {
        self.for_each_selected(selection, |s| s.set_destination_origin(x, y, destination))
    }

    pub fn set_render_options(
        &self,
        selection: &Selection,
        options: RenderOptions,
        destination: usize,
    ) -> Result<usize> {
        self.for_each_selected(selection, |s| s.set_render_options(options, destination))
    }

    /// Center a destination of `to_center` inside a destination of `target`.
    pub fn center_sprite_in_sprite(
        &self,
        to_center: &str,
        target: &str,
        destination_this: usize,
        destination_other: usize,
    ) -> Result<()> {
        let sprite = self.get(to_center)?;
        let area = self.get(target)?.borrow().destination(destination_other)?;
        sprite.borrow_mut().center_in(area, destination_this)
    }
}
