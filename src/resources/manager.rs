//! Root sprite manager and render queue.
//!
//! [`Manager`] owns the sprite registry, the texture cache, the value parser
//! and the render queue. The queue is a contiguous `Vec<RenderItem>` whose
//! order is the draw order: index 0 is drawn first and ends up at the back.
//!
//! The manager holds `Rc`-shared sprites and is therefore `!Send`; in an ECS
//! world it is stored as a non-send resource and accessed through
//! `NonSend<Manager>` / `NonSendMut<Manager>`.
//!
//! Queue operations come in two flavours:
//! - index based (`push_to_render_queue`, `swap_in_render_queue*`), taking
//!   sprite references directly;
//! - name based (`append_to_render_queue`, `insert_in_render_queue_*`,
//!   `move_in_render_queue_*`, ...), resolving sprites through the registry
//!   and anchors through [`Manager::find_in_render_queue`].
//!
//! Every failing operation leaves the queue unchanged.

use std::rc::Rc;

use log::{debug, info};

use crate::backend::{DrawCall, RenderBackend, TextureLoader};
use crate::components::color::Color;
use crate::components::rect::Rect;
use crate::components::renderitem::{RenderItem, SpriteRef};
use crate::components::texture::Texture;
use crate::directives::queuemanipulation::QueueManipulation;
use crate::directives::spritemanipulation::SpriteManipulation;
use crate::directives::valueparser::ValueParser;
use crate::error::{Result, SpriteError};
use crate::resources::screensize::ScreenSize;
use crate::resources::spritemanager::SpriteManager;
use crate::resources::texturemanager::TextureManager;

/// Visibility change requested by [`Manager::toggle_render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
    Flip,
}

pub struct Manager {
    name: String,
    screen: ScreenSize,
    parser: ValueParser,
    sprites: SpriteManager,
    textures: TextureManager,
    render_queue: Vec<RenderItem>,
    /// Deleted sprites whose texture reference is released once no render
    /// item points at them anymore.
    retired: Vec<SpriteRef>,
}

impl Manager {
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        let name = name.into();
        info!("sprite manager '{}' created for {}x{}", name, width, height);
        Self {
            name,
            screen: ScreenSize::new(width, height),
            parser: ValueParser::new(width, height),
            sprites: SpriteManager::new(),
            textures: TextureManager::new(),
            render_queue: Vec::new(),
            retired: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.screen
    }

    /// Change the screen size and propagate it to the value parser.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.screen = ScreenSize::new(width, height);
        self.parser.set_screen_size(self.screen);
        info!("sprite manager '{}' resized to {}x{}", self.name, width, height);
    }

    pub fn parser(&self) -> &ValueParser {
        &self.parser
    }

    pub fn sprites(&self) -> &SpriteManager {
        &self.sprites
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Directive interpreter bound to this manager's sprites and parser.
    pub fn manipulation(&self) -> SpriteManipulation<'_> {
        SpriteManipulation::new(&self.sprites, &self.parser)
    }

    /// Directive interpreter for render queue edits.
    pub fn queue_manipulation(&mut self) -> QueueManipulation<'_> {
        QueueManipulation::new(self)
    }

    // ---------------------------------------------------------------------
    // Sprites and textures
    // ---------------------------------------------------------------------

    /// Create a sprite from `source` inside the texture at `texture_key`,
    /// loading the texture if it is not cached yet.
    ///
    /// Each sprite holds one reference on its texture.
    pub fn create_sprite(
        &mut self,
        name: &str,
        texture_key: &str,
        source: Rect,
        loader: &mut dyn TextureLoader,
    ) -> Result<SpriteRef> {
        if self.sprites.contains(name) {
            return Err(SpriteError::DuplicateSprite(name.to_string()));
        }
        let texture = self.textures.acquire(texture_key, loader)?;
        self.sprites.create_sprite(name, texture, source)
    }

    /// Load the texture at `path` together with a full-texture sprite of the
    /// same name.
    pub fn create_texture_from_file(
        &mut self,
        path: &str,
        loader: &mut dyn TextureLoader,
    ) -> Result<Rc<Texture>> {
        if self.sprites.contains(path) {
            return Err(SpriteError::DuplicateSprite(path.to_string()));
        }
        let texture = self.textures.acquire(path, loader)?;
        self.sprites
            .create_sprite(path, texture.clone(), Rect::default())?;
        Ok(texture)
    }

    /// Create a solid `width` x `height` texture filled with `color`
    /// together with a full-texture sprite of the same name.
    pub fn create_texture_from_rectangle(
        &mut self,
        name: &str,
        width: i32,
        height: i32,
        color: Color,
        loader: &mut dyn TextureLoader,
    ) -> Result<Rc<Texture>> {
        if self.sprites.contains(name) {
            return Err(SpriteError::DuplicateSprite(name.to_string()));
        }
        let texture = self
            .textures
            .acquire_solid(name, width, height, color, loader)?;
        let sprite = self
            .sprites
            .create_sprite(name, texture.clone(), Rect::default())?;
        sprite.borrow_mut().set_color(color, 0)?;
        Ok(texture)
    }

    /// Unregister a sprite and drop its texture reference.
    ///
    /// Render items that still draw the sprite keep it alive; in that case
    /// the texture reference is dropped by a later
    /// [`release_retired`](Self::release_retired) once the items are gone.
    pub fn delete_sprite(&mut self, name: &str, loader: &mut dyn TextureLoader) -> Result<()> {
        let sprite = self.sprites.remove(name)?;
        self.retired.push(sprite);
        self.release_retired(loader)?;
        Ok(())
    }

    /// Release the texture references of deleted sprites that are no longer
    /// queued. Returns the number of sprites released.
    pub fn release_retired(&mut self, loader: &mut dyn TextureLoader) -> Result<usize> {
        if self.retired.is_empty() {
            return Ok(0);
        }
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.retired)
            .into_iter()
            .partition(|sprite| Rc::strong_count(sprite) == 1);
        self.retired = waiting;
        let released = ready.len();
        let mut first_error = None;
        for sprite in ready {
            let key = sprite.borrow().texture().key().to_string();
            drop(sprite);
            if let Err(e) = self.textures.release(&key, loader) {
                first_error.get_or_insert(e);
            }
        }
        if released > 0 {
            debug!("released {} retired sprites", released);
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(released),
        }
    }

    /// Delete the texture at `key` together with the full-texture sprite of
    /// the same name created by `create_texture_from_*`.
    ///
    /// Fails with [`SpriteError::TextureInUse`] while any other sprite holds
    /// a reference on the texture or the same-named sprite is still queued.
    /// Nothing is changed in that case.
    pub fn delete_texture(&mut self, key: &str, loader: &mut dyn TextureLoader) -> Result<()> {
        let refs = self.textures.refcount(key);
        if refs == 0 {
            return Err(SpriteError::UnknownTexture(key.to_string()));
        }
        let own = self
            .sprites
            .find(key)
            .filter(|sprite| sprite.borrow().texture().key() == key);
        let queued = own.as_ref().is_some_and(|sprite| {
            self.render_queue
                .iter()
                .any(|item| Rc::ptr_eq(item.sprite(), sprite))
        });
        let others = refs - usize::from(own.is_some());
        if others > 0 || queued {
            return Err(SpriteError::TextureInUse {
                key: key.to_string(),
                refs: others + usize::from(queued),
            });
        }
        drop(own);
        self.delete_sprite(key, loader)?;
        info!("deleted texture {}", key);
        Ok(())
    }

    /// Sprites deleted from the registry but still referenced by the queue.
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    pub fn center_sprite_in_sprite(
        &self,
        to_center: &str,
        target: &str,
        destination_this: usize,
        destination_other: usize,
    ) -> Result<()> {
        self.sprites
            .center_sprite_in_sprite(to_center, target, destination_this, destination_other)
    }

    /// Drop the queue, every sprite and every texture.
    pub fn clear(&mut self, loader: &mut dyn TextureLoader) {
        self.render_queue.clear();
        self.retired.clear();
        self.sprites.clear();
        self.textures.clear(loader);
        info!("sprite manager '{}' cleared", self.name);
    }

    // ---------------------------------------------------------------------
    // Render queue, index based
    // ---------------------------------------------------------------------

    pub fn render_queue(&self) -> &[RenderItem] {
        &self.render_queue
    }

    pub fn render_queue_len(&self) -> usize {
        self.render_queue.len()
    }

    /// Append `destination` of `sprite` to the end of the queue (front-most).
    ///
    /// Returns the position of the new item.
    pub fn push_to_render_queue(&mut self, sprite: &SpriteRef, destination: usize) -> Result<usize> {
        let item = RenderItem::new(sprite.clone(), destination)?;
        debug!("queue push {:?} at {}", item, self.render_queue.len());
        self.render_queue.push(item);
        Ok(self.render_queue.len() - 1)
    }

    /// Exchange the items at positions `a` and `b`.
    pub fn swap_in_render_queue(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_position(a)?;
        self.check_position(b)?;
        self.render_queue.swap(a, b);
        debug!("queue swap {} <-> {}", a, b);
        Ok(())
    }

    /// Replace the item at `position`. Returns the replaced item.
    pub fn swap_in_render_queue_at_position(
        &mut self,
        position: usize,
        sprite: &SpriteRef,
        destination: usize,
    ) -> Result<RenderItem> {
        self.check_position(position)?;
        let item = RenderItem::new(sprite.clone(), destination)?;
        debug!("queue replace {} with {:?}", position, item);
        Ok(std::mem::replace(&mut self.render_queue[position], item))
    }

    /// Replace the last (front-most) item. Returns the replaced item.
    pub fn swap_in_render_queue_last_position(
        &mut self,
        sprite: &SpriteRef,
        destination: usize,
    ) -> Result<RenderItem> {
        let last = self
            .render_queue
            .len()
            .checked_sub(1)
            .ok_or(SpriteError::EmptyQueue)?;
        self.swap_in_render_queue_at_position(last, sprite, destination)
    }

    fn check_position(&self, index: usize) -> Result<()> {
        if index < self.render_queue.len() {
            Ok(())
        } else {
            Err(SpriteError::IndexOutOfRange {
                index,
                size: self.render_queue.len(),
            })
        }
    }

    // ---------------------------------------------------------------------
    // Render queue, name based
    // ---------------------------------------------------------------------

    /// Position of the first item drawing `destination` of sprite `name`.
    pub fn find_in_render_queue(&self, name: &str, destination: usize) -> Option<usize> {
        self.render_queue
            .iter()
            .position(|item| item.refers_to(name, destination))
    }

    fn position_of(&self, name: &str, destination: usize) -> Result<usize> {
        self.find_in_render_queue(name, destination)
            .ok_or_else(|| SpriteError::RenderItemNotFound {
                name: name.to_string(),
                destination,
            })
    }

    fn new_item(&self, name: &str, destination: usize) -> Result<RenderItem> {
        RenderItem::new(self.sprites.get(name)?, destination)
    }

    pub fn append_to_render_queue(&mut self, name: &str, destination: usize) -> Result<usize> {
        let sprite = self.sprites.get(name)?;
        self.push_to_render_queue(&sprite, destination)
    }

    /// Insert a new item right after the anchor item (drawn on top of it).
    ///
    /// Returns the position of the new item.
    pub fn insert_in_render_queue_after(
        &mut self,
        to_add: &str,
        after: &str,
        destination_add: usize,
        destination_after: usize,
    ) -> Result<usize> {
        let item = self.new_item(to_add, destination_add)?;
        let position = self.position_of(after, destination_after)? + 1;
        debug!("queue insert {:?} at {}", item, position);
        self.render_queue.insert(position, item);
        Ok(position)
    }

    /// Insert a new item right before the anchor item (drawn below it).
    pub fn insert_in_render_queue_before(
        &mut self,
        to_add: &str,
        before: &str,
        destination_add: usize,
        destination_before: usize,
    ) -> Result<usize> {
        let item = self.new_item(to_add, destination_add)?;
        let position = self.position_of(before, destination_before)?;
        debug!("queue insert {:?} at {}", item, position);
        self.render_queue.insert(position, item);
        Ok(position)
    }

    /// Move an already queued item right after the anchor item.
    ///
    /// Returns the new position of the moved item.
    pub fn move_in_render_queue_after(
        &mut self,
        to_move: &str,
        after: &str,
        destination_move: usize,
        destination_after: usize,
    ) -> Result<usize> {
        let (from, anchor) =
            self.move_positions(to_move, after, destination_move, destination_after)?;
        Ok(self.relocate(from, anchor, 1))
    }

    /// Move an already queued item right before the anchor item.
    pub fn move_in_render_queue_before(
        &mut self,
        to_move: &str,
        before: &str,
        destination_move: usize,
        destination_before: usize,
    ) -> Result<usize> {
        let (from, anchor) =
            self.move_positions(to_move, before, destination_move, destination_before)?;
        Ok(self.relocate(from, anchor, 0))
    }

    fn move_positions(
        &self,
        to_move: &str,
        anchor: &str,
        destination_move: usize,
        destination_anchor: usize,
    ) -> Result<(usize, usize)> {
        Ok((
            self.position_of(to_move, destination_move)?,
            self.position_of(anchor, destination_anchor)?,
        ))
    }

    /// Move the item at `from` to `anchor + offset`, where `anchor` is the
    /// anchor's position before the move.
    fn relocate(&mut self, from: usize, anchor: usize, offset: usize) -> usize {
        if from == anchor {
            return from;
        }
        let item = self.render_queue.remove(from);
        let anchor = if from < anchor { anchor - 1 } else { anchor };
        let to = anchor + offset;
        debug!("queue move {:?} {} -> {}", item, from, to);
        self.render_queue.insert(to, item);
        to
    }

    /// Replace the first item drawing `to_remove` with a new item drawing
    /// `to_add`. Returns the replaced item.
    pub fn swap_in_render_queue_by_name(
        &mut self,
        to_add: &str,
        to_remove: &str,
        destination_add: usize,
        destination_remove: usize,
    ) -> Result<RenderItem> {
        let item = self.new_item(to_add, destination_add)?;
        let position = self.position_of(to_remove, destination_remove)?;
        debug!("queue replace {} with {:?}", position, item);
        Ok(std::mem::replace(&mut self.render_queue[position], item))
    }

    /// Remove the first item drawing `destination` of sprite `name`.
    pub fn remove_from_render_queue(&mut self, name: &str, destination: usize) -> Result<RenderItem> {
        let position = self.position_of(name, destination)?;
        let item = self.render_queue.remove(position);
        debug!("queue remove {:?} from {}", item, position);
        Ok(item)
    }

    pub fn clear_render_queue(&mut self) {
        self.render_queue.clear();
    }

    /// Show, hide or flip every item drawing `destination` of sprite `name`.
    ///
    /// Hidden items keep their position. Returns the number of items changed.
    pub fn toggle_render(&mut self, name: &str, destination: usize, toggle: Toggle) -> Result<usize> {
        let mut count = 0;
        for item in self
            .render_queue
            .iter_mut()
            .filter(|item| item.refers_to(name, destination))
        {
            let visible = match toggle {
                Toggle::On => true,
                Toggle::Off => false,
                Toggle::Flip => !item.is_visible(),
            };
            item.set_visible(visible);
            count += 1;
        }
        if count == 0 {
            return Err(SpriteError::RenderItemNotFound {
                name: name.to_string(),
                destination,
            });
        }
        debug!("toggle {:?} {}[{}] on {} items", toggle, name, destination, count);
        Ok(count)
    }

    /// Topmost visible item whose destination contains (x, y).
    pub fn item_at(&self, x: i32, y: i32) -> Option<&RenderItem> {
        self.render_queue
            .iter()
            .rev()
            .find(|item| item.is_visible() && item.is_inside(x, y))
    }

    // ---------------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------------

    /// Draw calls for the visible items, back to front.
    pub fn draw_calls(&self) -> Result<Vec<DrawCall>> {
        self.render_queue
            .iter()
            .filter(|item| item.is_visible())
            .map(draw_call)
            .collect()
    }

    /// Draw one frame. Returns the number of items drawn.
    pub fn render(&self, backend: &mut dyn RenderBackend) -> Result<usize> {
        let calls = self.draw_calls()?;
        backend.begin_frame();
        let outcome = calls.iter().try_for_each(|call| {
            backend.draw(call).map_err(|reason| SpriteError::Draw {
                sprite: call.sprite.clone(),
                reason,
            })
        });
        backend.end_frame();
        outcome.map(|()| calls.len())
    }
}

fn draw_call(item: &RenderItem) -> Result<DrawCall> {
    let sprite = item.sprite().borrow();
    let settings = sprite.settings(item.destination())?;
    Ok(DrawCall {
        sprite: sprite.name().to_string(),
        texture: sprite.texture().handle(),
        source: sprite.source(),
        destination: settings.destination,
        color: settings.color,
        options: settings.options,
    })
}
