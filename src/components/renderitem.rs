//! Render queue entry.
//!
//! A [`RenderItem`] is one draw call: a shared sprite plus the index of the
//! destination to draw. Items share the sprite with the sprite registry and
//! with other items, so the same sprite can be queued any number of times.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::components::rect::Rect;
use crate::components::sprite::Sprite;
use crate::error::Result;

/// Shared, interior-mutable sprite reference.
pub type SpriteRef = Rc<RefCell<Sprite>>;

#[derive(Clone)]
pub struct RenderItem {
    sprite: SpriteRef,
    destination: usize,
    visible: bool,
}

impl RenderItem {
    /// Create an item for `destination` of `sprite`.
    ///
    /// Fails with `InvalidDestination` if the sprite has no such destination.
    pub fn new(sprite: SpriteRef, destination: usize) -> Result<Self> {
        sprite.borrow().check_destination(destination)?;
        Ok(Self {
            sprite,
            destination,
            visible: true,
        })
    }

    pub fn sprite(&self) -> &SpriteRef {
        &self.sprite
    }

    pub fn destination(&self) -> usize {
        self.destination
    }

    /// Hidden items keep their queue position but are skipped when drawing.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn sprite_name(&self) -> String {
        self.sprite.borrow().name().to_string()
    }

    /// Returns `true` if the item draws `destination` of the sprite called `name`.
    pub fn refers_to(&self, name: &str, destination: usize) -> bool {
        self.destination == destination && self.sprite.borrow().name() == name
    }

    /// Current destination rectangle of the referenced sprite.
    pub fn rect(&self) -> Result<Rect> {
        self.sprite.borrow().destination(self.destination)
    }

    /// Returns `true` if (x, y) lies inside the drawn destination.
    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        self.sprite.borrow().is_inside(x, y, self.destination)
    }
}

/// Items are equal when they draw the same sprite name at the same destination.
impl PartialEq for RenderItem {
    fn eq(&self, other: &Self) -> bool {
        self.destination == other.destination
            && self.sprite.borrow().name() == other.sprite.borrow().name()
    }
}

impl fmt::Debug for RenderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderItem")
            .field("sprite", &self.sprite.borrow().name())
            .field("destination", &self.destination)
            .field("visible", &self.visible)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::texture::{Texture, TextureHandle};

    fn sprite(name: &str) -> SpriteRef {
        let tex = Rc::new(Texture::new("t", TextureHandle(0), 8, 8));
        Rc::new(RefCell::new(Sprite::new(name, tex, Rect::default())))
    }

    #[test]
    fn test_new_rejects_unknown_destination() {
        assert!(RenderItem::new(sprite("a"), 1).is_err());
        assert!(RenderItem::new(sprite("a"), 0).is_ok());
    }

    #[test]
    fn test_clone_shares_sprite() {
        let s = sprite("a");
        let item = RenderItem::new(s.clone(), 0).unwrap();
        let copy = item.clone();
        assert!(Rc::ptr_eq(item.sprite(), copy.sprite()));
        assert_eq!(Rc::strong_count(&s), 3);
    }

    #[test]
    fn test_equality_by_name_and_destination() {
        let s = sprite("a");
        s.borrow_mut().add_destination(4, 4);
        let a0 = RenderItem::new(s.clone(), 0).unwrap();
        let a1 = RenderItem::new(s.clone(), 1).unwrap();
        let other_a0 = RenderItem::new(sprite("a"), 0).unwrap();
        assert_ne!(a0, a1);
        assert_eq!(a0, other_a0);
        assert!(a1.refers_to("a", 1));
    }

    #[test]
    fn test_sprite_mutation_visible_through_item() {
        let s = sprite("a");
        let item = RenderItem::new(s.clone(), 0).unwrap();
        s.borrow_mut().set_destination_origin(3, 4, 0).unwrap();
        assert_eq!(item.rect().unwrap(), Rect::new(3, 4, 8, 8));
        assert!(item.is_inside(5, 5));
    }
}
