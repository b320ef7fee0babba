//! Render queue directive interpreter.
//!
//! Queue directives reorder the draw queue by name, relative to other queued
//! items:
//!
//! | keyword        | arguments              | effect                                 |
//! |----------------|------------------------|----------------------------------------|
//! | `append`       |                        | queue on top of everything             |
//! | `insertAfter`  | `other [otherDest]`    | queue right above `other`              |
//! | `insertBefore` | `other [otherDest]`    | queue right below `other`              |
//! | `moveAfter`    | `other [otherDest]`    | move the queued item above `other`     |
//! | `moveBefore`   | `other [otherDest]`    | move the queued item below `other`     |
//! | `swap`         | `other [otherDest]`    | replace `other`'s item with this one   |
//! | `remove`       |                        | drop the item from the queue           |
//! | `toggle`       | `[on\|off]`            | show, hide or flip visibility          |

use log::debug;
use smallvec::SmallVec;

use crate::error::{Result, SpriteError};
use crate::resources::manager::{Manager, Toggle};

/// A parsed queue edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueCommand {
    Append,
    InsertAfter { other: String, destination: usize },
    InsertBefore { other: String, destination: usize },
    MoveAfter { other: String, destination: usize },
    MoveBefore { other: String, destination: usize },
    Swap { other: String, destination: usize },
    Remove,
    Toggle(Toggle),
}

impl QueueCommand {
    pub fn parse(directive: &str, manager: &Manager) -> Result<Self> {
        let tokens: SmallVec<[&str; 4]> = directive.split_whitespace().collect();
        let Some((command, args)) = tokens.split_first() else {
            return Err(SpriteError::UnknownCommand(String::new()));
        };
        let anchored = |args: &[&str]| -> Result<(String, usize)> {
            match args {
                [other] => Ok((other.to_string(), 0)),
                [other, destination] => {
                    let value = manager.parser().strings_to_numbers(&[*destination])?[0];
                    let destination = usize::try_from(value).map_err(|_| {
                        SpriteError::parse(*destination, "index must not be negative")
                    })?;
                    Ok((other.to_string(), destination))
                }
                _ => Err(SpriteError::ArgumentCount {
                    command: command.to_string(),
                    expected: "1 or 2",
                    found: args.len(),
                }),
            }
        };
        let bare = |args: &[&str]| -> Result<()> {
            if args.is_empty() {
                Ok(())
            } else {
                Err(SpriteError::ArgumentCount {
                    command: command.to_string(),
                    expected: "0",
                    found: args.len(),
                })
            }
        };
        let parsed = match *command {
            "append" => {
                bare(args)?;
                QueueCommand::Append
            }
            "remove" => {
                bare(args)?;
                QueueCommand::Remove
            }
            "insertAfter" => {
                let (other, destination) = anchored(args)?;
                QueueCommand::InsertAfter { other, destination }
            }
            "insertBefore" => {
                let (other, destination) = anchored(args)?;
                QueueCommand::InsertBefore { other, destination }
            }
            "moveAfter" => {
                let (other, destination) = anchored(args)?;
                QueueCommand::MoveAfter { other, destination }
            }
            "moveBefore" => {
                let (other, destination) = anchored(args)?;
                QueueCommand::MoveBefore { other, destination }
            }
            "swap" => {
                let (other, destination) = anchored(args)?;
                QueueCommand::Swap { other, destination }
            }
            "toggle" => match args {
                [] => QueueCommand::Toggle(Toggle::Flip),
                ["on"] => QueueCommand::Toggle(Toggle::On),
                ["off"] => QueueCommand::Toggle(Toggle::Off),
                [other] => return Err(SpriteError::parse(*other, "expected 'on' or 'off'")),
                _ => {
                    return Err(SpriteError::ArgumentCount {
                        command: command.to_string(),
                        expected: "0 or 1",
                        found: args.len(),
                    });
                }
            },
            other => return Err(SpriteError::UnknownCommand(other.to_string())),
        };
        Ok(parsed)
    }
}

pub struct QueueManipulation<'a> {
    manager: &'a mut Manager,
}

impl<'a> QueueManipulation<'a> {
    pub fn new(manager: &'a mut Manager) -> Self {
        Self { manager }
    }

    /// Apply `directive` to the item drawing destination 0 of `name`.
    pub fn apply(&mut self, name: &str, directive: &str) -> Result<()> {
        self.apply_at(name, 0, directive)
    }

    /// `remove` and `toggle` also reach items of sprites that were deleted
    /// from the registry but are still queued; every other command needs a
    /// registered sprite.
    pub fn apply_at(&mut self, name: &str, destination: usize, directive: &str) -> Result<()> {
        let registered = self.manager.sprites().contains(name);
        let queued = || {
            self.manager
                .render_queue()
                .iter()
                .any(|item| item.sprite().borrow().name() == name)
        };
        if !registered && !queued() {
            return Err(SpriteError::UnknownSprite(name.to_string()));
        }
        let command = QueueCommand::parse(directive, self.manager)?;
        if !registered && !matches!(command, QueueCommand::Remove | QueueCommand::Toggle(_)) {
            return Err(SpriteError::UnknownSprite(name.to_string()));
        }
        let m = &mut *self.manager;
        match command {
            QueueCommand::Append => {
                m.append_to_render_queue(name, destination)?;
            }
            QueueCommand::InsertAfter { other, destination: d } => {
                m.insert_in_render_queue_after(name, &other, destination, d)?;
            }
            QueueCommand::InsertBefore { other, destination: d } => {
                m.insert_in_render_queue_before(name, &other, destination, d)?;
            }
            QueueCommand::MoveAfter { other, destination: d } => {
                m.move_in_render_queue_after(name, &other, destination, d)?;
            }
            QueueCommand::MoveBefore { other, destination: d } => {
                m.move_in_render_queue_before(name, &other, destination, d)?;
            }
            QueueCommand::Swap { other, destination: d } => {
                m.swap_in_render_queue_by_name(name, &other, destination, d)?;
            }
            QueueCommand::Remove => {
                m.remove_from_render_queue(name, destination)?;
            }
            QueueCommand::Toggle(toggle) => {
                m.toggle_render(name, destination, toggle)?;
            }
        }
        debug!("applied queue directive '{}' to {}[{}]", directive, name, destination);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingBackend;
    use crate::components::color::Color;

    fn manager(names: &[&str]) -> Manager {
        let mut backend = RecordingBackend::new();
        let mut manager = Manager::new("queue", 100, 100);
        for name in names {
            manager
                .create_texture_from_rectangle(name, 4, 4, Color::WHITE, &mut backend)
                .unwrap();
        }
        manager
    }

    fn order(manager: &Manager) -> Vec<String> {
        manager
            .render_queue()
            .iter()
            .map(|item| item.sprite_name())
            .collect()
    }

    #[test]
    fn test_build_queue_with_directives() {
        let mut m = manager(&["bg", "hero", "hud", "shadow"]);
        let mut q = m.queue_manipulation();
        q.apply("bg", "append").unwrap();
        q.apply("hud", "append").unwrap();
        q.apply("hero", "insertBefore hud").unwrap();
        q.apply("shadow", "insertAfter bg 0").unwrap();
        assert_eq!(order(&m), ["bg", "shadow", "hero", "hud"]);
    }

    #[test]
    fn test_move_swap_remove() {
        let mut m = manager(&["a", "b", "c"]);
        for name in ["a", "b", "c"] {
            m.append_to_render_queue(name, 0).unwrap();
        }
        m.queue_manipulation().apply("a", "moveAfter c").unwrap();
        assert_eq!(order(&m), ["b", "c", "a"]);
        m.queue_manipulation().apply("a", "moveBefore b").unwrap();
        assert_eq!(order(&m), ["a", "b", "c"]);
        m.queue_manipulation().apply("a", "swap c").unwrap();
        assert_eq!(order(&m), ["a", "b", "a"]);
        m.queue_manipulation().apply("a", "remove").unwrap();
        assert_eq!(order(&m), ["b", "a"]);
    }

    #[test]
    fn test_toggle() {
        let mut m = manager(&["a"]);
        m.append_to_render_queue("a", 0).unwrap();
        m.queue_manipulation().apply("a", "toggle off").unwrap();
        assert!(!m.render_queue()[0].is_visible());
        m.queue_manipulation().apply("a", "toggle").unwrap();
        assert!(m.render_queue()[0].is_visible());
        assert!(m.queue_manipulation().apply("a", "toggle maybe").is_err());
    }

    #[test]
    fn test_errors_leave_queue_unchanged() {
        let mut m = manager(&["a", "b"]);
        m.append_to_render_queue("a", 0).unwrap();
        let mut q = m.queue_manipulation();
        assert_eq!(
            q.apply("ghost", "append").unwrap_err(),
            SpriteError::UnknownSprite("ghost".into())
        );
        assert_eq!(
            q.apply("b", "shuffle").unwrap_err(),
            SpriteError::UnknownCommand("shuffle".into())
        );
        assert!(matches!(
            q.apply("b", "insertAfter").unwrap_err(),
            SpriteError::ArgumentCount { .. }
        ));
        assert!(matches!(
            q.apply("b", "insertAfter a 1").unwrap_err(),
            SpriteError::RenderItemNotFound { destination: 1, .. }
        ));
        assert!(q.apply("b", "append now").is_err());
        assert_eq!(order(&m), ["a"]);
    }

    #[test]
    fn test_remove_and_toggle_reach_deleted_sprites() {
        let mut backend = RecordingBackend::new();
        let mut m = Manager::new("queue", 100, 100);
        for name in ["a", "b"] {
            m.create_texture_from_rectangle(name, 4, 4, Color::WHITE, &mut backend)
                .unwrap();
            m.append_to_render_queue(name, 0).unwrap();
        }
        m.delete_sprite("a", &mut backend).unwrap();

        m.queue_manipulation().apply("a", "toggle off").unwrap();
        assert!(!m.render_queue()[0].is_visible());
        assert_eq!(
            m.queue_manipulation().apply("a", "moveAfter b").unwrap_err(),
            SpriteError::UnknownSprite("a".into())
        );

        m.queue_manipulation().apply("a", "remove").unwrap();
        assert_eq!(order(&m), ["b"]);
        assert_eq!(m.release_retired(&mut backend).unwrap(), 1);
        assert_eq!(
            m.queue_manipulation().apply("a", "remove").unwrap_err(),
            SpriteError::UnknownSprite("a".into())
        );
    }
}
