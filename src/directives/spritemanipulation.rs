//! Sprite directive interpreter.
//!
//! A directive is one line of whitespace-separated tokens: a command keyword
//! followed by its arguments, e.g. `"centerIn 0 0 100%w 100%h"`. Numeric
//! arguments go through the [`ValueParser`], so they can be screen-relative.
//!
//! Besides the table-driven commands of [`Manipulation`], the interpreter
//! understands `centerInSprite <other> [otherDestination]`, which needs the
//! sprite registry to resolve the other sprite.

use log::debug;
use smallvec::SmallVec;

use crate::directives::manipulation::Manipulation;
use crate::directives::valueparser::ValueParser;
use crate::error::{Result, SpriteError};
use crate::resources::spritemanager::{Selection, SpriteManager};

pub const CENTER_IN_SPRITE: &str = "centerInSprite";

type Tokens<'d> = SmallVec<[&'d str; 8]>;

pub struct SpriteManipulation<'a> {
    sprites: &'a SpriteManager,
    parser: &'a ValueParser,
}

impl<'a> SpriteManipulation<'a> {
    pub fn new(sprites: &'a SpriteManager, parser: &'a ValueParser) -> Self {
        Self { sprites, parser }
    }

    /// Apply `directive` to destination 0 of the sprite called `name`.
    pub fn apply(&self, name: &str, directive: &str) -> Result<()> {
        self.apply_at(name, 0, directive)
    }

    /// Apply `directive` to `destination` of the sprite called `name`.
    ///
    /// The sprite is looked up before the directive is parsed, so an unknown
    /// sprite is reported even when the directive is malformed too.
    pub fn apply_at(&self, name: &str, destination: usize, directive: &str) -> Result<()> {
        let sprite = self.sprites.get(name)?;
        let manipulation = self.parse(directive)?;
        manipulation.apply(&mut sprite.borrow_mut(), destination)?;
        debug!("applied '{}' to {}[{}]", directive, name, destination);
        Ok(())
    }

    /// Apply one directive to every selected sprite, stopping at the first
    /// failure. The directive is parsed once, before any sprite is touched.
    pub fn apply_to(
        &self,
        selection: &Selection,
        destination: usize,
        directive: &str,
    ) -> Result<usize> {
        let manipulation = self.parse(directive)?;
        self.sprites
            .for_each_selected(selection, |sprite| manipulation.apply(sprite, destination))
    }

    /// Parse a directive without applying it.
    pub fn parse(&self, directive: &str) -> Result<Manipulation> {
        let tokens: Tokens<'_> = directive.split_whitespace().collect();
        let Some((command, args)) = tokens.split_first() else {
            return Err(SpriteError::UnknownCommand(String::new()));
        };
        if *command == CENTER_IN_SPRITE {
            return self.parse_center_in_sprite(args);
        }
        Manipulation::parse(command, args, self.parser)
    }

    fn parse_center_in_sprite(&self, args: &[&str]) -> Result<Manipulation> {
        let (other, destination) = match args {
            [other] => (*other, 0),
            [other, destination] => (*other, self.parse_index(destination)?),
            _ => {
                return Err(SpriteError::ArgumentCount {
                    command: CENTER_IN_SPRITE.to_string(),
                    expected: "1 or 2",
                    found: args.len(),
                });
            }
        };
        let area = self.sprites.get(other)?.borrow().destination(destination)?;
        Ok(Manipulation::center_in(area))
    }

    fn parse_index(&self, token: &str) -> Result<usize> {
        let value = self.parser.strings_to_numbers(&[token])?[0];
        usize::try_from(value).map_err(|_| SpriteError::parse(token, "index must not be negative"))
    }
}
