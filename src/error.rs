//! Error type shared by the queue, the directive interpreter and the stores.
//!
//! Every operation surfaces its failure to the caller; nothing is clamped or
//! replaced with a default value.

use thiserror::Error;

/// Errors produced by sprite, texture, queue and directive operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpriteError {
    /// A numeric or option token could not be interpreted.
    #[error("cannot parse '{token}': {reason}")]
    Parse { token: String, reason: String },

    /// A render option keyword is not part of the vocabulary.
    #[error("unknown render option '{0}'")]
    UnknownOption(String),

    /// The first directive token names no manipulator.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("unknown sprite '{0}'")]
    UnknownSprite(String),

    #[error("unknown texture '{0}'")]
    UnknownTexture(String),

    #[error("sprite '{0}' already exists")]
    DuplicateSprite(String),

    /// Render queue position is past the end of the queue.
    #[error("render queue position {index} out of range (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("render queue is empty")]
    EmptyQueue,

    /// Destination rectangle index is past the sprite's destination list.
    #[error("sprite '{sprite}' has no destination {index} ({count} defined)")]
    InvalidDestination {
        sprite: String,
        index: usize,
        count: usize,
    },

    #[error("'{command}' expects {expected} arguments, got {found}")]
    ArgumentCount {
        command: String,
        expected: &'static str,
        found: usize,
    },

    /// No queued item matches the sprite name and destination index.
    #[error("no render item for sprite '{name}' destination {destination}")]
    RenderItemNotFound { name: String, destination: usize },

    #[error("failed to load texture '{key}': {reason}")]
    TextureLoad { key: String, reason: String },

    /// The texture is still referenced by sprites other than its own
    /// full-texture sprite, or that sprite is still queued.
    #[error("texture '{key}' is still used by {refs} sprite(s)")]
    TextureInUse { key: String, refs: usize },

    /// A batch operation stopped at the named sprite.
    #[error("batch aborted at sprite '{name}' (entry {position}): {source}")]
    Batch {
        name: String,
        position: usize,
        source: Box<SpriteError>,
    },

    #[error("failed to draw sprite '{sprite}': {reason}")]
    Draw { sprite: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SpriteError {
    pub(crate) fn parse(token: impl Into<String>, reason: impl Into<String>) -> Self {
        SpriteError::Parse {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// The innermost error, looking through [`SpriteError::Batch`] wrappers.
    pub fn root_cause(&self) -> &SpriteError {
        match self {
            SpriteError::Batch { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpriteError>;
