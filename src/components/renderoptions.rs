//! Render option flags.
//!
//! [`RenderOptions`] is a `bitflags` set describing how a destination is drawn:
//! color/alpha modulation, flipping, quarter-turn rotation and blend mode.
//! Rotation and blend mode are exclusive groups, so at most one flag of each
//! group is set at a time.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Bitset of render options for one sprite destination.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RenderOptions: u32 {
        /// Tint the texture with the destination color.
        const COLOR_MOD   = 1 << 0;
        /// Use the destination color's alpha channel.
        const ALPHA_MOD   = 1 << 1;
        const FLIP_H      = 1 << 2;
        const FLIP_V      = 1 << 3;
        const ROTATE_90   = 1 << 4;
        const ROTATE_180  = 1 << 5;
        const ROTATE_270  = 1 << 6;
        const BLEND_NONE  = 1 << 7;
        const BLEND_ALPHA = 1 << 8;
        const BLEND_ADD   = 1 << 9;
        const BLEND_MOD   = 1 << 10;
    }
}

/// Blend mode requested by a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    None,
    Alpha,
    Additive,
    Multiplied,
}

impl RenderOptions {
    pub const DEFAULT: RenderOptions = RenderOptions::empty();

    pub const ROTATION_GROUP: RenderOptions = RenderOptions::ROTATE_90
        .union(RenderOptions::ROTATE_180)
        .union(RenderOptions::ROTATE_270);
    pub const BLEND_GROUP: RenderOptions = RenderOptions::BLEND_NONE
        .union(RenderOptions::BLEND_ALPHA)
        .union(RenderOptions::BLEND_ADD)
        .union(RenderOptions::BLEND_MOD);

    /// Keyword vocabulary accepted in directives, in display order.
    pub const KEYWORDS: [(&'static str, RenderOptions); 12] = [
        ("default", RenderOptions::DEFAULT),
        ("colormod", RenderOptions::COLOR_MOD),
        ("alphamod", RenderOptions::ALPHA_MOD),
        ("flip-h", RenderOptions::FLIP_H),
        ("flip-v", RenderOptions::FLIP_V),
        ("rotate-90", RenderOptions::ROTATE_90),
        ("rotate-180", RenderOptions::ROTATE_180),
        ("rotate-270", RenderOptions::ROTATE_270),
        ("blend-none", RenderOptions::BLEND_NONE),
        ("blend-alpha", RenderOptions::BLEND_ALPHA),
        ("blend-add", RenderOptions::BLEND_ADD),
        ("blend-mod", RenderOptions::BLEND_MOD),
    ];

    /// Look up a single keyword.
    pub fn from_keyword(keyword: &str) -> Option<RenderOptions> {
        Self::KEYWORDS
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, o)| *o)
    }

    /// Clockwise rotation in degrees (0, 90, 180 or 270).
    pub fn rotation_degrees(self) -> f32 {
        if self.contains(Self::ROTATE_90) {
            90.0
        } else if self.contains(Self::ROTATE_180) {
            180.0
        } else if self.contains(Self::ROTATE_270) {
            270.0
        } else {
            0.0
        }
    }

    /// Requested blend mode. Alpha blending is implied by `alphamod`.
    pub fn blend_mode(self) -> BlendMode {
        if self.contains(Self::BLEND_ADD) {
            BlendMode::Additive
        } else if self.contains(Self::BLEND_MOD) {
            BlendMode::Multiplied
        } else if self.contains(Self::BLEND_ALPHA) || self.contains(Self::ALPHA_MOD) {
            BlendMode::Alpha
        } else {
            BlendMode::None
        }
    }
}

impl fmt::Display for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "default");
        }
        let mut first = true;
        for (keyword, flag) in Self::KEYWORDS.iter().skip(1) {
            if self.contains(*flag) {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{}", keyword)?;
                first = false;
            }
        }
        Ok(())
    }
}
