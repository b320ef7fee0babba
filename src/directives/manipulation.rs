//! Sprite manipulators.
//!
//! Each directive command maps to one [`Manipulation`] variant through the
//! [`MANIPULATORS`] dispatch table. Building a manipulation parses all of its
//! arguments up front, so [`Manipulation::apply`] only ever sees valid values
//! and a directive with a bad argument never touches the sprite.
//!
//! | keyword          | arguments            | effect                                  |
//! |------------------|----------------------|-----------------------------------------|
//! | `centerIn`       | `x y w h [w h]`      | center inside the area, optional resize |
//! | `setOrigin`      | `x y`                | move, keep size                         |
//! | `setOptions`     | `option...`          | replace render options                  |
//! | `setSize`        | `w h`                | resize, keep origin                     |
//! | `setColor`       | `r g b [a]`          | replace color                           |
//! | `moveBy`         | `dx dy`              | relative move                           |
//! | `addDestination` | `x y`                | append a destination                    |

use log::debug;

use crate::components::color::Color;
use crate::components::rect::Rect;
use crate::components::renderoptions::RenderOptions;
use crate::components::sprite::Sprite;
use crate::directives::valueparser::{round_to_i32, ValueParser};
use crate::error::{Result, SpriteError};

/// A parsed, ready-to-apply sprite mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Manipulation {
    /// Center the destination in `area` (x, y, w, h). With `size` the
    /// destination is resized first.
    CenterIn {
        area: [f64; 4],
        size: Option<[f64; 2]>,
    },
    SetOrigin {
        x: i32,
        y: i32,
    },
    /// Overwrites the option set; applying it twice equals applying it once.
    SetOptions(RenderOptions),
    SetSize {
        w: i32,
        h: i32,
    },
    SetColor(Color),
    MoveBy {
        dx: i32,
        dy: i32,
    },
    AddDestination {
        x: i32,
        y: i32,
    },
}

type ParseFn = fn(&str, &[&str], &ValueParser) -> Result<Manipulation>;

/// Command keyword to argument parser.
pub const MANIPULATORS: &[(&str, ParseFn)] = &[
    ("centerIn", parse_center_in),
    ("setOrigin", parse_set_origin),
    ("setOptions", parse_set_options),
    ("setSize", parse_set_size),
    ("setColor", parse_set_color),
    ("moveBy", parse_move_by),
    ("addDestination", parse_add_destination),
];

impl Manipulation {
    /// Look up `command` and parse its arguments.
    pub fn parse(command: &str, args: &[&str], parser: &ValueParser) -> Result<Self> {
        let (_, parse) = MANIPULATORS
            .iter()
            .find(|(keyword, _)| *keyword == command)
            .ok_or_else(|| SpriteError::UnknownCommand(command.to_string()))?;
        parse(command, args, parser)
    }

    /// Returns `true` if `command` names a manipulator.
    pub fn is_command(command: &str) -> bool {
        MANIPULATORS.iter().any(|(keyword, _)| *keyword == command)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Manipulation::CenterIn { .. } => "centerIn",
            Manipulation::SetOrigin { .. } => "setOrigin",
            Manipulation::SetOptions(_) => "setOptions",
            Manipulation::SetSize { .. } => "setSize",
            Manipulation::SetColor(_) => "setColor",
            Manipulation::MoveBy { .. } => "moveBy",
            Manipulation::AddDestination { .. } => "addDestination",
        }
    }

    /// Center-in-rectangle manipulation for an integer area.
    pub fn center_in(area: Rect) -> Self {
        Manipulation::CenterIn {
            area: [area.x as f64, area.y as f64, area.w as f64, area.h as f64],
            size: None,
        }
    }

    /// Mutate `destination` of `sprite`.
    ///
    /// Fails if the destination does not exist or a resulting coordinate does
    /// not fit an `i32`; in both cases the sprite is left unchanged.
    pub fn apply(&self, sprite: &mut Sprite, destination: usize) -> Result<()> {
        debug!(
            "{} on sprite {} destination {}",
            self.keyword(),
            sprite.name(),
            destination
        );
        match *self {
            Manipulation::CenterIn { area, size } => {
                let current = sprite.destination(destination)?;
                let (w, h) = match size {
                    Some([w, h]) => (round_to_i32(w, "centerIn")?, round_to_i32(h, "centerIn")?),
                    None => (current.w, current.h),
                };
                let [ax, ay, aw, ah] = area;
                let x = round_to_i32(ax + (aw - w as f64) / 2.0, "centerIn")?;
                let y = round_to_i32(ay + (ah - h as f64) / 2.0, "centerIn")?;
                sprite.set_destination(Rect::new(x, y, w, h), destination)
            }
            Manipulation::SetOrigin { x, y } => sprite.set_destination_origin(x, y, destination),
            Manipulation::SetOptions(options) => sprite.set_render_options(options, destination),
            Manipulation::SetSize { w, h } => sprite.set_destination_size(w, h, destination),
            Manipulation::SetColor(color) => sprite.set_color(color, destination),
            Manipulation::MoveBy { dx, dy } => {
                let current = sprite.destination(destination)?;
                let x = current.x.checked_add(dx);
                let y = current.y.checked_add(dy);
                match (x, y) {
                    (Some(x), Some(y)) => sprite.set_destination_origin(x, y, destination),
                    _ => Err(SpriteError::parse(
                        "moveBy",
                        format!("moving ({}, {}) by ({}, {}) overflows", current.x, current.y, dx, dy),
                    )),
                }
            }
            Manipulation::AddDestination { x, y } => {
                sprite.add_destination(x, y);
                Ok(())
            }
        }
    }
}

fn expect_args(
    command: &str,
    args: &[&str],
    allowed: &[usize],
    expected: &'static str,
) -> Result<()> {
    if allowed.contains(&args.len()) {
        Ok(())
    } else {
        Err(SpriteError::ArgumentCount {
            command: command.to_string(),
            expected,
            found: args.len(),
        })
    }
}

fn parse_pair(command: &str, args: &[&str], parser: &ValueParser) -> Result<(i32, i32)> {
    expect_args(command, args, &[2], "2")?;
    let v = parser.strings_to_numbers(args)?;
    Ok((v[0], v[1]))
}

fn parse_center_in(command: &str, args: &[&str], parser: &ValueParser) -> Result<Manipulation> {
    expect_args(command, args, &[4, 6], "4 or 6")?;
    let v = parser.strings_to_doubles(args)?;
    let size = if v.len() == 6 {
        for i in [4, 5] {
            if v[i] < 0.0 {
                return Err(SpriteError::parse(args[i], "size must not be negative"));
            }
            round_to_i32(v[i], args[i])?;
        }
        Some([v[4], v[5]])
    } else {
        None
    };
    Ok(Manipulation::CenterIn {
        area: [v[0], v[1], v[2], v[3]],
        size,
    })
}

fn parse_set_origin(command: &str, args: &[&str], parser: &ValueParser) -> Result<Manipulation> {
    let (x, y) = parse_pair(command, args, parser)?;
    Ok(Manipulation::SetOrigin { x, y })
}

fn parse_set_options(_command: &str, args: &[&str], parser: &ValueParser) -> Result<Manipulation> {
    Ok(Manipulation::SetOptions(
        parser.strings_to_render_options(args)?,
    ))
}

fn parse_set_size(command: &str, args: &[&str], parser: &ValueParser) -> Result<Manipulation> {
    let (w, h) = parse_pair(command, args, parser)?;
    if w < 0 || h < 0 {
        let token = if w < 0 { args[0] } else { args[1] };
        return Err(SpriteError::parse(token, "size must not be negative"));
    }
    Ok(Manipulation::SetSize { w, h })
}

fn parse_set_color(command: &str, args: &[&str], parser: &ValueParser) -> Result<Manipulation> {
    expect_args(command, args, &[3, 4], "3 or 4")?;
    let v = parser.strings_to_numbers(args)?;
    let mut channels = [0u8, 0, 0, 0xFF];
    for (i, value) in v.iter().enumerate() {
        channels[i] = u8::try_from(*value)
            .map_err(|_| SpriteError::parse(args[i], "color channel must be 0-255"))?;
    }
    let [r, g, b, a] = channels;
    Ok(Manipulation::SetColor(Color::new(r, g, b, a)))
}

fn parse_move_by(command: &str, args: &[&str], parser: &ValueParser) -> Result<Manipulation> {
    let (dx, dy) = parse_pair(command, args, parser)?;
    Ok(Manipulation::MoveBy { dx, dy })
}

fn parse_add_destination(
    command: &str,
    args: &[&str],
    parser: &ValueParser,
) -> Result<Manipulation> {
    let (x, y) = parse_pair(command, args, parser)?;
    Ok(Manipulation::AddDestination { x, y })
}
