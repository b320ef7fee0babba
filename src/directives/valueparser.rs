//! Directive value parser.
//!
//! Translates directive argument tokens into numbers and render options.
//! Besides plain numeric literals a token may use the screen-relative
//! keywords `screenWidth` and `screenHeight`, percentages of the screen
//! (`50%w`, `12.5%h`) and arithmetic over all of these without spaces:
//!
//! ```text
//! screenWidth/2-10    (screenHeight-20)*0.5    -50%w+4
//! ```
//!
//! `*` and `/` bind tighter than `+` and `-`; operators of equal precedence
//! are evaluated left to right. The parser only reads its configured
//! [`ScreenSize`]; it never mutates anything else.

use smallvec::SmallVec;

use crate::components::renderoptions::RenderOptions;
use crate::error::{Result, SpriteError};
use crate::resources::screensize::ScreenSize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
}

impl Op {
    fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 2,
            Op::Mul | Op::Div => 3,
            Op::Neg => 4,
        }
    }

    fn right_associative(self) -> bool {
        matches!(self, Op::Neg)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Item {
    Num(f64),
    Op(Op),
    Open,
    Close,
}

type Items = SmallVec<[Item; 16]>;

/// Converts directive tokens into values, resolving screen-relative terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueParser {
    screen: ScreenSize,
}

impl ValueParser {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            screen: ScreenSize::new(width, height),
        }
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.screen
    }

    /// Replace the screen dimensions used to resolve relative values.
    pub fn set_screen_size(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    /// Parse a single token into a finite double.
    pub fn value_from_string(&self, token: &str) -> Result<f64> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SpriteError::parse(token, "empty value"));
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            if v.is_finite() {
                return Ok(v);
            }
        }
        let items = self.lex(trimmed)?;
        let rpn = to_postfix(trimmed, &items)?;
        evaluate(trimmed, &rpn)
    }

    /// Parse every token into a double. The output has the input's length.
    pub fn strings_to_doubles<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<f64>> {
        tokens
            .iter()
            .map(|t| self.value_from_string(t.as_ref()))
            .collect()
    }

    /// Parse every token and round half away from zero to a whole number.
    pub fn strings_to_numbers<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<i32>> {
        tokens
            .iter()
            .map(|t| {
                let token = t.as_ref();
                round_to_i32(self.value_from_string(token)?, token)
            })
            .collect()
    }

    /// Combine option keywords into a [`RenderOptions`] set.
    ///
    /// Unknown keywords fail with [`SpriteError::UnknownOption`]; two
    /// different rotations or blend modes fail with [`SpriteError::Parse`].
    pub fn strings_to_render_options<S: AsRef<str>>(&self, tokens: &[S]) -> Result<RenderOptions> {
        let mut options = RenderOptions::DEFAULT;
        for token in tokens {
            let token = token.as_ref();
            let flag = RenderOptions::from_keyword(token)
                .ok_or_else(|| SpriteError::UnknownOption(token.to_string()))?;
            for group in [RenderOptions::ROTATION_GROUP, RenderOptions::BLEND_GROUP] {
                if group.intersects(flag)
                    && options.intersects(group)
                    && !options.contains(flag)
                {
                    return Err(SpriteError::parse(
                        token,
                        format!("conflicts with '{}'", options),
                    ));
                }
            }
            options.insert(flag);
        }
        Ok(options)
    }

    fn lex(&self, token: &str) -> Result<Items> {
        let bytes = token.as_bytes();
        let len = bytes.len();
        let mut items = Items::new();
        let mut i = 0;
        while i < len {
            let c = bytes[i];
            match c {
                b'0'..=b'9' | b'.' => {
                    let start = i;
                    while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                        i += 1;
                    }
                    // optional exponent, only consumed if digits follow
                    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
                        let mut j = i + 1;
                        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
                            j += 1;
                        }
                        if j < len && bytes[j].is_ascii_digit() {
                            while j < len && bytes[j].is_ascii_digit() {
                                j += 1;
                            }
                            i = j;
                        }
                    }
                    let literal = &token[start..i];
                    let mut value: f64 = literal.parse().map_err(|_| {
                        SpriteError::parse(token, format!("invalid number '{}'", literal))
                    })?;
                    if i < len && bytes[i] == b'%' {
                        let base = match bytes.get(i + 1) {
                            Some(b'w') => self.screen.w,
                            Some(b'h') => self.screen.h,
                            _ => {
                                return Err(SpriteError::parse(
                                    token,
                                    "percentage must end in 'w' or 'h'",
                                ));
                            }
                        };
                        value = value / 100.0 * base as f64;
                        i += 2;
                    }
                    items.push(Item::Num(value));
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                    let start = i;
                    while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                        i += 1;
                    }
                    let value = match &token[start..i] {
                        "screenWidth" => self.screen.w,
                        "screenHeight" => self.screen.h,
                        other => {
                            return Err(SpriteError::parse(
                                token,
                                format!("unknown keyword '{}'", other),
                            ));
                        }
                    };
                    items.push(Item::Num(value as f64));
                }
                b'+' | b'-' => {
                    let unary = matches!(items.last(), None | Some(Item::Op(_)) | Some(Item::Open));
                    if !unary {
                        items.push(Item::Op(if c == b'+' { Op::Add } else { Op::Sub }));
                    } else if c == b'-' {
                        items.push(Item::Op(Op::Neg));
                    }
                    i += 1;
                }
                b'*' => {
                    items.push(Item::Op(Op::Mul));
                    i += 1;
                }
                b'/' => {
                    items.push(Item::Op(Op::Div));
                    i += 1;
                }
                b'(' => {
                    items.push(Item::Open);
                    i += 1;
                }
                b')' => {
                    items.push(Item::Close);
                    i += 1;
                }
                _ => {
                    let bad = token[i..].chars().next().unwrap_or('?');
                    return Err(SpriteError::parse(
                        token,
                        format!("unexpected character '{}'", bad),
                    ));
                }
            }
        }
        Ok(items)
    }
}

/// Shunting-yard conversion to postfix order.
fn to_postfix(token: &str, items: &[Item]) -> Result<Items> {
    let mut output = Items::new();
    let mut ops = Items::new();
    for &item in items {
        match item {
            Item::Num(_) => output.push(item),
            Item::Op(op) => {
                while let Some(&Item::Op(top)) = ops.last() {
                    let pops = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && !op.right_associative());
                    if !pops {
                        break;
                    }
                    output.push(Item::Op(top));
                    ops.pop();
                }
                ops.push(item);
            }
            Item::Open => ops.push(item),
            Item::Close => loop {
                match ops.pop() {
                    Some(Item::Open) => break,
                    Some(other) => output.push(other),
                    None => return Err(SpriteError::parse(token, "unbalanced ')'")),
                }
            },
        }
    }
    while let Some(item) = ops.pop() {
        if item == Item::Open {
            return Err(SpriteError::parse(token, "unbalanced '('"));
        }
        output.push(item);
    }
    Ok(output)
}

fn evaluate(token: &str, postfix: &[Item]) -> Result<f64> {
    let malformed = || SpriteError::parse(token, "malformed expression");
    let mut stack: SmallVec<[f64; 16]> = SmallVec::new();
    for &item in postfix {
        match item {
            Item::Num(v) => stack.push(v),
            Item::Op(Op::Neg) => {
                let v = stack.pop().ok_or_else(malformed)?;
                stack.push(-v);
            }
            Item::Op(op) => {
                let b = stack.pop().ok_or_else(malformed)?;
                let a = stack.pop().ok_or_else(malformed)?;
                let v = match op {
                    Op::Add => a + b,
                    Op::Sub => a - b,
                    Op::Mul => a * b,
                    Op::Div => {
                        if b == 0.0 {
                            return Err(SpriteError::parse(token, "division by zero"));
                        }
                        a / b
                    }
                    Op::Neg => -b,
                };
                stack.push(v);
            }
            Item::Open | Item::Close => return Err(malformed()),
        }
    }
    match stack.as_slice() {
        [v] if v.is_finite() => Ok(*v),
        [_] => Err(SpriteError::parse(token, "result is not a finite number")),
        _ => Err(malformed()),
    }
}

/// Round half away from zero, failing instead of saturating when the result
/// does not fit an `i32`.
pub(crate) fn round_to_i32(value: f64, token: &str) -> Result<i32> {
    let rounded = value.round();
    if rounded >= i32::MIN as f64 && rounded <= i32::MAX as f64 {
        Ok(rounded as i32)
    } else {
        Err(SpriteError::parse(token, "value out of integer range"))
    }
}
