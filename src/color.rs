//! 8-bit RGBA color in the forms the host understands.
//!
//! The host hands out colors as `#rrggbb` / `#rrggbbaa` hex or as the
//! `rgba(r,g,b,a)` text this tool writes back, so both parse here.

use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same RGB with the alpha channel replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rrggbb`, `#rrggbbaa`, or `rgba(r,g,b,a)` text.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| Error::InvalidColor(text.into()));
        }
        if let Some(args) = text
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_channels(args).ok_or_else(|| Error::InvalidColor(text.into()));
        }
        Err(Error::InvalidColor(text.into()))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    fn parse_channels(args: &str) -> Option<Self> {
        let mut channels = args.split(',').map(|part| part.trim().parse::<u8>().ok());
        let mut next = || channels.next().flatten();
        let color = Self::rgba(next()?, next()?, next()?, next()?);
        if channels.next().is_some() {
            return None;
        }
        Some(color)
    }
}

impl fmt::Display for Color {
    /// The `rgba(r,g,b,a)` form the host consumes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}
