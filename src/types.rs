// Core value types shared by the canvas engine and the host window.

use crate::error::Error;
use std::str::FromStr;

/// Packed screen buffer handed to minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// Three-channel colour. Channel order is R, G, B everywhere:
/// background fill, brush colour, layer storage and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn from_channels(c: [u8; 3]) -> Self {
        Self { r: c[0], g: c[1], b: c[2] }
    }

    /// Pack as 0x00RRGGBB (the layout minifb expects).
    #[inline]
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Accepts `#rrggbb` or `rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Integer pixel coordinate. May lie off-canvas while stamping; layers clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One sample from the pointer source (mouse, hand tracker, stylus).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Option<Point>, // None = pointer lost, ends the stroke
    pub pressure: f32,           // expected in [0,1], clamped by the engine
    pub is_drawing: bool,        // false = pen lifted, ends the stroke
}

impl PointerEvent {
    /// Pen down (or still down) at (x,y).
    pub fn draw(x: i32, y: i32, pressure: f32) -> Self {
        Self { position: Some(Point::new(x, y)), pressure, is_drawing: true }
    }

    /// Pointer absent: the stroke (if any) ends here.
    pub fn lift() -> Self {
        Self { position: None, pressure: 0.0, is_drawing: false }
    }
}
