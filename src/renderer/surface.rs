//! Presentation boundary
//!
//! The game only needs filled rectangles, text labels and the surface size.
//! `DrawList` records those calls; the browser frontend turns the record into
//! GPU triangles and DOM labels, tests just inspect it.

use glam::Vec2;

use crate::sim::Aabb;

/// Linear RGBA colour, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Opaque colour from 0xRRGGBB
    pub fn from_hex(rgb: u32) -> Self {
        Self::from_rgba8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 0xFF)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Multiplicative tint (white leaves the colour unchanged)
    pub fn tinted(self, tint: u32) -> Self {
        let t = Color::from_hex(tint);
        Self {
            r: self.r * t.r,
            g: self.g * t.g,
            b: self.b * t.b,
            a: self.a,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// CSS `rgba()` string for DOM labels
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}

/// Text label style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in world units
    pub font_size: f32,
    pub color: Color,
}

/// Something the game can draw on
pub trait Surface {
    /// Current drawable size in world units
    fn size(&self) -> (f32, f32);
    fn fill_rect(&mut self, rect: Aabb, color: Color);
    /// `pos` is the label's top-left corner
    fn draw_text(&mut self, pos: Vec2, text: &str, style: TextStyle);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect { rect: Aabb, color: Color },
    Text { pos: Vec2, text: String, style: TextStyle },
}

/// Recording surface
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Forget the previous frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn rects(&self) -> impl Iterator<Item = (&Aabb, &Color)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Rect { rect, color } => Some((rect, color)),
            _ => None,
        })
    }

    /// Text commands placed relative to `origin` (the surface's offset
    /// inside whatever element hosts the labels)
    pub fn texts_at(&self, origin: Vec2) -> impl Iterator<Item = (Vec2, &str, &TextStyle)> {
        self.commands.iter().filter_map(move |c| match c {
            DrawCommand::Text { pos, text, style } => Some((origin + *pos, text.as_str(), style)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn draw_text(&mut self, pos: Vec2, text: &str, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            style,
        });
    }
}
