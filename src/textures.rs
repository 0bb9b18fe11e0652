//! Placeholder sprite textures
//!
//! No asset files: every entity kind gets a solid-colour square generated at
//! startup. Entity sizes are scales of this square.

use crate::consts::BASE_SPRITE_SIZE;
use crate::renderer::Color;
use crate::sim::EntityKind;

/// Side length of generated textures in pixels
pub const TEXTURE_SIZE: u32 = BASE_SPRITE_SIZE as u32;

/// Generated texture names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Blue,
    Green,
    Yellow,
    Red,
}

impl TextureKey {
    pub const ALL: [TextureKey; 4] = [
        TextureKey::Blue,
        TextureKey::Green,
        TextureKey::Yellow,
        TextureKey::Red,
    ];

    /// Fill colour (0xRRGGBB)
    pub fn rgb(self) -> u32 {
        match self {
            TextureKey::Blue => 0x0000FF,
            TextureKey::Green => 0x228B22,
            TextureKey::Yellow => 0xFFD700,
            TextureKey::Red => 0xFF0000,
        }
    }

    /// Texture used to draw an entity kind
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => TextureKey::Blue,
            EntityKind::Platform => TextureKey::Green,
            EntityKind::Coin => TextureKey::Yellow,
            EntityKind::Enemy => TextureKey::Red,
        }
    }
}

/// RGBA8 pixel buffer
#[derive(Debug, Clone)]
pub struct SpriteTexture {
    pub key: TextureKey,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteTexture {
    /// Opaque square filled with the key's colour
    pub fn solid(key: TextureKey, width: u32, height: u32) -> Self {
        let rgb = key.rgb();
        let pixel = [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 0xFF];
        let rgba = pixel
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self {
            key,
            width,
            height,
            rgba,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }

    /// Colour to draw this texture as a flat quad
    pub fn fill_color(&self) -> Color {
        self.pixel(0, 0)
            .map(|[r, g, b, a]| Color::from_rgba8(r, g, b, a))
            .unwrap_or(Color::WHITE)
    }
}

/// All generated textures
#[derive(Debug, Clone)]
pub struct TextureCache {
    textures: Vec<SpriteTexture>,
}

impl TextureCache {
    /// Generate every texture once
    pub fn generate() -> Self {
        let textures: Vec<SpriteTexture> = TextureKey::ALL
            .iter()
            .map(|&key| SpriteTexture::solid(key, TEXTURE_SIZE, TEXTURE_SIZE))
            .collect();
        log::info!(
            "Generated {} placeholder textures ({}x{})",
            textures.len(),
            TEXTURE_SIZE,
            TEXTURE_SIZE
        );
        Self { textures }
    }

    pub fn get(&self, key: TextureKey) -> Option<&SpriteTexture> {
        self.textures.iter().find(|t| t.key == key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Flat colour for an entity kind
    pub fn color_for(&self, kind: EntityKind) -> Color {
        self.get(TextureKey::for_kind(kind))
            .map(SpriteTexture::fill_color)
            .unwrap_or(Color::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_all_textures() {
        let cache = TextureCache::generate();
        assert_eq!(cache.len(), 4);
        for key in TextureKey::ALL {
            let texture = cache.get(key).unwrap();
            assert_eq!((texture.width, texture.height), (100, 100));
            assert_eq!(texture.rgba.len(), 100 * 100 * 4);
        }
    }

    #[test]
    fn test_textures_are_solid() {
        let texture = SpriteTexture::solid(TextureKey::Green, 100, 100);
        assert_eq!(texture.pixel(0, 0), Some([0x22, 0x8B, 0x22, 0xFF]));
        assert_eq!(texture.pixel(99, 99), texture.pixel(0, 0));
        assert_eq!(texture.pixel(100, 0), None);
    }

    #[test]
    fn test_kind_colors() {
        let cache = TextureCache::generate();
        assert_eq!(cache.color_for(EntityKind::Coin), Color::from_hex(0xFFD700));
        assert_eq!(cache.color_for(EntityKind::Enemy), Color::from_hex(0xFF0000));
        assert_eq!(cache.color_for(EntityKind::Player), Color::from_hex(0x0000FF));
    }
}
