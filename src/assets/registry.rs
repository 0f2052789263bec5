use std::collections::HashMap;

use crate::assets::glyph::GlyphImage;

/// Handle to a glyph image owned by a [`TextureRegistry`].
///
/// Handles are never reused, so a handle kept past a rebuild resolves to nothing instead of to
/// another particle's glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct TextureId(pub(crate) u64);

impl TextureId {
    /// Access raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Allocation counters for leak checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureStats {
    /// Images registered since creation.
    pub allocated: u64,
    /// Images released since creation.
    pub released: u64,
}

impl TextureStats {
    /// Images currently alive.
    pub fn live(self) -> u64 {
        self.allocated.saturating_sub(self.released)
    }
}

/// Owner of every glyph image backing the current particles.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    next_id: u64,
    images: HashMap<TextureId, GlyphImage>,
    stats: TextureStats,
}

impl TextureRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `image` and return its handle.
    ///
    /// An image whose buffer disagrees with its dimensions is replaced by a 1x1 blank, so every
    /// registered image can be sampled without bounds surprises.
    pub fn insert(&mut self, image: GlyphImage) -> TextureId {
        let image = if image.is_well_formed() {
            image
        } else {
            tracing::warn!(
                ch = %image.ch,
                width = image.width,
                height = image.height,
                bytes = image.rgba8_premul.len(),
                "malformed glyph image replaced with a blank"
            );
            GlyphImage::blank(image.ch, 1, 1)
        };
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.images.insert(id, image);
        self.stats.allocated += 1;
        id
    }

    /// Lookup a live image.
    pub fn get(&self, id: TextureId) -> Option<&GlyphImage> {
        self.images.get(&id)
    }

    /// Release one image. Returns `false` if it was already gone.
    pub fn release(&mut self, id: TextureId) -> bool {
        let removed = self.images.remove(&id).is_some();
        if removed {
            self.stats.released += 1;
        }
        removed
    }

    /// Release every image, returning how many were dropped.
    pub fn release_all(&mut self) -> usize {
        let n = self.images.len();
        self.images.clear();
        self.stats.released += n as u64;
        n
    }

    /// Number of live images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Return `true` when no images are alive.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Allocation counters.
    pub fn stats(&self) -> TextureStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/registry.rs"]
mod tests;
