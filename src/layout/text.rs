use crate::assets::glyph::{GlyphImage, GlyphRasterizer};
use crate::foundation::core::Vec2;

/// Constants driving [`layout`]. Lengths are in scene units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Height of one glyph plane; its width is `aspect * base_size`.
    pub base_size: f32,
    /// Soft-wrap boundary for quote lines.
    pub max_row_width: f32,
    /// Vertical distance between quote lines.
    pub line_height: f32,
    /// Scale applied to author glyphs.
    pub author_scale: f32,
    /// Gap between glyphs of one quote word.
    pub kerning: f32,
    /// Gap between author glyphs.
    pub author_kerning: f32,
    /// Inter-word space as a fraction of `base_size`.
    pub space_ratio: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            base_size: 5.0,
            max_row_width: 110.0,
            line_height: 8.0,
            author_scale: 0.45,
            kerning: 0.5,
            author_kerning: 0.2,
            space_ratio: 0.6,
        }
    }
}

impl LayoutParams {
    /// Width of the gap between two quote words.
    pub fn space_width(&self) -> f32 {
        self.base_size * self.space_ratio
    }
}

/// Which part of the layout a glyph belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GlyphRole {
    /// Letter of the quote body.
    Quote,
    /// Letter of the author line.
    Author,
}

/// A placed character.
#[derive(Clone, Debug)]
pub struct Glyph {
    /// Upper-cased character.
    pub ch: char,
    /// Unscaled plane width (`aspect * base_size`).
    pub width: f32,
    /// Index of the owning word, counted across the whole quote or across the author line.
    pub word: usize,
    /// Index of the owning line; the author line follows the quote lines.
    pub line: usize,
    /// Quote or author letter.
    pub role: GlyphRole,
    /// Center of the glyph in layout space (unscaled, origin at the block center).
    pub target: Vec2,
    /// Rasterized image backing this glyph.
    pub image: GlyphImage,
}

/// Ordered glyphs of one quote word.
#[derive(Clone, Debug)]
pub struct Word {
    /// Glyphs left to right.
    pub glyphs: Vec<Glyph>,
    /// Sum of glyph widths plus kerning between them.
    pub width: f32,
}

/// One wrapped quote line.
#[derive(Clone, Debug)]
pub struct Line {
    /// Words left to right.
    pub words: Vec<Word>,
    /// Sum of word widths plus inter-word spaces.
    pub width: f32,
    /// Vertical center of the line.
    pub y: f32,
}

/// Result of laying out one quote.
#[derive(Clone, Debug)]
pub struct TextLayout {
    /// Wrapped quote lines, top to bottom.
    pub lines: Vec<Line>,
    /// Author line glyphs, left to right.
    pub author: Vec<Glyph>,
    /// Scaled width of the author line.
    pub author_width: f32,
    /// Vertical center of the author line.
    pub author_y: f32,
    /// Height taken by quote lines alone.
    pub quote_height: f32,
    /// Bounding width used for fitting (the wrap width).
    pub total_width: f32,
    /// Quote block height plus the author gap.
    pub total_height: f32,
}

impl TextLayout {
    /// All glyphs: quote lines in reading order, then the author line.
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.lines
            .iter()
            .flat_map(|l| l.words.iter())
            .flat_map(|w| w.glyphs.iter())
            .chain(self.author.iter())
    }

    /// Number of glyphs across quote and author.
    pub fn glyph_count(&self) -> usize {
        self.glyphs().count()
    }

    /// Consume the layout, yielding glyphs in [`TextLayout::glyphs`] order.
    pub fn into_glyphs(self) -> Vec<Glyph> {
        let mut out: Vec<Glyph> = self
            .lines
            .into_iter()
            .flat_map(|l| l.words)
            .flat_map(|w| w.glyphs)
            .collect();
        out.extend(self.author);
        out
    }
}

/// Lay out `quote` as centered, greedily wrapped lines with `author` underneath.
///
/// The quote is upper-cased and split on whitespace. A line breaks when appending the next word
/// and its leading space would exceed `max_row_width`; a word wider than the row still gets a
/// line of its own. The author line reads `// AUTHOR`, is never wrapped and uses
/// `author_scale`-scaled glyph widths. Empty strings produce no glyphs for their part.
#[tracing::instrument(level = "debug", skip(params, rasterizer))]
pub fn layout(
    quote: &str,
    author: &str,
    params: &LayoutParams,
    rasterizer: &mut dyn GlyphRasterizer,
    family: &str,
) -> TextLayout {
    let upper = quote.to_uppercase();
    let words: Vec<Word> = upper
        .split_whitespace()
        .enumerate()
        .map(|(i, w)| build_word(i, w, params, rasterizer, family))
        .collect();

    let space = params.space_width();
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut current_width = 0.0f32;
    for word in words {
        if !current.is_empty() && current_width + space + word.width > params.max_row_width {
            lines.push(Line {
                words: std::mem::take(&mut current),
                width: current_width,
                y: 0.0,
            });
            current_width = 0.0;
        }
        if !current.is_empty() {
            current_width += space;
        }
        current_width += word.width;
        current.push(word);
    }
    if !current.is_empty() {
        lines.push(Line {
            words: current,
            width: current_width,
            y: 0.0,
        });
    }

    let quote_height = lines.len() as f32 * params.line_height;
    let author_gap = params.line_height * 1.5;
    let total_height = quote_height + author_gap;
    let start_y = total_height / 2.0 - params.line_height / 2.0;

    for (line_idx, line) in lines.iter_mut().enumerate() {
        line.y = start_y - line_idx as f32 * params.line_height;
        let mut x = -line.width / 2.0;
        for word in &mut line.words {
            let word_start = x;
            for glyph in &mut word.glyphs {
                glyph.line = line_idx;
                glyph.target = Vec2::new(x + glyph.width / 2.0, line.y);
                x += glyph.width + params.kerning;
            }
            x = word_start + word.width + space;
        }
    }

    let author_y = start_y - quote_height - author_gap / 2.0;
    let (author, author_width) = layout_author(
        author,
        params,
        rasterizer,
        family,
        lines.len(),
        author_y,
    );

    tracing::debug!(
        lines = lines.len(),
        author_glyphs = author.len(),
        total_height,
        "quote laid out"
    );

    TextLayout {
        lines,
        author,
        author_width,
        author_y,
        quote_height,
        total_width: params.max_row_width,
        total_height,
    }
}

fn build_word(
    index: usize,
    word: &str,
    params: &LayoutParams,
    rasterizer: &mut dyn GlyphRasterizer,
    family: &str,
) -> Word {
    let glyphs: Vec<Glyph> = word
        .chars()
        .map(|ch| {
            let image = rasterizer.rasterize(ch, family);
            Glyph {
                ch,
                width: params.base_size * image.aspect(),
                word: index,
                line: 0,
                role: GlyphRole::Quote,
                target: Vec2::ZERO,
                image,
            }
        })
        .collect();
    let width = glyphs.iter().map(|g| g.width).sum::<f32>()
        + params.kerning * glyphs.len().saturating_sub(1) as f32;
    Word { glyphs, width }
}

enum AuthorItem {
    Space,
    Glyph(Glyph),
}

fn layout_author(
    author: &str,
    params: &LayoutParams,
    rasterizer: &mut dyn GlyphRasterizer,
    family: &str,
    line: usize,
    y: f32,
) -> (Vec<Glyph>, f32) {
    let name = author.trim();
    if name.is_empty() {
        return (Vec::new(), 0.0);
    }
    let text = format!("// {}", name.to_uppercase());

    let mut word = 0usize;
    let items: Vec<AuthorItem> = text
        .chars()
        .map(|ch| {
            if ch.is_whitespace() {
                word += 1;
                return AuthorItem::Space;
            }
            let image = rasterizer.rasterize(ch, family);
            AuthorItem::Glyph(Glyph {
                ch,
                width: params.base_size * image.aspect(),
                word,
                line,
                role: GlyphRole::Author,
                target: Vec2::ZERO,
                image,
            })
        })
        .collect();

    let space = params.space_width() * params.author_scale;
    let advance = |item: &AuthorItem| match item {
        AuthorItem::Space => space,
        AuthorItem::Glyph(g) => g.width * params.author_scale + params.author_kerning,
    };
    let mut width: f32 = items.iter().map(advance).sum();
    if matches!(items.last(), Some(AuthorItem::Glyph(_))) {
        width -= params.author_kerning;
    }

    let mut x = -width / 2.0;
    let mut glyphs = Vec::with_capacity(items.len());
    for item in items {
        let step = advance(&item);
        if let AuthorItem::Glyph(mut g) = item {
            g.target = Vec2::new(x + g.width * params.author_scale / 2.0, y);
            glyphs.push(g);
        }
        x += step;
    }
    (glyphs, width)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
