pub(crate) mod glyph;
pub(crate) mod quotes;
pub(crate) mod registry;
