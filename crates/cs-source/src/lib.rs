/// Frame producers for camscii (still image, procedural test patterns).

pub mod image;
pub mod pattern;
