//! Text-to-geometry conversion.
//!
//! Two sources are provided: a built-in 5×7 block font that extrudes each
//! lit cell into a box, and a directory of per-character OBJ files.

use crate::core::math::transform::TransformFactory;
use crate::io::obj_loader::{ObjError, load_obj};
use crate::scene::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum GlyphError {
    #[error("no glyph for character {0:?}")]
    UnsupportedCharacter(char),

    #[error("glyph file missing: {0}")]
    Missing(PathBuf),

    #[error(transparent)]
    Load(#[from] ObjError),

    #[error("text {0:?} produced no geometry")]
    Empty(String),
}

/// Size parameters of generated text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Glyph height in world units.
    pub size: f32,
    /// Extrusion along +Z.
    pub depth: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 1.0,
            depth: 0.2,
        }
    }
}

/// Anything that can turn a string into a mesh. Text starts at the origin
/// (left edge, baseline) and runs along +X.
pub trait GlyphSource: Send + Sync {
    fn build(&self, text: &str, style: &TextStyle) -> Result<Mesh, GlyphError>;
}

const ROWS: usize = 7;
const COLS: usize = 5;

/// Built-in block font covering `A-Z` (case-insensitive), `0-9` and space.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl BlockFont {
    /// Row bitmaps, top row first, bit 4 = leftmost column.
    fn bitmap(ch: char) -> Option<[u8; ROWS]> {
        let rows = match ch.to_ascii_uppercase() {
            'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
            'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
            'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
            'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
            'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
            'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
            'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
            'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
            'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
            'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
            'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
            'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
            'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
            'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
            'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
            'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
            'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
            'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
            'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
            'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
            'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
            'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
            '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
            '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
            '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
            '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
            '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
            '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
            '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
            '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
            '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
            '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
            ' ' => [0; ROWS],
            _ => return None,
        };
        Some(rows)
    }

    /// Horizontal runs of lit cells in one row as `(first_col, len)`.
    fn runs(row: u8) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut col = 0;
        while col < COLS {
            if row & (1 << (COLS - 1 - col)) == 0 {
                col += 1;
                continue;
            }
            let start = col;
            while col < COLS && row & (1 << (COLS - 1 - col)) != 0 {
                col += 1;
            }
            runs.push((start, col - start));
        }
        runs
    }
}

impl GlyphSource for BlockFont {
    fn build(&self, text: &str, style: &TextStyle) -> Result<Mesh, GlyphError> {
        let cell = style.size / ROWS as f32;
        let advance = (COLS + 1) as f32 * cell;
        let mut mesh = Mesh::default();

        for (index, ch) in text.chars().enumerate() {
            let rows = Self::bitmap(ch).ok_or(GlyphError::UnsupportedCharacter(ch))?;
            let origin_x = index as f32 * advance;

            for (row_index, &row) in rows.iter().enumerate() {
                let y0 = (ROWS - 1 - row_index) as f32 * cell;
                for (col, len) in Self::runs(row) {
                    let x0 = origin_x + col as f32 * cell;
                    mesh.append(&Mesh::create_box(
                        Point3::new(x0, y0, 0.0),
                        Point3::new(x0 + len as f32 * cell, y0 + cell, style.depth),
                    ));
                }
            }
        }

        if mesh.is_empty() {
            return Err(GlyphError::Empty(text.to_string()));
        }
        Ok(mesh)
    }
}

/// Glyphs read from `<dir>/<char>.obj`, each scaled to `style.size` tall.
#[derive(Debug, Clone)]
pub struct ObjGlyphSource {
    pub dir: PathBuf,
}

impl ObjGlyphSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl GlyphSource for ObjGlyphSource {
    fn build(&self, text: &str, style: &TextStyle) -> Result<Mesh, GlyphError> {
        let spacing = style.size * 0.2;
        let mut cursor = 0.0;
        let mut mesh = Mesh::default();

        for ch in text.chars() {
            if ch == ' ' {
                cursor += style.size * 0.6;
                continue;
            }
            let path = self.dir.join(format!("{ch}.obj"));
            if !path.exists() {
                return Err(GlyphError::Missing(path));
            }
            let mut glyph = load_obj(&path)?;
            let Some((lo, hi)) = glyph.bounds() else {
                return Err(GlyphError::Empty(ch.to_string()));
            };

            let extent = hi - lo;
            let scale = if extent.y > 1e-6 { style.size / extent.y } else { 1.0 };
            let place = TransformFactory::translation(&Vector3::new(cursor, 0.0, 0.0))
                * TransformFactory::scaling(&Vector3::repeat(scale))
                * TransformFactory::translation(&-lo.coords);
            glyph.transform(&place);

            cursor += extent.x * scale + spacing;
            mesh.append(&glyph);
        }

        if mesh.is_empty() {
            return Err(GlyphError::Empty(text.to_string()));
        }
        Ok(mesh)
    }
}
