//! Engrave text rasterizer
//!
//! Maps text to the squares of a 5 x 7 pixel font. Placements come back in a
//! y-up frame whose origin is the lower-left corner of the text block, so a
//! caller can centre the block with [`Raster::translated`].
//!
//! The cutting service strokes paths and never fills them, so each lit pixel
//! is emitted as a closed square outline (see [`PixelPlacement::outline`]).
//! Each square is inset within its cell so that neighbouring outlines do not
//! share an edge.
//!
//! Only upper-case letters, digits, space and `- . : /` are supported. There
//! is no case folding: `'a'` is rejected like any other unsupported
//! character.

use crate::geometry::{close_path, Point};
use faxbox_core::GlyphError;
use serde::Serialize;

pub const GLYPH_COLUMNS: usize = 5;
pub const GLYPH_ROWS: usize = 7;

/// Fraction of the pixel pitch covered by a lit square.
const PIXEL_FILL: f64 = 0.85;

/// Bitmap for `ch`, top row first. `#` is a lit pixel.
pub fn glyph(ch: char) -> Option<[&'static str; GLYPH_ROWS]> {
    let rows = match ch {
        'A' => [" ### ", "#   #", "#   #", "#####", "#   #", "#   #", "#   #"],
        'B' => ["#### ", "#   #", "#   #", "#### ", "#   #", "#   #", "#### "],
        'C' => [" ####", "#    ", "#    ", "#    ", "#    ", "#    ", " ####"],
        'D' => ["#### ", "#   #", "#   #", "#   #", "#   #", "#   #", "#### "],
        'E' => ["#####", "#    ", "#    ", "#### ", "#    ", "#    ", "#####"],
        'F' => ["#####", "#    ", "#    ", "#### ", "#    ", "#    ", "#    "],
        'G' => [" ####", "#    ", "#    ", "#  ##", "#   #", "#   #", " ####"],
        'H' => ["#   #", "#   #", "#   #", "#####", "#   #", "#   #", "#   #"],
        'I' => ["#####", "  #  ", "  #  ", "  #  ", "  #  ", "  #  ", "#####"],
        'J' => ["  ###", "   # ", "   # ", "   # ", "   # ", "#  # ", " ##  "],
        'K' => ["#   #", "#  # ", "# #  ", "##   ", "# #  ", "#  # ", "#   #"],
        'L' => ["#    ", "#    ", "#    ", "#    ", "#    ", "#    ", "#####"],
        'M' => ["#   #", "## ##", "# # #", "#   #", "#   #", "#   #", "#   #"],
        'N' => ["#   #", "##  #", "# # #", "#  ##", "#   #", "#   #", "#   #"],
        'O' => [" ### ", "#   #", "#   #", "#   #", "#   #", "#   #", " ### "],
        'P' => ["#### ", "#   #", "#   #", "#### ", "#    ", "#    ", "#    "],
        'Q' => [" ### ", "#   #", "#   #", "#   #", "# # #", "#  # ", " ## #"],
        'R' => ["#### ", "#   #", "#   #", "#### ", "# #  ", "#  # ", "#   #"],
        'S' => [" ####", "#    ", "#    ", " ### ", "    #", "    #", "#### "],
        'T' => ["#####", "  #  ", "  #  ", "  #  ", "  #  ", "  #  ", "  #  "],
        'U' => ["#   #", "#   #", "#   #", "#   #", "#   #", "#   #", " ### "],
        'V' => ["#   #", "#   #", "#   #", "#   #", "#   #", " # # ", "  #  "],
        'W' => ["#   #", "#   #", "#   #", "# # #", "# # #", "## ##", "#   #"],
        'X' => ["#   #", "#   #", " # # ", "  #  ", " # # ", "#   #", "#   #"],
        'Y' => ["#   #", "#   #", " # # ", "  #  ", "  #  ", "  #  ", "  #  "],
        'Z' => ["#####", "    #", "   # ", "  #  ", " #   ", "#    ", "#####"],
        '0' => [" ### ", "#   #", "#  ##", "# # #", "##  #", "#   #", " ### "],
        '1' => ["  #  ", " ##  ", "  #  ", "  #  ", "  #  ", "  #  ", " ### "],
        '2' => [" ### ", "#   #", "    #", "   # ", "  #  ", " #   ", "#####"],
        '3' => ["#####", "   # ", "  #  ", "   # ", "    #", "#   #", " ### "],
        '4' => ["   # ", "  ## ", " # # ", "#  # ", "#####", "   # ", "   # "],
        '5' => ["#####", "#    ", "#### ", "    #", "    #", "#   #", " ### "],
        '6' => ["  ## ", " #   ", "#    ", "#### ", "#   #", "#   #", " ### "],
        '7' => ["#####", "    #", "   # ", "  #  ", " #   ", " #   ", " #   "],
        '8' => [" ### ", "#   #", "#   #", " ### ", "#   #", "#   #", " ### "],
        '9' => [" ### ", "#   #", "#   #", " ####", "    #", "   # ", " ##  "],
        ' ' => ["     ", "     ", "     ", "     ", "     ", "     ", "     "],
        '-' => ["     ", "     ", "     ", " ### ", "     ", "     ", "     "],
        '.' => ["     ", "     ", "     ", "     ", "     ", "     ", "  #  "],
        ':' => ["     ", "     ", "  #  ", "     ", "  #  ", "     ", "     "],
        '/' => ["    #", "    #", "   # ", "  #  ", " #   ", "#    ", "#    "],
        _ => return None,
    };
    Some(rows)
}

/// One lit pixel: the lower-left corner and side of its square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelPlacement {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl PixelPlacement {
    /// Closed square outline of this pixel.
    pub fn outline(&self) -> Vec<Point> {
        let mut path = vec![
            Point::new(self.x, self.y),
            Point::new(self.x + self.size, self.y),
            Point::new(self.x + self.size, self.y + self.size),
            Point::new(self.x, self.y + self.size),
        ];
        close_path(&mut path);
        path
    }
}

/// Rasterized text block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Raster {
    pub placements: Vec<PixelPlacement>,
    /// Width of the block, from the left of the first cell to the right of the last.
    pub width: f64,
    pub height: f64,
}

impl Raster {
    /// Copy with every placement moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Raster {
        Raster {
            placements: self
                .placements
                .iter()
                .map(|p| PixelPlacement {
                    x: p.x + dx,
                    y: p.y + dy,
                    size: p.size,
                })
                .collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Bounding box of the lit squares, if any.
    pub fn extent(&self) -> Option<(Point, Point)> {
        let first = self.placements.first()?;
        let mut min = Point::new(first.x, first.y);
        let mut max = Point::new(first.x + first.size, first.y + first.size);
        for p in &self.placements {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x + p.size);
            max.y = max.y.max(p.y + p.size);
        }
        Some((min, max))
    }
}

/// Rasterize `text` with `pixel_size` pitch and `spacing` between glyph cells.
pub fn rasterize(text: &str, pixel_size: f64, spacing: f64) -> Result<Raster, GlyphError> {
    if !pixel_size.is_finite() || pixel_size <= 0.0 {
        return Err(GlyphError::InvalidMetrics {
            reason: format!("pixel size must be positive, got {}", pixel_size),
        });
    }
    if !spacing.is_finite() || spacing < 0.0 {
        return Err(GlyphError::InvalidMetrics {
            reason: format!("spacing must not be negative, got {}", spacing),
        });
    }

    let advance = GLYPH_COLUMNS as f64 * pixel_size + spacing;
    let size = pixel_size * PIXEL_FILL;
    let inset = (pixel_size - size) / 2.0;

    let mut placements = Vec::new();
    let mut count = 0usize;
    for (index, ch) in text.chars().enumerate() {
        let rows = glyph(ch).ok_or(GlyphError::Unsupported { ch, index })?;
        let origin_x = index as f64 * advance;
        for (row, bits) in rows.iter().enumerate() {
            let y = (GLYPH_ROWS - 1 - row) as f64 * pixel_size + inset;
            for (col, bit) in bits.chars().enumerate() {
                if bit == '#' {
                    placements.push(PixelPlacement {
                        x: origin_x + col as f64 * pixel_size + inset,
                        y,
                        size,
                    });
                }
            }
        }
        count += 1;
    }

    let width = if count == 0 {
        0.0
    } else {
        count as f64 * GLYPH_COLUMNS as f64 * pixel_size + (count - 1) as f64 * spacing
    };

    Ok(Raster {
        placements,
        width,
        height: GLYPH_ROWS as f64 * pixel_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_table_shape() {
        let chars = ('A'..='Z').chain('0'..='9').chain(" -.:/".chars());
        for ch in chars {
            let rows = glyph(ch).unwrap_or_else(|| panic!("missing glyph {:?}", ch));
            for row in rows {
                assert_eq!(row.chars().count(), GLYPH_COLUMNS, "glyph {:?}", ch);
                assert!(row.chars().all(|c| c == '#' || c == ' '));
            }
        }
    }

    #[test]
    fn test_letter_f() {
        let raster = rasterize("F", 3.0, 1.0).unwrap();
        // Top bar 5, middle bar 4, plus 5 more pixels of the stem.
        assert_eq!(raster.placements.len(), 14);
        assert_eq!(raster.width, 15.0);
        assert_eq!(raster.height, 21.0);

        let size = 3.0 * 0.85;
        let inset = (3.0 - size) / 2.0;
        let top_left = raster.placements[0];
        assert!((top_left.x - inset).abs() < 1e-12);
        assert!((top_left.y - (18.0 + inset)).abs() < 1e-12);
        assert!((top_left.size - size).abs() < 1e-12);
    }

    #[test]
    fn test_fax_is_repeatable() {
        let first = rasterize("FAX", 3.0, 1.0).unwrap();
        assert_eq!(first, rasterize("FAX", 3.0, 1.0).unwrap());
        assert_eq!(first.width, 3.0 * 15.0 + 2.0);
        assert!(!first.placements.is_empty());
    }

    #[test]
    fn test_advance_and_width() {
        let raster = rasterize("II", 2.0, 3.0).unwrap();
        assert_eq!(raster.width, 2.0 * 10.0 + 3.0);
        let second_start = raster
            .placements
            .iter()
            .map(|p| p.x)
            .filter(|x| *x > 10.0)
            .fold(f64::INFINITY, f64::min);
        assert!((second_start - (13.0 + 0.15)).abs() < 1e-9);
    }

    #[test]
    fn test_space_has_no_pixels() {
        let raster = rasterize(" ", 3.0, 2.0).unwrap();
        assert!(raster.placements.is_empty());
        assert_eq!(raster.width, 15.0);
    }

    #[test]
    fn test_unsupported_reports_position() {
        assert_eq!(
            rasterize("FAX!", 3.0, 1.0),
            Err(GlyphError::Unsupported { ch: '!', index: 3 })
        );
    }

    #[test]
    fn test_invalid_metrics() {
        assert!(matches!(
            rasterize("A", 0.0, 1.0),
            Err(GlyphError::InvalidMetrics { .. })
        ));
        assert!(matches!(
            rasterize("A", 1.0, -1.0),
            Err(GlyphError::InvalidMetrics { .. })
        ));
    }

    #[test]
    fn test_translated_and_outline() {
        let raster = rasterize("I", 1.0, 0.0).unwrap().translated(10.0, 20.0);
        let (min, max) = raster.extent().unwrap();
        assert!((min.x - 10.075).abs() < 1e-9);
        assert!((max.y - (27.0 - 0.075)).abs() < 1e-9);

        let outline = raster.placements[0].outline();
        assert_eq!(outline.len(), 5);
        assert_eq!(outline.first(), outline.last());
    }
}
