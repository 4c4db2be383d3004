//! Sheet layout
//!
//! Rendered panels are packed onto sheets in shelves: tallest first, left to
//! right, starting a new row when the sheet width runs out. When the sheet
//! height runs out the layout either fails or, with `multi_sheet` set,
//! continues on a fresh sheet.

use crate::error::{LayoutError, LayoutResult};
use crate::geometry::Point;
use crate::panel::{Outline, RenderedPanel};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Usable sheet width, mm.
    pub sheet_width: f64,
    /// Usable sheet height, mm.
    pub sheet_height: f64,
    /// Gap between parts, mm.
    pub spacing: f64,
    /// Continue on a new sheet instead of failing when one is full.
    pub multi_sheet: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            sheet_width: 1290.0,
            sheet_height: 800.0,
            spacing: 5.0,
            multi_sheet: false,
        }
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> LayoutResult<()> {
        for (name, value) in [("sheet_width", self.sheet_width), ("sheet_height", self.sheet_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidSettings {
                    name: name.to_string(),
                    reason: format!("must be positive, got {}", value),
                });
            }
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(LayoutError::InvalidSettings {
                name: "spacing".to_string(),
                reason: format!("must not be negative, got {}", self.spacing),
            });
        }
        Ok(())
    }
}

/// A panel moved into sheet coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedPanel {
    pub id: String,
    pub label: String,
    pub outlines: Vec<Outline>,
}

/// One sheet of packed panels. `width` and `height` are the used extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub panels: Vec<PlacedPanel>,
    pub width: f64,
    pub height: f64,
}

impl Sheet {
    fn new() -> Self {
        Self {
            panels: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    fn place(&mut self, panel: RenderedPanel, x: f64, y: f64) {
        let dx = x - panel.bounds.min_x;
        let dy = y - panel.bounds.min_y;
        self.width = self.width.max(x + panel.bounds.width());
        self.height = self.height.max(y + panel.bounds.height());
        self.panels.push(PlacedPanel {
            id: panel.id,
            label: panel.label,
            outlines: panel
                .outlines
                .into_iter()
                .map(|outline| Outline {
                    operation: outline.operation,
                    points: outline.points.iter().map(|p| p.offset(dx, dy)).collect(),
                })
                .collect(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Whether every point of every outline lies on the sheet.
    pub fn contains_all(&self) -> bool {
        let on_sheet = |p: &Point| {
            p.x >= -1e-9 && p.y >= -1e-9 && p.x <= self.width + 1e-9 && p.y <= self.height + 1e-9
        };
        self.panels
            .iter()
            .flat_map(|panel| &panel.outlines)
            .flat_map(|outline| &outline.points)
            .all(on_sheet)
    }
}

#[derive(Clone, Copy, Debug)]
struct LayoutCursor {
    x: f64,
    y: f64,
    row_height: f64,
    spacing: f64,
}

impl LayoutCursor {
    fn new(spacing: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            row_height: 0.0,
            spacing,
        }
    }

    fn place(&mut self, width: f64, height: f64) -> (f64, f64) {
        let position = (self.x, self.y);
        self.x += width + self.spacing;
        self.row_height = self.row_height.max(height);
        position
    }

    fn next_row(&mut self) {
        self.y += self.row_height + self.spacing;
        self.x = 0.0;
        self.row_height = 0.0;
    }
}

/// Pack `panels` onto as many sheets as `settings` allow.
pub fn pack(mut panels: Vec<RenderedPanel>, settings: &LayoutSettings) -> LayoutResult<Vec<Sheet>> {
    settings.validate()?;

    for panel in &panels {
        let (w, h) = (panel.bounds.width(), panel.bounds.height());
        if w > settings.sheet_width || h > settings.sheet_height {
            return Err(oversize(&panel.id, w, h, settings));
        }
    }

    // Sort by height descending, then label
    panels.sort_by(|a, b| {
        b.bounds
            .height()
            .total_cmp(&a.bounds.height())
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut sheets = Vec::new();
    let mut sheet = Sheet::new();
    let mut cursor = LayoutCursor::new(settings.spacing);

    for panel in panels {
        let (w, h) = (panel.bounds.width(), panel.bounds.height());
        if cursor.x > 0.0 && cursor.x + w > settings.sheet_width {
            cursor.next_row();
        }
        if cursor.y + h > settings.sheet_height {
            if !settings.multi_sheet {
                let width = sheet.width.max(w);
                return Err(oversize("layout", width, cursor.y + h, settings));
            }
            debug!("sheet {} full after {} panels", sheets.len() + 1, sheet.panels.len());
            sheets.push(std::mem::replace(&mut sheet, Sheet::new()));
            cursor = LayoutCursor::new(settings.spacing);
        }
        let (x, y) = cursor.place(w, h);
        sheet.place(panel, x, y);
    }
    if !sheet.is_empty() {
        sheets.push(sheet);
    }

    debug!("packed onto {} sheet(s)", sheets.len());
    Ok(sheets)
}

fn oversize(subject: &str, width: f64, height: f64, settings: &LayoutSettings) -> LayoutError {
    LayoutError::Oversize {
        subject: subject.to_string(),
        width,
        height,
        sheet_width: settings.sheet_width,
        sheet_height: settings.sheet_height,
    }
}
