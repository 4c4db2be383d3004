//! Finger-joint panel renderer
//!
//! Draws each [`PanelSpec`] as closed outlines: the border with fingers and
//! notches, one outline per cutout and finger hole, and one engrave square per
//! lit text pixel. Finger pitch is given in multiples of the stock thickness;
//! `burn` is the kerf, and half of it is added to or taken off each cut so the
//! finished parts come out at nominal size.

use crate::geometry::{close_path, push_unique_point, rounded_rect, Bounds, Point};
use crate::panel::{
    Direction, Edge, EdgeRole, Feature, Operation, Outline, PanelRenderer, PanelSpec,
    RenderedPanel,
};
use faxbox_core::{FingerJointSettings, Length, RenderingError};
use tracing::trace;

pub struct FingerJointRenderer {
    settings: FingerJointSettings,
    t: f64,
    burn: f64,
}

impl FingerJointRenderer {
    pub fn new(settings: FingerJointSettings, thickness: Length, burn: f64) -> Self {
        Self {
            settings,
            t: thickness.as_mm(),
            burn,
        }
    }

    /// Calculate number of fingers and leftover space for a given length
    pub fn calc_fingers(&self, length: f64) -> (usize, f64) {
        let settings = &self.settings;
        let t = self.t;

        let space = settings.space * t;
        let finger = settings.finger * t;

        if finger <= 0.0 || space + finger <= 0.0 {
            return (0, length);
        }

        let mut fingers = ((length - (settings.surrounding_spaces - 1.0) * space)
            / (space + finger))
            .floor()
            .max(0.0) as usize;

        // Shrink surrounding space if a single finger still fits
        if fingers == 0 && length > finger + t {
            fingers = 1;
        }

        let leftover = if fingers > 0 {
            length - (fingers as f64) * (space + finger) + space
        } else {
            length
        };

        (fingers, leftover)
    }

    /// Outermost line of an edge in its own frame, kerf included.
    ///
    /// Both tabbed roles reach one thickness past the nominal line: male
    /// fingers stick out to it, female edges are based on it and notched
    /// back to the nominal line. A panel spans its nominal size plus `t` for
    /// every tabbed edge.
    fn base_line(&self, role: EdgeRole) -> f64 {
        let half_kerf = self.burn / 2.0;
        match role {
            EdgeRole::Female => -self.t - half_kerf,
            EdgeRole::Male | EdgeRole::Plain => -half_kerf,
        }
    }

    /// One tabbed edge along +x from the origin, panel material on +y.
    ///
    /// Male fingers reach from the nominal line out to `-t`; female notches
    /// are cut from `-t` back to the nominal line.
    fn draw_finger_edge(&self, length: f64, male: bool) -> Vec<Point> {
        let mut path = Vec::new();
        let t = self.t;

        let mut space = self.settings.space * t;
        let mut finger = self.settings.finger * t;
        let play = self.settings.play * t;
        let kerf = self.burn;
        let half_kerf = kerf / 2.0;

        let (fingers, mut leftover) = self.calc_fingers(length);

        if !male {
            finger += play;
            space -= play;
            leftover -= play;
        }

        let (finger_draw, space_draw, leftover_draw, tip_y) = if male {
            (finger + kerf, space - kerf, leftover - kerf, -t - half_kerf)
        } else {
            (finger - kerf, space + kerf, leftover + kerf, -half_kerf)
        };
        let base_y = if male { -half_kerf } else { -t - half_kerf };

        let mut x = 0.0;
        path.push(Point::new(x, base_y));
        x += leftover_draw / 2.0;
        path.push(Point::new(x, base_y));

        for i in 0..fingers {
            path.push(Point::new(x, tip_y));
            x += finger_draw;
            path.push(Point::new(x, tip_y));
            path.push(Point::new(x, base_y));

            if i + 1 < fingers {
                x += space_draw;
                path.push(Point::new(x, base_y));
            }
        }

        x += leftover_draw / 2.0;
        path.push(Point::new(x, base_y));

        path
    }

    /// Border of a `width` x `height` panel, counter-clockwise from the
    /// lower-left corner.
    fn draw_border(&self, panel: &PanelSpec) -> Result<Vec<Point>, RenderingError> {
        let width = panel.width.as_mm();
        let height = panel.height.as_mm();
        let mut path: Vec<Point> = Vec::new();

        for (i, edge) in Edge::ALL.into_iter().enumerate() {
            let role = panel.edges.role(edge);
            let previous = panel.edges.role(Edge::ALL[(i + 3) % 4]);
            let length = match edge {
                Edge::Bottom | Edge::Top => width,
                Edge::Right | Edge::Left => height,
            };

            // Map the edge frame (x along, y inward) onto the panel.
            let place = |p: &Point| match edge {
                Edge::Bottom => Point::new(p.x, p.y),
                Edge::Right => Point::new(width - p.y, p.x),
                Edge::Top => Point::new(width - p.x, height - p.y),
                Edge::Left => Point::new(p.y, height - p.x),
            };

            // Corner shared with the previous edge.
            let corner = Point::new(self.base_line(previous), self.base_line(role));
            push_unique_point(&mut path, place(&corner));

            if role.is_tabbed() {
                let (fingers, _) = self.calc_fingers(length);
                if fingers == 0 {
                    return Err(RenderingError::EdgeTooShort {
                        panel: panel.id.clone(),
                        edge: edge.index(),
                        length: panel.edge_length(edge),
                    });
                }
                for p in self.draw_finger_edge(length, role == EdgeRole::Male) {
                    push_unique_point(&mut path, place(&p));
                }
            }
        }

        close_path(&mut path);
        Ok(path)
    }

    /// Slots for a row of fingers entering the panel face.
    fn draw_finger_holes(
        &self,
        panel: &PanelSpec,
        name: &str,
        start: Point,
        length: f64,
        across: f64,
        direction: Direction,
    ) -> Result<Vec<Vec<Point>>, RenderingError> {
        let (fingers, mut leftover) = self.calc_fingers(length);
        if fingers == 0 {
            return Err(RenderingError::InvalidPanel {
                panel: panel.id.clone(),
                reason: format!("finger hole row '{}' is too short for a finger", name),
            });
        }

        let mut space = self.settings.space * self.t;
        let mut finger = self.settings.finger * self.t;
        let play = self.settings.play * self.t;
        let kerf = self.burn;

        // Holes are cut with play, like female notches
        finger += play;
        space -= play;
        leftover -= play;

        let slot_w = finger - kerf;
        let slot_h = across - kerf;

        let mut holes = Vec::with_capacity(fingers);
        for i in 0..fingers {
            let pos = leftover / 2.0 + i as f64 * (finger + space) + kerf / 2.0;
            let (x, y, w, h) = match direction {
                Direction::Vertical => (start.x - slot_h / 2.0, start.y + pos, slot_h, slot_w),
                Direction::Horizontal => (start.x + pos, start.y - slot_h / 2.0, slot_w, slot_h),
            };
            let mut path = vec![
                Point::new(x, y),
                Point::new(x + w, y),
                Point::new(x + w, y + h),
                Point::new(x, y + h),
            ];
            close_path(&mut path);
            holes.push(path);
        }
        Ok(holes)
    }
}

impl PanelRenderer for FingerJointRenderer {
    fn render(&self, panel: &PanelSpec) -> Result<RenderedPanel, RenderingError> {
        let mut outlines = vec![Outline {
            operation: Operation::Cut,
            points: self.draw_border(panel)?,
        }];

        for feature in &panel.features {
            match feature {
                Feature::Cutout {
                    center,
                    size,
                    radius,
                    ..
                } => {
                    // Holes shrink by the kerf
                    let points = rounded_rect(
                        center.to_point(),
                        size.width.as_mm() - self.burn,
                        size.height.as_mm() - self.burn,
                        radius.as_mm(),
                    );
                    outlines.push(Outline {
                        operation: Operation::Cut,
                        points,
                    });
                }
                Feature::FingerHoles {
                    name,
                    start,
                    length,
                    direction,
                    width,
                } => {
                    let holes = self.draw_finger_holes(
                        panel,
                        name,
                        start.to_point(),
                        length.as_mm(),
                        width.as_mm(),
                        *direction,
                    )?;
                    outlines.extend(holes.into_iter().map(|points| Outline {
                        operation: Operation::Cut,
                        points,
                    }));
                }
                Feature::Engraving { raster, .. } => {
                    outlines.extend(raster.placements.iter().map(|pixel| Outline {
                        operation: Operation::Engrave,
                        points: pixel.outline(),
                    }));
                }
            }
        }

        let bounds = Bounds::of(outlines.iter().flat_map(|o| o.points.iter())).ok_or_else(|| {
            RenderingError::InvalidPanel {
                panel: panel.id.clone(),
                reason: "no geometry".to_string(),
            }
        })?;

        trace!(
            "rendered {} ({}) as {} outlines",
            panel.id,
            panel.edges,
            outlines.len()
        );

        Ok(RenderedPanel {
            id: panel.id.clone(),
            label: panel.label.clone(),
            outlines,
            bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{PanelPoint, PanelSpec};
    use crate::raster::rasterize;
    use faxbox_core::PanelSize;

    fn mm(v: f64) -> Length {
        Length::from_mm(v)
    }

    fn renderer(burn: f64) -> FingerJointRenderer {
        FingerJointRenderer::new(FingerJointSettings::default(), mm(3.0), burn)
    }

    fn panel(w: f64, h: f64, roles: &str) -> PanelSpec {
        PanelSpec::new("test", "Test", PanelSize::new(mm(w), mm(h)), roles.parse().unwrap())
    }

    #[test]
    fn test_calc_fingers() {
        let r = renderer(0.0);
        // (100 - 6) / 12 = 7 fingers, leftover 100 - 84 + 6 = 22
        let (fingers, leftover) = r.calc_fingers(100.0);
        assert_eq!(fingers, 7);
        assert!((leftover - 22.0).abs() < 1e-9);

        // Too short for the surrounding spaces but long enough for one finger
        assert_eq!(r.calc_fingers(10.0).0, 1);
        assert_eq!(r.calc_fingers(8.0).0, 0);
    }

    #[test]
    fn test_male_fingers_protrude_by_thickness() {
        let rendered = renderer(0.0).render(&panel(100.0, 50.0, "Feee")).unwrap();
        let b = rendered.bounds;
        assert!((b.min_y + 3.0).abs() < 1e-9);
        assert!((b.max_y - 50.0).abs() < 1e-9);
        assert!((b.width() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_female_edges_reach_past_nominal_line() {
        let rendered = renderer(0.0).render(&panel(100.0, 50.0, "ffff")).unwrap();
        let b = rendered.bounds;
        assert!((b.min_x + 3.0).abs() < 1e-9);
        assert!((b.min_y + 3.0).abs() < 1e-9);
        assert!((b.width() - 106.0).abs() < 1e-9);
        assert!((b.height() - 56.0).abs() < 1e-9);

        // Notch floors sit on the nominal line.
        let border = &rendered.outlines[0].points;
        assert!(border.iter().any(|p| p.y.abs() < 1e-9 && p.x > 0.0 && p.x < 100.0));
    }

    #[test]
    fn test_mating_edges_span_the_same_outside() {
        // A wall with female sides and a floor with female edges both gain
        // one thickness per tabbed edge, so a 94 x 74 x 54 cavity closes
        // into a 100 x 80 x 60 box.
        let r = renderer(0.0);
        let front = r.render(&panel(94.0, 54.0, "FfFf")).unwrap().bounds;
        let side = r.render(&panel(74.0, 54.0, "FFFF")).unwrap().bounds;
        let top = r.render(&panel(94.0, 74.0, "ffff")).unwrap().bounds;
        assert!((front.width() - 100.0).abs() < 1e-9);
        assert!((front.height() - 60.0).abs() < 1e-9);
        assert!((side.width() - 80.0).abs() < 1e-9);
        assert!((top.width() - front.width()).abs() < 1e-9);
        assert!((top.height() - side.width()).abs() < 1e-9);
    }

    #[test]
    fn test_border_is_closed() {
        let rendered = renderer(0.1).render(&panel(120.0, 60.0, "FfFf")).unwrap();
        let border = &rendered.outlines[0].points;
        assert_eq!(border.first(), border.last());
        assert_eq!(rendered.outlines.len(), 1);
    }

    #[test]
    fn test_plain_edges_offset_by_half_kerf() {
        let rendered = renderer(0.2).render(&panel(40.0, 20.0, "eeee")).unwrap();
        let b = rendered.bounds;
        assert!((b.min_x + 0.1).abs() < 1e-9);
        assert!((b.max_x - 40.1).abs() < 1e-9);
        assert_eq!(rendered.outlines[0].points.len(), 5);
    }

    #[test]
    fn test_short_tabbed_edge_fails() {
        let err = renderer(0.0).render(&panel(100.0, 8.0, "eFee")).unwrap_err();
        assert_eq!(
            err,
            RenderingError::EdgeTooShort {
                panel: "test".to_string(),
                edge: 1,
                length: mm(8.0),
            }
        );
    }

    #[test]
    fn test_finger_holes_match_mating_fingers() {
        let r = renderer(0.0);
        let spec = panel(100.0, 50.0, "eeee").with_feature(Feature::FingerHoles {
            name: "divider".to_string(),
            start: PanelPoint::new(Length::ZERO, mm(25.0)),
            length: mm(100.0),
            direction: Direction::Horizontal,
            width: mm(3.0),
        });
        let rendered = r.render(&spec).unwrap();
        assert_eq!(rendered.outlines.len(), 1 + 7);

        let first = Bounds::of(&rendered.outlines[1].points).unwrap();
        assert!((first.min_x - 11.0).abs() < 1e-9);
        assert!((first.width() - 6.0).abs() < 1e-9);
        assert!((first.height() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cutout_and_engraving() {
        let raster = rasterize("FAX", 3.0, 1.0).unwrap().translated(10.0, 10.0);
        let pixels = raster.placements.len();
        let spec = panel(100.0, 50.0, "eeee")
            .with_feature(Feature::Cutout {
                name: "notch".to_string(),
                center: PanelPoint::new(mm(80.0), mm(25.0)),
                size: PanelSize::new(mm(10.0), mm(10.0)),
                radius: mm(2.0),
            })
            .with_feature(Feature::Engraving {
                name: "label".to_string(),
                raster,
            });
        let rendered = renderer(0.1).render(&spec).unwrap();
        assert_eq!(rendered.outlines.len(), 2 + pixels);
        assert_eq!(rendered.outlines[1].operation, Operation::Cut);
        assert!(rendered.outlines[2..]
            .iter()
            .all(|o| o.operation == Operation::Engrave));

        let notch = Bounds::of(&rendered.outlines[1].points).unwrap();
        assert!((notch.width() - 9.9).abs() < 1e-9);
    }
}
