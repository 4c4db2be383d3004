//! Plain 2D geometry shared by the renderer, the rasterizer and the layout.
//!
//! All coordinates are millimetres in a y-up frame.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Points closer than this are merged when building a path.
const MERGE_TOLERANCE: f64 = 0.001;

/// Segments used for each quarter circle of a rounded corner.
const ARC_SEGMENTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Append `point` unless it repeats the last point of `path`.
pub fn push_unique_point(path: &mut Vec<Point>, point: Point) {
    if let Some(last) = path.last() {
        if (point.x - last.x).abs() < MERGE_TOLERANCE && (point.y - last.y).abs() < MERGE_TOLERANCE
        {
            return;
        }
    }
    path.push(point);
}

/// Repeat the first point at the end so the outline is closed.
pub fn close_path(path: &mut Vec<Point>) {
    if let Some(first) = path.first().copied() {
        push_unique_point(path, first);
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn of<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in points {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Closed outline of a rectangle centred on `center`, corners rounded by `radius`.
///
/// The radius is capped at half the shorter side.
pub fn rounded_rect(center: Point, width: f64, height: f64, radius: f64) -> Vec<Point> {
    let hw = width / 2.0;
    let hh = height / 2.0;
    let r = radius.max(0.0).min(hw).min(hh);
    let mut path = Vec::new();

    if r <= 0.0 {
        for (dx, dy) in [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)] {
            path.push(center.offset(dx, dy));
        }
        close_path(&mut path);
        return path;
    }

    // Counter-clockwise from the bottom-right corner.
    let corners = [
        (hw - r, -hh + r, -FRAC_PI_2),
        (hw - r, hh - r, 0.0),
        (-hw + r, hh - r, FRAC_PI_2),
        (-hw + r, -hh + r, 2.0 * FRAC_PI_2),
    ];
    for (cx, cy, start) in corners {
        for step in 0..=ARC_SEGMENTS {
            let angle = start + FRAC_PI_2 * step as f64 / ARC_SEGMENTS as f64;
            push_unique_point(
                &mut path,
                center.offset(cx + r * angle.cos(), cy + r * angle.sin()),
            );
        }
    }
    close_path(&mut path);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_unique_point_merges_duplicates() {
        let mut path = vec![Point::new(0.0, 0.0)];
        push_unique_point(&mut path, Point::new(0.0, 0.0005));
        push_unique_point(&mut path, Point::new(1.0, 0.0));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_sharp_rect() {
        let path = rounded_rect(Point::new(10.0, 5.0), 4.0, 2.0, 0.0);
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Point::new(8.0, 4.0));
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn test_rounded_rect_stays_in_bounds() {
        let path = rounded_rect(Point::new(0.0, 0.0), 20.0, 10.0, 2.0);
        let b = Bounds::of(&path).unwrap();
        assert!((b.width() - 20.0).abs() < 1e-9);
        assert!((b.height() - 10.0).abs() < 1e-9);
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::of(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).unwrap();
        let b = Bounds::of(&[Point::new(-1.0, 0.5), Point::new(0.5, 3.0)]).unwrap();
        let u = a.union(b);
        assert_eq!((u.min_x, u.min_y, u.max_x, u.max_y), (-1.0, 0.0, 1.0, 3.0));
        assert!(Bounds::of(&Vec::<Point>::new()).is_none());
    }
}
