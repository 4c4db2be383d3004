//! Panel descriptors
//!
//! A [`PanelSpec`] is what an emitter hands to the renderer: a rectangle in
//! its own frame, a role for each of its four edges and a list of features
//! (cutouts, finger-hole rows and engravings) positioned from the panel's
//! lower-left corner. Emitters never draw; a [`PanelRenderer`] turns specs
//! into outlines.
//!
//! Edges are always listed bottom, right, top, left, starting at the
//! lower-left corner and running counter-clockwise. The role string uses
//! `F` for a male edge (fingers out), `f` for a female edge (notched back to
//! the nominal line) and `e` for a plain edge. Width and height are nominal:
//! the span of the cavity the panel closes. Each tabbed edge adds one stock
//! thickness outside it.

use crate::geometry::{Bounds, Point};
use crate::raster::Raster;
use faxbox_core::{ConfigurationError, Length, PanelSize, RenderingError};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Tolerance for engraving bounds, which are in floating point.
const BOUNDS_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Edge {
    Bottom,
    Right,
    Top,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Bottom, Edge::Right, Edge::Top, Edge::Left];

    pub fn index(self) -> usize {
        match self {
            Edge::Bottom => 0,
            Edge::Right => 1,
            Edge::Top => 2,
            Edge::Left => 3,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Bottom => write!(f, "bottom"),
            Edge::Right => write!(f, "right"),
            Edge::Top => write!(f, "top"),
            Edge::Left => write!(f, "left"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeRole {
    /// Fingers protrude from the edge.
    Male,
    /// Notches receive a male edge.
    Female,
    Plain,
}

impl EdgeRole {
    pub fn code(self) -> char {
        match self {
            EdgeRole::Male => 'F',
            EdgeRole::Female => 'f',
            EdgeRole::Plain => 'e',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'F' => Some(EdgeRole::Male),
            'f' => Some(EdgeRole::Female),
            'e' => Some(EdgeRole::Plain),
            _ => None,
        }
    }

    pub fn is_tabbed(self) -> bool {
        self != EdgeRole::Plain
    }
}

/// The four edge roles of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeRoles([EdgeRole; 4]);

impl EdgeRoles {
    pub const fn new(bottom: EdgeRole, right: EdgeRole, top: EdgeRole, left: EdgeRole) -> Self {
        Self([bottom, right, top, left])
    }

    pub fn role(&self, edge: Edge) -> EdgeRole {
        self.0[edge.index()]
    }
}

impl FromStr for EdgeRoles {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ConfigurationError::InvalidEdgeRoles {
            roles: s.to_string(),
            reason,
        };

        let roles = s
            .chars()
            .map(|c| EdgeRole::from_code(c).ok_or_else(|| invalid(format!("unknown role {:?}", c))))
            .collect::<Result<Vec<_>, _>>()?;
        let roles: [EdgeRole; 4] = roles
            .try_into()
            .map_err(|v: Vec<EdgeRole>| invalid(format!("expected 4 roles, got {}", v.len())))?;
        Ok(Self(roles))
    }
}

impl fmt::Display for EdgeRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for role in self.0 {
            write!(f, "{}", role.code())?;
        }
        Ok(())
    }
}

/// A position on a panel, from its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelPoint {
    pub x: Length,
    pub y: Length,
}

impl PanelPoint {
    pub const fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x.as_mm(), self.y.as_mm())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Geometry drawn inside a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Feature {
    /// Rectangular hole with optionally rounded corners.
    Cutout {
        name: String,
        center: PanelPoint,
        size: PanelSize,
        radius: Length,
    },
    /// Row of slots receiving the male edge of a perpendicular panel.
    FingerHoles {
        name: String,
        /// Start of the row's centre line.
        start: PanelPoint,
        length: Length,
        direction: Direction,
        /// Slot width across the row: the mating panel's stock.
        width: Length,
    },
    /// Engraved pixel text, already positioned in panel coordinates.
    Engraving { name: String, raster: Raster },
}

impl Feature {
    pub fn name(&self) -> &str {
        match self {
            Feature::Cutout { name, .. }
            | Feature::FingerHoles { name, .. }
            | Feature::Engraving { name, .. } => name,
        }
    }

    fn fits_within(&self, width: Length, height: Length) -> bool {
        let inside = |lo_x: Length, lo_y: Length, hi_x: Length, hi_y: Length| {
            lo_x >= Length::ZERO && lo_y >= Length::ZERO && hi_x <= width && hi_y <= height
        };
        match self {
            Feature::Cutout { center, size, .. } => {
                let hw = size.width.half();
                let hh = size.height.half();
                size.width.is_positive()
                    && size.height.is_positive()
                    && inside(center.x - hw, center.y - hh, center.x + hw, center.y + hh)
            }
            Feature::FingerHoles {
                start,
                length,
                direction,
                width: across,
                ..
            } => {
                let half = across.half();
                length.is_positive()
                    && match direction {
                        Direction::Horizontal => {
                            inside(start.x, start.y - half, start.x + *length, start.y + half)
                        }
                        Direction::Vertical => {
                            inside(start.x - half, start.y, start.x + half, start.y + *length)
                        }
                    }
            }
            Feature::Engraving { raster, .. } => match raster.extent() {
                None => true,
                Some((min, max)) => {
                    min.x >= -BOUNDS_EPSILON
                        && min.y >= -BOUNDS_EPSILON
                        && max.x <= width.as_mm() + BOUNDS_EPSILON
                        && max.y <= height.as_mm() + BOUNDS_EPSILON
                }
            },
        }
    }
}

/// One flat part to be cut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSpec {
    /// Unique within a layout, e.g. `shell/front` or `drawer-2/side-left`.
    pub id: String,
    pub label: String,
    pub width: Length,
    pub height: Length,
    pub edges: EdgeRoles,
    pub features: Vec<Feature>,
}

impl PanelSpec {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        size: PanelSize,
        edges: EdgeRoles,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            width: size.width,
            height: size.height,
            edges,
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn edge_length(&self, edge: Edge) -> Length {
        match edge {
            Edge::Bottom | Edge::Top => self.width,
            Edge::Left | Edge::Right => self.height,
        }
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name() == name)
    }

    /// Check the panel is non-degenerate and every feature lies on it.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (quantity, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_positive() {
                return Err(ConfigurationError::NonPositive {
                    quantity: format!("{} {}", self.id, quantity),
                    value,
                });
            }
        }
        for feature in &self.features {
            if !feature.fits_within(self.width, self.height) {
                return Err(ConfigurationError::FeatureOutOfBounds {
                    panel: self.id.clone(),
                    feature: feature.name().to_string(),
                    width: self.width,
                    height: self.height,
                });
            }
        }
        Ok(())
    }
}

/// One side of a joint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Mate {
    Edge { panel: String, edge: Edge },
    Holes { panel: String, feature: String },
}

impl Mate {
    pub fn edge(panel: impl Into<String>, edge: Edge) -> Self {
        Mate::Edge {
            panel: panel.into(),
            edge,
        }
    }

    pub fn holes(panel: impl Into<String>, feature: impl Into<String>) -> Self {
        Mate::Holes {
            panel: panel.into(),
            feature: feature.into(),
        }
    }

    fn panel(&self) -> &str {
        match self {
            Mate::Edge { panel, .. } | Mate::Holes { panel, .. } => panel,
        }
    }

    fn with_prefix(&self, prefix: &str) -> Mate {
        match self {
            Mate::Edge { panel, edge } => Mate::edge(format!("{}{}", prefix, panel), *edge),
            Mate::Holes { panel, feature } => {
                Mate::holes(format!("{}{}", prefix, panel), feature.clone())
            }
        }
    }
}

impl fmt::Display for Mate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mate::Edge { panel, edge } => write!(f, "{}:{}", panel, edge),
            Mate::Holes { panel, feature } => write!(f, "{}[{}]", panel, feature),
        }
    }
}

/// Two mates that are assembled together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Joint {
    pub a: Mate,
    pub b: Mate,
}

impl Joint {
    pub fn new(a: Mate, b: Mate) -> Self {
        Self { a, b }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.a, self.b)
    }
}

fn resolve(
    panels: &HashMap<&str, &PanelSpec>,
    joint: &Joint,
    mate: &Mate,
) -> Result<(EdgeRole, Length), ConfigurationError> {
    let mismatch = |reason: String| ConfigurationError::JointMismatch {
        joint: joint.to_string(),
        reason,
    };
    let panel = panels
        .get(mate.panel())
        .ok_or_else(|| mismatch(format!("no panel '{}'", mate.panel())))?;
    match mate {
        Mate::Edge { edge, .. } => Ok((panel.edges.role(*edge), panel.edge_length(*edge))),
        Mate::Holes { feature, .. } => match panel.feature(feature) {
            Some(Feature::FingerHoles { length, .. }) => Ok((EdgeRole::Female, *length)),
            Some(_) => Err(mismatch(format!("'{}' is not a row of finger holes", feature))),
            None => Err(mismatch(format!("no feature '{}' on '{}'", feature, panel.id))),
        },
    }
}

/// Every joint must pair one male side with one female side of equal length.
pub fn check_joints(panels: &[PanelSpec], joints: &[Joint]) -> Result<(), ConfigurationError> {
    let by_id: HashMap<&str, &PanelSpec> = panels.iter().map(|p| (p.id.as_str(), p)).collect();

    for joint in joints {
        let (role_a, len_a) = resolve(&by_id, joint, &joint.a)?;
        let (role_b, len_b) = resolve(&by_id, joint, &joint.b)?;
        let mismatch = |reason: String| ConfigurationError::JointMismatch {
            joint: joint.to_string(),
            reason,
        };

        match (role_a, role_b) {
            (EdgeRole::Male, EdgeRole::Female) | (EdgeRole::Female, EdgeRole::Male) => {}
            _ => {
                return Err(mismatch(format!(
                    "roles '{}' and '{}' do not pair male with female",
                    role_a.code(),
                    role_b.code()
                )))
            }
        }
        if len_a != len_b {
            return Err(mismatch(format!("lengths {} and {} differ", len_a, len_b)));
        }
    }
    Ok(())
}

/// The panels of one part family and how they join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartSet {
    /// Stock every panel of the set is cut from.
    pub thickness: Length,
    pub panels: Vec<PanelSpec>,
    pub joints: Vec<Joint>,
}

impl PartSet {
    pub fn new(thickness: Length) -> Self {
        Self {
            thickness,
            panels: Vec::new(),
            joints: Vec::new(),
        }
    }

    pub fn push(&mut self, panel: PanelSpec) {
        self.panels.push(panel);
    }

    pub fn join(&mut self, a: Mate, b: Mate) {
        self.joints.push(Joint::new(a, b));
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn panel(&self, id: &str) -> Option<&PanelSpec> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Copy with `prefix` put in front of every panel id and `label` in
    /// front of every label.
    pub fn prefixed(&self, prefix: &str, label: &str) -> PartSet {
        PartSet {
            thickness: self.thickness,
            panels: self
                .panels
                .iter()
                .map(|p| PanelSpec {
                    id: format!("{}{}", prefix, p.id),
                    label: format!("{}{}", label, p.label),
                    ..p.clone()
                })
                .collect(),
            joints: self
                .joints
                .iter()
                .map(|j| Joint::new(j.a.with_prefix(prefix), j.b.with_prefix(prefix)))
                .collect(),
        }
    }

    pub fn extend(&mut self, other: PartSet) {
        self.panels.extend(other.panels);
        self.joints.extend(other.joints);
    }

    /// Validate every panel, ids and every joint.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();
        for panel in &self.panels {
            panel.validate()?;
            if !seen.insert(panel.id.as_str()) {
                return Err(ConfigurationError::InvalidValue {
                    name: "panel id".to_string(),
                    reason: format!("'{}' is used twice", panel.id),
                });
            }
        }
        check_joints(&self.panels, &self.joints)
    }
}

/// Kind of laser pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    Cut,
    Engrave,
}

/// One closed path of a rendered panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outline {
    pub operation: Operation,
    pub points: Vec<Point>,
}

/// Drawable form of a [`PanelSpec`], in the panel's own frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPanel {
    pub id: String,
    pub label: String,
    pub outlines: Vec<Outline>,
    pub bounds: Bounds,
}

/// Turns panel descriptors into closed outlines.
pub trait PanelRenderer {
    fn render(&self, panel: &PanelSpec) -> Result<RenderedPanel, RenderingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mm(v: f64) -> Length {
        Length::from_mm(v)
    }

    fn panel(id: &str, w: f64, h: f64, roles: &str) -> PanelSpec {
        PanelSpec::new(id, id, PanelSize::new(mm(w), mm(h)), roles.parse().unwrap())
    }

    #[test]
    fn test_edge_roles_round_trip_string() {
        let roles: EdgeRoles = "Ffef".parse().unwrap();
        assert_eq!(roles.role(Edge::Bottom), EdgeRole::Male);
        assert_eq!(roles.role(Edge::Right), EdgeRole::Female);
        assert_eq!(roles.role(Edge::Top), EdgeRole::Plain);
        assert_eq!(roles.to_string(), "Ffef");
    }

    #[test]
    fn test_edge_roles_rejects_bad_strings() {
        assert!(matches!(
            "Ffex".parse::<EdgeRoles>(),
            Err(ConfigurationError::InvalidEdgeRoles { .. })
        ));
        assert!(matches!(
            "FFF".parse::<EdgeRoles>(),
            Err(ConfigurationError::InvalidEdgeRoles { reason, .. }) if reason.contains("got 3")
        ));
    }

    #[test]
    fn test_cutout_bounds() {
        let inside = panel("p", 100.0, 50.0, "eeee").with_feature(Feature::Cutout {
            name: "hole".to_string(),
            center: PanelPoint::new(mm(50.0), mm(25.0)),
            size: PanelSize::new(mm(100.0), mm(10.0)),
            radius: mm(2.0),
        });
        assert!(inside.validate().is_ok());

        let outside = panel("p", 100.0, 50.0, "eeee").with_feature(Feature::Cutout {
            name: "hole".to_string(),
            center: PanelPoint::new(mm(95.0), mm(25.0)),
            size: PanelSize::new(mm(20.0), mm(10.0)),
            radius: Length::ZERO,
        });
        assert!(matches!(
            outside.validate(),
            Err(ConfigurationError::FeatureOutOfBounds { ref feature, .. }) if feature == "hole"
        ));
    }

    #[test]
    fn test_finger_hole_bounds() {
        let holes = |y: f64| Feature::FingerHoles {
            name: "row".to_string(),
            start: PanelPoint::new(Length::ZERO, mm(y)),
            length: mm(100.0),
            direction: Direction::Horizontal,
            width: mm(3.0),
        };
        assert!(panel("p", 100.0, 50.0, "eeee").with_feature(holes(25.0)).validate().is_ok());
        assert!(panel("p", 100.0, 50.0, "eeee").with_feature(holes(49.0)).validate().is_err());
    }

    #[test]
    fn test_joint_pairs_male_with_female() {
        let a = panel("a", 100.0, 50.0, "Feee");
        let b = panel("b", 100.0, 80.0, "feee");
        let joint = Joint::new(Mate::edge("a", Edge::Bottom), Mate::edge("b", Edge::Bottom));
        assert!(check_joints(&[a.clone(), b], &[joint.clone()]).is_ok());

        let c = panel("b", 100.0, 80.0, "Feee");
        let err = check_joints(&[a.clone(), c], &[joint.clone()]).unwrap_err();
        assert!(matches!(err, ConfigurationError::JointMismatch { ref reason, .. } if reason.contains("'F' and 'F'")));

        let short = panel("b", 90.0, 80.0, "feee");
        let err = check_joints(&[a, short], &[joint]).unwrap_err();
        assert!(err.to_string().contains("lengths 100mm and 90mm differ"));
    }

    #[test]
    fn test_joint_with_finger_holes() {
        let wall = panel("wall", 100.0, 50.0, "eeee").with_feature(Feature::FingerHoles {
            name: "divider".to_string(),
            start: PanelPoint::new(mm(40.0), Length::ZERO),
            length: mm(50.0),
            direction: Direction::Vertical,
            width: mm(3.0),
        });
        let divider = panel("divider", 80.0, 50.0, "eeeF");
        let joints = [Joint::new(
            Mate::edge("divider", Edge::Left),
            Mate::holes("wall", "divider"),
        )];
        assert!(check_joints(&[wall.clone(), divider], &joints).is_ok());

        let missing = [Joint::new(
            Mate::edge("divider", Edge::Left),
            Mate::holes("wall", "shelf"),
        )];
        assert!(check_joints(&[wall], &missing).is_err());
    }

    #[test]
    fn test_prefixed_renames_panels_and_joints() {
        let mut set = PartSet::new(mm(3.0));
        set.push(panel("front", 100.0, 50.0, "Feee"));
        set.push(panel("bottom", 100.0, 80.0, "feee"));
        set.join(Mate::edge("front", Edge::Bottom), Mate::edge("bottom", Edge::Bottom));

        let renamed = set.prefixed("drawer-2/", "Drawer 2 ");
        assert_eq!(renamed.panel("drawer-2/front").unwrap().label, "Drawer 2 front");
        assert_eq!(renamed.joints[0].to_string(), "drawer-2/front:bottom <-> drawer-2/bottom:bottom");
        assert!(renamed.validate().is_ok());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut set = PartSet::new(mm(3.0));
        set.push(panel("a", 10.0, 10.0, "eeee"));
        set.push(panel("a", 10.0, 10.0, "eeee"));
        assert!(set.validate().is_err());
    }
}
