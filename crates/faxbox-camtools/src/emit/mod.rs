//! Panel emitters
//!
//! One emitter per part family. Each reads a validated [`BoxPlan`] and the
//! [`DimensionModel`] it came from and returns a [`PartSet`]: panel
//! descriptors plus the joints between them. Emitters only decide sizes,
//! edge roles and feature positions; [`render_set`] hands the result to the
//! finger-joint renderer once every joint has been checked.

pub mod calibration;
pub mod drawers;
pub mod lids;
pub mod shell;

use crate::error::CamToolResult;
use crate::finger_joint::FingerJointRenderer;
use crate::panel::{
    Edge, EdgeRole, EdgeRoles, Mate, PanelRenderer, PanelSpec, PartSet, RenderedPanel,
};
use faxbox_core::{BoxPlan, DimensionModel, Extents, Length, PanelSize};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// The part families that can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PartFamily {
    Shell,
    Drawers,
    Lids,
    Calibration,
}

impl PartFamily {
    /// Families that make up the organizer itself.
    pub const ORGANIZER: [PartFamily; 3] =
        [PartFamily::Shell, PartFamily::Drawers, PartFamily::Lids];

    pub fn emit(self, plan: &BoxPlan, model: &DimensionModel) -> CamToolResult<PartSet> {
        match self {
            PartFamily::Shell => shell::emit(plan, model),
            PartFamily::Drawers => drawers::emit(plan, model),
            PartFamily::Lids => lids::emit(plan, model),
            PartFamily::Calibration => calibration::emit(model),
        }
    }
}

impl fmt::Display for PartFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartFamily::Shell => write!(f, "shell"),
            PartFamily::Drawers => write!(f, "drawers"),
            PartFamily::Lids => write!(f, "lids"),
            PartFamily::Calibration => write!(f, "calibration box"),
        }
    }
}

/// Check every panel and joint of `set`, then render it.
pub fn render_set(set: &PartSet, model: &DimensionModel) -> CamToolResult<Vec<RenderedPanel>> {
    set.validate()?;
    let renderer =
        FingerJointRenderer::new(model.finger_joint.clone(), set.thickness, model.burn);
    let rendered = set
        .panels
        .iter()
        .map(|panel| renderer.render(panel))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("rendered {} panels", rendered.len());
    Ok(rendered)
}

/// Emit and render one family.
pub fn generate(
    family: PartFamily,
    plan: &BoxPlan,
    model: &DimensionModel,
) -> CamToolResult<Vec<RenderedPanel>> {
    let set = family.emit(plan, model)?;
    debug!("{}: {} panels, {} joints", family, set.len(), set.joints.len());
    render_set(&set, model)
}

const MALE: EdgeRole = EdgeRole::Male;
const FEMALE: EdgeRole = EdgeRole::Female;
const PLAIN_EDGE: EdgeRole = EdgeRole::Plain;

/// `Ffef`
const WALL_EDGES: EdgeRoles = EdgeRoles::new(MALE, FEMALE, PLAIN_EDGE, FEMALE);
/// `FFeF`
const SIDE_EDGES: EdgeRoles = EdgeRoles::new(MALE, MALE, PLAIN_EDGE, MALE);
/// `FfFf`
const CLOSED_WALL_EDGES: EdgeRoles = EdgeRoles::new(MALE, FEMALE, MALE, FEMALE);
/// `FFFF`
pub(crate) const ALL_MALE: EdgeRoles = EdgeRoles::new(MALE, MALE, MALE, MALE);
/// `ffff`
const FLOOR_EDGES: EdgeRoles = EdgeRoles::new(FEMALE, FEMALE, FEMALE, FEMALE);
/// `eeee`
pub(crate) const PLAIN: EdgeRoles = EdgeRoles::new(PLAIN_EDGE, PLAIN_EDGE, PLAIN_EDGE, PLAIN_EDGE);

/// The five or six panels of a finger-jointed box around an inner cavity.
///
/// Front and back are `width` x `height`, the sides `depth` x `height`, and
/// the floor (and top, if closed) `width` x `depth`. Every panel is seen from
/// outside the box; the floor and top are seen with the front at the bottom.
pub(crate) struct BoxWalls {
    prefix: String,
    pub bottom: PanelSpec,
    pub front: PanelSpec,
    pub back: PanelSpec,
    pub left: PanelSpec,
    pub right: PanelSpec,
    pub top: Option<PanelSpec>,
}

impl BoxWalls {
    pub fn new(prefix: &str, label: &str, inner: Extents, closed_top: bool) -> Self {
        let (wall, side) = if closed_top {
            (CLOSED_WALL_EDGES, ALL_MALE)
        } else {
            (WALL_EDGES, SIDE_EDGES)
        };
        let id = |name: &str| format!("{}{}", prefix, name);
        let floor = PanelSize::new(inner.width, inner.depth);
        let long = PanelSize::new(inner.width, inner.height);
        let short = PanelSize::new(inner.depth, inner.height);

        Self {
            prefix: prefix.to_string(),
            bottom: PanelSpec::new(id("bottom"), format!("{} Bottom", label), floor, FLOOR_EDGES),
            front: PanelSpec::new(id("front"), format!("{} Front", label), long, wall),
            back: PanelSpec::new(id("back"), format!("{} Back", label), long, wall),
            left: PanelSpec::new(id("left"), format!("{} Left", label), short, side),
            right: PanelSpec::new(id("right"), format!("{} Right", label), short, side),
            top: closed_top
                .then(|| PanelSpec::new(id("top"), format!("{} Top", label), floor, FLOOR_EDGES)),
        }
    }

    pub fn id(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Push every panel and the joints between them.
    pub fn into_set(self, set: &mut PartSet) {
        let id = |name: &str| format!("{}{}", self.prefix, name);

        // Floor edges run bottom, right, top, left = front, right, back, left.
        for (edge, wall) in [
            (Edge::Bottom, "front"),
            (Edge::Right, "right"),
            (Edge::Top, "back"),
            (Edge::Left, "left"),
        ] {
            set.join(Mate::edge(id(wall), Edge::Bottom), Mate::edge(id("bottom"), edge));
            if self.top.is_some() {
                set.join(Mate::edge(id(wall), Edge::Top), Mate::edge(id("top"), edge));
            }
        }

        // Corners, walking around the outside.
        for (a, b) in [("front", "right"), ("right", "back"), ("back", "left"), ("left", "front")] {
            set.join(Mate::edge(id(a), Edge::Right), Mate::edge(id(b), Edge::Left));
        }

        set.push(self.bottom);
        set.push(self.front);
        set.push(self.back);
        set.push(self.left);
        set.push(self.right);
        if let Some(top) = self.top {
            set.push(top);
        }
    }
}

/// Where a feature of `size` starts when centred in `span` beginning at `start`.
pub(crate) fn centred_start(start: Length, span: Length, size: Length) -> Length {
    start + (span - size).half()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_box_walls_join_up() {
        let mut set = PartSet::new(Length::from_mm(3.0));
        BoxWalls::new("b/", "Box", Extents::from_mm(100.0, 80.0, 50.0), false).into_set(&mut set);
        assert_eq!(set.len(), 5);
        assert_eq!(set.joints.len(), 8);
        assert!(set.validate().is_ok());
        assert_eq!(set.panel("b/front").unwrap().edges.to_string(), "Ffef");
        assert_eq!(set.panel("b/left").unwrap().edges.to_string(), "FFeF");
        assert_eq!(set.panel("b/bottom").unwrap().edges.to_string(), "ffff");
    }

    #[test]
    fn test_closed_box_walls_join_up() {
        let mut set = PartSet::new(Length::from_mm(3.0));
        BoxWalls::new("", "Box", Extents::from_mm(100.0, 80.0, 50.0), true).into_set(&mut set);
        assert_eq!(set.len(), 6);
        assert_eq!(set.joints.len(), 12);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_centred_start() {
        let mm = Length::from_mm;
        assert_eq!(centred_start(mm(10.0), mm(100.0), mm(20.0)), mm(50.0));
    }
}
