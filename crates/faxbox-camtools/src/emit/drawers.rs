//! Drawers: one open-top finger-jointed box per slot, with a finger notch
//! in the front wall.

use super::{centred_start, BoxWalls};
use crate::error::CamToolResult;
use crate::panel::{Feature, PanelPoint, PartSet};
use faxbox_core::{BoxPlan, DimensionModel, Length, PanelSize};
use tracing::debug;

pub fn emit(plan: &BoxPlan, model: &DimensionModel) -> CamToolResult<PartSet> {
    let t = model.drawer_material_thickness;
    let inner = plan.drawer_internal;
    let r = model.finger_notch_radius;

    let mut walls = BoxWalls::new("", "", inner, false);
    let notch = PanelSize::new(r * 2, r);
    walls.front = walls.front.with_feature(Feature::Cutout {
        name: "finger-notch".to_string(),
        center: PanelPoint::new(
            centred_start(Length::ZERO, inner.width, notch.width) + r,
            inner.height - r.half() - t,
        ),
        size: notch,
        radius: r.half(),
    });

    let mut template = PartSet::new(t);
    walls.into_set(&mut template);

    let mut set = PartSet::new(t);
    for i in 1..=plan.stack.count() {
        set.extend(template.prefixed(&format!("drawer-{}/", i), &format!("Drawer {}", i)));
    }
    debug!("{} drawers of {} panels", plan.stack.count(), template.len());
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::render_set;

    #[test]
    fn test_one_box_per_drawer() {
        let model = DimensionModel::default();
        let plan = BoxPlan::derive(&model).unwrap();
        let set = emit(&plan, &model).unwrap();
        assert_eq!(set.len(), 10);
        assert_eq!(set.joints.len(), 16);

        let front = set.panel("drawer-2/front").unwrap();
        assert_eq!(front.label, "Drawer 2 Front");
        assert_eq!(front.width, Length::from_mm(146.0));
        assert_eq!(front.height, Length::from_mm(54.0));
        assert_eq!(set.panel("drawer-1/left").unwrap().width, Length::from_mm(206.0));

        assert_eq!(render_set(&set, &model).unwrap().len(), 10);
    }

    #[test]
    fn test_rendered_drawer_matches_envelope() {
        let model = DimensionModel::default();
        let plan = BoxPlan::derive(&model).unwrap();
        let rendered = render_set(&emit(&plan, &model).unwrap(), &model).unwrap();
        let width = |id: &str| {
            let panel = rendered.iter().find(|p| p.id == id).unwrap();
            panel.bounds.width() - model.burn
        };
        let close = |a: f64, b: f64| (a - b).abs() < 1e-6;
        assert!(close(width("drawer-1/front"), model.drawer.width.as_mm()));
        assert!(close(width("drawer-1/bottom"), model.drawer.width.as_mm()));
        assert!(close(width("drawer-1/left"), model.drawer.depth.as_mm()));
    }

    #[test]
    fn test_finger_notch_near_top_of_front() {
        let model = DimensionModel::default();
        let plan = BoxPlan::derive(&model).unwrap();
        let set = emit(&plan, &model).unwrap();
        match set.panel("drawer-1/front").unwrap().feature("finger-notch") {
            Some(Feature::Cutout { center, size, radius, .. }) => {
                assert_eq!(center.x, Length::from_mm(73.0));
                assert_eq!(center.y, Length::from_mm(45.0));
                assert_eq!(size.width, Length::from_mm(24.0));
                assert_eq!(*radius, Length::from_mm(6.0));
            }
            other => panic!("unexpected feature {:?}", other),
        }
        assert!(set.panel("drawer-1/back").unwrap().features.is_empty());
    }

    #[test]
    fn test_drawer_stock_is_independent() {
        let mut model = DimensionModel::default();
        model.drawer_material_thickness = Length::from_mm(2.0);
        let plan = BoxPlan::derive(&model).unwrap();
        let set = emit(&plan, &model).unwrap();
        assert_eq!(set.thickness, Length::from_mm(2.0));
        assert_eq!(set.panel("drawer-1/front").unwrap().width, Length::from_mm(148.0));
    }
}
