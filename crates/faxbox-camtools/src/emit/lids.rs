//! Lids: a sliding lid over the paper compartment riding in two grooves on
//! tab strips, and a flat lid over the drawer bay located by four square
//! pegs glued into matching holes.
//!
//! Lid pieces have plain edges and no joints.

use super::PLAIN;
use crate::error::CamToolResult;
use crate::panel::{Feature, PanelPoint, PanelSpec, PartSet};
use faxbox_core::{BoxPlan, DimensionModel, Length};

pub fn emit(plan: &BoxPlan, model: &DimensionModel) -> CamToolResult<PartSet> {
    let lids = &plan.lids;
    let mut set = PartSet::new(model.material_thickness);

    set.push(PanelSpec::new("lids/sliding", "Sliding Lid", lids.sliding_lid, PLAIN));
    for side in ["left", "right"] {
        set.push(PanelSpec::new(
            format!("lids/tab-{}", side),
            format!("Sliding Lid Tab ({})", side),
            lids.tab_strip,
            PLAIN,
        ));
    }

    let w = lids.flat_lid.width;
    let h = lids.flat_lid.height;
    let inset = lids.peg_inset + lids.peg.width.half();
    let corners = [
        (inset, inset),
        (w - inset, inset),
        (w - inset, h - inset),
        (inset, h - inset),
    ];
    let mut flat = PanelSpec::new("lids/flat", "Flat Lid", lids.flat_lid, PLAIN);
    for (i, (x, y)) in corners.into_iter().enumerate() {
        flat = flat.with_feature(Feature::Cutout {
            name: format!("peg-hole-{}", i + 1),
            center: PanelPoint::new(x, y),
            size: lids.peg,
            radius: Length::ZERO,
        });
    }
    set.push(flat);

    for i in 1..=corners.len() {
        set.push(PanelSpec::new(
            format!("lids/peg-{}", i),
            format!("Lid Peg {}", i),
            lids.peg,
            PLAIN,
        ));
    }

    Ok(set)
}
