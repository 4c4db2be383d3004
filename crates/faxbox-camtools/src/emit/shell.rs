//! Outer shell: five walls around the internal cavity, the vertical divider
//! between paper compartment and drawer bay, and one shelf between each pair
//! of drawer slots.
//!
//! The front and back walls run along the shell width, paper compartment on
//! the left as seen from the front. Drawers are pulled out through openings
//! in the right wall.

use super::{BoxWalls, ALL_MALE, SIDE_EDGES};
use crate::error::CamToolResult;
use crate::panel::{Direction, Edge, Feature, Mate, PanelPoint, PanelSpec, PartSet};
use crate::raster::rasterize;
use faxbox_core::{BoxPlan, DimensionModel, Length, PanelSize};

/// Corner radius of the drawer openings.
const OPENING_RADIUS_MM: f64 = 2.0;

fn shelf_name(index: usize) -> String {
    format!("shelf-{}", index + 1)
}

fn holes(name: String, start: PanelPoint, length: Length, direction: Direction, t: Length) -> Feature {
    Feature::FingerHoles {
        name,
        start,
        length,
        direction,
        width: t,
    }
}

pub fn emit(plan: &BoxPlan, model: &DimensionModel) -> CamToolResult<PartSet> {
    let t = model.material_thickness;
    let inner = plan.shell_internal;
    let paper = plan.paper_width();
    let bay = plan.bay_width();
    let divider_t = plan.divider_thickness;
    let bay_start = paper + divider_t;
    let shelves: Vec<Length> = plan.stack.shelf_offsets().collect();

    let mut walls = BoxWalls::new("shell/", "Shell", inner, false);

    // Front: divider and shelf slots, engraving.
    let divider_x = paper + divider_t.half();
    walls.front = walls.front.with_feature(holes(
        "divider".to_string(),
        PanelPoint::new(divider_x, Length::ZERO),
        inner.height,
        Direction::Vertical,
        divider_t,
    ));
    for (i, floor) in shelves.iter().enumerate() {
        walls.front = walls.front.with_feature(holes(
            shelf_name(i),
            PanelPoint::new(bay_start, *floor + t.half()),
            bay,
            Direction::Horizontal,
            t,
        ));
    }

    let engrave = &model.engrave;
    let raster = rasterize(&engrave.text, engrave.pixel_size, engrave.font_spacing)?;
    let text_x = (inner.width.as_mm() - raster.width) / 2.0;
    let text_y = (inner.height - engrave.top_margin).as_mm() - raster.height;
    walls.front = walls.front.with_feature(Feature::Engraving {
        name: "engraving".to_string(),
        raster: raster.translated(text_x, text_y),
    });

    // Back: the same slots seen from behind.
    walls.back = walls.back.with_feature(holes(
        "divider".to_string(),
        PanelPoint::new(inner.width - divider_x, Length::ZERO),
        inner.height,
        Direction::Vertical,
        divider_t,
    ));
    for (i, floor) in shelves.iter().enumerate() {
        walls.back = walls.back.with_feature(holes(
            shelf_name(i),
            PanelPoint::new(inner.width - bay_start - bay, *floor + t.half()),
            bay,
            Direction::Horizontal,
            t,
        ));
    }

    // Bottom: divider slots, front edge at the bottom of the panel.
    walls.bottom = walls.bottom.with_feature(holes(
        "divider".to_string(),
        PanelPoint::new(divider_x, Length::ZERO),
        inner.depth,
        Direction::Vertical,
        divider_t,
    ));

    // Left wall: sliding lid groove.
    let groove = lid_groove(plan, model);
    walls.left = walls.left.with_feature(groove.clone());

    // Right wall: one opening per drawer slot and the shelf slots.
    let clearance = model.drawer_clearance * 2;
    let opening = PanelSize::new(model.drawer.width + clearance, model.drawer.height + clearance);
    for (i, offset) in plan.stack.offsets.iter().enumerate() {
        walls.right = walls.right.with_feature(Feature::Cutout {
            name: format!("drawer-opening-{}", i + 1),
            center: PanelPoint::new(inner.depth.half(), *offset + plan.stack.slot_height.half()),
            size: opening,
            radius: Length::from_mm(OPENING_RADIUS_MM),
        });
    }
    for (i, floor) in shelves.iter().enumerate() {
        walls.right = walls.right.with_feature(holes(
            shelf_name(i),
            PanelPoint::new(Length::ZERO, *floor + t.half()),
            inner.depth,
            Direction::Horizontal,
            t,
        ));
    }

    let front_id = walls.id("front");
    let back_id = walls.id("back");
    let right_id = walls.id("right");
    let bottom_id = walls.id("bottom");

    let mut set = PartSet::new(t);
    walls.into_set(&mut set);

    // Divider: seen from the paper compartment, front on the left.
    let mut divider = PanelSpec::new(
        "shell/divider",
        "Shell Divider",
        PanelSize::new(inner.depth, inner.height),
        SIDE_EDGES,
    )
    .with_feature(groove);
    for (i, floor) in shelves.iter().enumerate() {
        divider = divider.with_feature(holes(
            shelf_name(i),
            PanelPoint::new(Length::ZERO, *floor + t.half()),
            inner.depth,
            Direction::Horizontal,
            t,
        ));
    }
    set.push(divider);
    set.join(Mate::edge("shell/divider", Edge::Bottom), Mate::holes(&bottom_id, "divider"));
    set.join(Mate::edge("shell/divider", Edge::Left), Mate::holes(&front_id, "divider"));
    set.join(Mate::edge("shell/divider", Edge::Right), Mate::holes(&back_id, "divider"));

    // Shelves: seen from above, front edge at the bottom.
    for i in 0..shelves.len() {
        let id = format!("shell/{}", shelf_name(i));
        set.push(PanelSpec::new(
            id.clone(),
            format!("Shell Shelf {}", i + 1),
            PanelSize::new(bay, inner.depth),
            ALL_MALE,
        ));
        set.join(Mate::edge(&id, Edge::Bottom), Mate::holes(&front_id, shelf_name(i)));
        set.join(Mate::edge(&id, Edge::Top), Mate::holes(&back_id, shelf_name(i)));
        set.join(Mate::edge(&id, Edge::Left), Mate::holes("shell/divider", shelf_name(i)));
        set.join(Mate::edge(&id, Edge::Right), Mate::holes(&right_id, shelf_name(i)));
    }

    Ok(set)
}

/// Groove the sliding lid runs in, cut through the left wall and the divider.
fn lid_groove(plan: &BoxPlan, model: &DimensionModel) -> Feature {
    let t = model.material_thickness;
    let inner = plan.shell_internal;
    let groove = model.lid_groove;
    let length = plan.lids.groove_length;
    Feature::Cutout {
        name: "lid-groove".to_string(),
        center: PanelPoint::new(inner.depth.half(), inner.height - t - groove.width.half()),
        size: PanelSize::new(length, groove.width),
        radius: Length::ZERO,
    }
}
