//! Dimension report printed by `faxbox dims`.

use faxbox_core::{
    format_length, get_unit_label, BoxPlan, DimensionModel, Extents, Length, MeasurementSystem,
    PanelSize,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct DimensionReport {
    pub version: &'static str,
    pub model: DimensionModel,
    pub plan: BoxPlan,
    /// Units of the text report. JSON is always millimetres.
    #[serde(skip)]
    pub units: MeasurementSystem,
}

impl DimensionReport {
    pub fn new(model: &DimensionModel, plan: &BoxPlan) -> Self {
        Self {
            version: crate::VERSION,
            model: model.clone(),
            plan: plan.clone(),
            units: MeasurementSystem::Metric,
        }
    }

    pub fn with_units(mut self, units: MeasurementSystem) -> Self {
        self.units = units;
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn len(&self, value: Length) -> String {
        match self.units {
            MeasurementSystem::Metric => value.to_string(),
            MeasurementSystem::Imperial => format!(
                "{}{}",
                format_length(value.as_mm(), self.units),
                get_unit_label(self.units)
            ),
        }
    }

    fn extents(&self, e: Extents) -> String {
        format!(
            "{} (w) x {} (d) x {} (h)",
            self.len(e.width),
            self.len(e.depth),
            self.len(e.height)
        )
    }

    fn size(&self, p: PanelSize) -> String {
        format!("{} x {}", self.len(p.width), self.len(p.height))
    }
}

impl fmt::Display for DimensionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = &self.model;
        let plan = &self.plan;
        let lids = &plan.lids;

        writeln!(f, "Outer shell")?;
        writeln!(f, "  External:          {}", self.extents(model.shell))?;
        writeln!(f, "  Internal:          {}", self.extents(plan.shell_internal))?;
        writeln!(f, "  Material:          {}", self.len(model.material_thickness))?;
        writeln!(f, "  Paper compartment: {}", self.len(plan.paper_width()))?;
        writeln!(f, "  Divider:           {}", self.len(plan.divider_thickness))?;
        writeln!(f, "  Drawer bay:        {}", self.len(plan.bay_width()))?;
        writeln!(f)?;

        writeln!(f, "Drawers ({})", plan.stack.count())?;
        writeln!(f, "  External:          {}", self.extents(model.drawer))?;
        writeln!(f, "  Internal:          {}", self.extents(plan.drawer_internal))?;
        writeln!(f, "  Material:          {}", self.len(model.drawer_material_thickness))?;
        writeln!(f, "  Slot height:       {}", self.len(plan.stack.slot_height))?;
        let offsets: Vec<String> = plan.stack.offsets.iter().map(|o| self.len(*o)).collect();
        writeln!(f, "  Slot offsets:      {}", offsets.join(", "))?;
        for axis in &plan.drawer_fit.axes {
            writeln!(
                f,
                "  Fit {:<6} -> {:<6} {} <= {}",
                axis.part_axis.to_string(),
                axis.cavity_axis.to_string(),
                self.len(axis.part),
                self.len(axis.limit)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Lids")?;
        writeln!(f, "  Sliding lid:       {}", self.size(lids.sliding_lid))?;
        writeln!(f, "  Tab strips:        2 x {}", self.size(lids.tab_strip))?;
        writeln!(
            f,
            "  Groove:            {} wide, {} deep, {} long",
            self.len(model.lid_groove.width),
            self.len(model.lid_groove.depth),
            self.len(lids.groove_length)
        )?;
        writeln!(f, "  Flat lid:          {}", self.size(lids.flat_lid))?;
        writeln!(
            f,
            "  Pegs:              4 x {}, {} from corners",
            self.size(lids.peg),
            self.len(lids.peg_inset)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_report() {
        let model = DimensionModel::default();
        let plan = BoxPlan::derive(&model).unwrap();
        let text = DimensionReport::new(&model, &plan).to_string();
        assert!(text.contains("Drawer bay:        219.6mm"));
        assert!(text.contains("Drawers (2)"));
        assert!(text.contains("Slot offsets:      0mm, 63.5mm"));
    }

    #[test]
    fn test_imperial_text_report() {
        let model = DimensionModel::default();
        let plan = BoxPlan::derive(&model).unwrap();
        let text = DimensionReport::new(&model, &plan)
            .with_units(MeasurementSystem::Imperial)
            .to_string();
        assert!(text.contains("External:          12.000in (w) x 6.500in (d) x 5.000in (h)"));
        assert!(text.contains("Slot offsets:      0.000in, 2.500in"));
    }

    #[test]
    fn test_json_report() {
        let model = DimensionModel::default();
        let plan = BoxPlan::derive(&model).unwrap();
        let json = DimensionReport::new(&model, &plan).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["plan"]["bay_cavity"]["width"], 219.6);
        assert_eq!(value["model"]["drawer_count"], 2);
    }
}
