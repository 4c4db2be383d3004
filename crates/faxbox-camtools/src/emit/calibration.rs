//! Calibration box: a small closed box cut from the shell stock to check
//! kerf and finger fit before committing a full sheet.

use super::BoxWalls;
use crate::error::CamToolResult;
use crate::panel::PartSet;
use faxbox_core::{internal_cavity, DimensionModel, Extents, OpenSides};
use tracing::debug;

/// Outside dimensions of the calibration box.
pub const ENVELOPE_MM: (f64, f64, f64) = (100.0, 80.0, 60.0);

pub fn emit(model: &DimensionModel) -> CamToolResult<PartSet> {
    let t = model.material_thickness;
    let (w, d, h) = ENVELOPE_MM;
    let inner = internal_cavity(Extents::from_mm(w, d, h), t, OpenSides::NONE)?;
    debug!("calibration box internal cavity: {}", inner);

    let mut set = PartSet::new(t);
    BoxWalls::new("test-box/", "Test Box", inner, true).into_set(&mut set);
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::render_set;
    use faxbox_core::Length;

    #[test]
    fn test_closed_box() {
        let model = DimensionModel::default();
        let set = emit(&model).unwrap();
        assert_eq!(set.len(), 6);
        assert_eq!(set.joints.len(), 12);

        let top = set.panel("test-box/top").unwrap();
        assert_eq!(top.width, Length::from_mm(94.0));
        assert_eq!(top.height, Length::from_mm(74.0));
        assert_eq!(set.panel("test-box/front").unwrap().edges.to_string(), "FfFf");
        assert_eq!(set.panel("test-box/left").unwrap().edges.to_string(), "FFFF");

        assert_eq!(render_set(&set, &model).unwrap().len(), 6);
    }

    #[test]
    fn test_thick_stock_rejected() {
        let model = DimensionModel {
            material_thickness: Length::from_mm(40.0),
            ..DimensionModel::default()
        };
        assert!(emit(&model).unwrap_err().is_configuration_error());
    }
}
