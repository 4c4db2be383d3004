//! End-to-end: model -> plan -> panels -> sheets -> SVG.

use faxbox_camtools::{
    generate, normalize_stroke_colors, pack, rasterize, sheet_to_svg, verify_stroke_colors,
    CamToolError, LayoutError, LayoutSettings, PartFamily, RenderedPanel,
};
use faxbox_core::{BoxPlan, DimensionModel, GlyphError};
use proptest::prelude::*;

fn organizer(model: &DimensionModel) -> Vec<RenderedPanel> {
    let plan = BoxPlan::derive(model).unwrap();
    PartFamily::ORGANIZER
        .iter()
        .flat_map(|family| generate(*family, &plan, model).unwrap())
        .collect()
}

#[test]
fn default_organizer_fits_one_sheet() {
    let model = DimensionModel::default();
    let panels = organizer(&model);
    // 7 shell, 10 drawer and 8 lid pieces.
    assert_eq!(panels.len(), 25);

    let sheets = pack(panels, &LayoutSettings::default()).unwrap();
    assert_eq!(sheets.len(), 1);
    assert!(sheets[0].width <= 1290.0);
    assert!(sheets[0].height <= 800.0);
    assert!(sheets[0].contains_all());

    let svg = sheet_to_svg(&sheets[0]);
    verify_stroke_colors(&svg).unwrap();
    assert!(svg.contains("<g id=\"drawer-2/front\">"));
    assert!(svg.contains("stroke=\"rgb(255,0,0)\""));
    assert_eq!(normalize_stroke_colors(&svg), svg);
}

#[test]
fn small_sheet_needs_multi_sheet() {
    let model = DimensionModel::default();
    let small = LayoutSettings {
        sheet_width: 400.0,
        sheet_height: 300.0,
        ..LayoutSettings::default()
    };
    let err = pack(organizer(&model), &small).unwrap_err();
    assert!(matches!(err, LayoutError::Oversize { .. }));

    let multi = LayoutSettings {
        multi_sheet: true,
        ..small
    };
    let sheets = pack(organizer(&model), &multi).unwrap();
    assert!(sheets.len() > 1);
    let placed: usize = sheets.iter().map(|s| s.panels.len()).sum();
    assert_eq!(placed, 25);
    for sheet in &sheets {
        assert!(sheet.width <= 400.0 && sheet.height <= 300.0);
        verify_stroke_colors(&sheet_to_svg(sheet)).unwrap();
    }
}

#[test]
fn lowercase_engraving_is_rejected() {
    assert!(matches!(
        rasterize("fax", 3.0, 1.0),
        Err(GlyphError::Unsupported { ch: 'f', index: 0 })
    ));

    let mut model = DimensionModel::default();
    model.engrave.text = "Fax".to_string();
    let plan = BoxPlan::derive(&model).unwrap();
    assert!(matches!(
        generate(PartFamily::Shell, &plan, &model),
        Err(CamToolError::Glyph(GlyphError::Unsupported { ch: 'a', index: 1 }))
    ));
}

#[test]
fn calibration_box_renders() {
    let model = DimensionModel::default();
    let plan = BoxPlan::derive(&model).unwrap();
    let panels = generate(PartFamily::Calibration, &plan, &model).unwrap();
    assert_eq!(panels.len(), 6);
    let sheets = pack(panels, &LayoutSettings::default()).unwrap();
    verify_stroke_colors(&sheet_to_svg(&sheets[0])).unwrap();
}

proptest! {
    #[test]
    fn rasterize_is_deterministic(text in "[A-Z0-9 :./-]{0,12}", pixel in 0.5f64..5.0, spacing in 0.0f64..3.0) {
        let a = rasterize(&text, pixel, spacing).unwrap();
        let b = rasterize(&text, pixel, spacing).unwrap();
        prop_assert_eq!(&a, &b);
        let n = text.chars().count() as f64;
        let expected = if n == 0.0 { 0.0 } else { n * 5.0 * pixel + (n - 1.0) * spacing };
        prop_assert!((a.width - expected).abs() < 1e-9);
    }

    #[test]
    fn normalization_is_idempotent(colors in prop::collection::vec("(#[0-9a-fA-F]{6}|red|blue|black|rgb\\([0-9]{1,3}, ?[0-9]{1,3}, ?[0-9]{1,3}\\))", 1..6)) {
        let svg: String = colors
            .iter()
            .map(|c| format!("<path d=\"M0,0 Z\" stroke=\"{}\"/>", c))
            .collect();
        let once = normalize_stroke_colors(&svg);
        prop_assert_eq!(normalize_stroke_colors(&once), once.clone());
        prop_assert!(verify_stroke_colors(&once).is_ok());
    }
}
