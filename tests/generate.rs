//! Generating and writing artifacts.

use faxbox::{build, write, Config, LayoutSettings, Target};
use faxbox_camtools::{verify_stroke_colors, CamToolError, LayoutError};
use tempfile::TempDir;

#[test]
fn every_target_writes_a_checked_svg() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let plan = config.plan().unwrap();

    for target in Target::ALL {
        let artifact = build(target, &plan, &config.dimensions, &config.layout).unwrap();
        let path = dir.path().join("out").join(target.file_name());
        let written = write(&artifact, &path).unwrap();
        assert_eq!(written, vec![path.clone()]);

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<?xml"));
        verify_stroke_colors(&svg).unwrap();
    }

    // Only the final files remain, no temporaries.
    let count = std::fs::read_dir(dir.path().join("out")).unwrap().count();
    assert_eq!(count, Target::ALL.len());
}

#[test]
fn combined_layout_has_every_part() {
    let config = Config::default();
    let plan = config.plan().unwrap();
    let artifact = build(Target::Combined, &plan, &config.dimensions, &config.layout).unwrap();
    assert_eq!(artifact.panel_count, 25);
    let svg = &artifact.documents[0];
    for id in ["shell/front", "drawer-1/bottom", "drawer-2/bottom", "lids/flat", "lids/peg-4"] {
        assert!(svg.contains(&format!("<g id=\"{}\">", id)), "missing {}", id);
    }
}

#[test]
fn multi_sheet_output_is_numbered() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let plan = config.plan().unwrap();
    let layout = LayoutSettings {
        sheet_width: 400.0,
        sheet_height: 300.0,
        multi_sheet: true,
        ..LayoutSettings::default()
    };

    let artifact = build(Target::Combined, &plan, &config.dimensions, &layout).unwrap();
    assert!(artifact.documents.len() > 1);
    let written = write(&artifact, &dir.path().join("final_layout.svg")).unwrap();
    assert_eq!(written.len(), artifact.documents.len());
    assert!(written[0].ends_with("final_layout-1.svg"));
    assert!(written.iter().all(|p| p.is_file()));
    assert!(!dir.path().join("final_layout.svg").exists());
}

#[test]
fn oversize_layout_writes_nothing() {
    let config = Config::default();
    let plan = config.plan().unwrap();
    let layout = LayoutSettings {
        sheet_width: 200.0,
        sheet_height: 200.0,
        ..LayoutSettings::default()
    };
    let err = build(Target::Shell, &plan, &config.dimensions, &layout).unwrap_err();
    assert!(matches!(err, CamToolError::Layout(LayoutError::Oversize { .. })));
}
