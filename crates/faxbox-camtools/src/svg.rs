//! SVG output for the cutting service
//!
//! The service reads operations from stroke colours only: `rgb(0,0,255)` is
//! a cut and `rgb(255,0,0)` an engrave. Paths are never filled.

use crate::error::{LayoutError, LayoutResult};
use crate::layout::Sheet;
use crate::panel::{Operation, Outline};
use faxbox_core::Rgb;
use regex::Regex;
use std::sync::LazyLock;

const STROKE_WIDTH_MM: f64 = 0.1;

static STROKE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"stroke\s*=\s*"([^"]*)""#).expect("invalid stroke regex"));
static STROKE_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"stroke\s*:\s*([^;"]+)"#).expect("invalid style regex"));
static PATH_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<path\b([^>]*)>"#).expect("invalid path regex"));

pub fn operation_color(operation: Operation) -> Rgb {
    match operation {
        Operation::Cut => Rgb::CUT,
        Operation::Engrave => Rgb::ENGRAVE,
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn path_data(outline: &Outline, height: f64) -> String {
    let mut points = outline.points.as_slice();
    if points.len() > 1 && points.first() == points.last() {
        points = &points[..points.len() - 1];
    }
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{}{:.3},{:.3} ", cmd, p.x, height - p.y));
    }
    d.push('Z');
    d
}

/// Render one sheet as a standalone SVG document, in millimetres, y down.
pub fn sheet_to_svg(sheet: &Sheet) -> String {
    let (w, h) = (sheet.width, sheet.height);
    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.3}mm\" height=\"{:.3}mm\" viewBox=\"0 0 {:.3} {:.3}\">\n",
        w, h, w, h
    ));
    for panel in &sheet.panels {
        svg.push_str(&format!(
            "  <g id=\"{}\">\n    <title>{}</title>\n",
            escape(&panel.id),
            escape(&panel.label)
        ));
        for outline in &panel.outlines {
            svg.push_str(&format!(
                "    <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                path_data(outline, h),
                operation_color(outline.operation),
                STROKE_WIDTH_MM
            ));
        }
        svg.push_str("  </g>\n");
    }
    svg.push_str("</svg>\n");
    svg
}

fn canonical_color(value: &str) -> Rgb {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.as_str() {
        "red" | "#f00" | "#ff0000" | "rgb(255,0,0)" | "rgb(100%,0%,0%)" => Rgb::ENGRAVE,
        _ => Rgb::CUT,
    }
}

/// Map every stroke colour onto one of the two operation colours. Red
/// variants become engrave; black, blue and anything else become cut.
pub fn normalize_stroke_colors(svg: &str) -> String {
    let attrs = STROKE_ATTR.replace_all(svg, |caps: &regex::Captures| {
        format!("stroke=\"{}\"", canonical_color(&caps[1]))
    });
    STROKE_STYLE
        .replace_all(&attrs, |caps: &regex::Captures| {
            format!("stroke:{}", canonical_color(&caps[1]))
        })
        .into_owned()
}

/// Every path must carry a stroke attribute with one of the two operation colours.
pub fn verify_stroke_colors(svg: &str) -> LayoutResult<()> {
    let cut = Rgb::CUT.to_string();
    let engrave = Rgb::ENGRAVE.to_string();
    for (index, tag) in PATH_TAG.captures_iter(svg).enumerate() {
        let stroke = STROKE_ATTR.captures(&tag[1]).map(|caps| caps[1].to_string());
        match stroke {
            Some(ref s) if *s == cut || *s == engrave => {}
            stroke => return Err(LayoutError::UntaggedStroke { index, stroke }),
        }
    }
    Ok(())
}
