//! Building SVG documents and writing them to disk.
//!
//! Documents are built and checked in full before anything is written.
//! Every sheet is first written to a temporary file in the destination
//! directory; only when all of them are on disk are they renamed into place.
//! Numbered sheets left over from an earlier run of the same target are
//! removed afterwards.

use crate::target::Target;
use anyhow::{Context, Result};
use faxbox_camtools::{
    generate, pack, sheet_to_svg, verify_stroke_colors, CamToolResult, LayoutSettings,
};
use faxbox_core::{BoxPlan, DimensionModel};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// One SVG document per sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub target: Target,
    pub documents: Vec<String>,
    /// Used extent of each sheet, mm.
    pub extents: Vec<(f64, f64)>,
    pub panel_count: usize,
}

/// Emit, render, pack and serialize `target`.
pub fn build(
    target: Target,
    plan: &BoxPlan,
    model: &DimensionModel,
    layout: &LayoutSettings,
) -> CamToolResult<Artifact> {
    let mut panels = Vec::new();
    for family in target.families() {
        panels.extend(generate(*family, plan, model)?);
    }
    let panel_count = panels.len();

    let sheets = pack(panels, layout)?;
    let mut documents = Vec::with_capacity(sheets.len());
    for sheet in &sheets {
        let svg = sheet_to_svg(sheet);
        verify_stroke_colors(&svg)?;
        documents.push(svg);
    }
    debug!("{}: {} panels on {} sheet(s)", target, panel_count, sheets.len());

    Ok(Artifact {
        target,
        documents,
        extents: sheets.iter().map(|s| (s.width, s.height)).collect(),
        panel_count,
    })
}

/// Paths the documents of an artifact go to: `path` itself for a single
/// sheet, else `<stem>-<n>.<ext>` for each sheet.
pub fn sheet_paths(path: &Path, sheets: usize) -> Vec<PathBuf> {
    if sheets == 1 {
        return vec![path.to_path_buf()];
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "svg".to_string());
    (1..=sheets)
        .map(|n| path.with_file_name(format!("{}-{}.{}", stem, n, ext)))
        .collect()
}

/// Outputs of an earlier run at `path`: the single-sheet file and any
/// `<stem>-<n>.<ext>` siblings.
fn previous_outputs(path: &Path, dir: &Path) -> Vec<PathBuf> {
    let (Some(stem), Some(ext)) = (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) else {
        return Vec::new();
    };
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let numbered = |name: &str| {
        name.strip_prefix(stem)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|rest| rest.strip_suffix(ext))
            .and_then(|rest| rest.strip_suffix('.'))
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| entry.file_name().to_str().is_some_and(numbered))
        .map(|entry| entry.path())
        .collect();
    if path.is_file() {
        found.push(path.to_path_buf());
    }
    found
}

/// Write every document of `artifact`, returning the paths written.
///
/// Either every sheet ends up in place or none does.
pub fn write(artifact: &Artifact, path: &Path) -> Result<Vec<PathBuf>> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let paths = sheet_paths(path, artifact.documents.len());
    let stale: Vec<PathBuf> = previous_outputs(path, &dir)
        .into_iter()
        .filter(|old| !paths.contains(old))
        .collect();

    let mut staged = Vec::with_capacity(paths.len());
    for (document, target) in artifact.documents.iter().zip(&paths) {
        let mut file = NamedTempFile::new_in(&dir)
            .with_context(|| format!("creating temporary file in {}", dir.display()))?;
        file.write_all(document.as_bytes())
            .with_context(|| format!("writing {}", target.display()))?;
        staged.push((file, target));
    }

    let mut persisted: Vec<&PathBuf> = Vec::with_capacity(staged.len());
    for (file, target) in staged {
        if let Err(err) = file.persist(target) {
            for done in &persisted {
                if let Err(e) = std::fs::remove_file(done) {
                    warn!("could not remove {}: {}", done.display(), e);
                }
            }
            return Err(err.error).with_context(|| format!("saving {}", target.display()));
        }
        persisted.push(target);
    }
    for target in &paths {
        info!("wrote {}", target.display());
    }

    for old in stale {
        match std::fs::remove_file(&old) {
            Ok(()) => debug!("removed stale {}", old.display()),
            Err(e) => warn!("could not remove stale {}: {}", old.display(), e),
        }
    }
    Ok(paths)
}
