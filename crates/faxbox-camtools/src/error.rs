//! Error types for the CAM tools crate.
//!
//! Panel emission reports the core [`ConfigurationError`]s, the renderer its
//! [`RenderingError`]s and the rasterizer its [`GlyphError`]s. Sheet layout
//! and SVG output add [`LayoutError`]. [`CamToolError`] unifies them.

use faxbox_core::{ConfigurationError, GlyphError, RenderingError};
use thiserror::Error;

/// Errors raised while packing parts onto sheets or checking the output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A part, or a whole single-sheet layout, exceeds the sheet.
    #[error(
        "{subject} measures {width:.1} x {height:.1} mm, larger than the {sheet_width:.1} x {sheet_height:.1} mm sheet"
    )]
    Oversize {
        subject: String,
        width: f64,
        height: f64,
        sheet_width: f64,
        sheet_height: f64,
    },

    /// A path reached the output without one of the two operation colours.
    #[error("Path {index} has stroke {stroke:?}, expected rgb(0,0,255) or rgb(255,0,0)")]
    UntaggedStroke {
        /// Position of the path in the document.
        index: usize,
        /// The stroke attribute found, if any.
        stroke: Option<String>,
    },

    /// Sheet settings are unusable.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidSettings { name: String, reason: String },
}

/// Errors that can occur during generation.
#[derive(Error, Debug)]
pub enum CamToolError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Glyph(#[from] GlyphError),

    #[error(transparent)]
    Rendering(#[from] RenderingError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl CamToolError {
    /// Whether the failure comes from the model rather than the output stage.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, CamToolError::Configuration(_))
    }
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
