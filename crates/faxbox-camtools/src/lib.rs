//! # FaxBox CAM tools
//!
//! Turns a derived [`faxbox_core::BoxPlan`] into cut-ready output:
//!
//! - [`emit`]: panel descriptors and joints for each part family
//! - [`finger_joint`]: the finger-joint renderer behind [`PanelRenderer`]
//! - [`raster`]: the 5 x 7 pixel font used for engraving
//! - [`layout`]: shelf packing of rendered panels onto sheets
//! - [`svg`]: the SVG writer and stroke-colour checks

pub mod emit;
pub mod error;
pub mod finger_joint;
pub mod geometry;
pub mod layout;
pub mod panel;
pub mod raster;
pub mod svg;

pub use emit::{generate, render_set, PartFamily};
pub use error::{CamToolError, CamToolResult, LayoutError, LayoutResult};
pub use finger_joint::FingerJointRenderer;
pub use geometry::{Bounds, Point};
pub use layout::{pack, LayoutSettings, PlacedPanel, Sheet};
pub use panel::{
    check_joints, Direction, Edge, EdgeRole, EdgeRoles, Feature, Joint, Mate, Operation, Outline,
    PanelPoint, PanelRenderer, PanelSpec, PartSet, RenderedPanel,
};
pub use raster::{rasterize, PixelPlacement, Raster};
pub use svg::{normalize_stroke_colors, sheet_to_svg, verify_stroke_colors};
