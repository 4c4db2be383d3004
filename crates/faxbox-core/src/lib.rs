//! # FaxBox Core
//!
//! Dimension model, derivation engine and error taxonomy for FaxBox.
//! Every other crate reads its measurements from a [`BoxPlan`] derived
//! here; nothing else recomputes cavity math.

pub mod derive;
pub mod error;
pub mod model;
pub mod units;

pub use derive::{
    fit_check, internal_cavity, partition_width, stack_drawers, AxisFit, AxisMapping, BoxPlan,
    DrawerStack, FitReport, LidPlan, PanelSize,
};

pub use error::{ConfigurationError, Error, GlyphError, RenderingError, Result};

pub use model::{
    Axis, DimensionModel, EngraveSettings, Extents, FingerJointSettings, LidGroove, OpenSides,
    Rgb,
};

pub use units::{format_length, get_unit_label, parse_length, Length, MeasurementSystem};
