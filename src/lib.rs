//! # FaxBox
//!
//! Generates the cut files for a laser-cut organizer that sits under a fax
//! machine: an open-top shell split into a paper compartment and a drawer
//! bay, finger-jointed drawers, and two lids.
//!
//! ## Architecture
//!
//! FaxBox is organized as a workspace with multiple crates:
//!
//! 1. **faxbox-core** - Lengths, the dimension model and the derivation engine
//! 2. **faxbox-camtools** - Panel emitters, finger-joint rendering, engraving, layout and SVG
//! 3. **faxbox-settings** - Config file loading, validation and discovery
//! 4. **faxbox** - The command-line binary
//!
//! Output is SVG for a cutting service that reads operations from stroke
//! colour: blue `rgb(0,0,255)` cuts, red `rgb(255,0,0)` engraves.

pub mod artifact;
pub mod report;
pub mod target;

pub use artifact::{build, sheet_paths, write, Artifact};
pub use report::DimensionReport;
pub use target::Target;

pub use faxbox_camtools::{LayoutSettings, PartFamily};
pub use faxbox_core::{BoxPlan, DimensionModel, Length, MeasurementSystem};
pub use faxbox_settings::{Config, OutputSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Environment variable selecting JSON log lines.
pub const LOG_JSON_ENV: &str = "FAXBOX_LOG_JSON";

/// Initialize logging with the default configuration
///
/// Logs go to stderr so that stdout stays clean for reports. The level
/// comes from `RUST_LOG` and defaults to `info`. Setting `FAXBOX_LOG_JSON`
/// switches to one JSON object per line.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var_os(LOG_JSON_ENV).is_some_and(|v| !v.is_empty());

    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
    });
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()?;

    Ok(())
}
