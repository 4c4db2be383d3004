//! Error handling for FaxBox
//!
//! Provides the error taxonomy shared by every generator:
//! - Configuration errors (derived dimensions, fit checks, joint pairing)
//! - Glyph errors (engraving text the pixel font cannot render)
//! - Rendering errors (raised by the finger-joint renderer)
//!
//! All error types use `thiserror` for ergonomic error handling. None of them
//! is ever recovered from inside a generation run: they abort it before any
//! artifact is written.

use crate::units::Length;
use thiserror::Error;

/// Configuration error type
///
/// A derived dimension is non-positive, a part does not fit its cavity, a
/// partition does not add up, or two panels disagree about a shared joint.
/// Never clamped or corrected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A measurement that must be strictly positive is not
    #[error("{quantity} must be positive, got {value}")]
    NonPositive {
        /// What was being measured.
        quantity: String,
        /// The offending value.
        value: Length,
    },

    /// The drawer stack is taller than the bay it goes into
    #[error(
        "{count} drawers of {drawer_height} with {shelf_thickness} shelves need {required}, \
         but the bay is only {available} high"
    )]
    StackOverflow {
        /// Number of drawers requested.
        count: usize,
        /// External height of one drawer.
        drawer_height: Length,
        /// Thickness of the shelves between drawers.
        shelf_thickness: Length,
        /// Total height the stack needs.
        required: Length,
        /// Height of the bay.
        available: Length,
    },

    /// A part is larger than the cavity it has to fit in
    #[error("{part} does not fit: {diagnostic}")]
    DoesNotFit {
        /// The part being placed.
        part: String,
        /// Which axes failed, with values.
        diagnostic: String,
    },

    /// A partition of a span does not add back up to the span
    #[error("{span} of {total} is partitioned into pieces summing to {sum}")]
    PartitionMismatch {
        /// The span being partitioned.
        span: String,
        /// The expected total.
        total: Length,
        /// The actual sum of the pieces.
        sum: Length,
    },

    /// A configuration value is invalid
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue {
        /// The setting name.
        name: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// An axis mapping is not a one-to-one assignment of axes
    #[error("Invalid axis mapping: {reason}")]
    InvalidAxisMapping {
        /// Why the mapping was rejected.
        reason: String,
    },

    /// An edge-role string is malformed
    #[error("Invalid edge roles '{roles}': {reason}")]
    InvalidEdgeRoles {
        /// The rejected role string.
        roles: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A cutout, hole row or engraving leaves the panel
    #[error("{feature} on panel '{panel}' leaves the {width} x {height} panel")]
    FeatureOutOfBounds {
        /// Panel identifier.
        panel: String,
        /// Description of the feature.
        feature: String,
        /// Panel width.
        width: Length,
        /// Panel height.
        height: Length,
    },

    /// Two mating edges do not pair up as one male and one female of equal length
    #[error("Joint {joint} does not pair up: {reason}")]
    JointMismatch {
        /// Human-readable joint description.
        joint: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Glyph error type
///
/// Raised by the engrave text rasterizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlyphError {
    /// The character has no bitmap in the pixel font
    #[error("Character {ch:?} at position {index} has no glyph in the pixel font")]
    Unsupported {
        /// The unsupported character.
        ch: char,
        /// Its character index in the input text.
        index: usize,
    },

    /// Pixel size or spacing is unusable
    #[error("Invalid font metrics: {reason}")]
    InvalidMetrics {
        /// Why the metrics were rejected.
        reason: String,
    },
}

/// Rendering error type
///
/// Raised by the panel renderer and propagated unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderingError {
    /// A tabbed edge cannot hold a single finger
    #[error("Edge {edge} of panel '{panel}' is {length}, too short for a finger joint")]
    EdgeTooShort {
        /// Panel identifier.
        panel: String,
        /// Edge index (0 = bottom, 1 = right, 2 = top, 3 = left).
        edge: usize,
        /// Nominal edge length.
        length: Length,
    },

    /// The renderer was handed a panel it cannot draw
    #[error("Cannot render panel '{panel}': {reason}")]
    InvalidPanel {
        /// Panel identifier.
        panel: String,
        /// Why rendering failed.
        reason: String,
    },
}

/// Main error type for FaxBox
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Glyph error
    #[error(transparent)]
    Glyph(#[from] GlyphError),

    /// Rendering error
    #[error(transparent)]
    Rendering(#[from] RenderingError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Check if this is a glyph error
    pub fn is_glyph_error(&self) -> bool {
        matches!(self, Error::Glyph(_))
    }

    /// Check if this is a rendering error
    pub fn is_rendering_error(&self) -> bool {
        matches!(self, Error::Rendering(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::NonPositive {
            quantity: "drawer bay width".to_string(),
            value: Length::from_mm(-2.5),
        };
        assert_eq!(err.to_string(), "drawer bay width must be positive, got -2.5mm");

        let err = ConfigurationError::StackOverflow {
            count: 2,
            drawer_height: Length::from_mm(53.0),
            shelf_thickness: Length::from_mm(3.0),
            required: Length::from_mm(109.0),
            available: Length::from_mm(100.0),
        };
        assert_eq!(
            err.to_string(),
            "2 drawers of 53mm with 3mm shelves need 109mm, but the bay is only 100mm high"
        );
    }

    #[test]
    fn test_glyph_error_display() {
        let err = GlyphError::Unsupported { ch: 'f', index: 0 };
        assert_eq!(
            err.to_string(),
            "Character 'f' at position 0 has no glyph in the pixel font"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = GlyphError::Unsupported { ch: '~', index: 3 }.into();
        assert!(err.is_glyph_error());

        let err: Error = RenderingError::InvalidPanel {
            panel: "shell/front".to_string(),
            reason: "empty".to_string(),
        }
        .into();
        assert!(err.is_rendering_error());
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
