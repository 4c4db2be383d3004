//! Dimension Model
//!
//! The single source of truth for every measurement of the organizer. A
//! [`DimensionModel`] is built once (from defaults or a configuration file)
//! and handed by reference to the derivation engine and every emitter.
//!
//! ## Axes
//!
//! Every box is described in its own frame with three named axes:
//!
//! - [`Axis::Width`]: side to side.
//! - [`Axis::Depth`]: front to back. For a drawer this is the pull direction.
//! - [`Axis::Height`]: vertical.
//!
//! The shell's width is its long axis. Its internal width is split, left to
//! right, into the paper compartment, the divider and the drawer bay, and
//! the drawers slide along it. A drawer's depth therefore lines up with the
//! bay's width; see [`crate::derive::AxisMapping::DRAWER_IN_BAY`].

use crate::units::Length;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// A named axis of a box, relative to that box's own frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Width,
    Depth,
    Height,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Width, Axis::Depth, Axis::Height];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Depth => write!(f, "depth"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// Size of a box along its three named axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extents {
    pub width: Length,
    pub depth: Length,
    pub height: Length,
}

impl Extents {
    pub const fn new(width: Length, depth: Length, height: Length) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    pub fn from_mm(width: f64, depth: f64, height: f64) -> Self {
        Self::new(
            Length::from_mm(width),
            Length::from_mm(depth),
            Length::from_mm(height),
        )
    }

    pub fn get(&self, axis: Axis) -> Length {
        match axis {
            Axis::Width => self.width,
            Axis::Depth => self.depth,
            Axis::Height => self.height,
        }
    }

    /// Copy with one axis replaced.
    pub fn with(mut self, axis: Axis, value: Length) -> Self {
        match axis {
            Axis::Width => self.width = value,
            Axis::Depth => self.depth = value,
            Axis::Height => self.height = value,
        }
        self
    }

    /// Every axis multiplied by `factor`.
    pub fn scaled(self, factor: i64) -> Self {
        Self::new(self.width * factor, self.depth * factor, self.height * factor)
    }
}

impl Index<Axis> for Extents {
    type Output = Length;

    fn index(&self, axis: Axis) -> &Length {
        match axis {
            Axis::Width => &self.width,
            Axis::Depth => &self.depth,
            Axis::Height => &self.height,
        }
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (w) x {} (d) x {} (h)",
            self.width, self.depth, self.height
        )
    }
}

/// Which faces of a box are left open.
///
/// A closed face takes one material thickness off the cavity along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenSides {
    pub left: bool,
    pub right: bool,
    pub front: bool,
    pub back: bool,
    pub bottom: bool,
    pub top: bool,
}

impl OpenSides {
    /// Fully boxed.
    pub const NONE: OpenSides = OpenSides {
        left: false,
        right: false,
        front: false,
        back: false,
        bottom: false,
        top: false,
    };

    /// Open top, as for drawers and the lidded shell.
    pub const TOP: OpenSides = OpenSides {
        top: true,
        ..OpenSides::NONE
    };

    /// Number of closed faces bounding `axis`: 0, 1 or 2.
    pub fn closed_faces(&self, axis: Axis) -> i64 {
        let (a, b) = match axis {
            Axis::Width => (self.left, self.right),
            Axis::Depth => (self.front, self.back),
            Axis::Height => (self.bottom, self.top),
        };
        i64::from(!a) + i64::from(!b)
    }
}

/// An RGB stroke colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const CUT: Rgb = Rgb(0, 0, 255);
    pub const ENGRAVE: Rgb = Rgb(255, 0, 0);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

/// Finger joint pitch, in multiples of the material thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerJointSettings {
    /// Width of fingers in multiples of thickness
    pub finger: f64,
    /// Space between fingers in multiples of thickness
    pub space: f64,
    /// Space at start and end in multiples of normal spaces
    pub surrounding_spaces: f64,
    /// Extra space to allow fingers to move in/out (multiples of thickness)
    pub play: f64,
}

impl Default for FingerJointSettings {
    fn default() -> Self {
        Self {
            finger: 2.0,
            space: 2.0,
            surrounding_spaces: 2.0,
            play: 0.0,
        }
    }
}

/// Sliding-lid groove cut into the two walls bounding the paper compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LidGroove {
    /// Opening of the groove; must exceed the lid stock thickness.
    pub width: Length,
    /// How far the groove reaches into the wall.
    pub depth: Length,
}

impl Default for LidGroove {
    fn default() -> Self {
        Self {
            width: Length::from_mm(3.5),
            depth: Length::from_mm(3.0),
        }
    }
}

/// Text engraved on the front wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngraveSettings {
    pub color: Rgb,
    /// Gap between glyph cells, mm.
    pub font_spacing: f64,
    /// Pitch of one font pixel, mm.
    pub pixel_size: f64,
    pub text: String,
    /// Distance from the top of the front wall to the top of the text.
    pub top_margin: Length,
}

impl Default for EngraveSettings {
    fn default() -> Self {
        Self {
            color: Rgb::ENGRAVE,
            font_spacing: 2.0,
            pixel_size: 3.0,
            text: "FAX MACHINE".to_string(),
            top_margin: Length::from_mm(12.0),
        }
    }
}

/// Every configurable dimension of the organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionModel {
    /// Shell, divider, shelf and lid stock.
    pub material_thickness: Length,
    /// Drawer stock.
    pub drawer_material_thickness: Length,
    /// External envelope of the shell. The width is the long axis.
    pub shell: Extents,
    /// Internal span of the paper compartment along the shell width.
    pub paper_compartment_depth: Length,
    /// External envelope of one drawer, in the drawer's frame (depth = pull).
    pub drawer: Extents,
    pub drawer_count: usize,
    /// Clearance on each side of a drawer in its slot.
    pub drawer_clearance: Length,
    pub finger_notch_radius: Length,
    pub lid_groove: LidGroove,
    pub sliding_lid_tab_depth: Length,
    pub lid_clearance: Length,
    /// Distance of the flat-lid alignment pegs from its corners.
    pub lid_tab_inset: Length,
    pub engrave: EngraveSettings,
    pub finger_joint: FingerJointSettings,
    /// Kerf compensation handed to the renderer, mm.
    pub burn: f64,
}

impl Default for DimensionModel {
    fn default() -> Self {
        Self {
            material_thickness: Length::from_mm(3.0),
            drawer_material_thickness: Length::from_mm(3.0),
            // 12" x 6.5" x 5"
            shell: Extents::from_mm(304.8, 165.1, 127.0),
            paper_compartment_depth: Length::from_mm(76.2),
            drawer: Extents::from_mm(152.0, 212.0, 57.0),
            drawer_count: 2,
            drawer_clearance: Length::from_mm(1.0),
            finger_notch_radius: Length::from_mm(12.0),
            lid_groove: LidGroove::default(),
            sliding_lid_tab_depth: Length::from_mm(2.0),
            lid_clearance: Length::from_mm(0.5),
            lid_tab_inset: Length::from_mm(10.0),
            engrave: EngraveSettings::default(),
            finger_joint: FingerJointSettings::default(),
            burn: 0.05,
        }
    }
}

impl DimensionModel {
    /// Every length of the model with its configuration key.
    pub fn lengths(&self) -> Vec<(&'static str, Length)> {
        vec![
            ("material_thickness", self.material_thickness),
            ("drawer_material_thickness", self.drawer_material_thickness),
            ("shell.width", self.shell.width),
            ("shell.depth", self.shell.depth),
            ("shell.height", self.shell.height),
            ("paper_compartment_depth", self.paper_compartment_depth),
            ("drawer.width", self.drawer.width),
            ("drawer.depth", self.drawer.depth),
            ("drawer.height", self.drawer.height),
            ("drawer_clearance", self.drawer_clearance),
            ("finger_notch_radius", self.finger_notch_radius),
            ("lid_groove.width", self.lid_groove.width),
            ("lid_groove.depth", self.lid_groove.depth),
            ("sliding_lid_tab_depth", self.sliding_lid_tab_depth),
            ("lid_clearance", self.lid_clearance),
            ("lid_tab_inset", self.lid_tab_inset),
            ("engrave.top_margin", self.engrave.top_margin),
        ]
    }

    /// Divider between paper compartment and drawer bay.
    pub fn divider_thickness(&self) -> Length {
        self.material_thickness
    }

    /// Shelves between stacked drawers.
    pub fn shelf_thickness(&self) -> Length {
        self.material_thickness
    }
}
