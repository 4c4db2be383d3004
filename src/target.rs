//! What a generate command produces.

use faxbox_camtools::PartFamily;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Target {
    Shell,
    Drawers,
    Lids,
    /// Every organizer part on one layout.
    Combined,
    TestBox,
}

impl Target {
    pub const ALL: [Target; 5] = [
        Target::Shell,
        Target::Drawers,
        Target::Lids,
        Target::Combined,
        Target::TestBox,
    ];

    pub fn families(self) -> &'static [PartFamily] {
        match self {
            Target::Shell => &[PartFamily::Shell],
            Target::Drawers => &[PartFamily::Drawers],
            Target::Lids => &[PartFamily::Lids],
            Target::Combined => &PartFamily::ORGANIZER,
            Target::TestBox => &[PartFamily::Calibration],
        }
    }

    /// File name used when no output path is given.
    pub fn file_name(self) -> &'static str {
        match self {
            Target::Shell => "outer_shell.svg",
            Target::Drawers => "drawer.svg",
            Target::Lids => "lids.svg",
            Target::Combined => "final_layout.svg",
            Target::TestBox => "test_box.svg",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Shell => write!(f, "outer shell"),
            Target::Drawers => write!(f, "drawers"),
            Target::Lids => write!(f, "lids"),
            Target::Combined => write!(f, "final layout"),
            Target::TestBox => write!(f, "test box"),
        }
    }
}
