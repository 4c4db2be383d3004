//! Derivation Engine
//!
//! Pure functions from the [`DimensionModel`] to every measurement the
//! emitters need. Nothing here is cached: a [`BoxPlan`] is recomputed from
//! the model whenever it is needed, and any inconsistency is reported as a
//! [`ConfigurationError`] instead of being clamped.

use crate::error::ConfigurationError;
use crate::model::{Axis, DimensionModel, Extents, OpenSides};
use crate::units::Length;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

type DeriveResult<T> = std::result::Result<T, ConfigurationError>;

/// Explicit assignment of each part axis to the cavity axis it lies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMapping {
    width: Axis,
    depth: Axis,
    height: Axis,
}

impl AxisMapping {
    /// Part and cavity share a frame.
    pub const IDENTITY: AxisMapping = AxisMapping {
        width: Axis::Width,
        depth: Axis::Depth,
        height: Axis::Height,
    };

    /// A drawer in the drawer bay: it is pulled along the shell's long axis,
    /// so its depth lies along the bay width and its width along the bay depth.
    pub const DRAWER_IN_BAY: AxisMapping = AxisMapping {
        width: Axis::Depth,
        depth: Axis::Width,
        height: Axis::Height,
    };

    /// Build a mapping; each cavity axis must be used exactly once.
    pub fn new(width: Axis, depth: Axis, height: Axis) -> DeriveResult<Self> {
        let targets = [width, depth, height];
        for axis in Axis::ALL {
            let uses = targets.iter().filter(|t| **t == axis).count();
            if uses != 1 {
                return Err(ConfigurationError::InvalidAxisMapping {
                    reason: format!("cavity {} is targeted {} times", axis, uses),
                });
            }
        }
        Ok(Self {
            width,
            depth,
            height,
        })
    }

    /// Cavity axis that `part_axis` lies along.
    pub fn target(&self, part_axis: Axis) -> Axis {
        match part_axis {
            Axis::Width => self.width,
            Axis::Depth => self.depth,
            Axis::Height => self.height,
        }
    }
}

impl fmt::Display for AxisMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "width->{}, depth->{}, height->{}",
            self.width, self.depth, self.height
        )
    }
}

fn require_positive(quantity: impl Into<String>, value: Length) -> DeriveResult<Length> {
    if value.is_positive() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonPositive {
            quantity: quantity.into(),
            value,
        })
    }
}

/// Cavity left inside `envelope` once `thickness` is taken off every closed face.
pub fn internal_cavity(
    envelope: Extents,
    thickness: Length,
    open: OpenSides,
) -> DeriveResult<Extents> {
    require_positive("material thickness", thickness)?;

    let mut cavity = envelope;
    for axis in Axis::ALL {
        let inner = envelope[axis] - thickness * open.closed_faces(axis);
        cavity = cavity.with(axis, require_positive(format!("internal {}", axis), inner)?);
    }
    Ok(cavity)
}

/// Width of the drawer bay left after the paper compartment and the divider.
pub fn partition_width(
    shell_internal_width: Length,
    paper_depth: Length,
    divider_thickness: Length,
) -> DeriveResult<Length> {
    require_positive(
        "drawer bay width",
        shell_internal_width - paper_depth - divider_thickness,
    )
}

/// Vertical layout of the drawer slots in the bay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawerStack {
    /// Height of each slot.
    pub slot_height: Length,
    /// Vertical slack between a drawer and its slot.
    pub clearance: Length,
    /// Offset of each slot's floor above the bay floor, bottom slot first.
    pub offsets: Vec<Length>,
}

impl DrawerStack {
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    /// Height of the shelf floors between slots, bottom first.
    pub fn shelf_offsets(&self) -> impl Iterator<Item = Length> + '_ {
        let slot = self.slot_height;
        self.offsets
            .iter()
            .take(self.offsets.len().saturating_sub(1))
            .map(move |offset| *offset + slot)
    }
}

/// Divide the bay height into `count` equal slots separated by shelves.
pub fn stack_drawers(
    bay_height: Length,
    drawer_height: Length,
    shelf_thickness: Length,
    count: usize,
) -> DeriveResult<DrawerStack> {
    if count == 0 {
        return Err(ConfigurationError::InvalidValue {
            name: "drawer_count".to_string(),
            reason: "at least one drawer is required".to_string(),
        });
    }
    require_positive("drawer height", drawer_height)?;

    let too_many = || ConfigurationError::InvalidValue {
        name: "drawer_count".to_string(),
        reason: format!("{} drawers cannot be stacked in any bay", count),
    };
    let n = i64::try_from(count).map_err(|_| too_many())?;
    let shelves = shelf_thickness.checked_mul(n - 1).ok_or_else(too_many)?;
    let required = drawer_height
        .checked_mul(n)
        .and_then(|drawers| drawers.checked_add(shelves))
        .ok_or_else(too_many)?;
    if required > bay_height {
        return Err(ConfigurationError::StackOverflow {
            count,
            drawer_height,
            shelf_thickness,
            required,
            available: bay_height,
        });
    }

    let slot_height = (bay_height - shelves) / n;
    let remainder = bay_height - shelves - slot_height * n;
    if remainder != Length::ZERO {
        warn!("{} of bay height left above the top drawer slot", remainder);
    }

    let offsets = (0..n).map(|i| (slot_height + shelf_thickness) * i).collect();

    Ok(DrawerStack {
        slot_height,
        clearance: slot_height - drawer_height,
        offsets,
    })
}

/// Result of checking one part axis against its cavity axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisFit {
    pub part_axis: Axis,
    pub cavity_axis: Axis,
    pub part: Length,
    /// Cavity extent minus clearance.
    pub limit: Length,
}

impl AxisFit {
    pub fn fits(&self) -> bool {
        self.part <= self.limit
    }
}

/// Outcome of [`fit_check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FitReport {
    pub fits: bool,
    pub diagnostic: String,
    pub axes: Vec<AxisFit>,
}

impl FitReport {
    /// Turn a failed report into [`ConfigurationError::DoesNotFit`].
    pub fn into_result(self, part: impl Into<String>) -> DeriveResult<FitReport> {
        if self.fits {
            Ok(self)
        } else {
            Err(ConfigurationError::DoesNotFit {
                part: part.into(),
                diagnostic: self.diagnostic,
            })
        }
    }
}

/// Check that every axis of `outer` fits the mapped axis of `cavity` less `clearance`.
pub fn fit_check(
    outer: Extents,
    cavity: Extents,
    clearance: Length,
    mapping: AxisMapping,
) -> FitReport {
    let axes: Vec<AxisFit> = Axis::ALL
        .iter()
        .map(|&part_axis| {
            let cavity_axis = mapping.target(part_axis);
            AxisFit {
                part_axis,
                cavity_axis,
                part: outer[part_axis],
                limit: cavity[cavity_axis] - clearance,
            }
        })
        .collect();

    let violations: Vec<String> = axes
        .iter()
        .filter(|fit| !fit.fits())
        .map(|fit| {
            format!(
                "part {} {} exceeds cavity {} {} less {} clearance",
                fit.part_axis,
                fit.part,
                fit.cavity_axis,
                fit.limit + clearance,
                clearance
            )
        })
        .collect();

    let fits = violations.is_empty();
    let diagnostic = if fits {
        format!("fits with mapping {}", mapping)
    } else {
        violations.join("; ")
    };

    FitReport {
        fits,
        diagnostic,
        axes,
    }
}

/// A flat rectangle in its own frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelSize {
    pub width: Length,
    pub height: Length,
}

impl PanelSize {
    pub const fn new(width: Length, height: Length) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for PanelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Sizes of every lid piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LidPlan {
    /// Sliding lid over the paper compartment.
    pub sliding_lid: PanelSize,
    /// Strip glued under each long edge of the sliding lid to ride in the grooves.
    pub tab_strip: PanelSize,
    /// Length of the grooves in the left wall and divider.
    pub groove_length: Length,
    /// Flat lid over the drawer bay.
    pub flat_lid: PanelSize,
    /// Square alignment peg glued under the flat lid.
    pub peg: PanelSize,
    pub peg_inset: Length,
}

/// Every derived measurement of the organizer, validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxPlan {
    pub shell_internal: Extents,
    pub paper_cavity: Extents,
    pub bay_cavity: Extents,
    pub divider_thickness: Length,
    pub shelf_thickness: Length,
    pub stack: DrawerStack,
    /// Drawer envelope checked against one slot of the bay.
    pub drawer_fit: FitReport,
    pub drawer_internal: Extents,
    pub lids: LidPlan,
}

impl BoxPlan {
    /// Run every derivation and reject inconsistent models.
    pub fn derive(model: &DimensionModel) -> DeriveResult<BoxPlan> {
        let t = model.material_thickness;
        let divider_thickness = model.divider_thickness();
        let shelf_thickness = model.shelf_thickness();
        Self::check_ranges(model)?;
        Self::check_finger_joint(model)?;

        let shell_internal = internal_cavity(model.shell, t, OpenSides::TOP)?;
        debug!("shell internal cavity: {}", shell_internal);

        let paper = require_positive("paper compartment depth", model.paper_compartment_depth)?;
        let bay_width = partition_width(shell_internal.width, paper, divider_thickness)?;
        let sum = paper + divider_thickness + bay_width;
        if sum != shell_internal.width {
            return Err(ConfigurationError::PartitionMismatch {
                span: "shell internal width".to_string(),
                total: shell_internal.width,
                sum,
            });
        }
        debug!("drawer bay width: {}", bay_width);

        let paper_cavity = shell_internal.with(Axis::Width, paper);
        let bay_cavity = shell_internal.with(Axis::Width, bay_width);

        let stack = stack_drawers(
            bay_cavity.height,
            model.drawer.height,
            shelf_thickness,
            model.drawer_count,
        )?;
        debug!(
            "drawer slots: {} x {} with {} shelves",
            stack.count(),
            stack.slot_height,
            shelf_thickness
        );

        let slot = bay_cavity.with(Axis::Height, stack.slot_height);
        let drawer_fit = fit_check(
            model.drawer,
            slot,
            model.drawer_clearance * 2,
            AxisMapping::DRAWER_IN_BAY,
        )
        .into_result("drawer")?;

        let drawer_internal = internal_cavity(
            model.drawer,
            model.drawer_material_thickness,
            OpenSides::TOP,
        )?;
        debug!("drawer internal cavity: {}", drawer_internal);

        let lids = Self::derive_lids(model, paper, bay_width, shell_internal.depth)?;

        Ok(BoxPlan {
            shell_internal,
            paper_cavity,
            bay_cavity,
            divider_thickness,
            shelf_thickness,
            stack,
            drawer_fit,
            drawer_internal,
            lids,
        })
    }

    fn check_ranges(model: &DimensionModel) -> DeriveResult<()> {
        match model.lengths().into_iter().find(|(_, value)| !value.in_range()) {
            Some((name, value)) => Err(ConfigurationError::InvalidValue {
                name: name.to_string(),
                reason: format!("{} is out of range (at most {}mm)", value, Length::MAX_MM),
            }),
            None => Ok(()),
        }
    }

    fn check_finger_joint(model: &DimensionModel) -> DeriveResult<()> {
        let settings = &model.finger_joint;
        let invalid = |name: &str, reason: &str| ConfigurationError::InvalidValue {
            name: format!("finger_joint.{}", name),
            reason: reason.to_string(),
        };
        let finite = [
            settings.finger,
            settings.space,
            settings.surrounding_spaces,
            settings.play,
            model.burn,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(invalid("*", "values must be finite"));
        }
        if settings.finger <= 0.0 {
            return Err(invalid("finger", "must be positive"));
        }
        if settings.space <= 0.0 {
            return Err(invalid("space", "must be positive"));
        }
        if settings.surrounding_spaces < 0.0 {
            return Err(invalid("surrounding_spaces", "must not be negative"));
        }
        if settings.play < 0.0 || settings.play >= settings.space {
            return Err(invalid("play", "must be at least zero and below the space"));
        }
        if model.burn < 0.0 || model.burn >= model.material_thickness.as_mm() {
            return Err(ConfigurationError::InvalidValue {
                name: "burn".to_string(),
                reason: format!("{} mm is not a usable kerf", model.burn),
            });
        }
        Ok(())
    }

    fn derive_lids(
        model: &DimensionModel,
        paper: Length,
        bay_width: Length,
        internal_depth: Length,
    ) -> DeriveResult<LidPlan> {
        let t = model.material_thickness;
        let groove = model.lid_groove;
        let clearance = model.lid_clearance;
        let tab_depth = model.sliding_lid_tab_depth;

        if groove.width <= t {
            return Err(ConfigurationError::InvalidValue {
                name: "lid_groove.width".to_string(),
                reason: format!("{} does not clear {} lid stock", groove.width, t),
            });
        }
        if groove.depth > t {
            return Err(ConfigurationError::InvalidValue {
                name: "lid_groove.depth".to_string(),
                reason: format!("{} is deeper than the {} wall", groove.depth, t),
            });
        }
        require_positive("sliding lid tab depth", tab_depth)?;
        if tab_depth >= groove.depth {
            return Err(ConfigurationError::InvalidValue {
                name: "sliding_lid_tab_depth".to_string(),
                reason: format!(
                    "{} does not leave room in the {} deep groove",
                    tab_depth, groove.depth
                ),
            });
        }

        let groove_length = require_positive("lid groove length", internal_depth - t * 2)?;
        let sliding_lid = PanelSize::new(
            require_positive("sliding lid width", paper - clearance)?,
            require_positive("sliding lid depth", internal_depth - clearance)?,
        );
        let engaged = sliding_lid.width + tab_depth * 2;
        let reach = paper + groove.depth * 2;
        if engaged > reach {
            return Err(ConfigurationError::DoesNotFit {
                part: "sliding lid".to_string(),
                diagnostic: format!(
                    "{} across its tabs exceeds {} between groove bottoms",
                    engaged, reach
                ),
            });
        }
        let tab_strip = PanelSize::new(
            tab_depth,
            require_positive("sliding lid tab length", sliding_lid.height - t * 4)?,
        );

        let flat_lid = PanelSize::new(
            require_positive("flat lid width", bay_width - clearance)?,
            require_positive("flat lid depth", internal_depth - clearance)?,
        );
        let peg = PanelSize::new(t * 2, t * 2);
        let peg_inset = model.lid_tab_inset;
        let span = peg_inset * 2 + peg.width;
        if span > flat_lid.width || span > flat_lid.height {
            return Err(ConfigurationError::InvalidValue {
                name: "lid_tab_inset".to_string(),
                reason: format!("pegs {} from the corners overlap on a {} lid", peg_inset, flat_lid),
            });
        }

        debug!(
            "lids: sliding {}, flat {}, groove length {}",
            sliding_lid, flat_lid, groove_length
        );

        Ok(LidPlan {
            sliding_lid,
            tab_strip,
            groove_length,
            flat_lid,
            peg,
            peg_inset,
        })
    }

    pub fn bay_width(&self) -> Length {
        self.bay_cavity.width
    }

    pub fn paper_width(&self) -> Length {
        self.paper_cavity.width
    }
}
