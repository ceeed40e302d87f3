use serde::{Deserialize, Serialize};
use std::fmt;

use super::units::round_half_up;

/// Number of low bits reserved for the size in a packed measure spec.
pub const MODE_SHIFT: u32 = 30;
pub const MODE_MASK: u32 = 0x3 << MODE_SHIFT;
pub const MAX_SPEC_SIZE: i32 = (1 << MODE_SHIFT) - 1;

/// Measured-dimension packing: low bits carry the size, the reserved state
/// byte carries the "measured smaller than it wanted" flag.
pub const MEASURED_SIZE_MASK: u32 = 0x00ff_ffff;
pub const MEASURED_STATE_MASK: u32 = 0xff00_0000;
pub const MEASURED_STATE_TOO_SMALL: u32 = 0x0100_0000;
pub const MEASURED_HEIGHT_STATE_SHIFT: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum MeasureMode {
    /// The parent imposes no constraint; the child reports any size it wants.
    Unspecified = 0,
    /// The parent has determined the child's exact size.
    Exactly = 1,
    /// The child may be any size up to the given bound.
    AtMost = 2,
}

impl MeasureMode {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0 => Self::Unspecified,
            1 => Self::Exactly,
            2 => Self::AtMost,
            _ => unreachable!("invalid measure mode bits: {bits}"),
        }
    }
}

/// A (mode, size) constraint packed into a single integer so it can be passed
/// through the tree as one word. Packing round-trips exactly for every size
/// in `0..=MAX_SPEC_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasureSpec(u32);

impl MeasureSpec {
    pub fn make(size: i32, mode: MeasureMode) -> Self {
        debug_assert!(
            (0..=MAX_SPEC_SIZE).contains(&size),
            "measure spec size out of range: {size}"
        );
        Self((size as u32 & !MODE_MASK) | ((mode as u32) << MODE_SHIFT))
    }

    pub fn unspecified() -> Self {
        Self::make(0, MeasureMode::Unspecified)
    }

    pub fn size(self) -> i32 {
        (self.0 & !MODE_MASK) as i32
    }

    pub fn mode(self) -> MeasureMode {
        MeasureMode::from_bits(self.0 >> MODE_SHIFT)
    }

    pub fn to_bits(self) -> u32 {
        self.0
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }
}

impl Default for MeasureSpec {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl fmt::Display for MeasureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode() {
            MeasureMode::Unspecified => "UNSPECIFIED",
            MeasureMode::Exactly => "EXACTLY",
            MeasureMode::AtMost => "AT_MOST",
        };
        write!(f, "MeasureSpec: {} {}", mode, self.size())
    }
}

/// Derives the constraint a parent passes to a child on one axis.
///
/// `child_length` is the child's already-resolved effective length on that
/// axis; a negative value means no explicit size was declared and the
/// constraint is derived from the parent's own spec instead.
pub fn child_measure_spec(
    parent_available: i32,
    parent_mode: MeasureMode,
    margins: i32,
    child_length: i32,
    stretched: bool,
) -> MeasureSpec {
    let (result_size, result_mode);

    if child_length >= 0 {
        // An explicit size was declared. Under any real parent constraint it
        // still cannot exceed the parent's available length.
        result_size = if parent_mode == MeasureMode::Unspecified {
            child_length
        } else {
            parent_available.min(child_length)
        };
        result_mode = MeasureMode::Exactly;
    } else {
        match parent_mode {
            MeasureMode::Exactly => {
                result_size = (parent_available - margins).max(0);
                result_mode = if stretched {
                    MeasureMode::Exactly
                } else {
                    MeasureMode::AtMost
                };
            }
            MeasureMode::AtMost => {
                result_size = (parent_available - margins).max(0);
                result_mode = MeasureMode::AtMost;
            }
            MeasureMode::Unspecified => {
                result_size = 0;
                result_mode = MeasureMode::Unspecified;
            }
        }
    }

    MeasureSpec::make(result_size, result_mode)
}

/// Reconciles a desired size with the spec the parent imposed, producing a
/// packed measured dimension. When an `AtMost` bound clips the desired size
/// the too-small flag is set; incoming child state bits propagate upward.
///
/// The `+ 0.499` bias makes the rounding a near-ceil: any fractional pixel
/// larger than a thousandth rounds up.
pub fn resolve_size_and_state(
    size: f32,
    spec_size: f32,
    spec_mode: MeasureMode,
    child_measured_state: u32,
) -> u32 {
    let mut result = size;
    let mut state = 0u32;

    match spec_mode {
        MeasureMode::Unspecified => {}
        MeasureMode::AtMost => {
            if spec_size < size {
                result = round_half_up(spec_size + 0.499) as f32;
                state = MEASURED_STATE_TOO_SMALL;
            }
        }
        MeasureMode::Exactly => {
            result = spec_size;
        }
    }

    (round_half_up(result + 0.499) as u32) | state | (child_measured_state & MEASURED_STATE_MASK)
}

pub fn combine_measured_states(current: u32, new: u32) -> u32 {
    current | new
}
