//! Tube-id → chamber/layer/plane-position mapping.
//!
//! The detector is 8 rows of 12 tubes. Rows 0..3 form chamber 0 and rows
//! 4..7 form chamber 1. Even rows are shifted by half a tube pitch, which
//! models the staggered close-packed grid.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Total number of tubes in both chambers.
pub const N_TUBES: u32 = 96;
/// Tubes in one row (layer).
pub const TUBES_PER_ROW: u32 = 12;
/// Tubes in one chamber.
pub const TUBES_PER_CHAMBER: u32 = 48;
/// Horizontal pitch between neighbouring tubes.
pub const TUBE_SEPARATION: f64 = 1.0;
/// Horizontal shift applied to even rows.
pub const ROW_OFFSET: f64 = 0.5;
/// Vertical pitch between rows.
pub const ROW_SEPARATION: f64 = 1.0;
/// Physical tube radius in grid units; only used for drawing.
pub const TUBE_RADIUS: f64 = 1.0;

/// Where a tube sits in the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TubeLocation {
    /// Tube identifier in `[0, 95]`.
    pub tube: u32,
    /// Chamber index, 0 or 1.
    pub chamber: u8,
    /// Layer within the chamber, `[0, 3]`.
    pub layer: u8,
    /// Tube index within the layer, `[0, 11]`.
    pub tube_in_layer: u8,
    /// Global row, `[0, 7]`.
    pub row: u8,
}

impl TubeLocation {
    /// Plane position `[x, y]` of the tube wire.
    pub fn position(&self) -> [f64; 2] {
        grid_position(self.tube)
    }
}

/// Validate a tube identifier.
pub fn check_tube(tube: u32) -> Result<u32, InputError> {
    if tube < N_TUBES {
        Ok(tube)
    } else {
        Err(InputError::TubeOutOfRange { tube })
    }
}

/// Chamber, layer and row of a tube.
pub fn tube_location(tube: u32) -> Result<TubeLocation, InputError> {
    let tube = check_tube(tube)?;
    Ok(TubeLocation {
        tube,
        chamber: (tube / TUBES_PER_CHAMBER) as u8,
        layer: ((tube % TUBES_PER_CHAMBER) / TUBES_PER_ROW) as u8,
        tube_in_layer: (tube % TUBES_PER_ROW) as u8,
        row: (tube / TUBES_PER_ROW) as u8,
    })
}

/// Plane position `[x, y]` of a tube wire.
pub fn tube_position(tube: u32) -> Result<[f64; 2], InputError> {
    Ok(grid_position(check_tube(tube)?))
}

/// Positions of several tubes, failing on the first invalid id.
pub fn tube_positions(tubes: &[u32]) -> Result<Vec<[f64; 2]>, InputError> {
    tubes.iter().map(|&t| tube_position(t)).collect()
}

/// Position for an already validated tube.
pub(crate) fn grid_position(tube: u32) -> [f64; 2] {
    let row = tube / TUBES_PER_ROW;
    let col = tube % TUBES_PER_ROW;
    let mut x = col as f64 * TUBE_SEPARATION;
    if row % 2 == 0 {
        x += ROW_OFFSET;
    }
    [x, row as f64 * ROW_SEPARATION]
}
