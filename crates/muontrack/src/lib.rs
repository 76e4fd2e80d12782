//! muontrack — track reconstruction for a two-chamber drift-tube detector.
//!
//! Each event is a set of tube hits with timing. The pipeline stages are:
//!
//! 1. **Geometry** – tube id → chamber, layer and plane position.
//! 2. **Calibration** – `(tof, tot)` → drift radius through a logistic model.
//! 3. **Line fit** – per chamber, the line tangent to all drift circles
//!    (OLS seed refined by a quasi-Newton minimizer, with fallback).
//! 4. **Combine** – the two chamber projection angles → spherical `(θ, φ)`.
//!
//! # Public API
//! - [`Reconstructor`] and [`ReconstructConfig`] as primary entry points
//! - [`Hit`] and [`Event`] as the acquisition-side data model
//! - the stage functions, for callers that drive the pipeline themselves

mod calibration;
mod error;
mod event;
pub mod geometry;
mod line_fit;
mod reconstruct;
mod spherical;

#[cfg(test)]
mod test_utils;

pub use calibration::{calibrated_radius, DriftCalibration};
pub use error::InputError;
pub use event::{Event, Hit};
pub use geometry::{tube_location, tube_position, tube_positions, TubeLocation};
pub use line_fit::{
    fit_chamber_line, fit_line_through_circles, tangency_cost, DriftCircle, FallbackReason,
    LineFitConfig, LineFitOutcome, MIN_CIRCLES,
};
pub use reconstruct::{
    reconstruct_hits, ChamberFit, PipelineStage, ReconstructConfig, Reconstruction, Reconstructor,
    Rejection, MIN_CHAMBER_HITS, MIN_TOTAL_HITS,
};
pub use spherical::{combine_projection_angles, ClampSign, SphericalAngles, SphericalConfig};
