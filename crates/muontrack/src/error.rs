//! Caller contract violations.
//!
//! Data conditions (too few hits, optimizer trouble) are not errors: they are
//! reported through [`crate::Rejection`] and [`crate::LineFitOutcome`].

/// Misuse of the geometry mapper, the line fitter or the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// Tube identifier outside `[0, 95]`.
    TubeOutOfRange {
        /// Offending tube identifier.
        tube: u32,
    },
    /// Tube and radius lists passed to the fitter differ in length.
    LengthMismatch {
        /// Number of tube identifiers.
        tubes: usize,
        /// Number of radii.
        radii: usize,
    },
    /// Too few drift circles for a line fit.
    TooFewCircles {
        /// Required minimum number of circles.
        needed: usize,
        /// Provided number of circles.
        got: usize,
    },
    /// Configuration value that cannot be used.
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TubeOutOfRange { tube } => {
                write!(f, "tube {} out of range [0, 95]", tube)
            }
            Self::LengthMismatch { tubes, radii } => {
                write!(f, "{} tubes but {} radii", tubes, radii)
            }
            Self::TooFewCircles { needed, got } => {
                write!(f, "too few drift circles: need {}, got {}", needed, got)
            }
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for InputError {}
