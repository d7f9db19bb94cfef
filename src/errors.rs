//! Error types produced while building materials, laminates and analyses.

use thiserror::Error;

/// Error returned when a material property is rejected.
///
/// The variants describe the reason the supplied value is rejected so callers can
/// present actionable feedback to users.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MaterialError {
    /// Returned when an elastic modulus is zero, negative or non-finite.
    #[error("{name} must be positive and finite (received {value})")]
    InvalidModulus {
        /// Name of the offending constant (`e11`, `e22` or `g12`).
        name: &'static str,
        /// Rejected modulus in psi.
        value: f64,
    },
    /// Returned when the major Poisson ratio falls outside the open interval (0, 1).
    #[error("nu12 must lie in (0, 1) (received {0})")]
    InvalidPoissonRatio(f64),
    /// Returned when a strength allowable is zero, negative or non-finite.
    #[error("{name} must be positive and finite (received {value})")]
    InvalidStrength {
        /// Name of the offending allowable (`xt`, `xc`, `yt`, `yc` or `s`).
        name: &'static str,
        /// Rejected allowable in psi.
        value: f64,
    },
}

/// Error returned when a ply stack cannot be assembled into a laminate.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum LayupError {
    /// Returned when the stacking sequence contains no plies.
    #[error("laminate must contain at least one ply")]
    EmptyLayup,
    /// Returned when a ply thickness is zero, negative or non-finite.
    #[error("ply {ply} thickness must be positive and finite (received {thickness})")]
    InvalidThickness {
        /// Zero-based index of the offending ply.
        ply: usize,
        /// Rejected thickness in inches.
        thickness: f64,
    },
    /// Returned when a fiber angle is non-finite.
    #[error("ply {ply} angle must be finite (received {angle})")]
    InvalidAngle {
        /// Zero-based index of the offending ply.
        ply: usize,
        /// Rejected angle in degrees.
        angle: f64,
    },
    /// Returned when per-ply thicknesses do not match the stacking sequence.
    #[error("expected {expected} ply thicknesses, received {received}")]
    ThicknessCountMismatch {
        /// Number of plies in the stacking sequence.
        expected: usize,
        /// Number of thickness values supplied.
        received: usize,
    },
}

/// Error returned when a component geometry dimension is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum GeometryError {
    /// Returned when a geometric dimension is zero, negative or non-finite.
    #[error("{dimension} must be positive and finite (received {value})")]
    NonPositiveDimension {
        /// Name of the offending dimension.
        dimension: &'static str,
        /// Rejected dimension in inches.
        value: f64,
    },
}

/// Error returned when a laminate analysis fails.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when the ABD stiffness matrix cannot be inverted.
    #[error("ABD stiffness matrix is singular; check ply properties")]
    SingularStiffness,
    /// Returned when a ply index falls outside the stacking sequence.
    #[error("ply index {index} is out of range for a laminate with {count} plies")]
    PlyOutOfRange {
        /// Requested zero-based ply index.
        index: usize,
        /// Number of plies in the laminate.
        count: usize,
    },
    /// Returned when a component references a material that is not in the library.
    #[error("material {0:?} is not in the material library")]
    UnknownMaterial(String),
    /// Returned when the component layup cannot be assembled.
    #[error(transparent)]
    Layup(#[from] LayupError),
    /// Returned when the component geometry cannot produce loads.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Error returned when reading or writing a material database file.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Returned when the database file cannot be read or written.
    #[error("material database I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the database file is not valid JSON.
    #[error("material database is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Returned when no platform data directory can be resolved.
    #[error("no application data directory is available on this platform")]
    NoDataDir,
}

/// Error returned when reading or writing a project file.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Returned when the project file cannot be read or written.
    #[error("project file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the project file is not valid YAML.
    #[error("project file is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
