//! Ply failure criteria and factor of safety calculations.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::material::Strength;

/// Failure criterion applied to ply stresses in material axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Quadratic interaction criterion of Tsai and Wu.
    #[default]
    TsaiWu,
    /// Non-interactive comparison of each stress component to its allowable.
    MaxStress,
    /// Quadratic criterion of Tsai and Hill.
    TsaiHill,
}

impl Criterion {
    /// Human-readable criterion name for reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::TsaiWu => "Tsai-Wu",
            Self::MaxStress => "Maximum Stress",
            Self::TsaiHill => "Tsai-Hill",
        }
    }

    /// Failure index of the stress state; values of 1 or more predict failure.
    ///
    /// `stress` holds the material-axis components `[s1, s2, t12]` in psi.
    #[must_use]
    pub fn index(&self, stress: &Vector3<f64>, strength: &Strength) -> f64 {
        match self {
            Self::TsaiWu => {
                let (linear, quadratic) = tsai_wu_terms(stress, strength);
                linear + quadratic
            }
            Self::MaxStress => {
                let ratio = max_stress_ratio(stress, strength);
                if ratio.is_finite() {
                    1.0 / ratio
                } else {
                    0.0
                }
            }
            Self::TsaiHill => tsai_hill_index(stress, strength),
        }
    }

    /// Strength ratio of the stress state: the factor by which the applied
    /// loading can grow before the criterion predicts failure.
    ///
    /// An unstressed ply yields an infinite ratio.
    ///
    /// # Examples
    /// ```
    /// use laminatx::{Criterion, MaterialLibrary};
    /// use nalgebra::Vector3;
    ///
    /// let library = MaterialLibrary::builtin();
    /// let strength = library
    ///     .get("T300/5208_graphite_epoxy")
    ///     .expect("built-in material available")
    ///     .strength;
    /// let ratio = Criterion::TsaiWu.strength_ratio(&Vector3::new(2_500.0, 0.0, 0.0), &strength);
    /// assert!((ratio - 87.0).abs() < 1.0e-9);
    /// ```
    #[must_use]
    pub fn strength_ratio(&self, stress: &Vector3<f64>, strength: &Strength) -> f64 {
        match self {
            Self::TsaiWu => {
                let (linear, quadratic) = tsai_wu_terms(stress, strength);
                // Scaling the stress state by R turns the criterion into
                // quadratic * R^2 + linear * R = 1; the positive root is the
                // strength ratio. The quadratic form is positive definite, so
                // it vanishes only for an unstressed ply.
                if quadratic <= 0.0 {
                    f64::INFINITY
                } else {
                    (-linear + (linear * linear + 4.0 * quadratic).sqrt()) / (2.0 * quadratic)
                }
            }
            Self::MaxStress => max_stress_ratio(stress, strength),
            Self::TsaiHill => {
                let index = tsai_hill_index(stress, strength);
                if index <= 0.0 {
                    f64::INFINITY
                } else {
                    1.0 / index.sqrt()
                }
            }
        }
    }
}

/// Linear and quadratic terms of the Tsai-Wu polynomial.
fn tsai_wu_terms(stress: &Vector3<f64>, strength: &Strength) -> (f64, f64) {
    let f1 = 1.0 / strength.xt - 1.0 / strength.xc;
    let f2 = 1.0 / strength.yt - 1.0 / strength.yc;
    let f11 = 1.0 / (strength.xt * strength.xc);
    let f22 = 1.0 / (strength.yt * strength.yc);
    let f66 = 1.0 / (strength.s * strength.s);
    let f12 = -0.5 * (f11 * f22).sqrt();

    let s1 = stress[0];
    let s2 = stress[1];
    let t12 = stress[2];

    let linear = f1 * s1 + f2 * s2;
    let quadratic =
        f11 * s1 * s1 + f22 * s2 * s2 + f66 * t12 * t12 + 2.0 * f12 * s1 * s2;
    (linear, quadratic)
}

/// Minimum allowable-to-applied ratio over the three stress components.
fn max_stress_ratio(stress: &Vector3<f64>, strength: &Strength) -> f64 {
    let mut ratio = f64::INFINITY;
    let s1 = stress[0];
    let s2 = stress[1];
    let t12 = stress[2];

    if s1 > 0.0 {
        ratio = ratio.min(strength.xt / s1);
    } else if s1 < 0.0 {
        ratio = ratio.min(strength.xc / -s1);
    }
    if s2 > 0.0 {
        ratio = ratio.min(strength.yt / s2);
    } else if s2 < 0.0 {
        ratio = ratio.min(strength.yc / -s2);
    }
    if t12 != 0.0 {
        ratio = ratio.min(strength.s / t12.abs());
    }
    ratio
}

/// Tsai-Hill failure index with sign-dependent longitudinal and transverse
/// allowables.
fn tsai_hill_index(stress: &Vector3<f64>, strength: &Strength) -> f64 {
    let s1 = stress[0];
    let s2 = stress[1];
    let t12 = stress[2];
    let x = if s1 >= 0.0 { strength.xt } else { strength.xc };
    let y = if s2 >= 0.0 { strength.yt } else { strength.yc };

    (s1 / x).powi(2) - s1 * s2 / (x * x) + (s2 / y).powi(2) + (t12 / strength.s).powi(2)
}
