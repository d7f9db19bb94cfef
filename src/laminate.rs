//! Classical laminate theory: ply stacks, ABD matrices and load response.

use std::collections::BTreeMap;

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

use crate::errors::{AnalysisError, LayupError};
use crate::material::{Elastic, Material};

/// A single layer of the laminate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ply {
    /// Fiber orientation in degrees, measured from the laminate x axis.
    pub angle: f64,
    /// Ply thickness in inches.
    pub thickness: f64,
}

/// Membrane force and moment resultants applied to the laminate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Loading {
    /// Force resultants `[Nx, Ny, Nxy]` in lb/in.
    pub forces: Vector3<f64>,
    /// Moment resultants `[Mx, My, Mxy]` in lb-in/in.
    pub moments: Vector3<f64>,
}

impl Loading {
    /// Create a loading from explicit force and moment resultants.
    #[must_use]
    pub const fn new(forces: Vector3<f64>, moments: Vector3<f64>) -> Self {
        Self { forces, moments }
    }

    /// Create a membrane-only loading with zero moment resultants.
    ///
    /// # Examples
    /// ```
    /// use laminatx::Loading;
    ///
    /// let loading = Loading::membrane(100.0, 0.0, 0.0);
    /// assert_eq!(loading.forces[0], 100.0);
    /// assert_eq!(loading.moments[1], 0.0);
    /// ```
    #[must_use]
    pub fn membrane(nx: f64, ny: f64, nxy: f64) -> Self {
        Self::new(Vector3::new(nx, ny, nxy), Vector3::zeros())
    }
}

impl Default for Loading {
    fn default() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }
}

/// Midplane strains and curvatures solved from the ABD relation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Response {
    /// Midplane strains `[ex, ey, gxy]`.
    pub midplane_strains: Vector3<f64>,
    /// Curvatures `[kx, ky, kxy]` in 1/in.
    pub curvatures: Vector3<f64>,
}

/// Strain and stress state of one ply at its mid-thickness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlyState {
    /// Strains in laminate axes `[ex, ey, gxy]`.
    pub global_strain: Vector3<f64>,
    /// Stresses in laminate axes `[sx, sy, txy]` in psi.
    pub global_stress: Vector3<f64>,
    /// Strains in material axes `[e1, e2, g12]`.
    pub local_strain: Vector3<f64>,
    /// Stresses in material axes `[s1, s2, t12]` in psi.
    pub local_stress: Vector3<f64>,
}

/// Effective engineering constants of the laminate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineeringConstants {
    /// Effective modulus along the laminate x axis in psi.
    pub ex: f64,
    /// Effective modulus along the laminate y axis in psi.
    pub ey: f64,
    /// Effective in-plane shear modulus in psi.
    pub gxy: f64,
    /// Effective major Poisson ratio.
    pub nu_xy: f64,
    /// Effective minor Poisson ratio.
    pub nu_yx: f64,
}

/// Breakdown of the stacking sequence by fiber angle.
#[derive(Clone, Debug, PartialEq)]
pub struct LayupDistribution {
    /// Ply count per fiber angle, keyed by the angle rounded to whole degrees.
    pub counts: BTreeMap<i64, usize>,
    /// Total number of plies.
    pub total_plies: usize,
    /// Share of 0 degree plies in percent.
    pub percent_zero: f64,
    /// Combined share of +45 and -45 degree plies in percent.
    pub percent_forty_five: f64,
    /// Share of 90 degree plies in percent.
    pub percent_ninety: f64,
}

/// An ordered ply stack bonded to a single material.
#[derive(Clone, Debug, PartialEq)]
pub struct Laminate {
    /// Material shared by every ply.
    material: Material,
    /// Stacking sequence from the bottom surface upward.
    plies: Vec<Ply>,
}

impl Laminate {
    /// Create a laminate with a uniform ply thickness.
    ///
    /// # Errors
    ///
    /// Returns [`LayupError`] when the stack is empty, the thickness is not
    /// strictly positive or an angle is non-finite.
    ///
    /// # Examples
    /// ```
    /// use laminatx::{Laminate, MaterialLibrary};
    ///
    /// let library = MaterialLibrary::builtin();
    /// let material = library
    ///     .get("T300/5208_graphite_epoxy")
    ///     .expect("built-in material available")
    ///     .clone();
    /// let laminate = Laminate::new(material, &[0.0, 45.0, -45.0, 90.0], 0.005)
    ///     .expect("valid layup");
    /// assert_eq!(laminate.ply_count(), 4);
    /// ```
    pub fn new(material: Material, angles: &[f64], thickness: f64) -> Result<Self, LayupError> {
        let thicknesses = vec![thickness; angles.len()];
        Self::with_thicknesses(material, angles, &thicknesses)
    }

    /// Create a laminate with an explicit thickness per ply.
    ///
    /// # Errors
    ///
    /// Returns [`LayupError`] when the stack is empty, the thickness list does
    /// not match the angle list, a thickness is not strictly positive or an
    /// angle is non-finite.
    pub fn with_thicknesses(
        material: Material,
        angles: &[f64],
        thicknesses: &[f64],
    ) -> Result<Self, LayupError> {
        if angles.is_empty() {
            return Err(LayupError::EmptyLayup);
        }
        if angles.len() != thicknesses.len() {
            return Err(LayupError::ThicknessCountMismatch {
                expected: angles.len(),
                received: thicknesses.len(),
            });
        }
        let mut plies = Vec::with_capacity(angles.len());
        for (ply, (&angle, &thickness)) in angles.iter().zip(thicknesses).enumerate() {
            if !angle.is_finite() {
                return Err(LayupError::InvalidAngle { ply, angle });
            }
            if !(thickness.is_finite() && thickness > 0.0) {
                return Err(LayupError::InvalidThickness { ply, thickness });
            }
            plies.push(Ply { angle, thickness });
        }
        Ok(Self { material, plies })
    }

    /// Create a symmetric laminate by mirroring the supplied half-stack.
    ///
    /// # Errors
    ///
    /// Returns [`LayupError`] under the same conditions as [`Laminate::new`].
    pub fn symmetric(
        material: Material,
        half_angles: &[f64],
        thickness: f64,
    ) -> Result<Self, LayupError> {
        let mut angles = half_angles.to_vec();
        angles.extend(half_angles.iter().rev());
        Self::new(material, &angles, thickness)
    }

    /// Number of plies in the stack.
    #[must_use]
    pub fn ply_count(&self) -> usize {
        self.plies.len()
    }

    /// Total laminate thickness in inches.
    #[must_use]
    pub fn total_thickness(&self) -> f64 {
        self.plies.iter().map(|ply| ply.thickness).sum()
    }

    /// The stacking sequence from the bottom surface upward.
    #[must_use]
    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    /// The material shared by every ply.
    #[must_use]
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Count plies per fiber angle and the standard 0/45/90 percentages.
    #[must_use]
    pub fn layup_distribution(&self) -> LayupDistribution {
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for ply in &self.plies {
            let key = ply.angle.round() as i64;
            *counts.entry(key).or_insert(0) += 1;
        }
        let total_plies = self.plies.len();
        let share = |count: usize| (count as f64 / total_plies as f64) * 100.0;
        let count = |angle: i64| counts.get(&angle).copied().unwrap_or(0);
        LayupDistribution {
            percent_zero: share(count(0)),
            percent_forty_five: share(count(45) + count(-45)),
            percent_ninety: share(count(90)),
            counts,
            total_plies,
        }
    }

    /// Build the stiffness model for this laminate.
    #[must_use]
    pub fn stiffness(&self) -> StiffnessModel {
        StiffnessModel::build(self)
    }
}

/// Per-ply matrices and coordinates cached by the stiffness model.
#[derive(Clone, Debug, PartialEq)]
struct PlyStiffness {
    /// Fiber orientation in degrees.
    angle: f64,
    /// Ply thickness in inches.
    thickness: f64,
    /// Stress transformation matrix for this ply.
    stress_transform: Matrix3<f64>,
    /// Strain transformation matrix for this ply.
    strain_transform: Matrix3<f64>,
    /// Transformed reduced stiffness in laminate axes.
    q_bar: Matrix3<f64>,
    /// Coordinate of the upper ply surface, measured from the midplane.
    z_upper: f64,
    /// Coordinate of the ply mid-thickness, measured from the midplane.
    z_mid: f64,
}

/// Solved laminate stiffness: transformation matrices, z coordinates and the
/// extensional (`A`), coupling (`B`) and bending (`D`) matrices.
#[derive(Clone, Debug, PartialEq)]
pub struct StiffnessModel {
    /// Cached per-ply matrices, bottom surface first.
    plies: Vec<PlyStiffness>,
    /// Total laminate thickness in inches.
    total_thickness: f64,
    /// Extensional stiffness matrix in lb/in.
    a: Matrix3<f64>,
    /// Coupling stiffness matrix in lb.
    b: Matrix3<f64>,
    /// Bending stiffness matrix in lb-in.
    d: Matrix3<f64>,
}

impl StiffnessModel {
    /// Assemble transformation matrices, z coordinates and the ABD matrices.
    fn build(laminate: &Laminate) -> Self {
        let q = reduced_stiffness(&laminate.material.elastic);
        let total_thickness = laminate.total_thickness();

        let mut plies = Vec::with_capacity(laminate.ply_count());
        let mut z_lower = -total_thickness / 2.0;
        for ply in laminate.plies() {
            let theta = ply.angle.to_radians();
            let stress = stress_transform(theta);
            let strain = strain_transform(theta);
            // The stress transformation through -theta is the inverse of the
            // transformation through theta.
            let q_bar = stress_transform(-theta) * q * strain;
            plies.push(PlyStiffness {
                angle: ply.angle,
                thickness: ply.thickness,
                stress_transform: stress,
                strain_transform: strain,
                q_bar,
                z_upper: z_lower + ply.thickness,
                z_mid: z_lower + ply.thickness / 2.0,
            });
            z_lower += ply.thickness;
        }

        let mut a = Matrix3::zeros();
        let mut b = Matrix3::zeros();
        let mut d = Matrix3::zeros();
        for ply in &plies {
            let z_lower = ply.z_upper - ply.thickness;
            a += ply.q_bar * ply.thickness;
            b += ply.q_bar * (0.5 * (ply.z_upper.powi(2) - z_lower.powi(2)));
            d += ply.q_bar * ((ply.z_upper.powi(3) - z_lower.powi(3)) / 3.0);
        }

        Self {
            plies,
            total_thickness,
            a,
            b,
            d,
        }
    }

    /// Number of plies in the underlying laminate.
    #[must_use]
    pub fn ply_count(&self) -> usize {
        self.plies.len()
    }

    /// Total laminate thickness in inches.
    #[must_use]
    pub fn total_thickness(&self) -> f64 {
        self.total_thickness
    }

    /// Extensional stiffness matrix `A` in lb/in.
    #[must_use]
    pub fn extensional(&self) -> &Matrix3<f64> {
        &self.a
    }

    /// Coupling stiffness matrix `B` in lb.
    #[must_use]
    pub fn coupling(&self) -> &Matrix3<f64> {
        &self.b
    }

    /// Bending stiffness matrix `D` in lb-in.
    #[must_use]
    pub fn bending(&self) -> &Matrix3<f64> {
        &self.d
    }

    /// Coordinate of the upper surface of ply `index`, measured from the midplane.
    #[must_use]
    pub fn ply_upper_coordinate(&self, index: usize) -> Option<f64> {
        self.plies.get(index).map(|ply| ply.z_upper)
    }

    /// Coordinate of the mid-thickness of ply `index`, measured from the midplane.
    #[must_use]
    pub fn ply_mid_coordinate(&self, index: usize) -> Option<f64> {
        self.plies.get(index).map(|ply| ply.z_mid)
    }

    /// Solve midplane strains and curvatures for the applied loading.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SingularStiffness`] when the assembled ABD
    /// matrix cannot be inverted.
    pub fn response(&self, loading: &Loading) -> Result<Response, AnalysisError> {
        let mut abd = Matrix6::<f64>::zeros();
        abd.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.a);
        abd.fixed_view_mut::<3, 3>(0, 3).copy_from(&self.b);
        abd.fixed_view_mut::<3, 3>(3, 0).copy_from(&self.b);
        abd.fixed_view_mut::<3, 3>(3, 3).copy_from(&self.d);

        let mut load = Vector6::<f64>::zeros();
        load.fixed_rows_mut::<3>(0).copy_from(&loading.forces);
        load.fixed_rows_mut::<3>(3).copy_from(&loading.moments);

        let solution = abd
            .lu()
            .solve(&load)
            .ok_or(AnalysisError::SingularStiffness)?;

        Ok(Response {
            midplane_strains: Vector3::new(solution[0], solution[1], solution[2]),
            curvatures: Vector3::new(solution[3], solution[4], solution[5]),
        })
    }

    /// Strain and stress state of ply `index` at its mid-thickness.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::PlyOutOfRange`] when `index` falls outside the
    /// stacking sequence.
    pub fn ply_state(&self, response: &Response, index: usize) -> Result<PlyState, AnalysisError> {
        let ply = self.plies.get(index).ok_or(AnalysisError::PlyOutOfRange {
            index,
            count: self.plies.len(),
        })?;

        let global_strain = response.midplane_strains + response.curvatures * ply.z_mid;
        let global_stress = ply.q_bar * global_strain;
        let local_strain = ply.strain_transform * global_strain;
        let local_stress = ply.stress_transform * global_stress;

        Ok(PlyState {
            global_strain,
            global_stress,
            local_strain,
            local_stress,
        })
    }

    /// Effective engineering constants from the extensional stiffness matrix.
    #[must_use]
    pub fn engineering_constants(&self) -> EngineeringConstants {
        let a = &self.a;
        let t = self.total_thickness;
        let coupling = 1.0 - a[(0, 1)].powi(2) / (a[(0, 0)] * a[(1, 1)]);
        EngineeringConstants {
            ex: a[(0, 0)] / t * coupling,
            ey: a[(1, 1)] / t * coupling,
            gxy: a[(2, 2)] / t,
            nu_xy: a[(0, 1)] / a[(1, 1)],
            nu_yx: a[(0, 1)] / a[(0, 0)],
        }
    }
}

/// Reduced stiffness matrix `Q` of the lamina under plane stress.
fn reduced_stiffness(elastic: &Elastic) -> Matrix3<f64> {
    let nu21 = elastic.nu21();
    let denom = 1.0 - elastic.nu12 * nu21;
    Matrix3::new(
        elastic.e11 / denom,
        nu21 * elastic.e11 / denom,
        0.0,
        elastic.nu12 * elastic.e22 / denom,
        elastic.e22 / denom,
        0.0,
        0.0,
        0.0,
        elastic.g12,
    )
}

/// Stress transformation matrix from laminate axes to material axes.
fn stress_transform(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(
        c * c,
        s * s,
        2.0 * s * c,
        s * s,
        c * c,
        -2.0 * s * c,
        -s * c,
        s * c,
        c * c - s * s,
    )
}

/// Strain transformation matrix from laminate axes to material axes.
fn strain_transform(theta: f64) -> Matrix3<f64> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(
        c * c,
        s * s,
        s * c,
        s * s,
        c * c,
        -s * c,
        -2.0 * s * c,
        2.0 * s * c,
        c * c - s * s,
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::material::MaterialLibrary;

    /// T300/5208 graphite/epoxy from the built-in library.
    fn t300() -> Material {
        MaterialLibrary::builtin()
            .get("T300/5208_graphite_epoxy")
            .expect("built-in material available")
            .clone()
    }

    #[test]
    fn empty_and_mismatched_layups_are_rejected() {
        let empty_error = Laminate::new(t300(), &[], 0.005).expect_err("empty stack rejected");
        assert_eq!(empty_error, LayupError::EmptyLayup);

        let mismatch_error = Laminate::with_thicknesses(t300(), &[0.0, 90.0], &[0.005])
            .expect_err("mismatched thickness list rejected");
        assert_eq!(
            mismatch_error,
            LayupError::ThicknessCountMismatch {
                expected: 2,
                received: 1
            }
        );
    }

    #[test]
    fn invalid_plies_are_rejected() {
        let thickness_error =
            Laminate::new(t300(), &[0.0, 90.0], 0.0).expect_err("zero thickness rejected");
        assert_eq!(
            thickness_error,
            LayupError::InvalidThickness {
                ply: 0,
                thickness: 0.0
            }
        );

        let angle_error = Laminate::new(t300(), &[0.0, f64::NAN], 0.005)
            .expect_err("non-finite angle rejected");
        assert!(matches!(
            angle_error,
            LayupError::InvalidAngle { ply: 1, .. }
        ));
    }

    #[test]
    fn symmetric_constructor_mirrors_the_half_stack() {
        let laminate =
            Laminate::symmetric(t300(), &[0.0, 45.0, -45.0, 90.0], 0.005).expect("valid layup");
        let angles: Vec<f64> = laminate.plies().iter().map(|ply| ply.angle).collect();
        assert_eq!(angles, vec![0.0, 45.0, -45.0, 90.0, 90.0, -45.0, 45.0, 0.0]);
        assert_relative_eq!(laminate.total_thickness(), 0.04);
    }

    #[test]
    fn ply_coordinates_stack_from_the_bottom_surface() {
        let laminate = Laminate::new(t300(), &[0.0, 0.0, 0.0, 0.0], 0.005).expect("valid layup");
        let model = laminate.stiffness();

        let expected_upper = [-0.005, 0.0, 0.005, 0.01];
        let expected_mid = [-0.0075, -0.0025, 0.0025, 0.0075];
        for index in 0..4 {
            let upper = model
                .ply_upper_coordinate(index)
                .expect("coordinate available");
            let mid = model
                .ply_mid_coordinate(index)
                .expect("coordinate available");
            assert_relative_eq!(upper, expected_upper[index], epsilon = 1.0e-12);
            assert_relative_eq!(mid, expected_mid[index], epsilon = 1.0e-12);
        }
    }

    #[test]
    fn unidirectional_laminate_recovers_lamina_constants() {
        let material = t300();
        let laminate =
            Laminate::new(material.clone(), &[0.0; 8], 0.005).expect("valid layup");
        let constants = laminate.stiffness().engineering_constants();

        assert_relative_eq!(constants.ex, material.elastic.e11, max_relative = 1.0e-9);
        assert_relative_eq!(constants.gxy, material.elastic.g12, max_relative = 1.0e-9);
        assert_relative_eq!(constants.nu_xy, material.elastic.nu12, max_relative = 1.0e-9);
        assert_relative_eq!(
            constants.nu_yx,
            material.elastic.nu21(),
            max_relative = 1.0e-9
        );
    }

    #[test]
    fn symmetric_laminate_has_no_coupling() {
        let laminate =
            Laminate::symmetric(t300(), &[0.0, 45.0, -45.0, 90.0], 0.005).expect("valid layup");
        let model = laminate.stiffness();
        assert!(model.coupling().norm() < 1.0e-6);
    }

    #[test]
    fn quasi_isotropic_laminate_has_equal_in_plane_moduli() {
        let laminate =
            Laminate::symmetric(t300(), &[0.0, 45.0, -45.0, 90.0], 0.005).expect("valid layup");
        let constants = laminate.stiffness().engineering_constants();
        assert_relative_eq!(constants.ex, constants.ey, max_relative = 1.0e-9);
    }

    #[test]
    fn membrane_loading_produces_uniform_ply_stress() {
        let laminate = Laminate::new(t300(), &[0.0; 8], 0.005).expect("valid layup");
        let model = laminate.stiffness();
        let loading = Loading::membrane(100.0, 0.0, 0.0);
        let response = model.response(&loading).expect("response solves");

        // A uniform unidirectional stack carries membrane load as uniform
        // stress, sigma_x = Nx / t.
        let expected_stress = 100.0 / laminate.total_thickness();
        for index in 0..model.ply_count() {
            let state = model.ply_state(&response, index).expect("ply in range");
            assert_relative_eq!(state.global_stress[0], expected_stress, max_relative = 1.0e-9);
            assert_relative_eq!(state.global_stress[1], 0.0, epsilon = 1.0e-6);
            assert_relative_eq!(state.global_stress[2], 0.0, epsilon = 1.0e-6);
            // At zero degrees the material axes coincide with the laminate axes.
            assert_relative_eq!(
                state.local_stress[0],
                expected_stress,
                max_relative = 1.0e-9
            );
        }
    }

    #[test]
    fn ply_state_rejects_out_of_range_indices() {
        let laminate = Laminate::new(t300(), &[0.0, 90.0], 0.005).expect("valid layup");
        let model = laminate.stiffness();
        let response = model
            .response(&Loading::membrane(10.0, 0.0, 0.0))
            .expect("response solves");

        let error = model
            .ply_state(&response, 2)
            .expect_err("out of range rejected");
        assert_eq!(error, AnalysisError::PlyOutOfRange { index: 2, count: 2 });
    }

    #[test]
    fn singular_stiffness_matrix_is_a_typed_error() {
        // Constructed directly; Elastic::new rejects a non-positive shear
        // modulus. Zero G12 zeroes the shear rows of A and D.
        let elastic = Elastic {
            e11: 26.25e6,
            e22: 1.49e6,
            g12: 0.0,
            nu12: 0.28,
        };
        let material = Material::new("degenerate", elastic, t300().strength);
        let laminate = Laminate::new(material, &[0.0, 0.0], 0.005).expect("valid layup");

        let error = laminate
            .stiffness()
            .response(&Loading::membrane(10.0, 0.0, 0.0))
            .expect_err("singular stiffness reported");
        assert_eq!(error, AnalysisError::SingularStiffness);
    }

    #[test]
    fn layup_distribution_reports_standard_percentages() {
        let laminate = Laminate::new(
            t300(),
            &[0.0, 0.0, 0.0, 0.0, 45.0, -45.0, 90.0, 90.0],
            0.005,
        )
        .expect("valid layup");
        let distribution = laminate.layup_distribution();

        assert_eq!(distribution.total_plies, 8);
        assert_eq!(distribution.counts.get(&0), Some(&4));
        assert_eq!(distribution.counts.get(&45), Some(&1));
        assert_relative_eq!(distribution.percent_zero, 50.0);
        assert_relative_eq!(distribution.percent_forty_five, 25.0);
        assert_relative_eq!(distribution.percent_ninety, 25.0);
    }

    #[test]
    fn transformation_matrices_reduce_to_identity_at_zero_degrees() {
        assert_relative_eq!(stress_transform(0.0), Matrix3::identity());
        assert_relative_eq!(strain_transform(0.0), Matrix3::identity());
    }
}
