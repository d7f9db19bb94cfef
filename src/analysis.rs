//! Component analysis: loads, laminate response and per-ply margins.

use nalgebra::Vector3;
use tracing::info;

use crate::component::{Component, FlightConditions};
use crate::errors::AnalysisError;
use crate::failure::Criterion;
use crate::laminate::{EngineeringConstants, Laminate, LayupDistribution, Loading, Response};
use crate::material::MaterialLibrary;
use crate::project::Project;

/// Solved state and margin of one ply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlyRecord {
    /// Zero-based ply index, bottom surface first.
    pub ply: usize,
    /// Fiber orientation in degrees.
    pub angle: f64,
    /// Strains in laminate axes `[ex, ey, gxy]`.
    pub global_strain: Vector3<f64>,
    /// Stresses in laminate axes `[sx, sy, txy]` in psi.
    pub global_stress: Vector3<f64>,
    /// Strains in material axes `[e1, e2, g12]`.
    pub local_strain: Vector3<f64>,
    /// Stresses in material axes `[s1, s2, t12]` in psi.
    pub local_stress: Vector3<f64>,
    /// Failure index under the selected criterion; 1 or more predicts failure.
    pub failure_index: f64,
    /// Factor of safety under the selected criterion.
    pub factor_of_safety: f64,
}

/// Summary of the analysis of one component.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentSummary {
    /// Component name.
    pub name: String,
    /// Failure criterion used for the margins.
    pub criterion: Criterion,
    /// Estimated force and moment resultants.
    pub loading: Loading,
    /// Solved midplane strains and curvatures.
    pub response: Response,
    /// Effective engineering constants of the laminate.
    pub constants: EngineeringConstants,
    /// Breakdown of the stacking sequence by fiber angle.
    pub distribution: LayupDistribution,
    /// Per-ply state and margins, bottom surface first.
    pub plies: Vec<PlyRecord>,
}

impl ComponentSummary {
    /// The ply with the lowest factor of safety, when any ply is stressed.
    #[must_use]
    pub fn critical_ply(&self) -> Option<&PlyRecord> {
        self.plies
            .iter()
            .filter(|record| record.factor_of_safety.is_finite())
            .min_by(|a, b| {
                a.factor_of_safety
                    .partial_cmp(&b.factor_of_safety)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// The lowest factor of safety across all plies.
    #[must_use]
    pub fn min_factor_of_safety(&self) -> Option<f64> {
        self.critical_ply().map(|record| record.factor_of_safety)
    }
}

/// Analyze one component under the supplied flight state.
///
/// Estimates the load resultants from the geometry, solves the laminate
/// response and computes per-ply stresses, strains and margins under the
/// selected failure criterion.
///
/// # Errors
///
/// Returns [`AnalysisError`] when the component references an unknown
/// material, its geometry or layup is invalid, or the ABD matrix is singular.
pub fn analyze(
    component: &Component,
    library: &MaterialLibrary,
    conditions: &FlightConditions,
    criterion: Criterion,
) -> Result<ComponentSummary, AnalysisError> {
    let material = library
        .get(&component.material)
        .ok_or_else(|| AnalysisError::UnknownMaterial(component.material.clone()))?;

    let loading = component.loading(conditions)?;
    let laminate = Laminate::new(
        material.clone(),
        &component.layup,
        component.ply_thickness,
    )?;
    let model = laminate.stiffness();
    let response = model.response(&loading)?;
    let constants = model.engineering_constants();
    let distribution = laminate.layup_distribution();

    let mut plies = Vec::with_capacity(model.ply_count());
    for (index, ply) in laminate.plies().iter().enumerate() {
        let state = model.ply_state(&response, index)?;
        plies.push(PlyRecord {
            ply: index,
            angle: ply.angle,
            global_strain: state.global_strain,
            global_stress: state.global_stress,
            local_strain: state.local_strain,
            local_stress: state.local_stress,
            failure_index: criterion.index(&state.local_stress, &material.strength),
            factor_of_safety: criterion.strength_ratio(&state.local_stress, &material.strength),
        });
    }

    let summary = ComponentSummary {
        name: component.name.clone(),
        criterion,
        loading,
        response,
        constants,
        distribution,
        plies,
    };
    info!(
        component = %summary.name,
        criterion = criterion.label(),
        min_fos = summary.min_factor_of_safety(),
        "component analyzed"
    );
    Ok(summary)
}

/// Analyze every component of a project under its flight state and criterion.
///
/// # Errors
///
/// Returns the first [`AnalysisError`] produced by a component.
pub fn analyze_project(
    project: &Project,
    library: &MaterialLibrary,
) -> Result<Vec<ComponentSummary>, AnalysisError> {
    project
        .components
        .iter()
        .map(|component| analyze(component, library, &project.conditions, project.criterion))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::component::Geometry;

    /// Airframe with a unidirectional hoop-direction layup under pressure only.
    fn pressurized_airframe() -> (Component, FlightConditions) {
        let mut component = Component::standard_airframe();
        component.layup = vec![0.0; 8];
        let conditions = FlightConditions {
            internal_pressure: 100.0,
            ..FlightConditions::default()
        };
        (component, conditions)
    }

    #[test]
    fn unknown_material_is_reported() {
        let mut component = Component::standard_airframe();
        component.material = "unobtainium".to_string();

        let error = analyze(
            &component,
            &MaterialLibrary::builtin(),
            &FlightConditions::default(),
            Criterion::TsaiWu,
        )
        .expect_err("unknown material rejected");
        assert_eq!(
            error,
            AnalysisError::UnknownMaterial("unobtainium".to_string())
        );
    }

    #[test]
    fn invalid_geometry_is_reported() {
        let mut component = Component::standard_airframe();
        component.geometry = Geometry::Airframe {
            length: 48.0,
            diameter: -1.0,
        };

        let error = analyze(
            &component,
            &MaterialLibrary::builtin(),
            &FlightConditions::default(),
            Criterion::TsaiWu,
        )
        .expect_err("invalid geometry rejected");
        assert!(matches!(error, AnalysisError::Geometry(_)));
    }

    #[test]
    fn pressurized_airframe_carries_uniform_hoop_stress() {
        let (component, conditions) = pressurized_airframe();
        let library = MaterialLibrary::builtin();
        let summary = analyze(&component, &library, &conditions, Criterion::TsaiWu)
            .expect("analysis succeeds");

        // Hoop force p * r spread over the laminate thickness.
        let expected_hoop_stress = 100.0 * 3.0 / 0.04;
        for record in &summary.plies {
            assert_relative_eq!(
                record.global_stress[1],
                expected_hoop_stress,
                max_relative = 1.0e-9
            );
        }
    }

    #[test]
    fn critical_ply_has_the_lowest_factor_of_safety() {
        let component = Component::standard_airframe();
        let conditions = FlightConditions {
            internal_pressure: 100.0,
            axial_load: 500.0,
            ..FlightConditions::default()
        };
        let library = MaterialLibrary::builtin();
        let summary = analyze(&component, &library, &conditions, Criterion::TsaiWu)
            .expect("analysis succeeds");

        let critical = summary.critical_ply().expect("stressed plies present");
        let min_fos = summary.min_factor_of_safety().expect("margin available");
        assert_relative_eq!(critical.factor_of_safety, min_fos);
        for record in &summary.plies {
            assert!(record.factor_of_safety >= min_fos);
        }
    }

    #[test]
    fn project_analysis_covers_every_component() {
        let mut project = crate::project::Project::new(
            "Vehicle",
            FlightConditions {
                velocity: 800.0,
                density: 0.002377,
                angle_of_attack: 4.0,
                internal_pressure: 15.0,
                ..FlightConditions::default()
            },
        );
        project.components.push(Component::standard_nosecone());
        project.components.push(Component::standard_airframe());
        project.components.push(Component::standard_fin());

        let summaries = analyze_project(&project, &MaterialLibrary::builtin())
            .expect("project analysis succeeds");
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].name, "Standard Nosecone");
        assert_eq!(summaries[0].plies.len(), 8);
    }
}
