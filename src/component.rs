//! Aerospace structural components and their simplified load estimates.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::errors::GeometryError;
use crate::laminate::Loading;

/// Nose cone profile shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoseConeShape {
    /// Tangent ogive profile.
    Ogive,
    /// Straight conical profile.
    Conical,
    /// Elliptical profile.
    Elliptical,
}

/// Geometry of a structural component, dimensions in inches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    /// Nose cone at the front of the vehicle.
    NoseCone {
        /// Profile shape.
        shape: NoseConeShape,
        /// Length from tip to base in inches.
        length: f64,
        /// Diameter at the base in inches.
        base_diameter: f64,
    },
    /// Cylindrical airframe body tube.
    Airframe {
        /// Tube length in inches.
        length: f64,
        /// Outer diameter in inches.
        diameter: f64,
    },
    /// Trapezoidal fin.
    Fin {
        /// Chord at the root in inches.
        root_chord: f64,
        /// Chord at the tip in inches.
        tip_chord: f64,
        /// Semi-span in inches.
        span: f64,
        /// Leading edge sweep in degrees.
        sweep: f64,
    },
}

/// Flight state used to estimate component loads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightConditions {
    /// Airspeed in ft/s.
    pub velocity: f64,
    /// Air density in slug/ft^3.
    pub density: f64,
    /// Angle of attack in degrees.
    pub angle_of_attack: f64,
    /// Axial compression carried by the airframe in lb.
    #[serde(default)]
    pub axial_load: f64,
    /// Bending moment carried by the airframe in lb-in.
    #[serde(default)]
    pub bending_moment: f64,
    /// Internal pressure in the airframe in psi.
    #[serde(default)]
    pub internal_pressure: f64,
}

impl FlightConditions {
    /// Dynamic pressure in psi.
    ///
    /// Computed as `0.5 * rho * v^2` in lb/ft^2, then converted to lb/in^2.
    #[must_use]
    pub fn dynamic_pressure(&self) -> f64 {
        0.5 * self.density * self.velocity * self.velocity / 144.0
    }
}

/// A structural component: geometry plus layup and material selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component name used in reports.
    pub name: String,
    /// Component geometry.
    pub geometry: Geometry,
    /// Fiber orientation angles in degrees, bottom surface first.
    pub layup: Vec<f64>,
    /// Uniform ply thickness in inches.
    pub ply_thickness: f64,
    /// Name of the material in the material library.
    pub material: String,
}

/// Standard stacking sequence shared by the component presets.
const PRESET_LAYUP: [f64; 8] = [0.0, 45.0, -45.0, 90.0, 90.0, -45.0, 45.0, 0.0];

/// Material used by the component presets.
const PRESET_MATERIAL: &str = "T300/5208_graphite_epoxy";

impl Component {
    /// Standard ogive nose cone preset.
    #[must_use]
    pub fn standard_nosecone() -> Self {
        Self {
            name: "Standard Nosecone".to_string(),
            geometry: Geometry::NoseCone {
                shape: NoseConeShape::Ogive,
                length: 24.0,
                base_diameter: 6.0,
            },
            layup: PRESET_LAYUP.to_vec(),
            ply_thickness: 0.005,
            material: PRESET_MATERIAL.to_string(),
        }
    }

    /// Standard cylindrical airframe preset.
    #[must_use]
    pub fn standard_airframe() -> Self {
        Self {
            name: "Standard Airframe".to_string(),
            geometry: Geometry::Airframe {
                length: 48.0,
                diameter: 6.0,
            },
            layup: PRESET_LAYUP.to_vec(),
            ply_thickness: 0.005,
            material: PRESET_MATERIAL.to_string(),
        }
    }

    /// Standard trapezoidal fin preset.
    #[must_use]
    pub fn standard_fin() -> Self {
        Self {
            name: "Standard Fin".to_string(),
            geometry: Geometry::Fin {
                root_chord: 12.0,
                tip_chord: 6.0,
                span: 6.0,
                sweep: 30.0,
            },
            layup: PRESET_LAYUP.to_vec(),
            ply_thickness: 0.005,
            material: PRESET_MATERIAL.to_string(),
        }
    }

    /// Estimate membrane force and moment resultants for the flight state.
    ///
    /// These are the simplified preliminary-design estimates: dynamic pressure
    /// acting on the nose cone and fin, and membrane shell forces from axial
    /// load, bending and internal pressure on the airframe.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when a geometric dimension is not strictly
    /// positive.
    pub fn loading(&self, conditions: &FlightConditions) -> Result<Loading, GeometryError> {
        match self.geometry {
            Geometry::NoseCone {
                length,
                base_diameter,
                ..
            } => {
                check_dimension("nose cone length", length)?;
                check_dimension("nose cone base diameter", base_diameter)?;

                let q = conditions.dynamic_pressure();
                let aoa = conditions.angle_of_attack.to_radians();
                let normal = q * aoa.sin();
                let axial = q * aoa.cos();

                Ok(Loading::new(
                    Vector3::new(axial, normal, 0.0),
                    // Simplified bending estimate about the base.
                    Vector3::new(0.0, normal * base_diameter / 4.0, 0.0),
                ))
            }
            Geometry::Airframe { length, diameter } => {
                check_dimension("airframe length", length)?;
                check_dimension("airframe diameter", diameter)?;

                let radius = diameter / 2.0;
                // Hoop force from internal pressure, p * r.
                let hoop = conditions.internal_pressure * radius;
                // Axial force spread over the circumference.
                let axial = conditions.axial_load / (std::f64::consts::PI * diameter);
                // Extreme-fiber axial force from the bending moment.
                let bending = conditions.bending_moment * radius
                    / (std::f64::consts::PI * radius.powi(3));

                Ok(Loading::new(
                    Vector3::new(axial + bending, hoop, 0.0),
                    Vector3::zeros(),
                ))
            }
            Geometry::Fin {
                root_chord, span, ..
            } => {
                check_dimension("fin root chord", root_chord)?;
                check_dimension("fin span", span)?;

                let q = conditions.dynamic_pressure();
                let aoa = conditions.angle_of_attack.to_radians();
                // Flat plate normal pressure at the angle of attack.
                let normal_pressure = q * aoa.sin() * aoa.cos();

                Ok(Loading::new(
                    Vector3::new(0.0, 0.0, normal_pressure / 2.0),
                    Vector3::new(0.0, normal_pressure * span / 2.0, 0.0),
                ))
            }
        }
    }
}

/// Reject non-positive or non-finite dimensions.
fn check_dimension(dimension: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::NonPositiveDimension { dimension, value })
    }
}
