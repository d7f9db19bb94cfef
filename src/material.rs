//! Composite material model and the material library.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{DatabaseError, MaterialError};

/// Elastic constants of a unidirectional lamina under plane stress.
///
/// Deserialization validates through [`Elastic::new`], so hand-edited
/// database files cannot smuggle in degenerate constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawElastic")]
pub struct Elastic {
    /// Modulus along the fibers in psi.
    pub e11: f64,
    /// Modulus across the fibers in psi.
    pub e22: f64,
    /// In-plane shear modulus in psi.
    pub g12: f64,
    /// Major Poisson ratio.
    pub nu12: f64,
}

impl Elastic {
    /// Create a validated set of elastic constants.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError`] when a modulus is not strictly positive or the
    /// Poisson ratio falls outside (0, 1).
    ///
    /// # Examples
    /// ```
    /// use laminatx::Elastic;
    ///
    /// let error = Elastic::new(0.0, 1.49e6, 1.04e6, 0.28).expect_err("zero modulus rejected");
    /// assert_eq!(error.to_string(), "e11 must be positive and finite (received 0)");
    /// ```
    pub fn new(e11: f64, e22: f64, g12: f64, nu12: f64) -> Result<Self, MaterialError> {
        for (name, value) in [("e11", e11), ("e22", e22), ("g12", g12)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MaterialError::InvalidModulus { name, value });
            }
        }
        if !(nu12.is_finite() && nu12 > 0.0 && nu12 < 1.0) {
            return Err(MaterialError::InvalidPoissonRatio(nu12));
        }
        Ok(Self { e11, e22, g12, nu12 })
    }

    /// Minor Poisson ratio from the reciprocity relation `nu21 = nu12 * E22 / E11`.
    #[must_use]
    pub fn nu21(&self) -> f64 {
        self.nu12 * self.e22 / self.e11
    }
}

/// Unvalidated mirror of [`Elastic`] used during deserialization.
#[derive(Deserialize)]
struct RawElastic {
    e11: f64,
    e22: f64,
    g12: f64,
    nu12: f64,
}

impl TryFrom<RawElastic> for Elastic {
    type Error = MaterialError;

    fn try_from(raw: RawElastic) -> Result<Self, Self::Error> {
        Self::new(raw.e11, raw.e22, raw.g12, raw.nu12)
    }
}

/// Stress allowables of a unidirectional lamina, all positive and in psi.
///
/// Deserialization validates through [`Strength::new`], like [`Elastic`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStrength")]
pub struct Strength {
    /// Longitudinal tensile strength.
    pub xt: f64,
    /// Longitudinal compressive strength.
    pub xc: f64,
    /// Transverse tensile strength.
    pub yt: f64,
    /// Transverse compressive strength.
    pub yc: f64,
    /// In-plane shear strength.
    pub s: f64,
}

impl Strength {
    /// Create a validated set of strength allowables.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::InvalidStrength`] when any allowable is not
    /// strictly positive and finite.
    pub fn new(xt: f64, xc: f64, yt: f64, yc: f64, s: f64) -> Result<Self, MaterialError> {
        for (name, value) in [("xt", xt), ("xc", xc), ("yt", yt), ("yc", yc), ("s", s)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MaterialError::InvalidStrength { name, value });
            }
        }
        Ok(Self { xt, xc, yt, yc, s })
    }

    /// Ultimate strains implied by the allowables and elastic constants.
    ///
    /// The order is longitudinal tension, longitudinal compression (negative),
    /// transverse tension, transverse compression (negative) and shear.
    #[must_use]
    pub fn ultimate_strains(&self, elastic: &Elastic) -> [f64; 5] {
        [
            self.xt / elastic.e11,
            -self.xc / elastic.e11,
            self.yt / elastic.e22,
            -self.yc / elastic.e22,
            self.s / elastic.g12,
        ]
    }
}

/// Unvalidated mirror of [`Strength`] used during deserialization.
#[derive(Deserialize)]
struct RawStrength {
    xt: f64,
    xc: f64,
    yt: f64,
    yc: f64,
    s: f64,
}

impl TryFrom<RawStrength> for Strength {
    type Error = MaterialError;

    fn try_from(raw: RawStrength) -> Result<Self, Self::Error> {
        Self::new(raw.xt, raw.xc, raw.yt, raw.yc, raw.s)
    }
}

/// A named composite material with elastic constants and strength allowables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name, also used as the library key.
    pub name: String,
    /// Elastic constants of the lamina.
    pub elastic: Elastic,
    /// Stress allowables of the lamina.
    pub strength: Strength,
}

impl Material {
    /// Create a material from validated property sets.
    #[must_use]
    pub fn new(name: impl Into<String>, elastic: Elastic, strength: Strength) -> Self {
        Self {
            name: name.into(),
            elastic,
            strength,
        }
    }
}

/// Library of composite materials keyed by name.
///
/// Persists as a plain JSON document so users can edit it in any text editor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLibrary {
    /// Materials keyed by name.
    materials: BTreeMap<String, Material>,
}

/// Raw property rows for a built-in material, in psi.
type BuiltinRow = (&'static str, [f64; 4], [f64; 5]);

/// Built-in material constants: name, (E11, E22, G12, nu12), (Xt, Xc, Yt, Yc, S).
const BUILTIN_MATERIALS: [BuiltinRow; 5] = [
    (
        "T300/5208_graphite_epoxy",
        [26.25e6, 1.49e6, 1.04e6, 0.28],
        [217.5e3, 217.5e3, 5.8e3, 35.7e3, 9.86e3],
    ),
    (
        "B(4)/5505_boron_epoxy",
        [29.59e6, 2.68e6, 0.81e6, 0.23],
        [182.7e3, 362.5e3, 8.85e3, 29.3e3, 9.72e3],
    ),
    (
        "AS/3501_graphite_epoxy",
        [20.01e6, 1.3e6, 1.03e6, 0.30],
        [209.9e3, 209.9e3, 7.5e3, 29.9e3, 13.5e3],
    ),
    (
        "Scotchply_1002_glass_epoxy",
        [5.6e6, 1.2e6, 0.6e6, 0.26],
        [154.0e3, 88.5e3, 4.5e3, 17.1e3, 10.4e3],
    ),
    (
        "Kevlar49_aramid_epoxy",
        [11.02e6, 0.8e6, 0.33e6, 0.34],
        [203.0e3, 34.1e3, 1.74e3, 7.69e3, 4.93e3],
    ),
];

impl MaterialLibrary {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library pre-populated with the five built-in materials.
    ///
    /// # Examples
    /// ```
    /// use laminatx::MaterialLibrary;
    ///
    /// let library = MaterialLibrary::builtin();
    /// assert_eq!(library.len(), 5);
    /// assert!(library.get("T300/5208_graphite_epoxy").is_some());
    /// ```
    #[must_use]
    pub fn builtin() -> Self {
        let mut library = Self::new();
        for (name, [e11, e22, g12, nu12], [xt, xc, yt, yc, s]) in BUILTIN_MATERIALS {
            // Constants are fixed at compile time and always pass validation.
            let elastic = Elastic { e11, e22, g12, nu12 };
            let strength = Strength { xt, xc, yt, yc, s };
            library.insert(Material::new(name, elastic, strength));
        }
        library
    }

    /// Return the number of materials in the library.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Return `true` when the library holds no materials.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Look up a material by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Insert a material, replacing any existing entry with the same name.
    pub fn insert(&mut self, material: Material) -> Option<Material> {
        self.materials.insert(material.name.clone(), material)
    }

    /// Remove a material by name, returning it when present.
    pub fn remove(&mut self, name: &str) -> Option<Material> {
        self.materials.remove(name)
    }

    /// Names of all materials in deterministic order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.materials.keys().map(String::as_str).collect()
    }

    /// Iterate over the materials in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// Load a library from a JSON database file.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError`] when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let library = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), "loaded material database");
        Ok(library)
    }

    /// Save the library to a JSON database file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError`] when the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DatabaseError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        debug!(path = %path.display(), "saved material database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn builtin_library_contains_expected_materials() {
        let library = MaterialLibrary::builtin();
        assert_eq!(
            library.names(),
            vec![
                "AS/3501_graphite_epoxy",
                "B(4)/5505_boron_epoxy",
                "Kevlar49_aramid_epoxy",
                "Scotchply_1002_glass_epoxy",
                "T300/5208_graphite_epoxy",
            ]
        );

        let t300 = library
            .get("T300/5208_graphite_epoxy")
            .expect("built-in material available");
        assert_relative_eq!(t300.elastic.e11, 26.25e6);
        assert_relative_eq!(t300.strength.s, 9.86e3);
    }

    #[test]
    fn minor_poisson_ratio_follows_reciprocity() {
        let elastic = Elastic::new(26.25e6, 1.49e6, 1.04e6, 0.28).expect("valid constants");
        assert_relative_eq!(elastic.nu21(), 0.28 * 1.49e6 / 26.25e6);
    }

    #[test]
    fn invalid_properties_are_rejected() {
        let modulus_error =
            Elastic::new(26.25e6, -1.0, 1.04e6, 0.28).expect_err("negative modulus rejected");
        assert_eq!(
            modulus_error,
            MaterialError::InvalidModulus {
                name: "e22",
                value: -1.0
            }
        );

        let poisson_error =
            Elastic::new(26.25e6, 1.49e6, 1.04e6, 1.2).expect_err("out of range ratio rejected");
        assert_eq!(poisson_error, MaterialError::InvalidPoissonRatio(1.2));

        let strength_error =
            Strength::new(217.5e3, 217.5e3, 0.0, 35.7e3, 9.86e3).expect_err("zero yt rejected");
        assert_eq!(
            strength_error,
            MaterialError::InvalidStrength {
                name: "yt",
                value: 0.0
            }
        );
    }

    #[test]
    fn ultimate_strains_match_database_values() {
        let library = MaterialLibrary::builtin();
        let t300 = library
            .get("T300/5208_graphite_epoxy")
            .expect("built-in material available");
        let strains = t300.strength.ultimate_strains(&t300.elastic);

        // Reference ultimate strains for T300/5208 from the source database.
        let expected = [0.00829, -0.00829, 0.00389, -0.02396, 0.00948];
        for (computed, reference) in strains.iter().copied().zip(expected) {
            assert_relative_eq!(computed, reference, max_relative = 1.0e-2);
        }
    }

    #[test]
    fn insert_and_remove_round_trip() {
        let mut library = MaterialLibrary::new();
        assert!(library.is_empty());

        let elastic = Elastic::new(10.0e6, 1.0e6, 0.5e6, 0.3).expect("valid constants");
        let strength =
            Strength::new(100.0e3, 100.0e3, 5.0e3, 20.0e3, 8.0e3).expect("valid allowables");
        library.insert(Material::new("test_material", elastic, strength));

        assert_eq!(library.len(), 1);
        let removed = library.remove("test_material").expect("material present");
        assert_eq!(removed.name, "test_material");
        assert!(library.get("test_material").is_none());
    }

    #[test]
    fn database_file_round_trip() {
        let dir = tempfile::tempdir().expect("temporary directory available");
        let path = dir.path().join("nested").join("materials.json");

        let library = MaterialLibrary::builtin();
        library.save(&path).expect("database saves");
        let restored = MaterialLibrary::load(&path).expect("database loads");
        assert_eq!(restored, library);
    }

    #[test]
    fn malformed_database_is_rejected() {
        let dir = tempfile::tempdir().expect("temporary directory available");
        let path = dir.path().join("materials.json");
        std::fs::write(&path, "{not json").expect("fixture written");

        let error = MaterialLibrary::load(&path).expect_err("malformed file rejected");
        assert!(matches!(error, DatabaseError::Json(_)));
    }

    #[test]
    fn edited_database_with_degenerate_constants_is_rejected() {
        let dir = tempfile::tempdir().expect("temporary directory available");
        let path = dir.path().join("materials.json");

        // A hand-edited database flipping the sign of a modulus must not reach
        // the analysis with the same constants Elastic::new rejects.
        let contents = serde_json::to_string_pretty(&MaterialLibrary::builtin())
            .expect("library serializes")
            .replace("26250000.0", "-1000000.0");
        std::fs::write(&path, contents).expect("fixture written");

        let error = MaterialLibrary::load(&path).expect_err("degenerate modulus rejected");
        assert!(matches!(error, DatabaseError::Json(_)));
        assert!(error.to_string().contains("e11 must be positive"));
    }

    #[test]
    fn degenerate_strength_values_fail_deserialization() {
        let error = serde_json::from_str::<Strength>(
            r#"{"xt": 217.5e3, "xc": 217.5e3, "yt": -5.8e3, "yc": 35.7e3, "s": 9.86e3}"#,
        )
        .expect_err("negative allowable rejected");
        assert!(error.to_string().contains("yt must be positive"));
    }
}
