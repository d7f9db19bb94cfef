//! YAML project files and platform data paths.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::{Component, FlightConditions};
use crate::errors::{DatabaseError, ProjectError};
use crate::failure::Criterion;

/// File extension used by project files.
///
/// Projects are plain-text YAML and can be edited in any text editor.
pub const PROJECT_EXTENSION: &str = "lamx";

/// Directory name used for persisted application state.
const APP_DIR: &str = "laminatx";

/// A saved analysis project: flight state plus the components to analyze.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project name used in reports.
    pub name: String,
    /// Failure criterion applied to every component.
    #[serde(default)]
    pub criterion: Criterion,
    /// Flight state shared by every component.
    pub conditions: FlightConditions,
    /// Components to analyze.
    pub components: Vec<Component>,
}

impl Project {
    /// Create a project with the supplied name and no components.
    #[must_use]
    pub fn new(name: impl Into<String>, conditions: FlightConditions) -> Self {
        Self {
            name: name.into(),
            criterion: Criterion::default(),
            conditions,
            components: Vec::new(),
        }
    }

    /// Load a project from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError`] when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let project = serde_yaml::from_str(&contents)?;
        debug!(path = %path.display(), "loaded project");
        Ok(project)
    }

    /// Save the project to a YAML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError`] when the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_yaml::to_string(self)?;
        fs::write(path, contents)?;
        debug!(path = %path.display(), "saved project");
        Ok(())
    }
}

/// Platform application-data directory for persisted state.
///
/// Resolves to the roaming profile on Windows, Application Support on macOS
/// and the XDG data home on Linux.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

/// Default location of the material database within the application data
/// directory.
///
/// # Errors
///
/// Returns [`DatabaseError::NoDataDir`] when the platform provides no data
/// directory.
pub fn default_database_path() -> Result<PathBuf, DatabaseError> {
    data_dir()
        .map(|dir| dir.join("materials.json"))
        .ok_or(DatabaseError::NoDataDir)
}
