#![warn(clippy::all)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod component;
pub mod errors;
pub mod failure;
pub mod laminate;
pub mod material;
pub mod project;
pub mod report;

pub use analysis::{analyze, analyze_project, ComponentSummary, PlyRecord};
pub use component::{Component, FlightConditions, Geometry, NoseConeShape};
pub use errors::{
    AnalysisError, DatabaseError, GeometryError, LayupError, MaterialError, ProjectError,
};
pub use failure::Criterion;
pub use laminate::{
    EngineeringConstants, Laminate, LayupDistribution, Loading, Ply, PlyState, Response,
    StiffnessModel,
};
pub use material::{Elastic, Material, MaterialLibrary, Strength};
pub use project::{data_dir, default_database_path, Project, PROJECT_EXTENSION};
pub use report::render_summary;
