//! Command line interface for analyzing laminate projects.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use laminatx::{
    analyze_project, default_database_path, render_summary, Component, MaterialLibrary, Project,
};

/// Classical laminate theory analysis for composite aerospace structures.
#[derive(Parser)]
#[command(name = "laminatx", version, about)]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Command {
    /// Analyze every component of a project file and print reports.
    Analyze {
        /// Path to the project file (.lamx).
        project: PathBuf,
        /// Material database file; defaults to the application data directory.
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// List the materials available to analyses.
    Materials {
        /// Material database file; defaults to the application data directory.
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Print a starter component preset as YAML.
    Preset {
        /// Kind of component to print.
        kind: PresetKind,
    },
}

/// Component presets available from the command line.
#[derive(Clone, Copy, ValueEnum)]
enum PresetKind {
    /// Standard ogive nose cone.
    Nosecone,
    /// Standard cylindrical airframe.
    Airframe,
    /// Standard trapezoidal fin.
    Fin,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze { project, database } => {
            let library = open_library(database)?;
            let project = Project::load(&project)?;
            for summary in analyze_project(&project, &library)? {
                println!("{}", render_summary(&summary));
            }
        }
        Command::Materials { database } => {
            let library = open_library(database)?;
            for material in library.iter() {
                println!(
                    "{}: E11 = {:.3e} psi, E22 = {:.3e} psi, G12 = {:.3e} psi, v12 = {:.2}",
                    material.name,
                    material.elastic.e11,
                    material.elastic.e22,
                    material.elastic.g12,
                    material.elastic.nu12
                );
                let strains = material.strength.ultimate_strains(&material.elastic);
                println!(
                    "  ultimate strains: e1t = {:+.4}, e1c = {:+.4}, e2t = {:+.4}, e2c = {:+.4}, g12 = {:+.4}",
                    strains[0], strains[1], strains[2], strains[3], strains[4]
                );
            }
        }
        Command::Preset { kind } => {
            let component = match kind {
                PresetKind::Nosecone => Component::standard_nosecone(),
                PresetKind::Airframe => Component::standard_airframe(),
                PresetKind::Fin => Component::standard_fin(),
            };
            print!("{}", serde_yaml::to_string(&component)?);
        }
    }

    Ok(())
}

/// Open the material database from an explicit path, the application data
/// directory, or fall back to the built-in materials.
fn open_library(database: Option<PathBuf>) -> Result<MaterialLibrary, Box<dyn Error>> {
    if let Some(path) = database {
        return Ok(MaterialLibrary::load(path)?);
    }
    if let Ok(default) = default_database_path() {
        if default.is_file() {
            return Ok(MaterialLibrary::load(default)?);
        }
    }
    Ok(MaterialLibrary::builtin())
}
