use anyhow::{anyhow, Error as AnyError};
use clap::{Parser, Subcommand};
use linefeat::Crs;
use std::{path::PathBuf, str::FromStr};

/// A tool for extracting lines and inspecting longitudinal profiles.
#[derive(Parser, Debug)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the first line of a map or GeoJSON document as WKT.
    Extract {
        /// Map or GeoJSON document.
        file: PathBuf,

        /// Output CRS.
        #[arg(long, default_value = "EPSG:3857")]
        to: Crs,
    },

    /// Print the profile request a document's first line produces.
    Request {
        /// Map or GeoJSON document.
        file: PathBuf,

        /// Extension configuration JSON.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Referential layer name, overriding the configured default.
        #[arg(short, long)]
        referential: Option<String>,

        /// Resampling step in meters, overriding the configured
        /// default.
        #[arg(short, long)]
        distance: Option<Distance>,

        /// Print the named process inputs instead of JSON.
        #[arg(long)]
        inputs: bool,
    },

    /// Render a saved profile process response.
    Show {
        /// Response JSON.
        response: PathBuf,

        #[command(subcommand)]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Format {
    /// Print points as CSV.
    Csv,

    /// Print points as JSON.
    Json,

    /// Print profile statistics.
    Infos,

    /// Plot altitude over distance.
    Plot,
}

/// A positive distance in meters.
#[derive(Clone, Copy, Debug)]
pub struct Distance(pub f64);

impl FromStr for Distance {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let meters = f64::from_str(s)?;
        if !(meters.is_finite() && meters > 0.0) {
            return Err(anyhow!("distance must be a positive number of meters"));
        }
        Ok(Self(meters))
    }
}
