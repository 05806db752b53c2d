mod options;

use anyhow::{anyhow, Error as AnyError};
use clap::Parser;
use linefeat::{read_document, DroppedFile, LineGeometry};
use log::debug;
use longitudinal::{
    ExtensionConfig, InputData, ProfilePayload, ProfilePoint, ProfileRequest, ProfileResult,
};
use options::{Cli, Command as CliCmd, Distance, Format};
use serde::Serialize;
use std::{io::Write, path::Path};
use textplots::{Chart, Plot, Shape};

fn main() -> Result<(), AnyError> {
    let Cli { cmd } = Cli::parse();

    env_logger::init();

    match cmd {
        CliCmd::Extract { file, to } => {
            let line = extract(&file, &[])?;
            println!("{}", line.reproject(to).to_wkt());
        }
        CliCmd::Request {
            file,
            config,
            referential,
            distance,
            inputs,
        } => {
            let request = request(&file, config.as_deref(), referential, distance)?;
            if inputs {
                print_inputs(&request)?;
            } else {
                println!("{}", serde_json::to_string_pretty(&request)?);
            }
        }
        CliCmd::Show { response, format } => {
            let payload = ProfilePayload::from_slice(&std::fs::read(&response)?)?;
            let profile = payload
                .into_result()
                .ok_or_else(|| anyhow!("{} carries no profile", response.display()))?;
            match format {
                Format::Csv => profile.write_csv(std::io::stdout().lock())?,
                Format::Json => print_json(&profile)?,
                Format::Infos => print_infos(&profile)?,
                Format::Plot => plot_ascii(&profile),
            }
        }
    }
    Ok(())
}

/// Returns the first line of a document, in the working CRS.
fn extract(path: &Path, extra_projections: &[String]) -> Result<LineGeometry, AnyError> {
    let file = DroppedFile::from_path(path)?;
    let document = read_document(&file, extra_projections)?;
    debug!("{} declares {}", document.file_name, document.crs);
    document
        .find_line()?
        .ok_or_else(|| anyhow!("no line feature in {}", path.display()))
}

fn request(
    file: &Path,
    config: Option<&Path>,
    referential: Option<String>,
    distance: Option<Distance>,
) -> Result<ProfileRequest, AnyError> {
    let config = config.map(ExtensionConfig::from_path).transpose()?;
    let defaults = config.as_ref().map(ExtensionConfig::defaults).transpose()?;
    let referential = referential
        .or_else(|| defaults.as_ref().map(|d| d.referential.clone()))
        .ok_or_else(|| anyhow!("no referential given or configured"))?;
    let distance = distance
        .map(|Distance(meters)| meters)
        .or_else(|| defaults.as_ref().map(|d| d.distance))
        .ok_or_else(|| anyhow!("no distance given or configured"))?;
    let extra = config
        .as_ref()
        .map(ExtensionConfig::projection_codes)
        .unwrap_or_default();
    let line = extract(file, &extra)?;
    Ok(ProfileRequest::new(
        config.as_ref(),
        &line,
        distance,
        referential,
    ))
}

fn print_inputs(request: &ProfileRequest) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    for (name, input) in request.inputs() {
        match input {
            InputData::Complex { data, mime } => writeln!(stdout, "{name} ({mime}): {data}")?,
            InputData::Literal(value) => writeln!(stdout, "{name}: {value}")?,
        }
    }
    Ok(())
}

fn print_json(profile: &ProfileResult) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonEntry {
        distance: f64,
        location: [f64; 2],
        altitude: f64,
        slope: f64,
    }

    let reshaped: Vec<JsonEntry> = profile
        .points
        .iter()
        .map(
            |&ProfilePoint {
                 distance,
                 x,
                 y,
                 altitude,
                 slope,
             }| JsonEntry {
                distance,
                location: [x, y],
                altitude,
                slope,
            },
        )
        .collect();
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

fn print_infos(profile: &ProfileResult) -> Result<(), AnyError> {
    let infos = &profile.infos;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "referential: {}", infos.referential_name)?;
    writeln!(stdout, "distance:    {} m", infos.distance)?;
    writeln!(stdout, "gain:        +{} m", infos.positive_elevation_gain)?;
    writeln!(stdout, "loss:        -{} m", infos.negative_elevation_gain)?;
    writeln!(stdout, "points:      {}", infos.processed_point_count)?;
    if let Some((low, high)) = altitude_range(&profile.points) {
        writeln!(stdout, "altitude:    {low} to {high} m")?;
    }
    Ok(())
}

fn altitude_range(points: &[ProfilePoint]) -> Option<(f64, f64)> {
    let first = points.first()?.altitude;
    Some(points.iter().fold((first, first), |(low, high), p| {
        (low.min(p.altitude), high.max(p.altitude))
    }))
}

#[allow(clippy::cast_possible_truncation)]
fn plot_ascii(profile: &ProfileResult) {
    let plot_data: Vec<(f32, f32)> = profile
        .points
        .iter()
        .map(|p| (p.distance as f32, p.altitude as f32))
        .collect();
    let length = plot_data.last().map_or(0.0, |(distance, _)| *distance);
    Chart::new(300, 150, 0.0, length)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}
