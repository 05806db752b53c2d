use crate::{Crs, LineGeometry};
use geo::geometry::Coord;
use geojson::{Feature, Value};

/// The first line feature of a collection and its geometry in
/// [`Crs::WORKING`].
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch<'a> {
    pub feature: &'a Feature,

    /// Reprojected line. For a `MultiLineString` this is its first
    /// member.
    pub geometry: LineGeometry,
}

/// Returns the first `LineString` or `MultiLineString` feature whose
/// coordinates, expressed in `source`, form a valid line.
///
/// Features of any other geometry type are skipped. `None` means no
/// line was found.
pub fn find_line_feature(features: &[Feature], source: Crs) -> Option<LineMatch<'_>> {
    features.iter().find_map(|feature| {
        let coords = line_coords(feature)?;
        let geometry = LineGeometry::new(coords, source).ok()?;
        Some(LineMatch {
            feature,
            geometry: geometry.reproject(Crs::WORKING),
        })
    })
}

fn line_coords(feature: &Feature) -> Option<Vec<Coord<f64>>> {
    match &feature.geometry.as_ref()?.value {
        Value::LineString(positions) => Some(coords(positions)),
        Value::MultiLineString(lines) => lines.first().map(|positions| coords(positions)),
        _ => None,
    }
}

fn coords(positions: &[Vec<f64>]) -> Vec<Coord<f64>> {
    positions
        .iter()
        .filter_map(|position| match position.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect()
}
