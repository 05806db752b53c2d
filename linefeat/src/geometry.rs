use crate::{Crs, LineError};
use geo::{
    algorithm::{BoundingRect, Centroid},
    geometry::{Coord, LineString, Point, Rect},
};
use geojson::{Feature, Geometry, Value};
use std::fmt::Write;

/// A line with at least two finite coordinates, tagged with the CRS
/// its coordinates are expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    line: LineString<f64>,
    projection: Crs,
}

impl LineGeometry {
    pub fn new(coords: Vec<Coord<f64>>, projection: Crs) -> Result<Self, LineError> {
        if coords.len() < 2 {
            return Err(LineError::Degenerate(coords.len()));
        }
        if let Some(Coord { x, y }) = coords
            .iter()
            .find(|c| !(c.x.is_finite() && c.y.is_finite()))
        {
            return Err(LineError::NonFinite { x: *x, y: *y });
        }
        Ok(Self {
            line: LineString::new(coords),
            projection,
        })
    }

    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    pub fn coords(&self) -> &[Coord<f64>] {
        &self.line.0
    }

    pub fn num_coords(&self) -> usize {
        self.line.0.len()
    }

    pub fn projection(&self) -> Crs {
        self.projection
    }

    /// Returns a copy of this line expressed in `to`.
    pub fn reproject(&self, to: Crs) -> Self {
        let from = self.projection;
        Self {
            line: self.line.coords().map(|c| from.transform(to, *c)).collect(),
            projection: to,
        }
    }

    /// Serializes the line as well-known text, `LINESTRING(x y,x y,...)`.
    pub fn to_wkt(&self) -> String {
        let mut wkt = String::from("LINESTRING(");
        for (i, Coord { x, y }) in self.line.coords().enumerate() {
            if i > 0 {
                wkt.push(',');
            }
            // Writing to a String can't fail.
            let _ = write!(wkt, "{x} {y}");
        }
        wkt.push(')');
        wkt
    }

    pub fn bounding_rect(&self) -> Rect<f64> {
        // Never empty: a line holds at least two coordinates.
        self.line
            .bounding_rect()
            .unwrap_or_else(|| Rect::new(Coord::zero(), Coord::zero()))
    }

    /// Length weighted centroid of the line.
    pub fn centroid(&self) -> Point<f64> {
        self.line
            .centroid()
            .unwrap_or_else(|| Point::from(self.line.0[0]))
    }

    pub fn to_feature(&self) -> Feature {
        let positions = self.line.coords().map(|c| vec![c.x, c.y]).collect();
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(positions))),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }
}
