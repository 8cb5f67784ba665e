//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::bbox::BoundingBox;
use crate::core::position::DirectPosition2D;
use crate::draw::info::AdditionalInfo;
use geo::{
    Area, BooleanOps, Contains, Coord, EuclideanLength, Intersects, LineString, MapCoordsInPlace,
    MultiLineString, MultiPolygon, Point, Polygon,
};

/// Concrete geometry of a drawable
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    Polygon(Polygon<f64>),
    MultiLineString(MultiLineString<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

/// Result of clipping a single geometry against a frame
#[derive(Clone, Debug, PartialEq)]
pub enum ClipOutcome {
    /// Untouched
    Kept,
    /// Replaced by a geometry of the same variant
    Replaced(Geometry),
    /// Replaced by a multi geometry
    Demoted(Geometry),
    /// Nothing left
    Removed,
}

/// Geometry with attributes, drawn onto the page
#[derive(Clone, Debug, PartialEq)]
pub struct DrawGeometry {
    pub geometry: Geometry,
    pub info: AdditionalInfo,
}

fn coord(pos: &DirectPosition2D) -> Coord<f64> {
    Coord {
        x: pos.ord0,
        y: pos.ord1,
    }
}

impl DrawGeometry {
    pub fn new(geometry: Geometry, info: AdditionalInfo) -> DrawGeometry {
        DrawGeometry { geometry, info }
    }

    pub fn point(pos: &DirectPosition2D, info: AdditionalInfo) -> DrawGeometry {
        DrawGeometry::new(Geometry::Point(Point::from(coord(pos))), info)
    }

    pub fn line_string(positions: &[DirectPosition2D], info: AdditionalInfo) -> DrawGeometry {
        let coords: Vec<Coord<f64>> = positions.iter().map(coord).collect();
        DrawGeometry::new(Geometry::LineString(LineString::from(coords)), info)
    }

    /// Polygon from an exterior ring; the ring is closed if necessary
    pub fn polygon(positions: &[DirectPosition2D], info: AdditionalInfo) -> DrawGeometry {
        let mut coords: Vec<Coord<f64>> = positions.iter().map(coord).collect();
        if let (Some(first), Some(last)) = (coords.first().cloned(), coords.last().cloned()) {
            if first != last {
                coords.push(first);
            }
        }
        DrawGeometry::new(
            Geometry::Polygon(Polygon::new(LineString::from(coords), vec![])),
            info,
        )
    }

    pub fn variant_name(&self) -> &'static str {
        match self.geometry {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    fn map_coords<F>(&mut self, func: F)
    where
        F: Fn(Coord<f64>) -> Coord<f64> + Copy,
    {
        match self.geometry {
            Geometry::Point(ref mut g) => g.map_coords_in_place(func),
            Geometry::LineString(ref mut g) => g.map_coords_in_place(func),
            Geometry::Polygon(ref mut g) => g.map_coords_in_place(func),
            Geometry::MultiLineString(ref mut g) => g.map_coords_in_place(func),
            Geometry::MultiPolygon(ref mut g) => g.map_coords_in_place(func),
        }
    }

    /// Translate by `(-dx, -dy)`.
    ///
    /// Multi line strings are translated by `(+dx, +dy)`.
    pub fn reduce(&mut self, dx: f64, dy: f64) {
        let (dx, dy) = match self.geometry {
            Geometry::MultiLineString(_) => (-dx, -dy),
            _ => (dx, dy),
        };
        self.map_coords(|c| Coord {
            x: c.x - dx,
            y: c.y - dy,
        });
    }

    /// Multiply all coordinates by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.map_coords(|c| Coord {
            x: c.x * factor,
            y: c.y * factor,
        });
    }

    fn as_geo(&self) -> geo::Geometry<f64> {
        match self.geometry {
            Geometry::Point(ref g) => geo::Geometry::Point(*g),
            Geometry::LineString(ref g) => geo::Geometry::LineString(g.clone()),
            Geometry::Polygon(ref g) => geo::Geometry::Polygon(g.clone()),
            Geometry::MultiLineString(ref g) => geo::Geometry::MultiLineString(g.clone()),
            Geometry::MultiPolygon(ref g) => geo::Geometry::MultiPolygon(g.clone()),
        }
    }

    pub fn intersects(&self, other: &DrawGeometry) -> bool {
        self.as_geo().intersects(&other.as_geo())
    }

    pub fn intersects_polygon(&self, polygon: &Polygon<f64>) -> bool {
        self.as_geo().intersects(polygon)
    }

    pub fn intersects_bbox(&self, bbox: &BoundingBox) -> bool {
        self.intersects_polygon(&bbox.to_polygon())
    }

    /// Area in square units; zero for points and lines
    pub fn area(&self) -> f64 {
        match self.geometry {
            Geometry::Polygon(ref g) => g.unsigned_area(),
            Geometry::MultiPolygon(ref g) => g.unsigned_area(),
            _ => 0.0,
        }
    }

    /// Length of lines or perimeter of polygons
    pub fn length(&self) -> f64 {
        fn perimeter(polygon: &Polygon<f64>) -> f64 {
            polygon.exterior().euclidean_length()
                + polygon
                    .interiors()
                    .iter()
                    .map(|ring| ring.euclidean_length())
                    .sum::<f64>()
        }
        match self.geometry {
            Geometry::Point(_) => 0.0,
            Geometry::LineString(ref g) => g.euclidean_length(),
            Geometry::MultiLineString(ref g) => g.euclidean_length(),
            Geometry::Polygon(ref g) => perimeter(g),
            Geometry::MultiPolygon(ref g) => g.0.iter().map(perimeter).sum(),
        }
    }

    /// Clip against `frame`. Multi geometries are left as they are.
    pub fn clip(&self, frame: &Polygon<f64>) -> ClipOutcome {
        match self.geometry {
            Geometry::Point(ref p) => {
                if frame.intersects(p) || frame.contains(p) {
                    ClipOutcome::Kept
                } else {
                    ClipOutcome::Removed
                }
            }
            Geometry::Polygon(ref polygon) => {
                if !frame.intersects(polygon) {
                    return ClipOutcome::Kept;
                }
                let mut parts = polygon.intersection(frame);
                parts.0.retain(|p| p.unsigned_area() > 0.0);
                match parts.0.len() {
                    0 => ClipOutcome::Removed,
                    1 => ClipOutcome::Replaced(Geometry::Polygon(parts.0.remove(0))),
                    _ => ClipOutcome::Demoted(Geometry::MultiPolygon(parts)),
                }
            }
            Geometry::LineString(ref line) => {
                if !frame.intersects(line) {
                    return ClipOutcome::Kept;
                }
                let mut parts = frame.clip(&MultiLineString::new(vec![line.clone()]), false);
                parts.0.retain(|l| l.euclidean_length() > 0.0);
                match parts.0.len() {
                    0 => ClipOutcome::Removed,
                    1 => ClipOutcome::Replaced(Geometry::LineString(parts.0.remove(0))),
                    _ => ClipOutcome::Demoted(Geometry::MultiLineString(parts)),
                }
            }
            Geometry::MultiLineString(_) | Geometry::MultiPolygon(_) => ClipOutcome::Kept,
        }
    }

    /// Coordinates of all vertices
    pub fn coords(&self) -> Vec<Coord<f64>> {
        match self.geometry {
            Geometry::Point(ref g) => vec![g.0],
            Geometry::LineString(ref g) => g.0.clone(),
            Geometry::Polygon(ref g) => g.exterior().0.clone(),
            Geometry::MultiLineString(ref g) => g.0.iter().flat_map(|l| l.0.clone()).collect(),
            Geometry::MultiPolygon(ref g) => g
                .0
                .iter()
                .flat_map(|p| p.exterior().0.clone())
                .collect(),
        }
    }
}
