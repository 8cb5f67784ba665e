//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::bbox::BoundingBox;
use crate::draw::geometry::{ClipOutcome, DrawGeometry, Geometry};

/// Draw geometries sorted into one bucket per variant
#[derive(Clone, Debug, Default)]
pub struct GeometryContainer {
    pub points: Vec<DrawGeometry>,
    pub line_strings: Vec<DrawGeometry>,
    pub polygons: Vec<DrawGeometry>,
    pub multi_line_strings: Vec<DrawGeometry>,
    pub multi_polygons: Vec<DrawGeometry>,
}

impl GeometryContainer {
    pub fn new() -> GeometryContainer {
        GeometryContainer::default()
    }

    pub fn add(&mut self, geometry: DrawGeometry) {
        match geometry.geometry {
            Geometry::Point(_) => self.points.push(geometry),
            Geometry::LineString(_) => self.line_strings.push(geometry),
            Geometry::Polygon(_) => self.polygons.push(geometry),
            Geometry::MultiLineString(_) => self.multi_line_strings.push(geometry),
            Geometry::MultiPolygon(_) => self.multi_polygons.push(geometry),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
            + self.line_strings.len()
            + self.polygons.len()
            + self.multi_line_strings.len()
            + self.multi_polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawGeometry> {
        self.points
            .iter()
            .chain(self.line_strings.iter())
            .chain(self.polygons.iter())
            .chain(self.multi_line_strings.iter())
            .chain(self.multi_polygons.iter())
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut DrawGeometry> {
        self.points
            .iter_mut()
            .chain(self.line_strings.iter_mut())
            .chain(self.polygons.iter_mut())
            .chain(self.multi_line_strings.iter_mut())
            .chain(self.multi_polygons.iter_mut())
    }

    pub fn reduce(&mut self, dx: f64, dy: f64) {
        self.iter_mut().for_each(|g| g.reduce(dx, dy));
    }

    pub fn scale(&mut self, factor: f64) {
        self.iter_mut().for_each(|g| g.scale(factor));
    }

    /// Move content by margin plus layer offset into page coordinates
    pub fn add_margin_offset(&mut self, margin: f64, offset_x: f64, offset_y: f64) {
        self.reduce(-margin - offset_x, -margin - offset_y);
    }

    /// Express content relative to the lower left corner of `bbox`
    pub fn reduce_content(&mut self, bbox: &BoundingBox) {
        self.reduce(bbox.ll().east(), bbox.ll().north());
    }

    /// Clip polygons, line strings and points against `bbox`.
    ///
    /// Multi geometries present before clipping are not touched.
    pub fn clip(&mut self, bbox: &BoundingBox) {
        let frame = bbox.to_polygon();
        let mut removed = 0;
        let mut demoted = 0;

        let mut idx = 0;
        while idx < self.polygons.len() {
            match self.polygons[idx].clip(&frame) {
                ClipOutcome::Kept => idx += 1,
                ClipOutcome::Replaced(geometry) => {
                    self.polygons[idx].geometry = geometry;
                    idx += 1;
                }
                ClipOutcome::Demoted(geometry) => {
                    let original = self.polygons.remove(idx);
                    self.multi_polygons
                        .push(DrawGeometry::new(geometry, original.info));
                    demoted += 1;
                }
                ClipOutcome::Removed => {
                    self.polygons.remove(idx);
                    removed += 1;
                }
            }
        }

        let mut idx = 0;
        while idx < self.line_strings.len() {
            match self.line_strings[idx].clip(&frame) {
                ClipOutcome::Kept => idx += 1,
                ClipOutcome::Replaced(geometry) => {
                    self.line_strings[idx].geometry = geometry;
                    idx += 1;
                }
                ClipOutcome::Demoted(geometry) => {
                    let original = self.line_strings.remove(idx);
                    self.multi_line_strings
                        .push(DrawGeometry::new(geometry, original.info));
                    demoted += 1;
                }
                ClipOutcome::Removed => {
                    self.line_strings.remove(idx);
                    removed += 1;
                }
            }
        }

        let before = self.points.len();
        self.points
            .retain(|point| point.clip(&frame) != ClipOutcome::Removed);
        removed += before - self.points.len();

        debug!(
            "Clipped container: {} removed, {} demoted, {} left",
            removed,
            demoted,
            self.len()
        );
    }
}
