//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::core::config::BboxCfg;
use geopdf_core::core::crs::{Crs, CANONICAL_CRS};
use geopdf_core::pdf::document::POINTS;
use geopdf_core::{GeoPdfError, Result};
use std::fmt;

/// Lifecycle of a layer. Transitions are strictly linear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LayerState {
    Constructed,
    Measured,
    Received,
    Prepared,
    Drawn,
    Terminal,
}

impl fmt::Display for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Bounding box from a `{ minx, miny, maxx, maxy, crs }` table
pub fn bbox_from_config(cfg: &BboxCfg) -> std::result::Result<BoundingBox, String> {
    let crs = match cfg.crs {
        Some(ref crs) => Crs::parse(crs).map_err(|e| e.to_string())?,
        None => CANONICAL_CRS,
    };
    BoundingBox::from_coords(crs, cfg.minx, cfg.miny, cfg.maxx, cfg.maxy).map_err(|e| e.to_string())
}

/// Placement of a layer within the map
#[derive(Clone, Debug)]
pub struct LayerBase {
    pub name: String,
    bbox: BoundingBox,
    map_bbox: Option<BoundingBox>,
    map_inch_width: f64,
    map_inch_height: f64,
    /// Size on the page in inches
    inch_width: f64,
    inch_height: f64,
    /// Offset to the map origin in points
    offset_x: f64,
    offset_y: f64,
    state: LayerState,
}

impl LayerBase {
    pub fn new(name: &str, bbox: BoundingBox) -> LayerBase {
        LayerBase {
            name: name.to_string(),
            bbox,
            map_bbox: None,
            map_inch_width: 0.0,
            map_inch_height: 0.0,
            inch_width: 0.0,
            inch_height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            state: LayerState::Constructed,
        }
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: LayerState) {
        debug!("Layer `{}`: {} -> {}", self.name, self.state, state);
        self.state = state;
    }

    pub fn expect_state(&self, expected: LayerState, action: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GeoPdfError::LayerState {
                layer: self.name.clone(),
                state: self.state.to_string(),
                action: action.to_string(),
            })
        }
    }

    /// Inject the map extent and the map size on the page.
    ///
    /// The offset to the map origin is the ratio `map width / dx` scaled to
    /// points, zero where the layer starts at the map origin.
    pub fn measure(&mut self, map_bbox: &BoundingBox, map_inch_width: f64, map_inch_height: f64) -> Result<()> {
        self.expect_state(LayerState::Constructed, "measure")?;
        if !(map_inch_width > 0.0 && map_inch_height > 0.0) {
            return Err(GeoPdfError::LayerInchesUncomputable(self.name.clone()));
        }
        self.inch_width = self.bbox.geo_width() / map_bbox.geo_width() * map_inch_width;
        self.inch_height = self.bbox.geo_height() / map_bbox.geo_height() * map_inch_height;
        let dx = self.bbox.ll().east() - map_bbox.ll().east();
        let dy = self.bbox.ll().north() - map_bbox.ll().north();
        self.offset_x = if dx == 0.0 {
            0.0
        } else {
            map_bbox.geo_width() / dx * map_inch_width * POINTS
        };
        self.offset_y = if dy == 0.0 {
            0.0
        } else {
            map_bbox.geo_height() / dy * map_inch_height * POINTS
        };
        self.map_bbox = Some(map_bbox.clone());
        self.map_inch_width = map_inch_width;
        self.map_inch_height = map_inch_height;
        self.set_state(LayerState::Measured);
        Ok(())
    }

    pub fn map_bbox(&self) -> Result<&BoundingBox> {
        self.map_bbox
            .as_ref()
            .ok_or_else(|| GeoPdfError::LayerInchesUncomputable(self.name.clone()))
    }

    pub fn inch_width(&self) -> f64 {
        self.inch_width
    }

    pub fn inch_height(&self) -> f64 {
        self.inch_height
    }

    /// Width on the page in points
    pub fn point_width(&self) -> f64 {
        self.inch_width * POINTS
    }

    /// Height on the page in points
    pub fn point_height(&self) -> f64 {
        self.inch_height * POINTS
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Recompute the offset to the map origin as the absolute meter
    /// difference scaled to points
    pub fn update_offset(&mut self) -> Result<(f64, f64)> {
        let (dx, dy, map_width, map_height) = {
            let map_bbox = self.map_bbox()?;
            (
                (self.bbox.ll().east() - map_bbox.ll().east()).abs(),
                (self.bbox.ll().north() - map_bbox.ll().north()).abs(),
                map_bbox.geo_width(),
                map_bbox.geo_height(),
            )
        };
        self.offset_x = dx / map_width * self.map_inch_width * POINTS;
        self.offset_y = dy / map_height * self.map_inch_height * POINTS;
        Ok((self.offset_x, self.offset_y))
    }

    /// Points per meter
    pub fn scale_factor(&self) -> f64 {
        0.5 * (self.point_width() / self.bbox.geo_width() + self.point_height() / self.bbox.geo_height())
    }
}
