//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Map composition

use crate::layers::{bbox_from_config, Layer, MapLayer, ReferencedLayer};
use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::core::config::{ApplicationCfg, Config};
use geopdf_core::pdf::PdfDocument;
use geopdf_core::{GeoPdfError, Result};

/// Size of the map on the page in inches.
///
/// The map keeps its aspect ratio and fills the available width, or the
/// available height if the width-bound map would be too high.
pub fn map_inches(geo_width: f64, geo_height: f64, available_width: f64, available_height: f64) -> (f64, f64) {
    let meters_per_inch = geo_width / available_width;
    if meters_per_inch * available_height >= geo_height {
        (available_width, geo_height / meters_per_inch)
    } else {
        let meters_per_inch = geo_height / available_height;
        (geo_width / meters_per_inch, available_height)
    }
}

/// Ordered layers with their common extent
pub struct Map {
    layers: Vec<Layer>,
    bbox: Option<BoundingBox>,
    inch_width: f64,
    inch_height: f64,
}

impl Map {
    pub fn new() -> Map {
        Map {
            layers: Vec::new(),
            bbox: None,
            inch_width: 0.0,
            inch_height: 0.0,
        }
    }

    /// Map with a fixed extent instead of the union of its layers
    pub fn with_bbox(bbox: BoundingBox) -> Map {
        Map {
            bbox: Some(bbox),
            ..Map::new()
        }
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn inch_width(&self) -> f64 {
        self.inch_width
    }

    pub fn inch_height(&self) -> f64 {
        self.inch_height
    }

    /// Set the extent to the union of all layer boxes, unless set explicitly
    pub fn compute_bbox(&mut self) -> Result<&BoundingBox> {
        if self.bbox.is_none() {
            let bbox = BoundingBox::union_all(self.layers.iter().map(|l| l.base().bbox()))?;
            debug!("Map extent {}", bbox.corners_for_request());
            self.bbox = Some(bbox);
        }
        self.bbox
            .as_ref()
            .ok_or_else(|| GeoPdfError::BBoxNotCreatable("map without extent".to_string()))
    }

    /// Fit the map onto the page of `doc` and measure all layers.
    ///
    /// Inserts the referenced layer carrying the georeferencing in front.
    pub fn measure(&mut self, doc: &PdfDocument) -> Result<()> {
        let bbox = self.compute_bbox()?.clone();
        if !self.layers.first().map(Layer::is_referenced).unwrap_or(false) {
            self.layers
                .insert(0, Layer::Referenced(ReferencedLayer::new(bbox.clone())));
        }
        let (inch_width, inch_height) = map_inches(
            bbox.geo_width(),
            bbox.geo_height(),
            doc.available_inches_width(),
            doc.available_inches_height(),
        );
        if !(inch_width > 0.0 && inch_height > 0.0) {
            return Err(GeoPdfError::LayerInchesUncomputable("map".to_string()));
        }
        info!("Map size {:.2} x {:.2} inches", inch_width, inch_height);
        self.inch_width = inch_width;
        self.inch_height = inch_height;
        for layer in self.layers.iter_mut() {
            layer.base_mut().measure(&bbox, inch_width, inch_height)?;
        }
        Ok(())
    }

    /// Remove and return the layers for processing
    pub(crate) fn take_layers(&mut self) -> Vec<Layer> {
        std::mem::take(&mut self.layers)
    }
}

impl Default for Map {
    fn default() -> Self {
        Map::new()
    }
}

impl<'a> Config<'a, ApplicationCfg> for Map {
    fn from_config(config: &ApplicationCfg) -> std::result::Result<Self, String> {
        let mut map = match config.map.as_ref().and_then(|m| m.bbox.as_ref()) {
            Some(bbox) => Map::with_bbox(bbox_from_config(bbox)?),
            None => Map::new(),
        };
        for layer_cfg in &config.layers {
            map.add_layer(Layer::from_config(layer_cfg)?);
        }
        Ok(map)
    }

    fn gen_config() -> String {
        Layer::gen_config()
    }

    fn gen_runtime_config(&self) -> String {
        let mut config = String::new();
        if let Some(ref bbox) = self.bbox {
            config.push_str(&format!(
                "\n[map]\nbbox = {{ minx = {}, miny = {}, maxx = {}, maxy = {} }}\n",
                bbox.ll().east(),
                bbox.ll().north(),
                bbox.ur().east(),
                bbox.ur().north()
            ));
        }
        for layer in &self.layers {
            config.push_str(&layer.gen_runtime_config());
        }
        config
    }
}
