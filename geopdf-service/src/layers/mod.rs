//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Map layers and their lifecycle

mod base;
pub mod graticule;
pub mod referenced;
pub mod track;
pub mod wfs;
pub mod wms;

pub use self::base::{bbox_from_config, LayerBase, LayerState};
pub use self::graticule::GraticuleLayer;
pub use self::referenced::ReferencedLayer;
pub use self::track::TrackLayer;
pub use self::wfs::WfsLayer;
pub use self::wms::WmsLayer;

use crate::talker::ServerTalker;
use geopdf_core::core::config::{Config, LayerCfg};
use geopdf_core::core::crs::Crs;
use geopdf_core::pdf::PdfSurface;
use geopdf_core::Result;

/// Everything a layer needs to draw itself
pub struct DrawContext<'a> {
    pub surface: &'a mut PdfSurface,
    pub talker: &'a ServerTalker,
    /// Page margin in points
    pub margin: f64,
    /// Reference system of the georeferencing points
    pub georeference_crs: Crs,
}

/// Operations of the layer lifecycle.
///
/// Implementations only transform their content, state checks are done by `Layer`.
pub trait MapLayer {
    fn base(&self) -> &LayerBase;
    fn base_mut(&mut self) -> &mut LayerBase;
    /// Acquire raw content
    fn receive(&mut self, talker: &ServerTalker) -> Result<()>;
    /// Transform content into page coordinates
    fn prepare(&mut self, margin: f64) -> Result<()>;
    /// Emit content onto the page
    fn draw(&mut self, ctx: &mut DrawContext) -> Result<()>;
}

pub enum Layer {
    Referenced(ReferencedLayer),
    Wms(WmsLayer),
    Wfs(WfsLayer),
    Track(TrackLayer),
    Graticule(GraticuleLayer),
}

macro_rules! dispatch {
    ($layer:expr, $l:ident => $call:expr) => {
        match $layer {
            Layer::Referenced($l) => $call,
            Layer::Wms($l) => $call,
            Layer::Wfs($l) => $call,
            Layer::Track($l) => $call,
            Layer::Graticule($l) => $call,
        }
    };
}

impl Layer {
    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn state(&self) -> LayerState {
        self.base().state()
    }

    pub fn is_referenced(&self) -> bool {
        matches!(self, Layer::Referenced(_))
    }

    /// Mark as finished, after drawing or when skipped
    pub fn terminate(&mut self) {
        self.base_mut().set_state(LayerState::Terminal);
    }

    pub fn from_config(cfg: &LayerCfg) -> std::result::Result<Layer, String> {
        match cfg.layer_type.to_lowercase().as_str() {
            "wms" => WmsLayer::from_config(cfg).map(Layer::Wms),
            "wfs" => WfsLayer::from_config(cfg).map(Layer::Wfs),
            "track" | "gps" => TrackLayer::from_config(cfg).map(Layer::Track),
            "graticule" | "grid" => GraticuleLayer::from_config(cfg).map(Layer::Graticule),
            _ => Err(format!("Unsupported layer type '{}'", cfg.layer_type)),
        }
    }

    pub fn gen_config() -> String {
        let mut config = String::new();
        config.push_str(&WmsLayer::gen_config());
        config.push_str(&WfsLayer::gen_config());
        config.push_str(&TrackLayer::gen_config());
        config.push_str(&GraticuleLayer::gen_config());
        config
    }

    pub fn gen_runtime_config(&self) -> String {
        match self {
            Layer::Referenced(_) => String::new(),
            Layer::Wms(l) => l.gen_runtime_config(),
            Layer::Wfs(l) => l.gen_runtime_config(),
            Layer::Track(l) => l.gen_runtime_config(),
            Layer::Graticule(l) => l.gen_runtime_config(),
        }
    }
}

impl MapLayer for Layer {
    fn base(&self) -> &LayerBase {
        dispatch!(self, l => l.base())
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        dispatch!(self, l => l.base_mut())
    }

    fn receive(&mut self, talker: &ServerTalker) -> Result<()> {
        self.base().expect_state(LayerState::Measured, "receive")?;
        dispatch!(self, l => l.receive(talker))?;
        self.base_mut().set_state(LayerState::Received);
        info!("Layer `{}` received", self.name());
        Ok(())
    }

    fn prepare(&mut self, margin: f64) -> Result<()> {
        self.base().expect_state(LayerState::Received, "prepare")?;
        dispatch!(self, l => l.prepare(margin))?;
        self.base_mut().set_state(LayerState::Prepared);
        info!("Layer `{}` prepared", self.name());
        Ok(())
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<()> {
        self.base().expect_state(LayerState::Prepared, "draw")?;
        dispatch!(self, l => l.draw(ctx))?;
        self.base_mut().set_state(LayerState::Drawn);
        info!("Layer `{}` drawn", self.name());
        Ok(())
    }
}

#[cfg(test)]
mod base_test;
