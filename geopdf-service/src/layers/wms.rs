//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::layers::{bbox_from_config, DrawContext, LayerBase, MapLayer};
use crate::talker::{MapRequest, ServerTalker};
use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::core::config::{Config, LayerCfg};
use geopdf_core::core::crs::Crs;
use geopdf_core::core::transform::CoordinateTransformer;
use geopdf_core::raster::image_handler::{apply_alpha, compose, estimated_megabytes};
use geopdf_core::raster::layer_image::LayerImage;
use geopdf_core::raster::tile::{Tile, TileArray};
use geopdf_core::{GeoPdfError, Result};

pub const DEFAULT_VERSION: &str = "1.3.0";
pub const DEFAULT_DPI: u32 = 10;
pub const DEFAULT_STYLE: &str = "default";
pub const DEFAULT_OPACITY: u8 = 255;

/// One requested layer of the map service
#[derive(Clone, Debug, PartialEq)]
pub struct WmsSublayer {
    pub name: String,
    pub dpi: u32,
    pub style: String,
    pub opacity: u8,
}

impl WmsSublayer {
    pub fn new(name: &str) -> WmsSublayer {
        WmsSublayer {
            name: name.to_string(),
            dpi: DEFAULT_DPI,
            style: DEFAULT_STYLE.to_string(),
            opacity: DEFAULT_OPACITY,
        }
    }
}

/// Raster of a sublayer after receiving
#[derive(Debug)]
pub enum SublayerRaster {
    /// Composed image placed in one piece
    Stitched(LayerImage),
    /// Tiles fetched and placed one by one while drawing
    Streaming(TileArray),
}

/// Raster layer of a WMS endpoint
pub struct WmsLayer {
    base: LayerBase,
    pub url: String,
    pub version: String,
    pub sublayers: Vec<WmsSublayer>,
    /// Reference system of the map requests
    pub crs: Crs,
    rasters: Vec<SublayerRaster>,
}

impl WmsLayer {
    pub fn new(bbox: BoundingBox, url: &str, version: &str, sublayers: Vec<WmsSublayer>) -> WmsLayer {
        WmsLayer {
            base: LayerBase::new(&format!("WMS-Layer: {}", url), bbox),
            url: url.to_string(),
            version: version.to_string(),
            sublayers,
            crs: CoordinateTransformer::global().canonical(),
            rasters: Vec::new(),
        }
    }

    pub fn rasters(&self) -> &[SublayerRaster] {
        &self.rasters
    }

    /// Composed images of all stitched sublayers
    pub fn images(&self) -> Vec<&LayerImage> {
        self.rasters
            .iter()
            .filter_map(|raster| match raster {
                SublayerRaster::Stitched(image) => Some(image),
                SublayerRaster::Streaming(_) => None,
            })
            .collect()
    }

    fn request(&self, sublayer: &WmsSublayer) -> MapRequest {
        MapRequest {
            url: self.url.clone(),
            version: self.version.clone(),
            layer: sublayer.name.clone(),
            style: sublayer.style.clone(),
            crs: self.crs,
        }
    }

    /// Raster size of a sublayer in pixels
    pub fn pixel_size(&self, dpi: u32) -> (u32, u32) {
        (
            (self.base.inch_width() * dpi as f64) as u32,
            (self.base.inch_height() * dpi as f64) as u32,
        )
    }

    /// Pixel cap per request, lowered by the server limits
    fn max_request_pixel(&self, talker: &ServerTalker) -> u32 {
        match talker.capabilities(&self.url, &self.version) {
            Ok(caps) => {
                for sublayer in &self.sublayers {
                    if !caps.has_layer(&sublayer.name) {
                        warn!("Layer `{}` not offered by {}", sublayer.name, self.url);
                    }
                }
                if !caps.supports_crs(&self.crs.to_string()) && !caps.crs.is_empty() {
                    warn!("{} doesn't announce {}", self.url, self.crs);
                }
                caps.max_request_pixel(talker.max_request_pixel)
            }
            Err(e) => {
                warn!("Ignoring capabilities of {}: {}", self.url, e);
                talker.max_request_pixel
            }
        }
    }

    /// Page rectangle of a tile as `(x, y, width, height)` in points
    fn tile_placement(&self, tile: &Tile, margin: f64) -> (f64, f64, f64, f64) {
        let scale = self.base.scale_factor();
        let (offset_x, offset_y) = self.base.offset();
        let ll = self.base.bbox().ll();
        let tile_bbox = tile.bbox();
        (
            margin + offset_x + (tile_bbox.ll().east() - ll.east()) * scale,
            margin + offset_y + (tile_bbox.ll().north() - ll.north()) * scale,
            tile_bbox.geo_width() * scale,
            tile_bbox.geo_height() * scale,
        )
    }
}

/// Fetch tiles in batches of `talker.threads()`, reporting progress
fn fetch_batched<F>(talker: &ServerTalker, request: &MapRequest, tiles: &mut [Tile], mut on_batch: F) -> Result<()>
where
    F: FnMut(&mut [Tile]) -> Result<()>,
{
    let mut progress = talker.progress_bar(&format!("{} ", request.layer), tiles.len() as u64);
    for batch in tiles.chunks_mut(talker.threads()) {
        talker.fetch_tiles(request, batch);
        on_batch(batch)?;
        if let Some(ref mut pb) = progress {
            pb.add(batch.len() as u64);
        }
    }
    if let Some(ref mut pb) = progress {
        pb.finish();
    }
    Ok(())
}

impl MapLayer for WmsLayer {
    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn receive(&mut self, talker: &ServerTalker) -> Result<()> {
        if self.sublayers.is_empty() {
            return Err(GeoPdfError::not_receivable(&self.base.name, "no layers requested"));
        }
        let max_pixels = self.max_request_pixel(talker);
        let mut rasters = Vec::with_capacity(self.sublayers.len());
        for sublayer in &self.sublayers {
            let (width, height) = self.pixel_size(sublayer.dpi);
            let mut tiles = TileArray::new(self.base.bbox(), width, height, max_pixels)
                .map_err(|e| GeoPdfError::not_receivable(&self.base.name, e))?;
            let megabytes = estimated_megabytes(width, height);
            if megabytes > talker.max_image_mb as f64 {
                info!(
                    "Streaming `{}` ({}x{} px, {:.1} MB) in {} tiles",
                    sublayer.name,
                    width,
                    height,
                    megabytes,
                    tiles.len()
                );
                rasters.push(SublayerRaster::Streaming(tiles));
                continue;
            }
            debug!(
                "Stitching `{}` ({}x{} px, {:.1} MB) from {} tiles",
                sublayer.name,
                width,
                height,
                megabytes,
                tiles.len()
            );
            let request = self.request(sublayer);
            fetch_batched(talker, &request, tiles.tiles_mut(), |_| Ok(()))?;
            let mut image = compose(tiles.tiles(), width, height);
            apply_alpha(&mut image, sublayer.opacity);
            rasters.push(SublayerRaster::Stitched(LayerImage::new(
                image,
                self.base.point_width(),
                self.base.point_height(),
            )));
        }
        self.rasters = rasters;
        Ok(())
    }

    fn prepare(&mut self, margin: f64) -> Result<()> {
        let (offset_x, offset_y) = self.base.update_offset()?;
        for raster in self.rasters.iter_mut() {
            if let SublayerRaster::Stitched(image) = raster {
                image.translate(margin + offset_x, margin + offset_y);
            }
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<()> {
        let mut rasters = std::mem::take(&mut self.rasters);
        ctx.surface.begin_layer(&self.base.name);
        for (sublayer, raster) in self.sublayers.iter().zip(rasters.iter_mut()) {
            ctx.surface.begin_layer(&sublayer.name);
            match raster {
                SublayerRaster::Stitched(image) => {
                    ctx.surface.draw_image(
                        &image.image,
                        image.offset_x,
                        image.offset_y,
                        image.width,
                        image.height,
                    )?;
                }
                SublayerRaster::Streaming(tiles) => {
                    let request = self.request(sublayer);
                    let surface = &mut *ctx.surface;
                    let margin = ctx.margin;
                    fetch_batched(ctx.talker, &request, tiles.tiles_mut(), |batch| {
                        for tile in batch.iter_mut() {
                            if let Some(mut image) = tile.image.take() {
                                apply_alpha(&mut image, sublayer.opacity);
                                let (x, y, w, h) = self.tile_placement(tile, margin);
                                surface.draw_image(&image, x, y, w, h)?;
                            }
                        }
                        Ok(())
                    })?;
                }
            }
            ctx.surface.end_layer();
        }
        ctx.surface.end_layer();
        self.rasters = rasters;
        Ok(())
    }
}

impl<'a> Config<'a, LayerCfg> for WmsLayer {
    fn from_config(cfg: &LayerCfg) -> std::result::Result<Self, String> {
        let bbox = bbox_from_config(&cfg.bbox)?;
        let url = cfg
            .url
            .as_ref()
            .ok_or_else(|| "WMS layer without url".to_string())?;
        if cfg.layers.is_empty() {
            return Err(format!("WMS layer {} without layers", url));
        }
        let sublayers = cfg
            .layers
            .iter()
            .enumerate()
            .map(|(i, name)| WmsSublayer {
                name: name.clone(),
                dpi: cfg.dpis.get(i).cloned().unwrap_or(DEFAULT_DPI),
                style: cfg
                    .styles
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_STYLE.to_string()),
                opacity: cfg.opacities.get(i).cloned().unwrap_or(DEFAULT_OPACITY),
            })
            .collect();
        let version = cfg.version.as_deref().unwrap_or(DEFAULT_VERSION);
        let mut layer = WmsLayer::new(bbox, url, version, sublayers);
        if let Some(ref name) = cfg.name {
            layer.base.name = name.clone();
        }
        Ok(layer)
    }

    fn gen_config() -> String {
        let toml = r#"
#[[layer]]
#type = "wms"
#url = "https://example.com/wms"
#version = "1.3.0"
#bbox = { minx = 500000, miny = 5900000, maxx = 500500, maxy = 5900500 }
#layers = ["dop", "roads"]
#dpis = [150, 150]
#styles = ["default", "default"]
#opacities = [255, 128]
"#;
        toml.to_string()
    }

    fn gen_runtime_config(&self) -> String {
        let bbox = self.base.bbox();
        let list = |values: Vec<String>| values.join(", ");
        format!(
            r#"
[[layer]]
type = "wms"
name = "{}"
url = "{}"
version = "{}"
bbox = {{ minx = {}, miny = {}, maxx = {}, maxy = {} }}
layers = [{}]
dpis = [{}]
styles = [{}]
opacities = [{}]
"#,
            self.base.name,
            self.url,
            self.version,
            bbox.ll().east(),
            bbox.ll().north(),
            bbox.ur().east(),
            bbox.ur().north(),
            list(self.sublayers.iter().map(|s| format!("\"{}\"", s.name)).collect()),
            list(self.sublayers.iter().map(|s| s.dpi.to_string()).collect()),
            list(self.sublayers.iter().map(|s| format!("\"{}\"", s.style)).collect()),
            list(self.sublayers.iter().map(|s| s.opacity.to_string()).collect()),
        )
    }
}
