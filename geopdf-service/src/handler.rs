//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Document creation

use crate::layers::{DrawContext, Layer, MapLayer};
use crate::map::Map;
use crate::talker::{CurlFetcher, Fetcher, ServerTalker};
use geopdf_core::core::config::{ApplicationCfg, Config, TilesCfg, DEFAULT_CONFIG};
use geopdf_core::pdf::surface::save;
use geopdf_core::pdf::{PdfDocument, PdfSurface};
use geopdf_core::{GeoPdfError, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Renders a map onto a document and writes the PDF
pub struct PdfHandler {
    doc: PdfDocument,
    map: Map,
    talker: ServerTalker,
}

impl PdfHandler {
    pub fn new(doc: Option<PdfDocument>, map: Option<Map>) -> Result<PdfHandler> {
        let doc = doc.ok_or_else(|| GeoPdfError::PdfHandler("a document".to_string()))?;
        let map = map.ok_or_else(|| GeoPdfError::PdfHandler("a map".to_string()))?;
        let talker = ServerTalker::new(Box::new(CurlFetcher::default()), &TilesCfg::default())?;
        Ok(PdfHandler { doc, map, talker })
    }

    pub fn with_talker(mut self, talker: ServerTalker) -> PdfHandler {
        self.talker = talker;
        self
    }

    /// Handler with all requests going through `fetcher`
    pub fn from_config_with_fetcher(config: &ApplicationCfg, fetcher: Box<dyn Fetcher>) -> Result<PdfHandler> {
        let doc = PdfDocument::from_config(&config.document).map_err(GeoPdfError::Config)?;
        let map = Map::from_config(config).map_err(GeoPdfError::Config)?;
        let talker = ServerTalker::new(fetcher, &config.tiles)?;
        Ok(PdfHandler { doc, map, talker })
    }

    pub fn document(&self) -> &PdfDocument {
        &self.doc
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn talker(&self) -> &ServerTalker {
        &self.talker
    }

    pub fn talker_mut(&mut self) -> &mut ServerTalker {
        &mut self.talker
    }

    fn process(&self, layer: &mut Layer, surface: &mut PdfSurface) -> Result<()> {
        layer.receive(&self.talker)?;
        layer.prepare(self.doc.margin())?;
        let mut ctx = DrawContext {
            surface,
            talker: &self.talker,
            margin: self.doc.margin(),
            georeference_crs: self.doc.georeference_crs,
        };
        layer.draw(&mut ctx)
    }

    /// Measure, receive, prepare and draw all layers of the map
    pub fn render(&mut self) -> Result<lopdf::Document> {
        let start = Instant::now();
        self.map.measure(&self.doc)?;
        let mut surface = self.doc.open_surface();
        if self.doc.print_margins {
            self.doc.draw_margins(&mut surface);
        }
        let mut layers = self.map.take_layers();
        let mut result = Ok(());
        for layer in layers.iter_mut() {
            let checkpoint = surface.checkpoint();
            match self.process(layer, &mut surface) {
                Ok(()) => {}
                Err(e) if layer.is_referenced() => {
                    error!("Georeferencing failed: {}", e);
                    result = Err(GeoPdfError::PdfCreation(e.to_string()));
                    layer.terminate();
                    break;
                }
                Err(e) => {
                    warn!("Skipping layer `{}`: {}", layer.name(), e);
                    surface.rollback(checkpoint);
                }
            }
            layer.terminate();
        }
        for layer in layers {
            self.map.add_layer(layer);
        }
        result?;

        for key in self.talker.stats.keys() {
            debug!("{}: {:?}", key, self.talker.stats.results(&key));
        }
        let doc = surface.finish(&self.doc.info)?;
        info!("Rendered map in {:.1}s", start.elapsed().as_secs_f64());
        Ok(doc)
    }

    /// Render and write the PDF, returning its path
    pub fn create(&mut self) -> Result<PathBuf> {
        let mut pdf = self.render()?;
        let path = self.doc.path();
        fs::create_dir_all(&self.doc.output_dir).map_err(|e| {
            GeoPdfError::PdfCreation(format!("{}: {}", self.doc.output_dir.display(), e))
        })?;
        save(&mut pdf, &path)
            .map_err(|e| GeoPdfError::PdfCreation(format!("{}: {}", path.display(), e)))?;
        info!("PDF written to {}", path.display());
        Ok(path)
    }
}

impl<'a> Config<'a, ApplicationCfg> for PdfHandler {
    fn from_config(config: &ApplicationCfg) -> std::result::Result<Self, String> {
        PdfHandler::from_config_with_fetcher(config, Box::new(CurlFetcher::default()))
            .map_err(|e| e.to_string())
    }

    fn gen_config() -> String {
        let mut config = DEFAULT_CONFIG.to_string();
        config.push_str(&Map::gen_config());
        config
    }

    fn gen_runtime_config(&self) -> String {
        let mut config = self.doc.gen_runtime_config();
        config.push_str(&format!(
            "\n[tiles]\nmax_request_pixel = {}\nmax_image_mb = {}\nmax_request_tries = {}\nthreads = {}\n",
            self.talker.max_request_pixel,
            self.talker.max_image_mb,
            self.talker.max_request_tries,
            self.talker.threads()
        ));
        config.push_str(&self.map.gen_runtime_config());
        config
    }
}
