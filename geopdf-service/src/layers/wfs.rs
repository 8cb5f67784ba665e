//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::gml::read_features;
use crate::layers::{bbox_from_config, DrawContext, LayerBase, MapLayer};
use crate::talker::ServerTalker;
use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::core::config::{Config, LayerCfg};
use geopdf_core::core::transform::CoordinateTransformer;
use geopdf_core::draw::container::GeometryContainer;
use geopdf_core::draw::geometry::DrawGeometry;
use geopdf_core::draw::style::{LineStringStyle, PointStyle, PolygonStyle, WfsStyle};
use geopdf_core::pdf::painter::{draw_geometry, GeometryStyles};
use geopdf_core::pdf::PdfSurface;
use geopdf_core::{GeoPdfError, Result};

pub const DEFAULT_VERSION: &str = "2.0.0";

/// Vector layer of a WFS endpoint
pub struct WfsLayer {
    base: LayerBase,
    pub url: String,
    pub version: String,
    /// Requested feature types
    pub layers: Vec<String>,
    pub style: WfsStyle,
    container: GeometryContainer,
}

impl WfsLayer {
    pub fn new(bbox: BoundingBox, url: &str, version: &str, layers: Vec<String>) -> WfsLayer {
        WfsLayer {
            base: LayerBase::new("Wfs-Layer", bbox),
            url: url.to_string(),
            version: version.to_string(),
            layers,
            style: WfsStyle::default(),
            container: GeometryContainer::new(),
        }
    }

    pub fn geometries(&self) -> &GeometryContainer {
        &self.container
    }
}

fn draw_group<'a, I>(surface: &mut PdfSurface, name: &str, geometries: I, styles: GeometryStyles) -> Result<()>
where
    I: Iterator<Item = &'a DrawGeometry>,
{
    surface.begin_layer(name);
    for geometry in geometries {
        draw_geometry(surface, geometry, styles)?;
    }
    surface.end_layer();
    Ok(())
}

impl MapLayer for WfsLayer {
    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn receive(&mut self, talker: &ServerTalker) -> Result<()> {
        if self.layers.is_empty() {
            return Err(GeoPdfError::not_receivable(&self.base.name, "no feature types requested"));
        }
        let crs = CoordinateTransformer::global().canonical();
        for typename in &self.layers {
            let root = talker.get_feature(
                &self.base.name,
                &self.url,
                &self.version,
                typename,
                self.base.bbox(),
                crs,
            )?;
            let features = read_features(&root, crs);
            debug!("{} geometries of `{}`", features.len(), typename);
            for feature in features {
                self.container.add(feature);
            }
        }
        Ok(())
    }

    fn prepare(&mut self, margin: f64) -> Result<()> {
        let before = self.container.len();
        self.container.clip(self.base.bbox());
        debug!(
            "Clipping `{}` kept {} of {} geometries",
            self.base.name,
            self.container.len(),
            before
        );
        self.container.reduce_content(self.base.bbox());
        self.container.scale(self.base.scale_factor());
        let (offset_x, offset_y) = self.base.update_offset()?;
        self.container.add_margin_offset(margin, offset_x, offset_y);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<()> {
        let styles = GeometryStyles {
            point: &self.style.point,
            line: &self.style.line,
            polygon: &self.style.polygon,
        };
        let c = &self.container;
        ctx.surface.begin_layer(&self.base.name);
        draw_group(
            ctx.surface,
            "Polygons",
            c.polygons.iter().chain(c.multi_polygons.iter()),
            styles,
        )?;
        draw_group(
            ctx.surface,
            "LineStrings",
            c.line_strings.iter().chain(c.multi_line_strings.iter()),
            styles,
        )?;
        draw_group(ctx.surface, "Points", c.points.iter(), styles)?;
        ctx.surface.end_layer();
        Ok(())
    }
}

impl<'a> Config<'a, LayerCfg> for WfsLayer {
    fn from_config(cfg: &LayerCfg) -> std::result::Result<Self, String> {
        let bbox = bbox_from_config(&cfg.bbox)?;
        let url = cfg
            .url
            .as_ref()
            .ok_or_else(|| "WFS layer without url".to_string())?;
        if cfg.layers.is_empty() {
            return Err(format!("WFS layer {} without layers", url));
        }
        let version = cfg.version.as_deref().unwrap_or(DEFAULT_VERSION);
        let mut layer = WfsLayer::new(bbox, url, version, cfg.layers.clone());
        if let Some(ref name) = cfg.name {
            layer.base.name = name.clone();
        }
        if let Some(ref style) = cfg.style {
            if let Some(ref point) = style.point {
                layer.style.point = PointStyle::from_config(point)?;
            }
            if let Some(ref line) = style.line {
                layer.style.line = LineStringStyle::from_config(line)?;
            }
            if let Some(ref polygon) = style.polygon {
                layer.style.polygon = PolygonStyle::from_config(polygon)?;
            }
        }
        Ok(layer)
    }

    fn gen_config() -> String {
        let toml = r#"
#[[layer]]
#type = "wfs"
#url = "https://example.com/wfs"
#version = "2.0.0"
#bbox = { minx = 500000, miny = 5900000, maxx = 500500, maxy = 5900500 }
#layers = ["buildings"]
"#;
        let mut config = toml.to_string();
        config.push_str(&PointStyle::gen_config());
        config.push_str(&LineStringStyle::gen_config());
        config.push_str(&PolygonStyle::gen_config());
        config
    }

    fn gen_runtime_config(&self) -> String {
        let bbox = self.base.bbox();
        let layers: Vec<String> = self.layers.iter().map(|l| format!("\"{}\"", l)).collect();
        format!(
            r#"
[[layer]]
type = "wfs"
name = "{}"
url = "{}"
version = "{}"
bbox = {{ minx = {}, miny = {}, maxx = {}, maxy = {} }}
layers = [{}]
"#,
            self.base.name,
            self.url,
            self.version,
            bbox.ll().east(),
            bbox.ll().north(),
            bbox.ur().east(),
            bbox.ur().north(),
            layers.join(", ")
        )
    }
}
