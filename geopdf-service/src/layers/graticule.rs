//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::layers::{bbox_from_config, DrawContext, LayerBase, MapLayer};
use crate::talker::ServerTalker;
use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::core::config::{Config, LayerCfg};
use geopdf_core::core::position::DirectPosition2D;
use geopdf_core::core::transform::CoordinateTransformer;
use geopdf_core::draw::color::{Color, GRAY};
use geopdf_core::draw::container::GeometryContainer;
use geopdf_core::draw::geometry::DrawGeometry;
use geopdf_core::draw::info::AdditionalInfo;
use geopdf_core::draw::style::{LineStringStyle, PointStyle, PolygonStyle};
use geopdf_core::pdf::painter::{draw_geometry, GeometryStyles};
use geopdf_core::{GeoPdfError, Result};

pub const DEFAULT_SPACING: f64 = 100.0;
pub const DEFAULT_STROKE_WIDTH: f64 = 0.1;
/// Upper bound of generated grid lines
pub const MAX_LINES: f64 = 10_000.0;

/// Grid lines at a fixed meter spacing
pub struct GraticuleLayer {
    base: LayerBase,
    /// Distance between lines in meters
    pub spacing: f64,
    pub style: LineStringStyle,
    container: GeometryContainer,
}

impl GraticuleLayer {
    pub fn new(bbox: BoundingBox, spacing: f64) -> GraticuleLayer {
        GraticuleLayer {
            base: LayerBase::new("Grid-Layer", bbox),
            spacing,
            style: LineStringStyle {
                width: DEFAULT_STROKE_WIDTH,
                color: GRAY,
                ..Default::default()
            },
            container: GeometryContainer::new(),
        }
    }

    pub fn lines(&self) -> &GeometryContainer {
        &self.container
    }
}

impl MapLayer for GraticuleLayer {
    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn receive(&mut self, _talker: &ServerTalker) -> Result<()> {
        let bbox = self.base.bbox();
        let (ll, ur) = (bbox.ll(), bbox.ur());
        if !(self.spacing > 0.0 && self.spacing.is_finite()) {
            return Err(GeoPdfError::not_receivable(
                &self.base.name,
                format!("grid spacing must be positive, got {}", self.spacing),
            ));
        }
        let count =
            (bbox.geo_width() / self.spacing).ceil() + (bbox.geo_height() / self.spacing).ceil();
        if count > MAX_LINES {
            return Err(GeoPdfError::not_receivable(
                &self.base.name,
                format!("{} m grid spacing gives more than {} lines", self.spacing, MAX_LINES),
            ));
        }
        let crs = CoordinateTransformer::global().canonical();
        let line = |x0: f64, y0: f64, x1: f64, y1: f64| {
            DrawGeometry::line_string(
                &[
                    DirectPosition2D::new(crs, x0, y0),
                    DirectPosition2D::new(crs, x1, y1),
                ],
                AdditionalInfo::new(),
            )
        };
        let mut x = ll.east() + self.spacing;
        while x < ur.east() {
            self.container.add(line(x, ll.north(), x, ur.north()));
            x += self.spacing;
        }
        let mut y = ll.north() + self.spacing;
        while y < ur.north() {
            self.container.add(line(ll.east(), y, ur.east(), y));
            y += self.spacing;
        }
        debug!("{} grid lines", self.container.len());
        Ok(())
    }

    fn prepare(&mut self, margin: f64) -> Result<()> {
        self.container.reduce_content(self.base.bbox());
        self.container.scale(self.base.scale_factor());
        let (offset_x, offset_y) = self.base.update_offset()?;
        self.container.add_margin_offset(margin, offset_x, offset_y);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<()> {
        let (point, polygon) = (PointStyle::default(), PolygonStyle::default());
        let styles = GeometryStyles {
            point: &point,
            line: &self.style,
            polygon: &polygon,
        };
        ctx.surface.begin_layer(&self.base.name);
        for line in self.container.iter() {
            draw_geometry(ctx.surface, line, styles)?;
        }
        ctx.surface.end_layer();
        Ok(())
    }
}

impl<'a> Config<'a, LayerCfg> for GraticuleLayer {
    fn from_config(cfg: &LayerCfg) -> std::result::Result<Self, String> {
        let bbox = bbox_from_config(&cfg.bbox)?;
        let spacing = cfg.spacing.unwrap_or(DEFAULT_SPACING);
        if !(spacing > 0.0) {
            return Err(format!("Grid spacing must be positive, got {}", spacing));
        }
        let mut layer = GraticuleLayer::new(bbox, spacing);
        if let Some(ref name) = cfg.name {
            layer.base.name = name.clone();
        }
        if let Some(ref color) = cfg.color {
            layer.style.color = Color::from_config(color)?;
        }
        if let Some(width) = cfg.stroke_width {
            layer.style.width = width;
        }
        Ok(layer)
    }

    fn gen_config() -> String {
        let toml = r##"
#[[layer]]
#type = "graticule"
#bbox = { minx = 500000, miny = 5900000, maxx = 500500, maxy = 5900500 }
#spacing = 100 # meters
#color = "#808080"
#stroke_width = 0.1
"##;
        toml.to_string()
    }

    fn gen_runtime_config(&self) -> String {
        let bbox = self.base.bbox();
        format!(
            r#"
[[layer]]
type = "graticule"
name = "{}"
bbox = {{ minx = {}, miny = {}, maxx = {}, maxy = {} }}
spacing = {}
color = "{}"
stroke_width = {}
"#,
            self.base.name,
            bbox.ll().east(),
            bbox.ll().north(),
            bbox.ur().east(),
            bbox.ur().north(),
            self.spacing,
            self.style.color.to_hex(),
            self.style.width
        )
    }
}
