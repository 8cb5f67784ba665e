//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::layers::{bbox_from_config, DrawContext, LayerBase, MapLayer};
use crate::talker::ServerTalker;
use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::core::config::{Config, LayerCfg};
use geopdf_core::core::crs::{Crs, WGS84};
use geopdf_core::core::position::DirectPosition2D;
use geopdf_core::core::transform::CoordinateTransformer;
use geopdf_core::draw::color::{gradient_white_to_channel, Channel, Color};
use geopdf_core::draw::container::GeometryContainer;
use geopdf_core::draw::geometry::DrawGeometry;
use geopdf_core::draw::info::AdditionalInfo;
use geopdf_core::draw::style::{LineStringStyle, PointStyle, PolygonStyle};
use geopdf_core::pdf::painter::{draw_geometry, GeometryStyles};
use geopdf_core::{GeoPdfError, Result};
use std::fs;
use std::path::PathBuf;

/// Recorded position with its height
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackPoint {
    pub position: DirectPosition2D,
    pub height: f64,
}

/// Parse one CSV row `ord0,ord1,height`.
///
/// Rows of geographic systems are read latitude first.
pub fn parse_row(line: &str, crs: Crs) -> std::result::Result<TrackPoint, String> {
    let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
    if fields.len() < 3 {
        return Err(format!("expected 3 fields, got {}", fields.len()));
    }
    let mut values = [0.0; 3];
    for (value, field) in values.iter_mut().zip(fields.iter()) {
        *value = field
            .parse()
            .map_err(|_| format!("`{}` is not a number", field))?;
    }
    let position = if crs.is_geographic() {
        DirectPosition2D::new(crs, values[1], values[0])
    } else {
        DirectPosition2D::new(crs, values[0], values[1])
    };
    Ok(TrackPoint {
        position,
        height: values[2],
    })
}

/// Read all valid rows of a track file, skipping malformed ones
pub fn read_track(content: &str, crs: Crs) -> Vec<TrackPoint> {
    let transformer = CoordinateTransformer::global();
    let mut points = Vec::new();
    for (no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let point = parse_row(line, crs).and_then(|point| {
            transformer
                .to_canonical(&point.position)
                .map(|position| TrackPoint { position, ..point })
                .map_err(|e| e.to_string())
        });
        match point {
            Ok(point) => points.push(point),
            Err(e) => warn!("Skipping track line {}: {}", no + 1, e),
        }
    }
    points
}

/// GPS track from a CSV file
pub struct TrackLayer {
    base: LayerBase,
    pub path: PathBuf,
    pub source_crs: Crs,
    pub point_style: PointStyle,
    /// Template of the height colored points
    pub colored_point_style: PointStyle,
    pub line_style: LineStringStyle,
    track: GeometryContainer,
    colored: GeometryContainer,
    colors: Vec<Color>,
}

impl TrackLayer {
    pub fn new<P: Into<PathBuf>>(bbox: BoundingBox, path: P, source_crs: Crs) -> TrackLayer {
        TrackLayer {
            base: LayerBase::new("GPS-Layer", bbox),
            path: path.into(),
            source_crs,
            point_style: PointStyle::default(),
            colored_point_style: PointStyle::default(),
            line_style: LineStringStyle::default(),
            track: GeometryContainer::new(),
            colored: GeometryContainer::new(),
            colors: Vec::new(),
        }
    }

    /// Track points and the line connecting them
    pub fn track(&self) -> &GeometryContainer {
        &self.track
    }

    pub fn colored_points(&self) -> &[DrawGeometry] {
        &self.colored.points
    }

    /// Colors of the colored points, by height
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    fn colored_style(&self, color: Color) -> PointStyle {
        PointStyle {
            radius: self.point_style.radius,
            color,
            fill_color: color,
            filled: true,
            ..self.colored_point_style.clone()
        }
    }
}

fn point_info(point: &TrackPoint) -> AdditionalInfo {
    AdditionalInfo::new()
        .with("Northing", point.position.north().to_string())
        .with("Easting", point.position.east().to_string())
        .with("Height", point.height.to_string())
}

impl MapLayer for TrackLayer {
    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn receive(&mut self, _talker: &ServerTalker) -> Result<()> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            GeoPdfError::not_receivable(&self.base.name, format!("{}: {}", self.path.display(), e))
        })?;
        let points = read_track(&content, self.source_crs);
        if points.is_empty() {
            return Err(GeoPdfError::not_receivable(
                &self.base.name,
                format!("no track points in {}", self.path.display()),
            ));
        }
        info!("{} track points read from {}", points.len(), self.path.display());

        let (min, max) = points.iter().fold((f64::MAX, f64::MIN), |(min, max), p| {
            (min.min(p.height), max.max(p.height))
        });
        for point in &points {
            self.track.add(DrawGeometry::point(&point.position, point_info(point)));
            self.colored
                .add(DrawGeometry::point(&point.position, point_info(point)));
            self.colors
                .push(gradient_white_to_channel(Channel::Red, point.height, min, max));
        }
        if points.len() > 1 {
            let positions: Vec<DirectPosition2D> = points.iter().map(|p| p.position).collect();
            let mut line = DrawGeometry::line_string(&positions, AdditionalInfo::new());
            let length = line.length();
            line.info.add("Point Number", points.len().to_string());
            line.info.add("Length", format!("{}m", length));
            line.info.add("Max height", format!("{}(m)", max));
            line.info.add("Min height", format!("{}(m)", min));
            self.track.add(line);
        }
        Ok(())
    }

    fn prepare(&mut self, margin: f64) -> Result<()> {
        let scale = self.base.scale_factor();
        let (offset_x, offset_y) = self.base.update_offset()?;
        for container in [&mut self.track, &mut self.colored].iter_mut() {
            container.reduce_content(self.base.bbox());
            container.scale(scale);
            container.add_margin_offset(margin, offset_x, offset_y);
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut DrawContext) -> Result<()> {
        let polygon = PolygonStyle::default();
        let styles = GeometryStyles {
            point: &self.point_style,
            line: &self.line_style,
            polygon: &polygon,
        };
        ctx.surface.begin_layer(&self.base.name);

        ctx.surface.begin_layer("GPS-Track");
        for line in self.track.line_strings.iter() {
            draw_geometry(ctx.surface, line, styles)?;
        }
        ctx.surface.end_layer();

        ctx.surface.begin_layer("GPS-Points");
        for point in self.track.points.iter() {
            draw_geometry(ctx.surface, point, styles)?;
        }
        ctx.surface.end_layer();

        ctx.surface.begin_layer("Colored GPS-Points");
        for (point, color) in self.colored.points.iter().zip(self.colors.iter()) {
            let style = self.colored_style(*color);
            draw_geometry(
                ctx.surface,
                point,
                GeometryStyles {
                    point: &style,
                    line: &self.line_style,
                    polygon: &polygon,
                },
            )?;
        }
        ctx.surface.end_layer();

        ctx.surface.end_layer();
        Ok(())
    }
}

impl<'a> Config<'a, LayerCfg> for TrackLayer {
    fn from_config(cfg: &LayerCfg) -> std::result::Result<Self, String> {
        let bbox = bbox_from_config(&cfg.bbox)?;
        let path = cfg
            .path
            .as_ref()
            .ok_or_else(|| "Track layer without path".to_string())?;
        let source_crs = match cfg.source_crs {
            Some(ref crs) => Crs::parse(crs).map_err(|e| e.to_string())?,
            None => WGS84,
        };
        let mut layer = TrackLayer::new(bbox, path, source_crs);
        if let Some(ref name) = cfg.name {
            layer.base.name = name.clone();
        }
        if let Some(ref style) = cfg.style {
            if let Some(ref point) = style.point {
                layer.point_style = PointStyle::from_config(point)?;
            }
            if let Some(ref point) = style.colored_point {
                layer.colored_point_style = PointStyle::from_config(point)?;
            }
            if let Some(ref line) = style.line {
                layer.line_style = LineStringStyle::from_config(line)?;
            }
        }
        Ok(layer)
    }

    fn gen_config() -> String {
        let toml = r#"
#[[layer]]
#type = "track"
#path = "track.csv" # rows of latitude,longitude,height
#source_crs = "EPSG:4326"
#bbox = { minx = 500000, miny = 5900000, maxx = 500500, maxy = 5900500 }
"#;
        toml.to_string()
    }

    fn gen_runtime_config(&self) -> String {
        let bbox = self.base.bbox();
        format!(
            r#"
[[layer]]
type = "track"
name = "{}"
path = "{}"
source_crs = "{}"
bbox = {{ minx = {}, miny = {}, maxx = {}, maxy = {} }}
"#,
            self.base.name,
            self.path.display(),
            self.source_crs,
            bbox.ll().east(),
            bbox.ll().north(),
            bbox.ur().east(),
            bbox.ur().north()
        )
    }
}
