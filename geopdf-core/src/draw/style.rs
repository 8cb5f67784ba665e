//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{parse_length, Config, LineStyleCfg, PointStyleCfg, PolygonStyleCfg};
use crate::core::error::Result;
use crate::draw::color::{Color, BLACK};
use image::RgbaImage;
use std::str::FromStr;
use std::sync::Arc;

/// Outline of a point symbol
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointSymbol {
    Circle,
    Square,
    Triangle,
    TriangleUpside,
    TriangleLyingLeft,
    Diamond,
    Cross,
    Star,
    X,
    Hourglass,
    HourglassLying,
    HourglassLeft,
    HourglassRight,
}

impl FromStr for PointSymbol {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let symbol = match s.to_lowercase().as_str() {
            "circle" => PointSymbol::Circle,
            "square" => PointSymbol::Square,
            "triangle" => PointSymbol::Triangle,
            "triangle_upside" => PointSymbol::TriangleUpside,
            "triangle_lying_left" => PointSymbol::TriangleLyingLeft,
            "diamond" => PointSymbol::Diamond,
            "cross" => PointSymbol::Cross,
            "star" => PointSymbol::Star,
            "x" => PointSymbol::X,
            "hourglass" => PointSymbol::Hourglass,
            "hourglass_lying" => PointSymbol::HourglassLying,
            "hourglass_left" => PointSymbol::HourglassLeft,
            "hourglass_right" => PointSymbol::HourglassRight,
            _ => return Err(format!("Unknown point symbol `{}`", s)),
        };
        Ok(symbol)
    }
}

/// Raster image drawn instead of a point symbol
#[derive(Debug)]
pub struct Icon {
    pub image: RgbaImage,
    /// Width on the page in inches. Defaults to the point radius.
    pub width: Option<f64>,
}

impl Icon {
    pub fn open(path: &str) -> Result<Icon> {
        let image = image::open(path)?.to_rgba8();
        Ok(Icon { image, width: None })
    }
    pub fn with_width_mm(mut self, millimeters: f64) -> Icon {
        self.width = Some(millimeters * crate::core::config::MM_TO_INCH);
        self
    }
    pub fn with_width_cm(mut self, centimeters: f64) -> Icon {
        self.width = Some(centimeters * crate::core::config::CM_TO_INCH);
        self
    }
    pub fn with_width_inch(mut self, inches: f64) -> Icon {
        self.width = Some(inches);
        self
    }
}

#[derive(Clone, Debug)]
pub struct PointStyle {
    pub symbol: PointSymbol,
    /// Symbol size in points
    pub radius: f64,
    pub line_width: f64,
    pub color: Color,
    pub filled: bool,
    pub fill_color: Color,
    /// Symbol centered on the position instead of starting there
    pub centered: bool,
    pub icon: Option<Arc<Icon>>,
}

impl Default for PointStyle {
    fn default() -> Self {
        PointStyle {
            symbol: PointSymbol::Circle,
            radius: 1.0,
            line_width: 1.0,
            color: BLACK,
            filled: false,
            fill_color: BLACK,
            centered: false,
            icon: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineStringStyle {
    pub width: f64,
    pub color: Color,
    /// Mark vertices
    pub points: bool,
    pub point_radius: f64,
}

impl Default for LineStringStyle {
    fn default() -> Self {
        LineStringStyle {
            width: 1.0,
            color: BLACK,
            points: false,
            point_radius: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolygonStyle {
    pub stroke_width: f64,
    pub color: Color,
    pub filled: bool,
    pub fill_color: Color,
    /// Mark vertices
    pub points: bool,
    pub point_radius: f64,
}

impl Default for PolygonStyle {
    fn default() -> Self {
        PolygonStyle {
            stroke_width: 1.0,
            color: BLACK,
            filled: true,
            fill_color: BLACK,
            points: false,
            point_radius: 1.0,
        }
    }
}

/// Styles of a feature service layer
#[derive(Clone, Debug, Default)]
pub struct WfsStyle {
    pub point: PointStyle,
    pub line: LineStringStyle,
    pub polygon: PolygonStyle,
}

fn color_or(cfg: &Option<crate::core::config::ColorCfg>, default: Color) -> std::result::Result<Color, String> {
    cfg.as_ref()
        .map(Color::from_config)
        .unwrap_or(Ok(default))
}

impl<'a> Config<'a, PointStyleCfg> for PointStyle {
    fn from_config(cfg: &PointStyleCfg) -> std::result::Result<Self, String> {
        let default = PointStyle::default();
        let symbol = match cfg.symbol {
            Some(ref s) => s.parse()?,
            None => default.symbol,
        };
        let icon = match cfg.icon {
            Some(ref path) => match Icon::open(path) {
                Ok(icon) => {
                    let icon = match cfg.icon_width {
                        Some(ref width) => icon.with_width_inch(parse_length(width)?),
                        None => icon,
                    };
                    Some(Arc::new(icon))
                }
                Err(e) => {
                    warn!("Icon `{}` not readable, using symbol instead: {}", path, e);
                    None
                }
            },
            None => None,
        };
        Ok(PointStyle {
            symbol,
            radius: cfg.radius.unwrap_or(default.radius),
            line_width: cfg.line_width.unwrap_or(default.line_width),
            color: color_or(&cfg.color, default.color)?,
            filled: cfg.filled.unwrap_or(default.filled),
            fill_color: color_or(&cfg.fill_color, default.fill_color)?,
            centered: cfg.centered.unwrap_or(default.centered),
            icon,
        })
    }
    fn gen_config() -> String {
        let toml = r##"
#[layer.style.point]
#symbol = "circle"
#radius = 1.0
#line_width = 1.0
#color = "#000000"
#filled = false
#fill_color = "#000000"
#centered = false
#icon = "marker.png"
#icon_width = "5mm"
"##;
        toml.to_string()
    }
}

impl<'a> Config<'a, LineStyleCfg> for LineStringStyle {
    fn from_config(cfg: &LineStyleCfg) -> std::result::Result<Self, String> {
        let default = LineStringStyle::default();
        Ok(LineStringStyle {
            width: cfg.width.unwrap_or(default.width),
            color: color_or(&cfg.color, default.color)?,
            points: cfg.points.unwrap_or(default.points),
            point_radius: cfg.point_radius.unwrap_or(default.point_radius),
        })
    }
    fn gen_config() -> String {
        let toml = r##"
#[layer.style.line]
#width = 1.0
#color = "#000000"
#points = false
#point_radius = 1.0
"##;
        toml.to_string()
    }
}

impl<'a> Config<'a, PolygonStyleCfg> for PolygonStyle {
    fn from_config(cfg: &PolygonStyleCfg) -> std::result::Result<Self, String> {
        let default = PolygonStyle::default();
        Ok(PolygonStyle {
            stroke_width: cfg.stroke_width.unwrap_or(default.stroke_width),
            color: color_or(&cfg.color, default.color)?,
            filled: cfg.filled.unwrap_or(default.filled),
            fill_color: color_or(&cfg.fill_color, default.fill_color)?,
            points: cfg.points.unwrap_or(default.points),
            point_radius: cfg.point_radius.unwrap_or(default.point_radius),
        })
    }
    fn gen_config() -> String {
        let toml = r##"
#[layer.style.polygon]
#stroke_width = 1.0
#color = "#000000"
#filled = true
#fill_color = "#000000"
"##;
        toml.to_string()
    }
}

#[test]
fn test_style_config() {
    use crate::core::config::ColorCfg;
    let cfg = PointStyleCfg {
        symbol: Some("Hourglass_Left".to_string()),
        radius: Some(4.0),
        color: Some(ColorCfg::Hex("#ff0000".to_string())),
        icon: Some("/nonexistent/icon.png".to_string()),
        ..Default::default()
    };
    let style = PointStyle::from_config(&cfg).unwrap();
    assert_eq!(style.symbol, PointSymbol::HourglassLeft);
    assert_eq!(style.radius, 4.0);
    assert_eq!(style.color, crate::draw::color::RED);
    assert_eq!(style.line_width, 1.0);
    assert!(style.icon.is_none());

    let cfg = PointStyleCfg {
        symbol: Some("blob".to_string()),
        ..Default::default()
    };
    assert!(PointStyle::from_config(&cfg).is_err());

    let polygon = PolygonStyle::from_config(&PolygonStyleCfg::default()).unwrap();
    assert_eq!(polygon, PolygonStyle::default());
    assert!(polygon.filled);
}

#[test]
fn test_style_templates() {
    use crate::core::config::StyleCfg;
    let template = [
        PointStyle::gen_config(),
        LineStringStyle::gen_config(),
        PolygonStyle::gen_config(),
    ]
    .concat();
    let active: Vec<&str> = template
        .lines()
        .map(|line| line.strip_prefix('#').unwrap_or(line))
        .collect();
    let value: toml::Value = toml::from_str(&active.join("\n")).unwrap();
    let style: StyleCfg = value["layer"]["style"].clone().try_into().unwrap();

    let point = PointStyle::from_config(style.point.as_ref().unwrap()).unwrap();
    assert_eq!(point.symbol, PointSymbol::Circle);
    assert_eq!(point.color, BLACK);
    // marker.png doesn't exist
    assert!(point.icon.is_none());
    let line = LineStringStyle::from_config(style.line.as_ref().unwrap()).unwrap();
    assert_eq!(line, LineStringStyle::default());
    let polygon = PolygonStyle::from_config(style.polygon.as_ref().unwrap()).unwrap();
    assert_eq!(polygon, PolygonStyle::default());
}
