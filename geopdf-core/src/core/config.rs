//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use regex::Regex;
use serde::Deserialize;
use std;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use tera::{Context, Tera};
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self, String>;
    /// Generate configuration template
    fn gen_config() -> String;
    /// Generate configuration template with runtime information
    fn gen_runtime_config(&self) -> String {
        Self::gen_config()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationCfg {
    pub document: DocumentCfg,
    #[serde(default)]
    pub tiles: TilesCfg,
    pub map: Option<MapCfg>,
    #[serde(rename = "layer", default)]
    pub layers: Vec<LayerCfg>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DocumentCfg {
    /// File name without extension (Default: GeospatialPDF4J_<epoch_ms>)
    pub name: Option<String>,
    pub output_dir: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Page width with unit suffix mm, cm, in or pt
    #[serde(default = "default_page_width")]
    pub page_width: String,
    /// Page height with unit suffix mm, cm, in or pt
    #[serde(default = "default_page_height")]
    pub page_height: String,
    /// Page margin in points
    pub margin: Option<f64>,
    /// Draw a frame around the printable area
    #[serde(default)]
    pub print_margins: bool,
    /// CRS of the georeferencing points (EPSG:25832 or EPSG:4326)
    pub georeference_crs: Option<String>,
}

pub fn default_page_width() -> String {
    "297mm".to_string()
}

pub fn default_page_height() -> String {
    "210mm".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct TilesCfg {
    /// Maximal width and height of a single image request
    #[serde(default = "default_max_request_pixel")]
    pub max_request_pixel: u32,
    /// Images estimated above this size are streamed tile by tile
    #[serde(default = "default_max_image_mb")]
    pub max_image_mb: u32,
    /// Number of requests per tile before giving up
    #[serde(default = "default_max_request_tries")]
    pub max_request_tries: u32,
    /// Parallel tile requests (Default: number of CPUs)
    pub threads: Option<usize>,
}

pub const DEFAULT_MAX_REQUEST_PIXEL: u32 = 1000;
pub const DEFAULT_MAX_IMAGE_MB: u32 = 200;
pub const DEFAULT_MAX_REQUEST_TRIES: u32 = 2;

pub fn default_max_request_pixel() -> u32 {
    DEFAULT_MAX_REQUEST_PIXEL
}

pub fn default_max_image_mb() -> u32 {
    DEFAULT_MAX_IMAGE_MB
}

pub fn default_max_request_tries() -> u32 {
    DEFAULT_MAX_REQUEST_TRIES
}

impl Default for TilesCfg {
    fn default() -> Self {
        TilesCfg {
            max_request_pixel: DEFAULT_MAX_REQUEST_PIXEL,
            max_image_mb: DEFAULT_MAX_IMAGE_MB,
            max_request_tries: DEFAULT_MAX_REQUEST_TRIES,
            threads: None,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct MapCfg {
    /// Explicit map extent instead of the union of all layers
    pub bbox: Option<BboxCfg>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct BboxCfg {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
    /// Reference system of the coordinates (Default: EPSG:25832)
    pub crs: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LayerCfg {
    /// wms, wfs, track or graticule
    #[serde(rename = "type")]
    pub layer_type: String,
    pub name: Option<String>,
    pub bbox: BboxCfg,
    // Web services
    pub url: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub layers: Vec<String>,
    #[serde(default)]
    pub dpis: Vec<u32>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub opacities: Vec<u8>,
    // Track files
    pub path: Option<String>,
    pub source_crs: Option<String>,
    // Graticule
    pub spacing: Option<f64>,
    pub color: Option<ColorCfg>,
    pub stroke_width: Option<f64>,
    pub style: Option<StyleCfg>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ColorCfg {
    Hex(String),
    Rgb([u8; 3]),
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct StyleCfg {
    pub point: Option<PointStyleCfg>,
    pub colored_point: Option<PointStyleCfg>,
    pub line: Option<LineStyleCfg>,
    pub polygon: Option<PolygonStyleCfg>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct PointStyleCfg {
    /// circle, square, triangle, triangle_upside, triangle_lying_left, diamond,
    /// cross, star, x, hourglass, hourglass_lying, hourglass_left, hourglass_right
    pub symbol: Option<String>,
    pub radius: Option<f64>,
    pub line_width: Option<f64>,
    pub color: Option<ColorCfg>,
    pub filled: Option<bool>,
    pub fill_color: Option<ColorCfg>,
    pub centered: Option<bool>,
    /// PNG file drawn instead of the symbol
    pub icon: Option<String>,
    /// Icon width with unit suffix
    pub icon_width: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LineStyleCfg {
    pub width: Option<f64>,
    pub color: Option<ColorCfg>,
    pub points: Option<bool>,
    pub point_radius: Option<f64>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct PolygonStyleCfg {
    pub stroke_width: Option<f64>,
    pub color: Option<ColorCfg>,
    pub filled: Option<bool>,
    pub fill_color: Option<ColorCfg>,
    pub points: Option<bool>,
    pub point_radius: Option<f64>,
}

pub const DEFAULT_CONFIG: &'static str = r#"
[document]
output_dir = "."
#name = "map"
author = ""
subject = ""
page_width = "297mm"
page_height = "210mm"
margin = 50 # points
print_margins = false
#georeference_crs = "EPSG:4326"

[tiles]
max_request_pixel = 1000
max_image_mb = 200
max_request_tries = 2
#threads = 4

#[map]
#bbox = { minx = 500000, miny = 5900000, maxx = 500500, maxy = 5900500, crs = "EPSG:25832" }
"#;

/// Length with unit suffix converted to inches. Without suffix millimeters
/// are assumed.
pub fn parse_length(length: &str) -> Result<f64, String> {
    let re = Regex::new(r"^\s*(-?[0-9]*\.?[0-9]+)\s*(mm|cm|in|pt)?\s*$").unwrap();
    let caps = re
        .captures(length)
        .ok_or(format!("Invalid length `{}` (expected e.g. 297mm, 21cm, 8.5in)", length))?;
    let value: f64 = caps[1]
        .parse()
        .map_err(|_| format!("Invalid number in length `{}`", length))?;
    let inches = match caps.get(2).map(|m| m.as_str()).unwrap_or("mm") {
        "cm" => value * CM_TO_INCH,
        "in" => value,
        "pt" => value / 72.0,
        _ => value * MM_TO_INCH,
    };
    Ok(inches)
}

pub const MM_TO_INCH: f64 = 0.03937;
pub const CM_TO_INCH: f64 = 0.3937;

/// Load and parse the config file into an config struct.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T, String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err("Could not find config file!".to_string());
        }
    };
    let mut config_toml = String::new();
    if let Err(err) = file.read_to_string(&mut config_toml) {
        return Err(format!("Error while reading config: [{}]", err));
    };

    parse_config(config_toml, path)
}

/// Parse the configuration into an config struct.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T, String> {
    // Parse template
    let mut tera = Tera::default();
    tera.add_raw_template(path, &config_toml)
        .map_err(|e| format!("Template error: {}", e))?;
    let mut context = Context::new();
    let mut env = HashMap::new();
    for (key, value) in env::vars() {
        env.insert(key, value);
    }
    context.insert("env", &env);
    let toml = tera.render(path, &context).map_err(|e| {
        format!(
            "Template error: {}",
            e.source().map(|s| s.to_string()).unwrap_or(e.to_string())
        )
    })?;

    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| format!("{} - {}", path, err))
}
