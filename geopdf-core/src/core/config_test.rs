//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{
    parse_config, parse_length, read_config, ApplicationCfg, ColorCfg, DEFAULT_CONFIG,
};

const EXAMPLE: &str = r##"
[document]
output_dir = "/tmp"
name = "bavaria"
author = "Survey"
page_width = "29.7cm"
page_height = "21cm"
margin = 36

[tiles]
max_request_pixel = 2048

[[layer]]
type = "wms"
name = "topo"
url = "https://example.com/wms?"
version = "1.3.0"
layers = ["topo", "roads"]
dpis = [150]
bbox = { minx = 10.0, miny = 50.0, maxx = 11.0, maxy = 51.0, crs = "EPSG:4326" }

[[layer]]
type = "graticule"
spacing = 1000
color = "#808080"
stroke_width = 0.1
bbox = { minx = 500000, miny = 5900000, maxx = 501000, maxy = 5901000 }

[[layer]]
type = "track"
path = "track.csv"
source_crs = "EPSG:4326"
bbox = { minx = 10.0, miny = 50.0, maxx = 11.0, maxy = 51.0, crs = "EPSG:4326" }
[layer.style.point]
symbol = "square"
color = [255, 0, 0]
"##;

#[test]
fn test_parse_example() {
    let config: ApplicationCfg = parse_config(EXAMPLE.to_string(), "example.toml").unwrap();
    assert_eq!(config.document.output_dir, "/tmp");
    assert_eq!(config.document.name, Some("bavaria".to_string()));
    assert_eq!(config.document.margin, Some(36.0));
    assert!(!config.document.print_margins);
    assert_eq!(config.tiles.max_request_pixel, 2048);
    assert_eq!(config.tiles.max_image_mb, 200);
    assert_eq!(config.tiles.max_request_tries, 2);
    assert_eq!(config.layers.len(), 3);
    assert_eq!(config.layers[0].layer_type, "wms");
    assert_eq!(config.layers[0].layers, vec!["topo", "roads"]);
    assert_eq!(config.layers[0].dpis, vec![150]);
    assert_eq!(config.layers[0].bbox.crs, Some("EPSG:4326".to_string()));
    assert_eq!(config.layers[1].spacing, Some(1000.0));
    assert_eq!(config.layers[1].color, Some(ColorCfg::Hex("#808080".to_string())));
    assert_eq!(config.layers[1].bbox.crs, None);
    let style = config.layers[2].style.as_ref().unwrap();
    let point = style.point.as_ref().unwrap();
    assert_eq!(point.symbol, Some("square".to_string()));
    assert_eq!(point.color, Some(ColorCfg::Rgb([255, 0, 0])));
}

#[test]
fn test_default_config() {
    let config: ApplicationCfg = parse_config(DEFAULT_CONFIG.to_string(), "").unwrap();
    assert_eq!(config.document.page_width, "297mm");
    assert_eq!(config.tiles.max_request_pixel, 1000);
    assert!(config.layers.is_empty());
    assert!(config.map.is_none());
}

#[test]
fn test_env_template() {
    std::env::set_var("GEOPDF_TEST_OUTDIR", "/var/maps");
    let toml = r#"
        [document]
        output_dir = "{{env.GEOPDF_TEST_OUTDIR}}"
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(config.document.output_dir, "/var/maps");

    let toml = r#"
        [document]
        output_dir = "${HOME}"
        "#;
    // only tera expressions are expanded
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(config.document.output_dir, "${HOME}");
}

#[test]
fn test_parse_error() {
    let config: Result<ApplicationCfg, _> = parse_config("[document]\n".to_string(), "doc.toml");
    let err = config.err().unwrap();
    assert!(err.starts_with("doc.toml - "));
    assert!(err.contains("missing field `output_dir`"));

    let config: Result<ApplicationCfg, _> = read_config("wrongfile");
    assert_eq!("Could not find config file!", config.err().unwrap());
}

#[test]
fn test_lengths() {
    assert!((parse_length("297mm").unwrap() - 297.0 * 0.03937).abs() < 1e-9);
    assert!((parse_length("21 cm").unwrap() - 21.0 * 0.3937).abs() < 1e-9);
    assert_eq!(parse_length("8.5in").unwrap(), 8.5);
    assert_eq!(parse_length("144pt").unwrap(), 2.0);
    assert!(parse_length("wide").is_err());
}
