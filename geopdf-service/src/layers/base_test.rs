//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::layers::{bbox_from_config, GraticuleLayer, Layer, LayerBase, LayerState, MapLayer};
use crate::mock_fetcher::MockFetcher;
use crate::talker::ServerTalker;
use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::core::config::{BboxCfg, TilesCfg};
use geopdf_core::core::crs::CANONICAL_CRS;
use geopdf_core::GeoPdfError;

fn bbox(minx: f64, miny: f64, maxx: f64, maxy: f64) -> BoundingBox {
    BoundingBox::from_coords(CANONICAL_CRS, minx, miny, maxx, maxy).unwrap()
}

fn map_bbox() -> BoundingBox {
    bbox(500000.0, 5900000.0, 501000.0, 5901000.0)
}

fn assert_near(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

#[test]
fn test_measure() {
    let mut base = LayerBase::new("test", bbox(500250.0, 5900500.0, 500750.0, 5901000.0));
    assert_eq!(base.state(), LayerState::Constructed);
    base.measure(&map_bbox(), 10.0, 10.0).unwrap();
    assert_eq!(base.state(), LayerState::Measured);
    assert_near(base.inch_width(), 5.0);
    assert_near(base.inch_height(), 5.0);
    assert_near(base.point_width(), 360.0);
    // map width over the distance to the map origin
    assert_eq!(base.offset(), (2880.0, 1440.0));
    assert_near(base.scale_factor(), 0.72);

    let (x, y) = base.update_offset().unwrap();
    assert_near(x, 180.0);
    assert_near(y, 360.0);
    assert_eq!(base.offset(), (x, y));
}

#[test]
fn test_measure_at_origin() {
    let mut base = LayerBase::new("test", map_bbox());
    base.measure(&map_bbox(), 8.0, 8.0).unwrap();
    assert_eq!(base.offset(), (0.0, 0.0));
    assert_eq!(base.update_offset().unwrap(), (0.0, 0.0));
    assert_near(base.scale_factor(), 8.0 * 72.0 / 1000.0);
}

#[test]
fn test_offset_outside_map() {
    // layer starting left of and below an explicit map extent
    let mut base = LayerBase::new("test", bbox(499750.0, 5899500.0, 500250.0, 5900000.0));
    base.measure(&map_bbox(), 10.0, 10.0).unwrap();
    let (x, y) = base.update_offset().unwrap();
    assert_near(x, 180.0);
    assert_near(y, 360.0);
}

#[test]
fn test_measure_errors() {
    let mut base = LayerBase::new("test", map_bbox());
    assert!(base.map_bbox().is_err());
    match base.update_offset() {
        Err(GeoPdfError::LayerInchesUncomputable(name)) => assert_eq!(name, "test"),
        _ => panic!("offset without map"),
    }
    match base.measure(&map_bbox(), 0.0, 5.0) {
        Err(GeoPdfError::LayerInchesUncomputable(_)) => {}
        _ => panic!("measure without map inches"),
    }
    assert_eq!(base.state(), LayerState::Constructed);

    base.measure(&map_bbox(), 5.0, 5.0).unwrap();
    match base.measure(&map_bbox(), 5.0, 5.0) {
        Err(GeoPdfError::LayerState { state, action, .. }) => {
            assert_eq!(state, "Measured");
            assert_eq!(action, "measure");
        }
        _ => panic!("measured twice"),
    }
}

#[test]
fn test_lifecycle_order() {
    let fetcher = MockFetcher::new();
    let talker = ServerTalker::new(Box::new(fetcher), &TilesCfg::default()).unwrap();
    let mut layer = Layer::Graticule(GraticuleLayer::new(map_bbox(), 100.0));

    match layer.receive(&talker) {
        Err(GeoPdfError::LayerState { layer, state, action }) => {
            assert_eq!(layer, "Grid-Layer");
            assert_eq!(state, "Constructed");
            assert_eq!(action, "receive");
        }
        _ => panic!("received before measuring"),
    }
    layer.base_mut().measure(&map_bbox(), 5.0, 5.0).unwrap();
    assert!(layer.prepare(50.0).is_err());
    layer.receive(&talker).unwrap();
    assert_eq!(layer.state(), LayerState::Received);
    assert!(layer.receive(&talker).is_err());
    layer.prepare(50.0).unwrap();
    assert_eq!(layer.state(), LayerState::Prepared);
    layer.terminate();
    assert_eq!(layer.state(), LayerState::Terminal);
    assert!(layer.prepare(50.0).is_err());
}

#[test]
fn test_bbox_from_config() {
    let cfg = BboxCfg {
        minx: 500000.0,
        miny: 5900000.0,
        maxx: 500500.0,
        maxy: 5900500.0,
        crs: None,
    };
    let bbox = bbox_from_config(&cfg).unwrap();
    assert_eq!(bbox.geo_width(), 500.0);

    let cfg = BboxCfg {
        minx: 9.0,
        miny: 53.0,
        maxx: 9.01,
        maxy: 53.01,
        crs: Some("EPSG:4326".to_string()),
    };
    let bbox = bbox_from_config(&cfg).unwrap();
    assert!(bbox.ll().east() > 499000.0 && bbox.ll().east() < 501000.0);
    assert!(bbox.geo_height() > 1100.0 && bbox.geo_height() < 1120.0);

    let cfg = BboxCfg {
        minx: 500500.0,
        miny: 5900000.0,
        maxx: 500000.0,
        maxy: 5900500.0,
        crs: None,
    };
    assert!(bbox_from_config(&cfg).is_err());

    let cfg = BboxCfg {
        crs: Some("EPSG:99999".to_string()),
        ..cfg
    };
    assert!(bbox_from_config(&cfg).is_err());
}
