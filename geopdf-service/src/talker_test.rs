//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::capabilities_test::WMS_CAPABILITIES;
use crate::gml_test::FEATURE_COLLECTION;
use crate::mock_fetcher::{param, MockFetcher};
use crate::talker::{request_url, MapRequest, ServerTalker};
use geopdf_core::core::bbox::BoundingBox;
use geopdf_core::core::config::TilesCfg;
use geopdf_core::core::crs::CANONICAL_CRS;
use geopdf_core::raster::tile::TileArray;
use geopdf_core::GeoPdfError;

fn talker(fetcher: &MockFetcher, tries: u32) -> ServerTalker {
    let cfg = TilesCfg {
        max_request_tries: tries,
        threads: Some(2),
        ..Default::default()
    };
    ServerTalker::new(Box::new(fetcher.clone()), &cfg).unwrap()
}

fn map_request(version: &str) -> MapRequest {
    MapRequest {
        url: "http://localhost/wms?map=test".to_string(),
        version: version.to_string(),
        layer: "dop".to_string(),
        style: "default".to_string(),
        crs: CANONICAL_CRS,
    }
}

#[test]
fn test_request_url() {
    assert_eq!(
        request_url("http://localhost/wms", &[("A", "1".to_string()), ("B", "x y".to_string())]),
        "http://localhost/wms?A=1&B=x%20y"
    );
    assert_eq!(
        request_url("http://localhost/wms?map=a", &[("A", "1".to_string())]),
        "http://localhost/wms?map=a&A=1"
    );
    assert_eq!(
        request_url("http://localhost/wms?", &[("A", "1".to_string())]),
        "http://localhost/wms?A=1"
    );
}

#[test]
fn test_getmap_url() {
    let bbox = BoundingBox::from_coords(CANONICAL_CRS, 500000.0, 5900000.0, 500250.0, 5900250.0).unwrap();
    let url = map_request("1.3.0").url(&bbox, 1000, 800);
    assert!(url.starts_with("http://localhost/wms?map=test&"));
    assert_eq!(param(&url, "REQUEST"), Some("GETMAP"));
    assert_eq!(param(&url, "VERSION"), Some("1.3.0"));
    assert_eq!(param(&url, "WIDTH"), Some("1000"));
    assert_eq!(param(&url, "HEIGHT"), Some("800"));
    assert_eq!(param(&url, "FORMAT"), Some("image/png"));
    assert_eq!(param(&url, "TRANSPARENT"), Some("TRUE"));
    assert_eq!(param(&url, "BBOX"), Some("500000,5900000,500250,5900250"));
    assert_eq!(param(&url, "CRS"), Some("EPSG:25832"));
    assert_eq!(param(&url, "LAYERS"), Some("dop"));
    assert_eq!(param(&url, "STYLES"), Some("default"));

    let url = map_request("1.1.1").url(&bbox, 10, 10);
    assert_eq!(param(&url, "SRS"), Some("EPSG:25832"));
    assert_eq!(param(&url, "CRS"), None);
}

#[test]
fn test_capabilities() {
    let fetcher = MockFetcher::new().with_response("GETCAPABILITIES", WMS_CAPABILITIES);
    let talker = talker(&fetcher, 2);
    let caps = talker.capabilities("http://localhost/wms", "1.3.0").unwrap();
    assert!(caps.has_layer("dop"));
    assert_eq!(caps.max_request_pixel(1000), 800);
    let url = &fetcher.requests()[0];
    assert_eq!(param(url, "SERVICE"), Some("WMS"));
    assert_eq!(param(url, "REQUEST"), Some("GETCAPABILITIES"));

    let talker = self::talker(&MockFetcher::new(), 2);
    match talker.capabilities("http://localhost/wms", "1.3.0") {
        Err(GeoPdfError::CapabilitiesRequest(_)) => {}
        other => panic!("unexpected result {:?}", other.map(|c| c.layers)),
    }
}

#[test]
fn test_fetch_tiles() {
    let fetcher = MockFetcher::new();
    let talker = talker(&fetcher, 2);
    let bbox = BoundingBox::from_coords(CANONICAL_CRS, 500000.0, 5900000.0, 501000.0, 5901000.0).unwrap();
    let mut tiles = TileArray::new(&bbox, 40, 40, 20).unwrap();
    talker.fetch_tiles(&map_request("1.3.0"), tiles.tiles_mut());
    assert_eq!(fetcher.count("REQUEST=GETMAP"), 4);
    for tile in tiles.tiles() {
        let image = tile.image.as_ref().unwrap();
        assert_eq!(image.dimensions(), (20, 20));
        assert_eq!(tile.tries, 1);
        // shaded by the tile's left edge
        let shade = (tile.bbox().ll().east() as u64 % 256) as u8;
        assert_eq!(image.get_pixel(10, 10).0, [shade, 100, 0, 255]);
    }
    assert_eq!(talker.stats.results("WMS.dop.tries").len, 4);
}

#[test]
fn test_retry() {
    let fetcher = MockFetcher::new().failing_maps(1);
    let talker = talker(&fetcher, 2);
    let bbox = BoundingBox::from_coords(CANONICAL_CRS, 500000.0, 5900000.0, 500100.0, 5900100.0).unwrap();
    let mut tiles = TileArray::new(&bbox, 10, 10, 10).unwrap();
    talker.fetch_tile(&map_request("1.3.0"), &mut tiles.tiles_mut()[0]);
    let tile = &tiles.tiles()[0];
    assert_eq!(tile.tries, 2);
    assert_eq!(tile.image.as_ref().unwrap().get_pixel(0, 0).0[3], 255);
}

#[test]
fn test_transparent_after_failures() {
    let fetcher = MockFetcher::new().failing_maps(5);
    let talker = talker(&fetcher, 2);
    let bbox = BoundingBox::from_coords(CANONICAL_CRS, 500000.0, 5900000.0, 500100.0, 5900100.0).unwrap();
    let mut tiles = TileArray::new(&bbox, 30, 20, 100).unwrap();
    talker.fetch_tile(&map_request("1.3.0"), &mut tiles.tiles_mut()[0]);
    let tile = &tiles.tiles()[0];
    assert_eq!(fetcher.count("REQUEST=GETMAP"), 2);
    let image = tile.image.as_ref().unwrap();
    assert_eq!(image.dimensions(), (30, 20));
    assert!(image.pixels().all(|p| p.0[3] == 0));
    assert_eq!(talker.stats.results("WMS.dop.failed").len, 1);
}

#[test]
fn test_get_feature() {
    let fetcher = MockFetcher::new().with_response("GetFeature", FEATURE_COLLECTION);
    let talker = talker(&fetcher, 2);
    let bbox = BoundingBox::from_coords(CANONICAL_CRS, 500000.0, 5900000.0, 500500.0, 5900500.0).unwrap();
    let root = talker
        .get_feature("Trees", "http://localhost/wfs", "2.0.0", "app:tree", &bbox, CANONICAL_CRS)
        .unwrap();
    assert_eq!(root.tag().name(), "FeatureCollection");
    let url = &fetcher.requests()[0];
    assert_eq!(param(url, "SERVICE"), Some("wfs"));
    assert_eq!(param(url, "VERSION"), Some("2.0.0"));
    assert_eq!(param(url, "TYPENAMES"), Some("app:tree"));
    assert_eq!(param(url, "BBOX"), Some("500000,5900000,500500,5900500"));
    assert_eq!(param(url, "SRSNAME"), Some("EPSG:25832"));

    let talker = self::talker(&MockFetcher::new(), 2);
    let url = "http://localhost/wfs";
    match talker.get_feature("Trees", url, "2.0.0", "app:tree", &bbox, CANONICAL_CRS) {
        Err(GeoPdfError::LayerNotReceivable { layer, reason }) => {
            assert_eq!(layer, "Trees");
            assert!(reason.starts_with("app:tree: "));
        }
        _ => panic!("feature request should fail"),
    }
}
