//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::capabilities::Capabilities;

pub const WMS_CAPABILITIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms">
  <Service>
    <Name>WMS</Name>
    <Title>Test service</Title>
    <MaxWidth>2048</MaxWidth>
    <MaxHeight>800</MaxHeight>
  </Service>
  <Capability>
    <Layer>
      <Title>Root</Title>
      <CRS>EPSG:4326</CRS>
      <CRS>EPSG:25832</CRS>
      <Layer>
        <Name>default</Name>
      </Layer>
      <Layer queryable="1">
        <Name>dop</Name>
        <Style><Name>rgb</Name></Style>
      </Layer>
      <Layer>
        <Name>roads</Name>
      </Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

#[test]
fn test_parse() {
    let caps = Capabilities::from_bytes(WMS_CAPABILITIES.as_bytes()).unwrap();
    assert_eq!(caps.version.as_deref(), Some("1.3.0"));
    assert_eq!(caps.layers, vec!["dop", "roads"]);
    assert!(caps.has_layer("roads"));
    assert!(!caps.has_layer("rgb"));
    assert!(caps.supports_crs("epsg:25832"));
    assert_eq!(caps.max_width, Some(2048));
    assert_eq!(caps.max_request_pixel(1000), 800);
}

#[test]
fn test_lowercase_limits() {
    let xml = r#"<WMT_MS_Capabilities version="1.1.1"><Service><maxwidth>500</maxwidth></Service>
        <Capability><Layer><SRS>EPSG:4326 EPSG:3857</SRS><Layer><Name>a</Name></Layer></Layer></Capability>
        </WMT_MS_Capabilities>"#;
    let caps = Capabilities::from_bytes(xml.as_bytes()).unwrap();
    assert_eq!(caps.max_request_pixel(1000), 500);
    assert_eq!(caps.crs, vec!["EPSG:4326", "EPSG:3857"]);
    assert_eq!(caps.version.as_deref(), Some("1.1.1"));
}

#[test]
fn test_invalid() {
    assert!(Capabilities::from_bytes(b"<html><body>").is_err());
}
