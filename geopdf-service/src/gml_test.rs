//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::gml::read_features;
use elementtree::Element;
use geopdf_core::core::crs::CANONICAL_CRS;

pub const FEATURE_COLLECTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0"
    xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:app="http://example.com/app">
  <wfs:member>
    <app:tree gml:id="tree.1">
      <app:species>Oak</app:species>
      <app:geom><gml:Point srsName="EPSG:25832"><gml:pos>500100 5900100</gml:pos></gml:Point></app:geom>
    </app:tree>
  </wfs:member>
  <wfs:member>
    <app:road gml:id="road.7">
      <app:name>Main Street</app:name>
      <app:geom><gml:LineString><gml:posList>500000 5900050 500250 5900050 500600 5900300</gml:posList></gml:LineString></app:geom>
    </app:road>
  </wfs:member>
  <wfs:member>
    <app:parcel>
      <app:geom><gml:Polygon><gml:exterior><gml:LinearRing>
        <gml:posList>500100 5900100 500100 5900200 500200 5900200 500200 5900100 500100 5900100</gml:posList>
      </gml:LinearRing></gml:exterior></gml:Polygon></app:geom>
    </app:parcel>
  </wfs:member>
  <wfs:member>
    <app:broken>
      <app:geom><gml:Point><gml:pos>500100 north</gml:pos></gml:Point></app:geom>
    </app:broken>
  </wfs:member>
  <wfs:member>
    <app:odd>
      <app:geom><gml:LineString><gml:posList>1 2 3</gml:posList></gml:LineString></app:geom>
    </app:odd>
  </wfs:member>
</wfs:FeatureCollection>"#;

#[test]
fn test_read_features() {
    let root = Element::from_reader(FEATURE_COLLECTION.as_bytes()).unwrap();
    let features = read_features(&root, CANONICAL_CRS);
    let kinds: Vec<_> = features.iter().map(|f| f.variant_name()).collect();
    assert_eq!(kinds, vec!["Point", "LineString", "Polygon"]);

    let tree = &features[0];
    assert_eq!(tree.info.get("species"), Some("Oak"));
    assert_eq!(tree.info.get("gml:id"), Some("tree.1"));
    let c = tree.coords()[0];
    assert_eq!((c.x, c.y), (500100.0, 5900100.0));

    assert_eq!(features[1].info.get("name"), Some("Main Street"));
    assert_eq!(features[1].coords().len(), 3);
    assert_eq!(features[2].area(), 10000.0);
}
