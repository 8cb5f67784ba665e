//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! GML feature collection reader

use elementtree::Element;
use geopdf_core::core::crs::Crs;
use geopdf_core::core::position::DirectPosition2D;
use geopdf_core::draw::geometry::DrawGeometry;
use geopdf_core::draw::info::AdditionalInfo;

fn is_member(name: &str) -> bool {
    name == "featureMember" || name == "member" || name == "featureMembers"
}

fn is_geometry(name: &str) -> bool {
    name == "Point" || name == "LineString" || name == "LinearRing"
}

/// Positions of the first `pos` or `posList` below `el`.
/// Coordinates are read pairwise as easting, northing.
fn positions(el: &Element, crs: Crs) -> Option<Vec<DirectPosition2D>> {
    let name = el.tag().name();
    if name == "pos" || name == "posList" {
        let values: Result<Vec<f64>, _> = el.text().split_whitespace().map(|v| v.parse::<f64>()).collect();
        return match values {
            Ok(ref values) if !values.is_empty() && values.len() % 2 == 0 => Some(
                values
                    .chunks(2)
                    .map(|pair| DirectPosition2D::new(crs, pair[0], pair[1]))
                    .collect(),
            ),
            _ => {
                warn!("Skipping malformed {} `{}`", name, el.text().trim());
                None
            }
        };
    }
    el.children().filter_map(|child| positions(child, crs)).next()
}

/// Attributes of a feature: leaf elements with text
fn feature_info(feature: &Element) -> AdditionalInfo {
    let mut info = AdditionalInfo::new();
    for child in feature.children() {
        let text = child.text().trim();
        if child.children().next().is_none() && !text.is_empty() {
            info.add(child.tag().name(), text);
        }
    }
    if let Some(id) = feature.get_attr(("http://www.opengis.net/gml", "id")) {
        info.add("gml:id", id);
    } else if let Some(id) = feature.get_attr(("http://www.opengis.net/gml/3.2", "id")) {
        info.add("gml:id", id);
    }
    info
}

fn collect(el: &Element, crs: Crs, info: &AdditionalInfo, geometries: &mut Vec<DrawGeometry>) {
    let name = el.tag().name();
    if is_geometry(name) {
        match positions(el, crs) {
            Some(ref coords) if name == "Point" => {
                geometries.push(DrawGeometry::point(&coords[0], info.clone()))
            }
            Some(ref coords) if coords.len() < 2 => warn!("Skipping {} with a single position", name),
            Some(ref coords) if name == "LineString" => {
                geometries.push(DrawGeometry::line_string(coords, info.clone()))
            }
            Some(ref coords) if coords.len() < 3 => warn!("Skipping ring with {} positions", coords.len()),
            Some(ref coords) => geometries.push(DrawGeometry::polygon(coords, info.clone())),
            None => {}
        }
        return;
    }
    for child in el.children() {
        if is_member(name) {
            let feature_info = feature_info(child);
            collect(child, crs, &feature_info, geometries);
        } else {
            collect(child, crs, info, geometries);
        }
    }
}

/// Collect points, line strings and polygon rings of a GetFeature response
pub fn read_features(root: &Element, crs: Crs) -> Vec<DrawGeometry> {
    let mut geometries = Vec::new();
    collect(root, crs, &AdditionalInfo::new(), &mut geometries);
    geometries
}
