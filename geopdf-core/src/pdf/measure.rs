//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Geospatial measure dictionary (ISO 32000-2, Adobe extension level 3)

use crate::core::bbox::BoundingBox;
use crate::core::crs::Crs;
use crate::core::error::{GeoPdfError, Result};
use crate::pdf::surface::{exact_real, real, text, PdfSurface};
use lopdf::{dictionary, Object, ObjectId};

/// Unit square clockwise from lower left
pub const UNIT_SQUARE: [f64; 8] = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];

fn unit_square() -> Vec<Object> {
    UNIT_SQUARE.iter().map(|v| real(*v)).collect()
}

/// Geographic points of the map corners ll, ul, ur, lr in `crs`,
/// each as (northing, easting) or (latitude, longitude)
pub fn geographic_points(bbox: &BoundingBox, crs: Crs) -> Result<Vec<f64>> {
    let corners = bbox.corners_in(crs)?;
    Ok(corners
        .iter()
        .flat_map(|corner| vec![corner.north(), corner.east()])
        .collect())
}

/// Add the coordinate system and measure dictionaries for `bbox` and return
/// the id of the measure dictionary.
pub fn add_measure(surface: &mut PdfSurface, bbox: &BoundingBox, crs: Crs) -> Result<ObjectId> {
    let wkt = crs
        .wkt()
        .ok_or_else(|| GeoPdfError::PdfCreation(format!("no WKT for {}", crs)))?;
    let gpts = geographic_points(bbox, crs)?;
    let cs_type = if crs.is_geographic() { "GEOGCS" } else { "PROJCS" };
    let cs_id = surface.add_object(dictionary! {
        "Type" => cs_type,
        "EPSG" => crs.epsg() as i64,
        "WKT" => text(&wkt),
    });
    let measure_id = surface.add_object(dictionary! {
        "Type" => "Measure",
        "Subtype" => "GEO",
        "Bounds" => unit_square(),
        "LPTS" => unit_square(),
        "GPTS" => gpts.iter().map(|v| exact_real(*v)).collect::<Vec<Object>>(),
        "GCS" => cs_id,
        "DCS" => cs_id,
        "PDU" => vec![Object::from("KM"), Object::from("SQKM"), Object::from("DEG")],
    });
    debug!("Measure dictionary for {} with GPTS {:?}", crs, gpts);
    Ok(measure_id)
}
