//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::bbox::BoundingBox;
use crate::core::crs::{CANONICAL_CRS, WGS84};
use crate::core::position::DirectPosition2D;
use crate::draw::geometry::DrawGeometry;
use crate::draw::info::AdditionalInfo;
use crate::draw::style::{LineStringStyle, PointStyle, PolygonStyle};
use crate::pdf::measure::{add_measure, geographic_points};
use crate::pdf::painter::{draw_geometry, GeometryStyles};
use crate::pdf::surface::{save_to, DocumentInfo, PdfSurface};
use crate::raster::image_handler::blank_canvas;
use image::Rgba;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};

fn number(obj: &Object) -> f64 {
    match *obj {
        Object::Integer(i) => i as f64,
        Object::Real(r) => r as f64,
        ref other => panic!("not a number: {:?}", other),
    }
}

fn string(obj: &Object) -> String {
    match *obj {
        Object::String(ref bytes, _) => String::from_utf8_lossy(bytes).to_string(),
        ref other => panic!("not a string: {:?}", other),
    }
}

fn name(obj: &Object) -> &[u8] {
    match *obj {
        Object::Name(ref name) => name,
        ref other => panic!("not a name: {:?}", other),
    }
}

fn deref<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match *obj {
        Object::Reference(id) => doc.get_object(id).unwrap(),
        ref other => other,
    }
}

fn catalog(doc: &Document) -> &Dictionary {
    let root = doc.trailer.get(b"Root").and_then(Object::as_reference).unwrap();
    doc.get_object(root).and_then(Object::as_dict).unwrap()
}

fn reload(surface: PdfSurface) -> Document {
    let info = DocumentInfo {
        title: Some("Test".to_string()),
        author: Some("Tester".to_string()),
        subject: None,
    };
    let mut doc = surface.finish(&info).unwrap();
    let mut buf = Vec::new();
    save_to(&mut doc, &mut buf).unwrap();
    Document::load_mem(&buf).unwrap()
}

#[test]
fn test_catalog() {
    let mut surface = PdfSurface::new(842.0, 595.0);
    surface.begin_layer("GPS-Layer");
    surface.begin_layer("GPS-Track");
    surface.end_layer();
    surface.begin_layer("GPS-Points");
    surface.end_layer();
    surface.end_layer();
    surface.begin_layer("Grid-Layer");
    surface.end_layer();
    assert_eq!(surface.layer_count(), 4);

    let doc = reload(surface);
    assert_eq!(doc.version, "1.7");
    let catalog = catalog(&doc);
    let adbe = catalog
        .get(b"Extensions")
        .and_then(Object::as_dict)
        .and_then(|ext| ext.get(b"ADBE"))
        .and_then(Object::as_dict)
        .unwrap();
    assert_eq!(number(adbe.get(b"ExtensionLevel").unwrap()), 3.0);
    let mark_info = catalog.get(b"MarkInfo").and_then(Object::as_dict).unwrap();
    assert!(mark_info.get(b"UserProperties").and_then(Object::as_bool).unwrap());

    let oc = catalog.get(b"OCProperties").and_then(Object::as_dict).unwrap();
    assert_eq!(oc.get(b"OCGs").and_then(Object::as_array).unwrap().len(), 4);
    let order = oc
        .get(b"D")
        .and_then(Object::as_dict)
        .and_then(|d| d.get(b"Order"))
        .and_then(Object::as_array)
        .unwrap();
    // parent, [children], parent
    assert_eq!(order.len(), 3);
    assert_eq!(order[1].as_array().unwrap().len(), 2);

    let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).unwrap();
    let info = doc.get_object(info_id).and_then(Object::as_dict).unwrap();
    assert_eq!(string(info.get(b"Author").unwrap()), "Tester");
}

#[test]
fn test_images_and_tags() {
    let mut surface = PdfSurface::new(842.0, 595.0);
    let image = blank_canvas(4, 4, Rgba([255, 185, 185, 0]));
    surface.draw_image(&image, 50.0, 50.0, 100.0, 100.0).unwrap();
    surface.draw_image(&image, 150.0, 50.0, 100.0, 100.0).unwrap();
    assert_eq!(surface.image_count(), 2);

    let pos = DirectPosition2D::new(CANONICAL_CRS, 10.0, 20.0);
    let point = DrawGeometry::point(&pos, AdditionalInfo::new().with("Height", "100"));
    let untagged = DrawGeometry::point(&pos, AdditionalInfo::new());
    let (p, l, g) = (
        PointStyle::default(),
        LineStringStyle::default(),
        PolygonStyle::default(),
    );
    let styles = GeometryStyles {
        point: &p,
        line: &l,
        polygon: &g,
    };
    draw_geometry(&mut surface, &point, styles).unwrap();
    draw_geometry(&mut surface, &untagged, styles).unwrap();

    let doc = reload(surface);
    let pages = doc.get_pages();
    let page_id = *pages.get(&1).unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    let images = content.operations.iter().filter(|op| op.operator == "Do").count();
    assert_eq!(images, 2);
    let tagged = content
        .operations
        .iter()
        .filter(|op| op.operator == "BDC")
        .count();
    assert_eq!(tagged, 1);

    let catalog = catalog(&doc);
    let root = deref(&doc, catalog.get(b"StructTreeRoot").unwrap()).as_dict().unwrap();
    let elems = root.get(b"K").and_then(Object::as_array).unwrap();
    assert_eq!(elems.len(), 1);
    let elem = deref(&doc, &elems[0]).as_dict().unwrap();
    let props = elem
        .get(b"A")
        .and_then(Object::as_dict)
        .and_then(|a| a.get(b"P"))
        .and_then(Object::as_array)
        .unwrap();
    let entry = props[0].as_dict().unwrap();
    assert_eq!(string(entry.get(b"N").unwrap()), "Height");
    assert_eq!(string(entry.get(b"V").unwrap()), "100");
}

#[test]
fn test_measure() {
    let bbox = BoundingBox::from_coords(CANONICAL_CRS, 500000.0, 5900000.0, 500500.0, 5900500.0)
        .unwrap();
    let gpts = geographic_points(&bbox, CANONICAL_CRS).unwrap();
    assert_eq!(
        gpts,
        vec![5900000.0, 500000.0, 5900500.0, 500000.0, 5900500.0, 500500.0, 5900000.0, 500500.0]
    );
    let latlon = geographic_points(&bbox, WGS84).unwrap();
    // latitude first, around 9°E 53.2°N
    assert!((latlon[0] - 53.24).abs() < 0.05);
    assert!((latlon[1] - 9.0).abs() < 0.01);

    let mut surface = PdfSurface::new(842.0, 595.0);
    let image = blank_canvas(2, 2, Rgba([255, 185, 185, 0]));
    let image_id = surface.draw_image(&image, 50.0, 50.0, 742.0, 495.0).unwrap();
    let measure_id = add_measure(&mut surface, &bbox, CANONICAL_CRS).unwrap();
    surface
        .set_entry(image_id, "Measure", Object::Reference(measure_id))
        .unwrap();
    surface.add_viewport([50.0, 50.0, 792.0, 545.0], "Map", measure_id);

    let doc = reload(surface);
    let measure = doc.get_object(measure_id).and_then(Object::as_dict).unwrap();
    assert_eq!(name(measure.get(b"Subtype").unwrap()), b"GEO");
    let gpts: Vec<f64> = measure
        .get(b"GPTS")
        .and_then(Object::as_array)
        .unwrap()
        .iter()
        .map(number)
        .collect();
    assert_eq!(gpts[0], 5900000.0);
    assert_eq!(gpts[7], 500500.0);
    assert_eq!(measure.get(b"LPTS").and_then(Object::as_array).unwrap().len(), 8);
    let gcs = deref(&doc, measure.get(b"GCS").unwrap()).as_dict().unwrap();
    assert_eq!(number(gcs.get(b"EPSG").unwrap()), 25832.0);
    assert_eq!(name(gcs.get(b"Type").unwrap()), b"PROJCS");
    assert_eq!(
        measure.get(b"GCS").and_then(Object::as_reference).unwrap(),
        measure.get(b"DCS").and_then(Object::as_reference).unwrap()
    );

    let image = doc.get_object(image_id).and_then(Object::as_stream).unwrap();
    assert_eq!(
        image.dict.get(b"Measure").and_then(Object::as_reference).unwrap(),
        measure_id
    );
    let page_id = *doc.get_pages().get(&1).unwrap();
    let page = doc.get_object(page_id).and_then(Object::as_dict).unwrap();
    assert_eq!(page.get(b"VP").and_then(Object::as_array).unwrap().len(), 1);
}

#[test]
fn test_rollback() {
    let mut surface = PdfSurface::new(200.0, 100.0);
    surface.begin_layer("Kept");
    surface.end_layer();
    let checkpoint = surface.checkpoint();
    surface.begin_layer("Broken");
    surface.begin_tagged(&AdditionalInfo::new().with("k", "v"));
    surface
        .draw_image(&blank_canvas(2, 2, Rgba([0, 0, 0, 255])), 0.0, 0.0, 10.0, 10.0)
        .unwrap();
    assert_eq!(surface.layer_count(), 2);
    assert_eq!(surface.image_count(), 1);

    surface.rollback(checkpoint);
    assert_eq!(surface.checkpoint(), checkpoint);
    assert_eq!(surface.layer_count(), 1);
    assert_eq!(surface.image_count(), 0);
    assert_eq!(surface.operations().len(), 2);

    surface.begin_layer("Next");
    surface.end_layer();
    let doc = reload(surface);
    let order = catalog(&doc)
        .get(b"OCProperties")
        .and_then(Object::as_dict)
        .and_then(|oc| oc.get(b"D"))
        .and_then(Object::as_dict)
        .and_then(|d| d.get(b"Order"))
        .and_then(Object::as_array)
        .unwrap();
    assert_eq!(order.len(), 2);
}

#[test]
fn test_gpts_precision() {
    let bbox = BoundingBox::new(
        DirectPosition2D::new(CANONICAL_CRS, 500000.25, 5900000.3),
        DirectPosition2D::new(CANONICAL_CRS, 500500.75, 5900500.7),
    )
    .unwrap();
    let mut surface = PdfSurface::new(842.0, 595.0);
    add_measure(&mut surface, &bbox, CANONICAL_CRS).unwrap();
    let mut doc = surface.finish(&DocumentInfo::default()).unwrap();
    let mut buf = Vec::new();
    save_to(&mut doc, &mut buf).unwrap();

    let content = String::from_utf8_lossy(&buf);
    assert!(!content.contains("GeoPdfReal"));
    let start = content.find("/GPTS").unwrap();
    let array = &content[start..];
    let array = &array[array.find('[').unwrap() + 1..array.find(']').unwrap()];
    let gpts: Vec<f64> = array
        .split_whitespace()
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(
        gpts,
        vec![5900000.3, 500000.25, 5900500.7, 500000.25, 5900500.7, 500500.75, 5900000.3, 500500.75]
    );

    // padded numbers keep the file loadable
    let doc = Document::load_mem(&buf).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}
