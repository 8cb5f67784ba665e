//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::bbox::BoundingBox;
use crate::core::crs::CANONICAL_CRS;
use crate::raster::image_handler::*;
use crate::raster::tile::TileArray;
use image::{Rgba, RgbaImage};

#[test]
fn test_estimate() {
    assert!((estimated_megabytes(4000, 4000) - 30.52).abs() < 0.01);
    assert!((estimated_megabytes(12000, 12000) - 274.66).abs() < 0.01);
}

#[test]
fn test_png_roundtrip() {
    let image = blank_canvas(3, 2, Rgba([255, 185, 185, 0]));
    let png = encode_png(&image).unwrap();
    let decoded = decode(&png).unwrap();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.get_pixel(2, 1), &Rgba([255, 185, 185, 0]));
    assert!(decode(b"no image").is_err());
}

#[test]
fn test_compose_quadrants() {
    let bbox = BoundingBox::from_coords(CANONICAL_CRS, 0.0, 0.0, 100.0, 100.0).unwrap();
    let mut array = TileArray::new(&bbox, 20, 20, 10).unwrap();
    for tile in array.tiles_mut() {
        let shade = (tile.column() * 100 + tile.row() * 10) as u8;
        let image = RgbaImage::from_pixel(1, 1, Rgba([shade, 0, 0, 255]));
        tile.image = Some(fit(image, tile.width(), tile.height()));
    }
    let composed = compose(array.tiles(), 20, 20);
    assert_eq!(composed.dimensions(), (20, 20));
    assert_eq!(composed.get_pixel(0, 0)[0], 0);
    assert_eq!(composed.get_pixel(15, 5)[0], 100);
    assert_eq!(composed.get_pixel(5, 15)[0], 10);
    assert_eq!(composed.get_pixel(19, 19)[0], 110);
}

#[test]
fn test_alpha() {
    let mut image = blank_canvas(2, 2, Rgba([10, 20, 30, 255]));
    apply_alpha(&mut image, 128);
    assert_eq!(image.get_pixel(0, 0)[3], 128);
    let (rgb, alpha) = split_alpha(&image);
    assert_eq!(rgb.len(), 12);
    assert_eq!(alpha.unwrap(), vec![128; 4]);

    let opaque = blank_canvas(1, 1, Rgba([1, 2, 3, 255]));
    assert_eq!(split_alpha(&opaque), (vec![1, 2, 3], None));
}
